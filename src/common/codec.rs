use super::bitstream::BitStream;
use super::ec;
use super::metadata::{
    Version, CHAR_COUNT_BIT_LEN, MODE_BYTE, MODE_INDICATOR_BIT_LEN, PADDING_CODEWORDS,
    TERMINATOR_BIT_LEN,
};

// Encoder
//------------------------------------------------------------------------------

/// Converts `text` to Latin-1 bytes for a byte-mode payload. Characters
/// outside the Latin-1 range are substituted by `encoding_rs`.
pub fn text_to_bytes(text: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(text);
    bytes.into_owned()
}

/// Encodes `data` into the full codeword bit stream for `ver`: header, byte
/// payload, terminator, padding codewords and error correction. Payloads
/// longer than the version capacity are silently truncated.
pub fn encode(data: &[u8], ver: Version) -> BitStream {
    let payload = &data[..data.len().min(ver.max_payload_len())];
    let mut out = BitStream::new(ver.total_bit_capacity());
    push_header(&mut out, payload.len() as u8);
    push_byte_data(&mut out, payload);
    push_terminator(&mut out);
    pad_remaining_capacity(&mut out, ver);
    push_error_correction(&mut out, ver);
    out
}

fn push_header(out: &mut BitStream, char_count: u8) {
    out.push_bits(MODE_BYTE, MODE_INDICATOR_BIT_LEN);
    out.push_bits(char_count, CHAR_COUNT_BIT_LEN);
}

fn push_byte_data(out: &mut BitStream, payload: &[u8]) {
    for &b in payload {
        out.push_bits(b, 8);
    }
}

fn push_terminator(out: &mut BitStream) {
    out.push_bits(0u8, TERMINATOR_BIT_LEN);
}

// Fills the data region up to capacity with alternating padding codewords.
// The terminator leaves the stream nibble-aligned on a byte boundary, so
// whole codewords always fit exactly.
fn pad_remaining_capacity(out: &mut BitStream, ver: Version) {
    debug_assert!(out.len() % 8 == 0, "Stream not byte aligned after terminator");
    let padding_len = (ver.data_bit_capacity() - out.len()) / 8;
    for i in 0..padding_len {
        out.push_bits(PADDING_CODEWORDS[i % 2], 8);
    }
}

fn push_error_correction(out: &mut BitStream, ver: Version) {
    let ecc = ec::ecc(out.data(), ver.ecc_len());
    out.extend(&ecc);
}
