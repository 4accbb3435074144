use std::ops::Not;

use super::error::{QRError, QRResult};

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Color {
    pub fn select<T>(self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

// Version
//------------------------------------------------------------------------------

pub const MIN_VERSION: usize = 1;
pub const MAX_VERSION: usize = 5;

/// A validated QR symbol version. Only versions 1 through 5 are supported:
/// they share the single-block EC-L codeword layout and a single alignment
/// pattern, which the rest of the pipeline relies on.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(usize);

impl Version {
    pub const fn new(version: usize) -> QRResult<Self> {
        match version {
            MIN_VERSION..=MAX_VERSION => Ok(Self(version)),
            _ => Err(QRError::InvalidVersion),
        }
    }

    pub const fn number(self) -> usize {
        self.0
    }

    pub const fn width(self) -> i16 {
        (self.0 * 4 + 17) as i16
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0 - 1]
    }

    pub fn ecc_len(self) -> usize {
        ECC_LEN[self.0 - 1]
    }

    pub fn data_codewords(self) -> usize {
        self.total_codewords() - self.ecc_len()
    }

    // 4b mode indicator + 8b char count + 4b terminator consume 2 codewords
    pub fn max_payload_len(self) -> usize {
        self.data_codewords() - 2
    }

    pub fn data_bit_capacity(self) -> usize {
        self.data_codewords() << 3
    }

    pub fn total_bit_capacity(self) -> usize {
        self.total_codewords() << 3
    }

    pub const fn has_alignment_pattern(self) -> bool {
        self.0 > 1
    }
}

#[cfg(test)]
mod version_tests {
    use test_case::test_case;

    use super::Version;
    use crate::common::error::QRError;

    #[test_case(1, 21, 26, 7)]
    #[test_case(2, 25, 44, 10)]
    #[test_case(3, 29, 70, 15)]
    #[test_case(4, 33, 100, 20)]
    #[test_case(5, 37, 134, 26)]
    fn test_version_constants(v: usize, width: i16, total: usize, ecc: usize) {
        let ver = Version::new(v).unwrap();
        assert_eq!(ver.width(), width);
        assert_eq!(ver.total_codewords(), total);
        assert_eq!(ver.ecc_len(), ecc);
        assert_eq!(ver.data_codewords(), total - ecc);
        assert_eq!(ver.max_payload_len(), total - ecc - 2);
    }

    #[test_case(0)]
    #[test_case(6)]
    #[test_case(40)]
    fn test_unsupported_version(v: usize) {
        assert_eq!(Version::new(v), Err(QRError::InvalidVersion));
    }
}

// Encoding constants
//------------------------------------------------------------------------------

pub const MODE_BYTE: u8 = 0b0100;
pub const MODE_INDICATOR_BIT_LEN: usize = 4;
pub const CHAR_COUNT_BIT_LEN: usize = 8;
pub const TERMINATOR_BIT_LEN: usize = 4;

pub static PADDING_CODEWORDS: [u8; 2] = [0b11101100, 0b00010001];

// Format info
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;

// Precomputed BCH(15, 5) sequences for EC level L, indexed by mask pattern
pub static FORMAT_INFOS: [u16; 8] = [
    0b111011111000100,
    0b111001011110011,
    0b111110110101010,
    0b111100010011101,
    0b110011000101111,
    0b110001100011000,
    0b110110001000001,
    0b110100101110110,
];

// Both strips consume the 15 bits MSB first. The row strip runs left to
// right along row 8, the column strip bottom to top along column 8; each
// skips the finder footprint and the timing intersection.
pub static FORMAT_INFO_COORDS_ROW: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

pub static FORMAT_INFO_COORDS_COL: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

// Capacity tables
//------------------------------------------------------------------------------

static TOTAL_CODEWORDS: [usize; 5] = [26, 44, 70, 100, 134];

static ECC_LEN: [usize; 5] = [7, 10, 15, 20, 26];
