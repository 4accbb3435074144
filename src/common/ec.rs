// Reed-Solomon error correction codeword generator
//------------------------------------------------------------------------------

/// Computes `ecc_count` error correction codewords for a block of data
/// codewords, as the remainder of polynomial long division by the generator
/// polynomial over GF(256) with modulus 0x11D. A non-positive codeword count
/// is a no-op by caller convention, not an error.
pub fn ecc(block: &[u8], ecc_count: usize) -> Vec<u8> {
    if ecc_count == 0 {
        return Vec::new();
    }

    let gen_poly = generator_polynomial(ecc_count);
    let len = block.len();

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i];
        if lead_coeff == 0 {
            continue;
        }

        for (u, v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            *u ^= mul(*v, lead_coeff);
        }
    }

    res.split_off(len)
}

fn generator_polynomial(ecc_count: usize) -> &'static [u8] {
    match ecc_count {
        7 => &GEN_POLY_7,
        10 => &GEN_POLY_10,
        15 => &GEN_POLY_15,
        20 => &GEN_POLY_20,
        26 => &GEN_POLY_26,
        _ => unreachable!("No generator polynomial for ecc count {ecc_count}"),
    }
}

// Galois field tables
//------------------------------------------------------------------------------

const GF_MODULUS: usize = 0x11D;

const EXP_TABLE: [u8; 255] = exp_table();

const LOG_TABLE: [u8; 256] = log_table();

const fn exp_table() -> [u8; 255] {
    let mut table = [0u8; 255];
    let mut value: usize = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = value as u8;
        value <<= 1;
        if value & 0x100 != 0 {
            value ^= GF_MODULUS;
        }
        i += 1;
    }
    table
}

const fn log_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[EXP_TABLE[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let mut log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    if log_sum >= 255 {
        log_sum -= 255;
    }
    EXP_TABLE[log_sum]
}

// Generator polynomials
//------------------------------------------------------------------------------

// Trailing coefficients of prod (x + a^i) for i in 0..N, highest degree
// first; the leading coefficient is always 1 and is dropped.
const fn generator_coefficients<const N: usize>() -> [u8; N] {
    let mut poly = [0u8; MAX_ECC_LEN + 1];
    poly[0] = 1;
    let mut degree = 0;
    while degree < N {
        let root = EXP_TABLE[degree];
        let mut next = [0u8; MAX_ECC_LEN + 1];
        let mut i = 0;
        while i <= degree {
            next[i] ^= poly[i];
            next[i + 1] ^= mul(poly[i], root);
            i += 1;
        }
        poly = next;
        degree += 1;
    }
    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        out[i] = poly[i + 1];
        i += 1;
    }
    out
}

static GEN_POLY_7: [u8; 7] = generator_coefficients::<7>();
static GEN_POLY_10: [u8; 10] = generator_coefficients::<10>();
static GEN_POLY_15: [u8; 15] = generator_coefficients::<15>();
static GEN_POLY_20: [u8; 20] = generator_coefficients::<20>();
static GEN_POLY_26: [u8; 26] = generator_coefficients::<26>();

const MAX_ECC_LEN: usize = 26;

#[cfg(test)]
mod ec_tests {
    use test_case::test_case;

    use super::{ecc, mul, GEN_POLY_10};

    #[test]
    fn test_poly_mod() {
        let res = ecc(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10);
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_generator_polynomial_10() {
        // Log-domain form of the degree-10 generator polynomial
        let exp_logs = [251, 67, 46, 61, 118, 70, 64, 94, 32, 45];
        let logs = GEN_POLY_10.map(|c| super::LOG_TABLE[c as usize]);
        assert_eq!(logs, exp_logs);
    }

    #[test_case(7)]
    #[test_case(10)]
    #[test_case(15)]
    #[test_case(20)]
    #[test_case(26)]
    fn test_ecc_len(count: usize) {
        assert_eq!(ecc(&[0x12; 30], count).len(), count);
        assert_eq!(ecc(&[0; 19], count), vec![0; count]);
    }

    #[test]
    fn test_ecc_zero_count() {
        assert!(ecc(&[0x12; 19], 0).is_empty());
    }

    // The remainder of data || ecc(data) must be zero
    #[test_case(7)]
    #[test_case(26)]
    fn test_ecc_remainder(count: usize) {
        let data = b"qrgen self check payload".to_vec();
        let mut codewords = data.clone();
        codewords.extend(ecc(&data, count));
        assert_eq!(ecc(&codewords, count), vec![0; count]);
    }

    // Polynomial remainder is linear over GF(256)
    #[test]
    fn test_ecc_linearity() {
        let a = b"first check block".to_vec();
        let b = b"other check block".to_vec();
        let sum = a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect::<Vec<_>>();
        let ecc_sum = ecc(&a, 15)
            .iter()
            .zip(ecc(&b, 15).iter())
            .map(|(x, y)| x ^ y)
            .collect::<Vec<_>>();
        assert_eq!(ecc(&sum, 15), ecc_sum);
    }

    #[test]
    fn test_mul() {
        assert_eq!(mul(0, 7), 0);
        assert_eq!(mul(7, 0), 0);
        assert_eq!(mul(1, 91), 91);
        assert_eq!(mul(2, 0x80), 0x1D);
    }
}
