use std::ops::Deref;

use super::bitstream::BitStream;
use super::metadata::Color;
use crate::builder::qr::QR;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid mask pattern");
        Self(pattern)
    }

    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_stripes,
            0b010 => mask_functions::vertical_stripes,
            0b011 => mask_functions::diagonal_stripes,
            0b100 => mask_functions::coarse_checkerboard,
            0b101 => mask_functions::plus_fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::interleaved,
            _ => unreachable!("Invalid mask pattern"),
        }
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_stripes(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_stripes(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_stripes(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn coarse_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn plus_fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn interleaved(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

// Penalty evaluation
//------------------------------------------------------------------------------

// Maximal same-color runs of length l >= 5 score 3 + (l - 5) each
fn compute_run_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut penalty = 0;
    for i in 0..w {
        penalty += line_run_penalty((0..w).map(|j| *qr.get(i, j)));
        penalty += line_run_penalty((0..w).map(|j| *qr.get(j, i)));
    }
    penalty
}

fn line_run_penalty(line: impl Iterator<Item = Color>) -> u32 {
    let mut penalty = 0;
    let mut run_color = None;
    let mut run_len = 0u32;
    for color in line {
        if run_color == Some(color) {
            run_len += 1;
        } else {
            if run_len >= 5 {
                penalty += run_len - 2;
            }
            run_color = Some(color);
            run_len = 1;
        }
    }
    if run_len >= 5 {
        penalty += run_len - 2;
    }
    penalty
}

// Each single-color 2x2 window scores 3; windows overlap
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut penalty = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let color = *qr.get(r, c);
            if color == *qr.get(r + 1, c)
                && color == *qr.get(r, c + 1)
                && color == *qr.get(r + 1, c + 1)
            {
                penalty += 3;
            }
        }
    }
    penalty
}

// Fully in-bounds 11-cell windows matching a finder-like sequence, in either
// orientation and either direction, score 40 each
fn compute_finder_line_penalty(qr: &QR) -> u32 {
    static PATTERN: [Color; 11] = [
        Color::Light,
        Color::Light,
        Color::Light,
        Color::Light,
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];

    let w = qr.width() as i16;
    let window_penalty = |window: &[Color; 11]| -> u32 {
        let matches_forward = window.iter().eq(PATTERN.iter());
        let matches_reverse = window.iter().rev().eq(PATTERN.iter());
        40 * (matches_forward as u32 + matches_reverse as u32)
    };

    let mut penalty = 0;
    for i in 0..w {
        for j in 0..=w - 11 {
            let mut row_window = [Color::Light; 11];
            let mut col_window = [Color::Light; 11];
            for k in 0..11 {
                row_window[k as usize] = *qr.get(i, j + k);
                col_window[k as usize] = *qr.get(j + k, i);
            }
            penalty += window_penalty(&row_window);
            penalty += window_penalty(&col_window);
        }
    }
    penalty
}

// Deviation of the dark-cell share from 50%, in 5% steps, scored double
fn compute_balance_penalty(qr: &QR) -> u32 {
    let total = qr.width() * qr.width();
    let pct = qr.count_dark_modules() * 100 / total;
    let low = pct - pct % 5;
    let high = low + 5;
    2 * low.abs_diff(50).min(high.abs_diff(50)) as u32
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    compute_run_penalty(qr)
        + compute_block_penalty(qr)
        + compute_finder_line_penalty(qr)
        + compute_balance_penalty(qr)
}

// Mask selection
//------------------------------------------------------------------------------

/// Runs one mask trial: clones the skeleton, writes the format info for
/// `pattern` and places the data bits under it. Trials share nothing but
/// read-only inputs, so the eight candidates are independent of each other.
pub fn mask_trial(skeleton: &QR, bits: &BitStream, pattern: MaskPattern) -> QR {
    let mut qr = skeleton.clone();
    qr.draw_format_info(pattern);
    qr.draw_data(bits, pattern);
    qr
}

/// Scores all eight mask candidates and returns the one with the lowest
/// penalty. Comparison is strict, so the lowest pattern id wins ties.
pub fn find_best_mask(skeleton: &QR, bits: &BitStream) -> (QR, MaskPattern) {
    let mut best_pattern = MaskPattern::new(0);
    let mut best_qr = mask_trial(skeleton, bits, best_pattern);
    let mut best_penalty = compute_total_penalty(&best_qr);
    for m in 1..8 {
        let pattern = MaskPattern::new(m);
        let qr = mask_trial(skeleton, bits, pattern);
        let penalty = compute_total_penalty(&qr);
        if penalty < best_penalty {
            best_qr = qr;
            best_pattern = pattern;
            best_penalty = penalty;
        }
    }
    (best_qr, best_pattern)
}

#[cfg(test)]
mod mask_function_tests {
    use test_case::test_case;

    use super::MaskPattern;

    #[test_case(0, &[(0, 0, true), (0, 1, false), (1, 0, false), (2, 4, true)])]
    #[test_case(1, &[(0, 5, true), (1, 5, false), (2, 0, true)])]
    #[test_case(2, &[(4, 0, true), (4, 1, false), (4, 3, true)])]
    #[test_case(3, &[(0, 0, true), (1, 2, true), (2, 2, false)])]
    #[test_case(4, &[(0, 0, true), (0, 2, true), (0, 3, false), (2, 0, false)])]
    #[test_case(5, &[(0, 3, true), (1, 1, false), (2, 2, false), (3, 3, false)])]
    #[test_case(6, &[(0, 0, true), (1, 1, true), (1, 5, false), (2, 3, true)])]
    #[test_case(7, &[(0, 0, true), (0, 1, false), (1, 2, false), (3, 3, true)])]
    fn test_mask_functions(pattern: u8, cases: &[(i16, i16, bool)]) {
        let f = MaskPattern::new(pattern).mask_function();
        for &(r, c, exp) in cases {
            assert_eq!(f(r, c), exp, "pattern {pattern} at ({r}, {c})");
        }
    }

    #[test]
    #[should_panic]
    fn test_invalid_mask_pattern() {
        MaskPattern::new(8);
    }
}
