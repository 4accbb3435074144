use super::metadata::Version;

// Iterator for placing data in the encoding region
//------------------------------------------------------------------------------

/// Cursor over the data region traversal: starts at the bottom-right
/// 2-column pair, scans it upward then the next pair downward, shifting two
/// columns left at each boundary (three when the pair would land on the
/// vertical timing column). Yields every cell of the zigzag; reserved cells
/// are filtered by the caller.
pub struct EncRegionIter {
    r: i16,
    // Right column of the current 2-column pair
    c: i16,
    width: i16,
    upward: bool,
    on_right: bool,
}

const VERT_TIMING_COL: i16 = 6;

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let w = version.width();
        Self { r: w - 1, c: w - 1, width: w, upward: true, on_right: true }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 1 {
            return None;
        }

        let res = (self.r, if self.on_right { self.c } else { self.c - 1 });

        if self.on_right {
            self.on_right = false;
        } else {
            self.on_right = true;
            let next_r = if self.upward { self.r - 1 } else { self.r + 1 };
            if next_r < 0 || next_r >= self.width {
                self.upward = !self.upward;
                self.c -= 2;
                if self.c == VERT_TIMING_COL {
                    self.c -= 1;
                }
            } else {
                self.r = next_r;
            }
        }

        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use std::collections::HashSet;

    use super::EncRegionIter;
    use crate::common::metadata::Version;

    #[test]
    fn test_traversal_start() {
        let version = Version::new(1).unwrap();
        let coords = EncRegionIter::new(version).take(8).collect::<Vec<_>>();
        let exp = [
            (20, 20),
            (20, 19),
            (19, 20),
            (19, 19),
            (18, 20),
            (18, 19),
            (17, 20),
            (17, 19),
        ];
        assert_eq!(coords, exp);
    }

    #[test]
    fn test_direction_flip_and_timing_skip() {
        let version = Version::new(1).unwrap();
        let coords = EncRegionIter::new(version).collect::<Vec<_>>();
        let w = 21;

        // Top boundary of the first pair flips into a downward pair
        let flip = coords.iter().position(|&rc| rc == (0, 19)).unwrap();
        assert_eq!(coords[flip + 1], (0, 18));
        assert_eq!(coords[flip + 2], (0, 17));
        assert_eq!(coords[flip + 3], (1, 18));

        // Pair after (8, 7) skips the vertical timing column entirely
        assert!(coords.iter().all(|&(_, c)| c != 6));
        let last_before_skip = coords.iter().position(|&rc| rc == (0, 7)).unwrap();
        assert_eq!(coords[last_before_skip + 1], (0, 5));

        // Every cell outside the timing column is visited exactly once
        assert_eq!(coords.len(), w * (w - 1));
        let unique = coords.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), coords.len());
    }

    #[test]
    fn test_traversal_end() {
        let version = Version::new(2).unwrap();
        let last = EncRegionIter::new(version).last().unwrap();
        assert!(last == (0, 0) || last == (24, 0));
    }
}
