use image::{GrayImage, Luma};
use std::ops::Deref;

use crate::common::bitstream::BitStream;
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    Color, Version, FORMAT_INFOS, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_COL,
    FORMAT_INFO_COORDS_ROW,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    mask: Option<MaskPattern>,
}

// QR grid
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version) -> Self {
        let w = ver.width() as usize;
        Self { grid: vec![Module::Empty; w * w], w, ver, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row {r} out of bounds for width {w}");
        debug_assert!(-w <= c && c < w, "Column {c} out of bounds for width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}


// Pattern templates
//------------------------------------------------------------------------------

/// Stamping source for the fixed markers. Rings are traced edge by edge from
/// the outside in, so inner rings overwrite nothing they shouldn't; `None`
/// cells are transparent and leave the target untouched.
struct PatternTemplate {
    cells: Vec<Option<Color>>,
    w: i16,
}

impl PatternTemplate {
    fn new(w: i16) -> Self {
        Self { cells: vec![None; (w * w) as usize], w }
    }

    // 7x7: dark ring, light ring, dark ring, dark center
    fn finder() -> Self {
        let mut t = Self::new(7);
        t.draw_ring(0, Color::Dark);
        t.draw_ring(1, Color::Light);
        t.draw_ring(2, Color::Dark);
        t.draw_center(Color::Dark);
        t
    }

    // 8x8 light border; the finder is stamped over the interior
    fn separator() -> Self {
        let mut t = Self::new(8);
        t.draw_ring(0, Color::Light);
        t
    }

    // 5x5: dark ring, light ring, dark center
    fn alignment() -> Self {
        let mut t = Self::new(5);
        t.draw_ring(0, Color::Dark);
        t.draw_ring(1, Color::Light);
        t.draw_center(Color::Dark);
        t
    }

    fn draw_ring(&mut self, ring: i16, color: Color) {
        let last = self.w - 1 - ring;
        for i in ring..=last {
            self.set(ring, i, color);
            self.set(last, i, color);
            self.set(i, ring, color);
            self.set(i, last, color);
        }
    }

    fn draw_center(&mut self, color: Color) {
        debug_assert!(self.w & 1 == 1, "Even-sided template has no center cell");
        self.set(self.w >> 1, self.w >> 1, color);
    }

    fn set(&mut self, r: i16, c: i16, color: Color) {
        self.cells[(r * self.w + c) as usize] = Some(color);
    }

    /// Stamps the template onto `qr` with its top-left corner at `(r0, c0)`.
    /// Negative corners wrap from the bottom/right edge.
    fn stamp(&self, qr: &mut QR, r0: i16, c0: i16) {
        for i in 0..self.w {
            for j in 0..self.w {
                if let Some(color) = self.cells[(i * self.w + j) as usize] {
                    qr.set(r0 + i, c0 + j, Module::Func(color));
                }
            }
        }
    }
}


// Function patterns
//------------------------------------------------------------------------------

impl QR {
    /// Draws every fixed marker: the three finder patterns inside their
    /// separators, the timing patterns, the alignment pattern where the
    /// version calls for one, and the dark module.
    pub fn draw_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_patterns();
        self.draw_alignment_pattern();
        self.set(-8, 8, Module::Func(Color::Dark));
    }

    fn draw_finder_patterns(&mut self) {
        let separator = PatternTemplate::separator();
        let finder = PatternTemplate::finder();
        for ((sr, sc), (fr, fc)) in [((0, 0), (0, 0)), ((0, -8), (0, -7)), ((-8, 0), (-7, 0))] {
            separator.stamp(self, sr, sc);
            finder.stamp(self, fr, fc);
        }
    }

    fn draw_timing_patterns(&mut self) {
        let w = self.w as i16;
        for i in 8..=w - 9 {
            let color = if i & 1 == 0 { Color::Dark } else { Color::Light };
            self.set(6, i, Module::Func(color));
            self.set(i, 6, Module::Func(color));
        }
    }

    fn draw_alignment_pattern(&mut self) {
        if !self.ver.has_alignment_pattern() {
            return;
        }
        PatternTemplate::alignment().stamp(self, -9, -9);
    }
}

#[cfg(test)]
mod function_pattern_tests {
    use super::{Module, QR};
    use crate::common::metadata::{Color, Version};

    #[test]
    fn test_finder_patterns() {
        let mut qr = QR::new(Version::new(1).unwrap());
        qr.draw_finder_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.....Ffffffff\n\
             fFFFFFfF.....FfFFFFFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFFFFFfF.....FfFFFFFf\n\
             fffffffF.....Ffffffff\n\
             FFFFFFFF.....FFFFFFFF\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             FFFFFFFF.............\n\
             fffffffF.............\n\
             fFFFFFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFFFFFfF.............\n\
             fffffffF.............\n"
        );
    }

    #[test]
    fn test_timing_patterns() {
        let mut qr = QR::new(Version::new(1).unwrap());
        qr.draw_timing_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........fFfFf........\n\
             .....................\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n"
        );
    }

    #[test]
    fn test_alignment_pattern_absent_for_version_1() {
        let mut qr = QR::new(Version::new(1).unwrap());
        qr.draw_alignment_pattern();
        assert!(qr.grid.iter().all(|&m| m == Module::Empty));
    }

    #[test]
    fn test_finder_and_alignment_patterns_2() {
        let mut qr = QR::new(Version::new(2).unwrap());
        qr.draw_finder_patterns();
        qr.draw_alignment_pattern();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.........Ffffffff\n\
             fFFFFFfF.........FfFFFFFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFFFFFfF.........FfFFFFFf\n\
             fffffffF.........Ffffffff\n\
             FFFFFFFF.........FFFFFFFF\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             ................fffff....\n\
             FFFFFFFF........fFFFf....\n\
             fffffffF........fFfFf....\n\
             fFFFFFfF........fFFFf....\n\
             fFfffFfF........fffff....\n\
             fFfffFfF.................\n\
             fFfffFfF.................\n\
             fFFFFFfF.................\n\
             fffffffF.................\n"
        );
    }

    #[test]
    fn test_function_patterns_1() {
        let mut qr = QR::new(Version::new(1).unwrap());
        qr.draw_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.....Ffffffff\n\
             fFFFFFfF.....FfFFFFFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFFFFFfF.....FfFFFFFf\n\
             fffffffFfFfFfFfffffff\n\
             FFFFFFFF.....FFFFFFFF\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             FFFFFFFFf............\n\
             fffffffF.............\n\
             fFFFFFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFFFFFfF.............\n\
             fffffffF.............\n"
        );
    }

    #[test]
    fn test_dark_module() {
        let mut qr = QR::new(Version::new(3).unwrap());
        qr.draw_function_patterns();
        assert_eq!(qr.get(-8, 8), Module::Func(Color::Dark));
    }
}

// Format info
//------------------------------------------------------------------------------

impl QR {
    /// Writes the 15-bit format sequence for `pattern` into both strips
    /// around the top-left finder and records the pattern on the grid.
    pub fn draw_format_info(&mut self, pattern: MaskPattern) {
        let format_info = FORMAT_INFOS[*pattern as usize];
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_ROW,
        );
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_COL,
        );
        self.mask = Some(pattern);
    }

    fn draw_number(
        &mut self,
        number: u16,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Places the payload bits into every cell the function patterns and
    /// format info left empty, in zigzag order, applying `pattern` to each
    /// bit. Once the stream runs out the remaining cells are filled as
    /// masked zero bits.
    pub fn draw_data(&mut self, bits: &BitStream, pattern: MaskPattern) {
        let mask_fn = pattern.mask_function();
        let mut bits = bits.iter();
        for (r, c) in EncRegionIter::new(self.ver) {
            if !matches!(self.get(r, c), Module::Empty) {
                continue;
            }
            let bit = bits.next().unwrap_or(false);
            let color = if bit ^ mask_fn(r, c) { Color::Dark } else { Color::Light };
            self.set(r, c, Module::Data(color));
        }

        debug_assert!(
            !self.grid.contains(&Module::Empty),
            "Empty module found after data placement"
        );
    }
}


// Render
//------------------------------------------------------------------------------

impl QR {
    pub fn render(&self, module_sz: u32) -> GrayImage {
        let qz_sz = 4 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::new(total_sz, total_sz);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.put_pixel(j, i, Luma([255]));
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;

                let clr = match self.get(r, c) {
                    Module::Func(c) | Module::Format(c) | Module::Data(c) => c,
                    Module::Empty => panic!("Empty module found at: {r} {c}"),
                };
                canvas.put_pixel(j, i, clr.select(Luma([0]), Luma([255])));
            }
        }

        canvas
    }

    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = 4 * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::new();
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;

                let clr = match self.get(r, c) {
                    Module::Func(c) | Module::Format(c) | Module::Data(c) => c,
                    Module::Empty => panic!("Empty module found at: {r} {c}"),
                };
                canvas.push(clr.select('█', ' '));
            }
            canvas.push('\n');
        }

        canvas
    }
}

#[cfg(test)]
mod render_tests {
    use super::QR;
    use crate::common::codec;
    use crate::common::mask::find_best_mask;
    use crate::common::metadata::Version;

    #[test]
    fn test_render_dimensions() {
        let version = Version::new(1).unwrap();
        let bits = codec::encode(b"render", version);
        let mut skeleton = QR::new(version);
        skeleton.draw_function_patterns();
        let (qr, _) = find_best_mask(&skeleton, &bits);

        let img = qr.render(3);
        let exp = (21 + 8) * 3;
        assert_eq!(img.dimensions(), (exp, exp));

        let txt = qr.to_str(1);
        assert_eq!(txt.lines().count(), 29);
        assert!(txt.lines().all(|l| l.chars().count() == 29));
    }
}
