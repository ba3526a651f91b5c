//! Fixed-size bitmap fonts.
//!
//! A glyph is `height` bytes, one per pixel row from top to bottom. Bit `j` of a row byte is the
//! pixel in column `j` counted from the left, set for foreground.

mod basic8x8;

/// Glyph slot used for the character right after the printable ASCII range, which the bundled
/// table fills with a degree sign.
pub const DEGREE_INDEX: usize = 95;

/// Descriptor for a glyph table. Cheap to copy; the table itself is borrowed for `'static`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font {
    width: u8,
    height: u8,
    data: &'static [u8],
}

/// The bundled 8x8 font covering `' '..='~'` plus a degree sign.
pub const FONT_8X8: Font = Font {
    width: 8,
    height: 8,
    data: &basic8x8::GLYPHS,
};

impl Font {
    /// Describe a glyph table of `width` x `height` pixel glyphs.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or wider than the 8 bits of a row byte, or if `height` is zero.
    pub fn new(width: u8, height: u8, data: &'static [u8]) -> Self {
        assert!(width > 0 && width <= 8, "glyph rows are one byte wide");
        assert!(height > 0, "glyphs need at least one row");
        Font {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Declared length of the glyph table in bytes.
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Map a character onto its slot in the table. Printable ASCII is offset from the space
    /// character, DEL and `'°'` share the degree slot, and everything else renders as `'?'`.
    pub fn glyph_index(ch: char) -> usize {
        match ch {
            ' '..='~' => ch as usize - ' ' as usize,
            '\x7f' | '°' => DEGREE_INDEX,
            _ => '?' as usize - ' ' as usize,
        }
    }

    /// The row bytes of glyph `index`, or `None` if the table is too short to hold it.
    pub fn glyph(&self, index: usize) -> Option<&'static [u8]> {
        let rows = self.height as usize;
        let start = index.checked_mul(rows)?;
        let end = start.checked_add(rows)?;
        self.data.get(start..end)
    }

    /// Shorthand for `glyph(Font::glyph_index(ch))`.
    pub fn glyph_for(&self, ch: char) -> Option<&'static [u8]> {
        self.glyph(Font::glyph_index(ch))
    }
}

impl Default for Font {
    fn default() -> Self {
        FONT_8X8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mapping() {
        assert_eq!(Font::glyph_index(' '), 0);
        assert_eq!(Font::glyph_index('!'), 1);
        assert_eq!(Font::glyph_index('A'), 33);
        assert_eq!(Font::glyph_index('~'), 94);
        assert_eq!(Font::glyph_index('\x7f'), DEGREE_INDEX);
        assert_eq!(Font::glyph_index('°'), DEGREE_INDEX);
        assert_eq!(Font::glyph_index('\t'), Font::glyph_index('?'));
        assert_eq!(Font::glyph_index('é'), Font::glyph_index('?'));
    }

    #[test]
    fn bundled_table_covers_every_slot() {
        assert_eq!(FONT_8X8.data_len(), 96 * 8);
        for index in 0..=DEGREE_INDEX {
            assert_eq!(FONT_8X8.glyph(index).map(|g| g.len()), Some(8));
        }
        assert_eq!(FONT_8X8.glyph(DEGREE_INDEX + 1), None);
    }

    #[test]
    fn space_is_blank() {
        assert!(FONT_8X8.glyph_for(' ').unwrap().iter().all(|row| *row == 0));
    }

    #[test]
    fn degree_glyph() {
        assert_eq!(
            FONT_8X8.glyph_for('°').unwrap(),
            &[0x1C, 0x36, 0x36, 0x1C, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn short_table() {
        static TINY: [u8; 5] = [0x1F, 0x11, 0x11, 0x11, 0x1F];
        let font = Font::new(5, 5, &TINY);
        assert_eq!(font.glyph(0), Some(&TINY[..]));
        assert_eq!(font.glyph(1), None);
        assert_eq!(font.glyph(usize::MAX), None);
    }

    #[test]
    #[should_panic]
    fn too_wide() {
        Font::new(9, 8, &[]);
    }
}
