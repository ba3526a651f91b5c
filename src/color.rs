//! 16-bit packed RGB565 colour values.
//!
//! The same value means the same thing on every backend. The monochrome panel only distinguishes
//! `WHITE` (pixel on) from everything else (pixel off).

/// A colour packed as 5 bits red, 6 bits green and 5 bits blue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Rgb565 = Rgb565(0x0000);
    pub const BLUE: Rgb565 = Rgb565(0x001F);
    pub const RED: Rgb565 = Rgb565(0xF800);
    pub const GREEN: Rgb565 = Rgb565(0x07E0);
    pub const CYAN: Rgb565 = Rgb565(0x07FF);
    pub const MAGENTA: Rgb565 = Rgb565(0xF81F);
    pub const YELLOW: Rgb565 = Rgb565(0xFFE0);
    pub const WHITE: Rgb565 = Rgb565(0xFFFF);

    /// Pack 8-bit-per-channel components, dropping the low bits of each channel.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb565((((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b & 0xF8) as u16 >> 3))
    }

    /// Bitwise complement against the 16-bit mask.
    pub const fn invert(self) -> Self {
        Rgb565(0xFFFF - self.0)
    }

    /// The two bytes sent on the wire for this colour, most significant first.
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Whether a monochrome panel lights the pixel for this colour.
    pub fn is_on(self) -> bool {
        self == Rgb565::WHITE
    }

    /// Look up one of the named colours. Names are upper case and matched exactly.
    pub fn from_name(name: &str) -> Option<Self> {
        let colour = match name {
            "BLACK" => Rgb565::BLACK,
            "BLUE" => Rgb565::BLUE,
            "RED" => Rgb565::RED,
            "GREEN" => Rgb565::GREEN,
            "CYAN" => Rgb565::CYAN,
            "MAGENTA" => Rgb565::MAGENTA,
            "YELLOW" => Rgb565::YELLOW,
            "WHITE" => Rgb565::WHITE,
            _ => return None,
        };
        Some(colour)
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Rgb565(raw)
    }
}

impl From<Rgb565> for u16 {
    fn from(colour: Rgb565) -> Self {
        colour.0
    }
}
