//! The command set for the SSD1306.
//!
//! Note 1: The display RAM of the SSD1306 is 128 columns by 64 rows, split into 8 pages of 8 rows.
//! Each byte written to the RAM covers one column of one page, with the least significant bit in
//! the topmost row of that page.
//!
//! Note 2: Unlike most controllers, the SSD1306 takes the parameters of a command on the command
//! stream (D/C low, or control byte 0x00 on I2C). Every byte a `Command` produces is therefore
//! sent with `send_command`.

use crate::error::Error;
use crate::interface::DisplayInterface;

pub const NUM_PIXEL_COLS: u16 = 128;
/// Highest page address accepted by `SetPageStart`. Panels with 128 rows are driven with 16 pages.
pub const PAGE_MAX: u8 = 15;

/// How the column and page pointers move as image data is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
    /// Column increments, wrapping to the next page at the end of the column range.
    Horizontal,
    /// Page increments, wrapping to the next column at the end of the page range.
    Vertical,
    /// Column increments and wraps within the current page; the page never changes on its own.
    Page,
}

/// Which end of the column address range is wired to SEG0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentRemap {
    /// Column address 0 drives SEG0.
    Column0,
    /// Column address 127 drives SEG0, mirroring the image horizontally.
    Column127,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// Scan from COM0 to COM[N-1].
    Normal,
    /// Scan from COM[N-1] to COM0.
    Remapped,
}

/// How the COM pins are wired to the panel rows. This is dictated by the display module; 32-row
/// modules are usually sequential, taller ones alternative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComPinLayout {
    Sequential,
    Alternative,
}

/// COM deselect voltage level, as a fraction of Vcc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VcomhLevel {
    /// ~0.65 x Vcc
    V065,
    /// ~0.77 x Vcc
    V077,
    /// ~0.83 x Vcc
    V083,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the panel on, or put it to sleep with the RAM retained.
    SetDisplayOn(bool),
    /// Set the contrast current. Range 0-255.
    SetContrast(u8),
    /// Light every pixel regardless of RAM content (`true`), or follow the RAM (`false`).
    SetEntireDisplayOn(bool),
    /// Show RAM bits inverted.
    SetInverted(bool),
    SetAddressMode(AddressMode),
    /// Set the page that page-mode writes go to. Range 0-15. (Note 1)
    SetPageStart(u8),
    /// Set the column that page-mode writes start at, as its low and high nibble commands.
    /// Range 0-127.
    SetColumnStart(u8),
    /// Set the RAM row shown on the first panel row. Range 0-63.
    SetStartLine(u8),
    SetSegmentRemap(SegmentRemap),
    SetComScanDirection(ComScanDirection),
    /// Set the number of active COM lines. Range 16-64.
    SetMuxRatio(u8),
    /// Shift the COM lines vertically. Range 0-63.
    SetDisplayOffset(u8),
    /// Set the oscillator frequency Fosc and the display clock divide ratio. Fosc is 0-15, higher
    /// values are faster; the divide ratio is 0-15 and divides by n + 1.
    SetClockDiv(u8, u8),
    /// Set the pre-charge phase 1 and phase 2 lengths, each 1-15 DCLKs.
    SetPrechargePeriod(u8, u8),
    /// Set the COM pin hardware layout and whether left and right halves are swapped.
    SetComPins(ComPinLayout, bool),
    SetVcomhDeselect(VcomhLevel),
    /// Enable the internal charge pump regulator. It must be on for modules without an external
    /// Vcc supply.
    SetChargePump(bool),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
}

impl Command {
    /// Send this command and its parameters over `iface`. Commands whose parameters are outside
    /// the ranges documented on each variant send nothing and return `Error::InvalidArgument`.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 1];
        let (cmd, args) = match self {
            Command::SetDisplayOn(on) => ok_command!(arg_buf, if on { 0xAF } else { 0xAE }, []),
            Command::SetContrast(contrast) => ok_command!(arg_buf, 0x81, [contrast]),
            Command::SetEntireDisplayOn(on) => {
                ok_command!(arg_buf, if on { 0xA5 } else { 0xA4 }, [])
            }
            Command::SetInverted(inverted) => {
                ok_command!(arg_buf, if inverted { 0xA7 } else { 0xA6 }, [])
            }
            Command::SetAddressMode(mode) => {
                let m = match mode {
                    AddressMode::Horizontal => 0x00,
                    AddressMode::Vertical => 0x01,
                    AddressMode::Page => 0x02,
                };
                ok_command!(arg_buf, 0x20, [m])
            }
            Command::SetPageStart(page) => match page {
                0..=PAGE_MAX => ok_command!(arg_buf, 0xB0 | page, []),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetColumnStart(col) => match col {
                0..=0x7F => ok_command!(arg_buf, col & 0x0F, [0x10 | (col >> 4)]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetStartLine(line) => match line {
                0..=0x3F => ok_command!(arg_buf, 0x40 | line, []),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetSegmentRemap(remap) => ok_command!(
                arg_buf,
                match remap {
                    SegmentRemap::Column0 => 0xA0,
                    SegmentRemap::Column127 => 0xA1,
                },
                []
            ),
            Command::SetComScanDirection(dir) => ok_command!(
                arg_buf,
                match dir {
                    ComScanDirection::Normal => 0xC0,
                    ComScanDirection::Remapped => 0xC8,
                },
                []
            ),
            Command::SetMuxRatio(ratio) => match ratio {
                16..=64 => ok_command!(arg_buf, 0xA8, [ratio - 1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDisplayOffset(offset) => match offset {
                0..=0x3F => ok_command!(arg_buf, 0xD3, [offset]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetClockDiv(fosc, divide) => match (fosc, divide) {
                (0..=15, 0..=15) => ok_command!(arg_buf, 0xD5, [fosc << 4 | divide]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPrechargePeriod(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(arg_buf, 0xD9, [phase_2 << 4 | phase_1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComPins(layout, swap_halves) => {
                let alt = match layout {
                    ComPinLayout::Sequential => 0x00,
                    ComPinLayout::Alternative => 0x10,
                };
                let lr = if swap_halves { 0x20 } else { 0x00 };
                ok_command!(arg_buf, 0xDA, [0x02 | alt | lr])
            }
            Command::SetVcomhDeselect(level) => {
                let l = match level {
                    VcomhLevel::V065 => 0x00,
                    VcomhLevel::V077 => 0x20,
                    VcomhLevel::V083 => 0x30,
                };
                ok_command!(arg_buf, 0xDB, [l])
            }
            Command::SetChargePump(on) => {
                ok_command!(arg_buf, 0x8D, [if on { 0x14 } else { 0x10 }])
            }
        }?;
        iface.send_command(cmd)?;
        for &arg in args {
            iface.send_command(arg)?;
        }
        Ok(())
    }
}
