//! The command set for the ST7735.
//!
//! Unlike the SSD1306, parameters follow the command byte on the data stream (D/C high).

use crate::error::Error;
use crate::interface::DisplayInterface;

/// Raw instruction bytes, for building packed command tables.
pub mod consts {
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const PTLON: u8 = 0x12;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const GAMSET: u8 = 0x26;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
    pub const FRMCTR2: u8 = 0xB2;
    pub const FRMCTR3: u8 = 0xB3;
    pub const INVCTR: u8 = 0xB4;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const PWCTR3: u8 = 0xC2;
    pub const PWCTR4: u8 = 0xC3;
    pub const PWCTR5: u8 = 0xC4;
    pub const VMCTR1: u8 = 0xC5;
    pub const GMCTRP1: u8 = 0xE0;
    pub const GMCTRN1: u8 = 0xE1;
}

/// Bits of the memory access control register, which sets the panel orientation and the
/// subpixel order.
pub mod madctl {
    /// Row address order: bottom to top.
    pub const MY: u8 = 0x80;
    /// Column address order: right to left.
    pub const MX: u8 = 0x40;
    /// Swap rows and columns.
    pub const MV: u8 = 0x20;
    /// Vertical refresh order.
    pub const ML: u8 = 0x10;
    pub const RGB: u8 = 0x00;
    pub const BGR: u8 = 0x08;
    /// Horizontal refresh order.
    pub const MH: u8 = 0x04;
}

/// The four predefined gamma curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gamma {
    /// Gamma 1.0
    G10,
    /// Gamma 2.5
    G25,
    /// Gamma 2.2
    G22,
    /// Gamma 1.8
    G18,
}

/// Interface pixel format set by `COLMOD`. Only 16-bit RGB565 is drawn by this crate.
pub const COLMOD_16BIT: u8 = 0x05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SetInverted(bool),
    SetDisplayOn(bool),
    /// Write the memory access control register. See `madctl`.
    SetMemoryAccess(u8),
    /// Set the interface pixel format. See `COLMOD_16BIT`.
    SetPixelFormat(u8),
    SetGamma(Gamma),
    /// Set the first and last column that `WriteMemory` fills. Start must be <= end.
    SetColumnRange(u16, u16),
    /// Set the first and last row that `WriteMemory` fills. Start must be <= end.
    SetRowRange(u16, u16),
    /// Start writing pixel data at the start of the column and row ranges.
    WriteMemory,
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$start:expr, $end:expr]) => {{
        $buf[..2].copy_from_slice(&$start.to_be_bytes());
        $buf[2..].copy_from_slice(&$end.to_be_bytes());
        Ok(($cmd, &$buf[..4]))
    }};
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 4];
        let (cmd, data) = match self {
            Command::SetInverted(inverted) => ok_command!(
                arg_buf,
                if inverted {
                    consts::INVON
                } else {
                    consts::INVOFF
                },
                []
            ),
            Command::SetDisplayOn(on) => ok_command!(
                arg_buf,
                if on { consts::DISPON } else { consts::DISPOFF },
                []
            ),
            Command::SetMemoryAccess(bits) => ok_command!(arg_buf, consts::MADCTL, [bits]),
            Command::SetPixelFormat(format) => ok_command!(arg_buf, consts::COLMOD, [format]),
            Command::SetGamma(gamma) => {
                let curve = match gamma {
                    Gamma::G10 => 0x01,
                    Gamma::G25 => 0x02,
                    Gamma::G22 => 0x04,
                    Gamma::G18 => 0x08,
                };
                ok_command!(arg_buf, consts::GAMSET, [curve])
            }
            Command::SetColumnRange(start, end) => {
                if start <= end {
                    ok_command!(arg_buf, consts::CASET, [start, end])
                } else {
                    Err(Error::InvalidArgument)
                }
            }
            Command::SetRowRange(start, end) => {
                if start <= end {
                    ok_command!(arg_buf, consts::RASET, [start, end])
                } else {
                    Err(Error::InvalidArgument)
                }
            }
            Command::WriteMemory => ok_command!(arg_buf, consts::RAMWR, []),
        }?;
        iface.send_command(cmd)?;
        if data.is_empty() {
            Ok(())
        } else {
            iface.send_data(data)
        }
    }
}
