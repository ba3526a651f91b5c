//! Panel-specific settings of an ST7735 module.

use super::command::{madctl, Command, COLMOD_16BIT};
use crate::display::Size;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// A configuration for the display. `Config::new()` describes the common 1.44" 128x128 module;
/// builder methods adjust it for other modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) size: Size,
    pub(crate) offset: (u16, u16),
    pub(crate) memory_access: u8,
    pub(crate) inverted: bool,
}

impl Config {
    pub fn new() -> Self {
        Config {
            size: Size::new(128, 128),
            offset: (2, 3),
            memory_access: madctl::MX | madctl::MY | madctl::BGR,
            inverted: false,
        }
    }

    /// Visible panel size in pixels.
    pub fn panel_size(self, width: u16, height: u16) -> Self {
        Self {
            size: Size::new(width, height),
            ..self
        }
    }

    /// Controller RAM address of the top left visible pixel. Many modules glue a panel smaller
    /// than the 132x162 RAM somewhere in the middle of it.
    pub fn offset(self, x: u16, y: u16) -> Self {
        Self {
            offset: (x, y),
            ..self
        }
    }

    /// Orientation and subpixel order. See `command::madctl`.
    pub fn memory_access(self, bits: u8) -> Self {
        Self {
            memory_access: bits,
            ..self
        }
    }

    /// Start with colours inverted, for modules whose panel is wired that way.
    pub fn inverted(self, inverted: bool) -> Self {
        Self { inverted, ..self }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Transmit the settings that sit between the power-up and gamma tables at init.
    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        Command::SetInverted(self.inverted).send(iface)?;
        Command::SetMemoryAccess(self.memory_access).send(iface)?;
        Command::SetPixelFormat(COLMOD_16BIT).send(iface)?;
        Command::SetColumnRange(0, self.size.width.saturating_sub(1)).send(iface)?;
        Command::SetRowRange(0, self.size.height.saturating_sub(1)).send(iface)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
