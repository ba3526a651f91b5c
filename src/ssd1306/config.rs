//! Register values of the SSD1306 that are fixed for a given panel module and sent once at init.

use super::command::*;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// A configuration for the display. Every option starts at the value that suits the common
/// 0.96"/0.91" modules with an internal charge pump; builder methods override them.
///
/// Options are always transmitted in the controller's documented init order, whatever order the
/// builder methods were called in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    contrast_cmd: Command,
    segment_remap_cmd: Command,
    com_scan_direction_cmd: Command,
    clock_div_cmd: Command,
    precharge_period_cmd: Command,
    vcomh_deselect_cmd: Command,
    charge_pump_cmd: Command,
}

impl Config {
    pub fn new() -> Self {
        Config {
            contrast_cmd: Command::SetContrast(0xFF),
            segment_remap_cmd: Command::SetSegmentRemap(SegmentRemap::Column127),
            com_scan_direction_cmd: Command::SetComScanDirection(ComScanDirection::Remapped),
            clock_div_cmd: Command::SetClockDiv(0xF, 0),
            precharge_period_cmd: Command::SetPrechargePeriod(2, 2),
            vcomh_deselect_cmd: Command::SetVcomhDeselect(VcomhLevel::V077),
            charge_pump_cmd: Command::SetChargePump(true),
        }
    }

    /// See `Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self {
            contrast_cmd: Command::SetContrast(contrast),
            ..self
        }
    }

    /// See `Command::SetSegmentRemap`.
    pub fn segment_remap(self, remap: SegmentRemap) -> Self {
        Self {
            segment_remap_cmd: Command::SetSegmentRemap(remap),
            ..self
        }
    }

    /// See `Command::SetComScanDirection`.
    pub fn com_scan_direction(self, direction: ComScanDirection) -> Self {
        Self {
            com_scan_direction_cmd: Command::SetComScanDirection(direction),
            ..self
        }
    }

    /// See `Command::SetClockDiv`.
    pub fn clock_div(self, fosc: u8, divide: u8) -> Self {
        Self {
            clock_div_cmd: Command::SetClockDiv(fosc, divide),
            ..self
        }
    }

    /// See `Command::SetPrechargePeriod`.
    pub fn precharge_period(self, phase_1: u8, phase_2: u8) -> Self {
        Self {
            precharge_period_cmd: Command::SetPrechargePeriod(phase_1, phase_2),
            ..self
        }
    }

    /// See `Command::SetVcomhDeselect`.
    pub fn vcomh_deselect(self, level: VcomhLevel) -> Self {
        Self {
            vcomh_deselect_cmd: Command::SetVcomhDeselect(level),
            ..self
        }
    }

    /// See `Command::SetChargePump`.
    pub fn charge_pump(self, enabled: bool) -> Self {
        Self {
            charge_pump_cmd: Command::SetChargePump(enabled),
            ..self
        }
    }

    /// Transmit everything between "display off" and "display on" that puts a panel with
    /// `height` rows into this configuration.
    ///
    /// The multiplex ratio and COM pin layout follow from the height: 32-row panels use 32 COM
    /// lines wired sequentially, 64- and 128-row panels use 64 lines wired alternately. Any other
    /// height stops the sequence before the multiplex ratio with `Error::UnsupportedHeight`.
    pub(crate) fn send<DI>(&self, iface: &mut DI, height: u16) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        Command::SetAddressMode(AddressMode::Horizontal).send(iface)?;
        Command::SetPageStart(0).send(iface)?;
        self.com_scan_direction_cmd.send(iface)?;
        Command::SetColumnStart(0).send(iface)?;
        Command::SetStartLine(0).send(iface)?;
        self.contrast_cmd.send(iface)?;
        self.segment_remap_cmd.send(iface)?;
        Command::SetInverted(false).send(iface)?;

        let (mux_ratio, com_pins) = match height {
            32 => (32, ComPinLayout::Sequential),
            64 | 128 => (64, ComPinLayout::Alternative),
            _ => return Err(Error::UnsupportedHeight(height)),
        };
        Command::SetMuxRatio(mux_ratio).send(iface)?;
        Command::SetEntireDisplayOn(false).send(iface)?;
        Command::SetDisplayOffset(0).send(iface)?;
        self.clock_div_cmd.send(iface)?;
        self.precharge_period_cmd.send(iface)?;
        Command::SetComPins(com_pins, false).send(iface)?;
        self.vcomh_deselect_cmd.send(iface)?;
        self.charge_pump_cmd.send(iface)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
