//! Packed initialisation command tables.
//!
//! A table is a byte string: the number of commands, then for each command the command byte, a
//! count byte whose low 7 bits are the number of argument bytes that follow and whose top bit says
//! a delay byte follows the arguments. A delay byte of 255 stands for 500 ms.

use hal::blocking::delay::DelayMs;

use super::command::consts::*;
use crate::error::Error;
use crate::interface::DisplayInterface;

const DELAY_FLAG: u8 = 0x80;
const LONG_DELAY: u8 = 255;
const LONG_DELAY_MS: u16 = 500;

/// One command of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitStep<'a> {
    pub cmd: u8,
    pub args: &'a [u8],
    pub delay_ms: Option<u16>,
}

impl<'a> InitStep<'a> {
    pub(crate) fn send<DI, D>(&self, iface: &mut DI, delay: &mut D) -> Result<(), Error>
    where
        DI: DisplayInterface,
        D: DelayMs<u16>,
    {
        debug!(
            "st7735: cmd {:#04x}, {} args, delay {:?}",
            self.cmd,
            self.args.len(),
            self.delay_ms
        );
        iface.send_command(self.cmd)?;
        if !self.args.is_empty() {
            iface.send_data(self.args)?;
        }
        if let Some(ms) = self.delay_ms {
            delay.delay_ms(ms);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CommandTable<'a> {
    bytes: &'a [u8],
}

impl<'a> CommandTable<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        CommandTable { bytes }
    }

    /// Iterate over the steps of the table. A table that ends early yields one
    /// `Error::InvalidArgument` and then stops.
    pub fn parse(&self) -> Steps<'a> {
        match self.bytes.split_first() {
            Some((&count, rest)) => Steps {
                rest,
                remaining: count,
            },
            None => Steps {
                rest: &[],
                remaining: 0,
            },
        }
    }

    /// Run every step of the table in order. Nothing is sent if the table is malformed.
    pub fn send<DI, D>(&self, iface: &mut DI, delay: &mut D) -> Result<(), Error>
    where
        DI: DisplayInterface,
        D: DelayMs<u16>,
    {
        if self.bytes.is_empty() {
            return Err(Error::InvalidArgument);
        }
        for step in self.parse() {
            step?;
        }
        for step in self.parse() {
            step?.send(iface, delay)?;
        }
        Ok(())
    }
}

pub struct Steps<'a> {
    rest: &'a [u8],
    remaining: u8,
}

impl<'a> Steps<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.rest.len() < n {
            return None;
        }
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        Some(head)
    }

    fn next_step(&mut self) -> Option<InitStep<'a>> {
        let header = self.take(2)?;
        let (cmd, count) = (header[0], header[1]);
        let args = self.take((count & !DELAY_FLAG) as usize)?;
        let delay_ms = if count & DELAY_FLAG != 0 {
            match self.take(1)?[0] {
                LONG_DELAY => Some(LONG_DELAY_MS),
                ms => Some(u16::from(ms)),
            }
        } else {
            None
        };
        Some(InitStep {
            cmd,
            args,
            delay_ms,
        })
    }
}

impl<'a> Iterator for Steps<'a> {
    type Item = Result<InitStep<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.next_step() {
            Some(step) => {
                self.remaining -= 1;
                Some(Ok(step))
            }
            None => {
                self.remaining = 0;
                Some(Err(Error::InvalidArgument))
            }
        }
    }
}

/// Power-up for the 1.44" ST7735R module, up to the point where panel-specific settings go:
/// software reset, sleep out, frame rates, inversion control and power control.
#[cfg_attr(rustfmt, rustfmt_skip)]
pub const RCMD1: CommandTable<'static> = CommandTable::new(&[
    12,
    SWRESET, DELAY_FLAG, 150,
    SLPOUT, DELAY_FLAG, LONG_DELAY,
    FRMCTR1, 3, 0x01, 0x2C, 0x2D,
    FRMCTR2, 3, 0x01, 0x2C, 0x2D,
    FRMCTR3, 6, 0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D,
    INVCTR, 1, 0x07,
    PWCTR1, 3, 0xA2, 0x02, 0x84,
    PWCTR2, 1, 0xC5,
    PWCTR3, 2, 0x0A, 0x00,
    PWCTR4, 2, 0x8A, 0x2A,
    PWCTR5, 2, 0x8A, 0xEE,
    VMCTR1, 1, 0x0E,
]);

/// Gamma correction, then normal display mode and display on.
#[cfg_attr(rustfmt, rustfmt_skip)]
pub const RCMD3: CommandTable<'static> = CommandTable::new(&[
    4,
    GMCTRP1, 16,
        0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D,
        0x29, 0x25, 0x2B, 0x39, 0x00, 0x01, 0x03, 0x10,
    GMCTRN1, 16,
        0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D,
        0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00, 0x02, 0x10,
    NORON, DELAY_FLAG, 100,
    DISPON, DELAY_FLAG, 100,
]);
