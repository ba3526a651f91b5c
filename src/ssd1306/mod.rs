//! Buffered driver for the Solomon Systech SSD1306 monochrome OLED controller.
//!
//! Drawing only touches a framebuffer owned by the caller; nothing reaches the panel until
//! `refresh`, which sends the whole buffer one page at a time.
//!
//! The framebuffer mirrors the controller RAM as it is laid out with segment remap and COM remap
//! both active (the default `Config`): the buffer is `height / 8` pages of `width` bytes, the last
//! page first, and within a page the rightmost column first. Bit 7 of a byte is the top row of its
//! page.

pub mod command;
pub mod config;

pub use self::command::{
    AddressMode, ComPinLayout, ComScanDirection, Command, SegmentRemap, VcomhLevel,
};
pub use self::config::Config;

use hal::blocking::delay::DelayMs;

use self::command::NUM_PIXEL_COLS;
use crate::color::Rgb565;
use crate::display::{Display, PixelTarget, Size};
use crate::error::Error;
use crate::font::Font;
use crate::interface::DisplayInterface;
use crate::text::Cursor;

/// Where the driver is in bringing the panel up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    /// `init` has started but not finished. The driver stays here if `init` failed.
    Initializing,
    Ready,
}

/// A driver for an SSD1306 panel connected through `DI`, drawing into a caller-provided buffer.
pub struct Ssd1306<'buf, DI>
where
    DI: DisplayInterface,
{
    iface: DI,
    buffer: &'buf mut [u8],
    size: Size,
    config: Config,
    state: State,
    display_on: bool,
    cursor: Cursor,
    font: Font,
}

impl<'buf, DI> Ssd1306<'buf, DI>
where
    DI: DisplayInterface,
{
    /// Construct a new driver for a panel of `size` pixels connected to `iface`. `buffer` becomes
    /// the framebuffer and must hold exactly `width * height / 8` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `size` is wider than the controller's 128 columns, if the height is not a
    /// non-zero multiple of 8 up to 128, or if `buffer` has the wrong length.
    pub fn new(iface: DI, buffer: &'buf mut [u8], size: Size, config: Config) -> Self {
        if size.width == 0 || size.width > NUM_PIXEL_COLS {
            panic!("panel width {} outside 1..={}", size.width, NUM_PIXEL_COLS);
        }
        if size.height == 0 || size.height > 128 || size.height % 8 != 0 {
            panic!("panel height {} is not a multiple of 8 up to 128", size.height);
        }
        let expected = size.width as usize * size.height as usize / 8;
        if buffer.len() != expected {
            panic!(
                "framebuffer is {} bytes, a {}x{} panel needs {}",
                buffer.len(),
                size.width,
                size.height,
                expected
            );
        }
        Ssd1306 {
            iface,
            buffer,
            size,
            config,
            state: State::Uninitialized,
            display_on: false,
            cursor: Cursor::default(),
            font: Font::default(),
        }
    }

    /// Give back the interface. The framebuffer borrow ends with the driver.
    pub fn release(self) -> DI {
        self.iface
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The framebuffer as it will be sent by the next `refresh`.
    pub fn buffer(&self) -> &[u8] {
        &*self.buffer
    }

    fn pages(&self) -> usize {
        self.size.height as usize / 8
    }

    /// Byte index and bit number holding pixel `(x, y)`, or `None` if it is off the canvas.
    pub fn pixel_index(&self, x: u16, y: u16) -> Option<(usize, u8)> {
        if !self.size.contains(x, y) {
            return None;
        }
        let width = self.size.width as usize;
        let page = y as usize / 8;
        let index = (self.pages() - 1 - page) * width + (width - 1 - x as usize);
        Some((index, 7 - (y % 8) as u8))
    }

    /// Inverse of `pixel_index`: the pixel stored in bit `bit` of byte `index`.
    pub fn buffer_coord(&self, index: usize, bit: u8) -> Option<(u16, u16)> {
        if index >= self.buffer.len() || bit > 7 {
            return None;
        }
        let width = self.size.width as usize;
        let page = self.pages() - 1 - index / width;
        let x = width - 1 - index % width;
        let y = page * 8 + (7 - bit as usize);
        Some((x as u16, y as u16))
    }

    /// Change the contrast current at any time. See `Command::SetContrast`.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error> {
        Command::SetContrast(contrast).send(&mut self.iface)
    }

    /// Switch the panel on, or put it to sleep. The controller RAM is kept while asleep.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Error> {
        Command::SetDisplayOn(on).send(&mut self.iface)?;
        self.display_on = on;
        Ok(())
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    /// Blank the framebuffer and send it to the panel.
    pub fn reset_screen(&mut self) -> Result<(), Error> {
        self.fill_screen(Rgb565::BLACK)?;
        self.refresh()
    }
}

impl<'buf, DI> PixelTarget for Ssd1306<'buf, DI>
where
    DI: DisplayInterface,
{
    fn size(&self) -> Size {
        self.size
    }

    /// Any colour other than `WHITE` clears the pixel.
    fn draw_pixel(&mut self, x: u16, y: u16, colour: Rgb565) -> Result<(), Error> {
        if let Some((index, bit)) = self.pixel_index(x, y) {
            if colour.is_on() {
                self.buffer[index] |= 1 << bit;
            } else {
                self.buffer[index] &= !(1 << bit);
            }
        }
        Ok(())
    }
}

impl<'buf, DI> Display for Ssd1306<'buf, DI>
where
    DI: DisplayInterface,
{
    /// Wait for the controller to power up, configure it from the `Config` given at construction,
    /// switch the panel on and blank it.
    ///
    /// Calling `init` again replays the whole sequence.
    fn init<D>(&mut self, delay: &mut D) -> Result<(), Error>
    where
        D: DelayMs<u16>,
    {
        debug!(
            "ssd1306: init {}x{} panel",
            self.size.width, self.size.height
        );
        self.state = State::Initializing;
        delay.delay_ms(100);
        self.set_display_on(false)?;
        if let Err(e) = self.config.send(&mut self.iface, self.size.height) {
            warn!("ssd1306: init aborted: {}", e);
            return Err(e);
        }
        self.set_display_on(true)?;
        self.fill_screen(Rgb565::BLACK)?;
        self.refresh()?;
        self.reset_cursor();
        self.state = State::Ready;
        debug!("ssd1306: ready");
        Ok(())
    }

    fn fill_screen(&mut self, colour: Rgb565) -> Result<(), Error> {
        let fill = if colour.is_on() { 0xFF } else { 0x00 };
        for byte in self.buffer.iter_mut() {
            *byte = fill;
        }
        Ok(())
    }

    /// Send the framebuffer one page at a time, each preceded by the page address and a column
    /// pointer reset.
    fn refresh(&mut self) -> Result<(), Error> {
        let width = self.size.width as usize;
        for (page, data) in self.buffer.chunks(width).enumerate() {
            trace!("ssd1306: page {}", page);
            Command::SetPageStart(page as u8).send(&mut self.iface)?;
            Command::SetColumnStart(0).send(&mut self.iface)?;
            self.iface.send_data(data)?;
        }
        Ok(())
    }

    fn font(&self) -> Font {
        self.font
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Cursor { x, y };
    }

    /// Only `"BLACK"` and `"WHITE"` mean anything on a monochrome panel.
    fn colour_by_name(&self, name: &str) -> Option<Rgb565> {
        match name {
            "BLACK" => Some(Rgb565::BLACK),
            "WHITE" => Some(Rgb565::WHITE),
            _ => {
                warn!("ssd1306: no colour named {:?}", name);
                None
            }
        }
    }
}
