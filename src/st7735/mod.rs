//! Streaming driver for the Sitronix ST7735 RGB565 TFT controller.
//!
//! There is no framebuffer. Every drawing call selects the chip, opens an addressing window over
//! the pixels it touches, streams their colours big-endian and deselects the chip again, so
//! `refresh` has nothing to do.

pub mod command;
pub mod config;
pub mod table;

pub use self::command::{madctl, Command, Gamma};
pub use self::config::Config;
pub use self::table::{CommandTable, InitStep};

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;

use crate::color::Rgb565;
use crate::display::{Display, PixelTarget, Size, Window};
use crate::error::Error;
use crate::font::Font;
use crate::interface::DisplayInterface;
use crate::text::{self, Cursor, Placement};

/// Bytes of pixel data per `send_data` call.
const STREAM_CHUNK: usize = 32;

/// Where the driver is in bringing the panel up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    /// The reset line is being pulsed. The driver stays here if the pin could not be driven.
    Resetting,
    /// The init tables are being sent. The driver stays here if that failed.
    ConfigSequence,
    Ready,
}

/// A driver for an ST7735 panel on `iface`, with chip-select pin `CS` and reset pin `RST`.
pub struct St7735<DI, CS, RST>
where
    DI: DisplayInterface,
    CS: OutputPin,
    RST: OutputPin,
{
    iface: DI,
    cs: CS,
    rst: RST,
    config: Config,
    state: State,
    cursor: Cursor,
    font: Font,
}

/// Point the controller's RAM write pointer at `window`, shifted by the panel's visible origin.
fn set_window<DI>(iface: &mut DI, offset: (u16, u16), window: Window) -> Result<(), Error>
where
    DI: DisplayInterface,
{
    let (dx, dy) = offset;
    Command::SetColumnRange(
        window.left.saturating_add(dx),
        window.right.saturating_add(dx),
    )
    .send(iface)?;
    Command::SetRowRange(
        window.top.saturating_add(dy),
        window.bottom.saturating_add(dy),
    )
    .send(iface)?;
    Command::WriteMemory.send(iface)
}

/// Send `pixels` as big-endian RGB565, `STREAM_CHUNK` bytes at a time.
fn stream<DI, I>(iface: &mut DI, pixels: I) -> Result<(), Error>
where
    DI: DisplayInterface,
    I: IntoIterator<Item = Rgb565>,
{
    let mut chunk = [0u8; STREAM_CHUNK];
    let mut len = 0;
    for pixel in pixels {
        chunk[len..len + 2].copy_from_slice(&pixel.to_be_bytes());
        len += 2;
        if len == STREAM_CHUNK {
            iface.send_data(&chunk)?;
            len = 0;
        }
    }
    if len > 0 {
        iface.send_data(&chunk[..len])?;
    }
    Ok(())
}

impl<DI, CS, RST> St7735<DI, CS, RST>
where
    DI: DisplayInterface,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Construct a new driver. Nothing is sent until `init`.
    pub fn new(iface: DI, cs: CS, rst: RST, config: Config) -> Self {
        St7735 {
            iface,
            cs,
            rst,
            config,
            state: State::Uninitialized,
            cursor: Cursor::default(),
            font: Font::default(),
        }
    }

    /// Give back the interface and the pins.
    pub fn release(self) -> (DI, CS, RST) {
        (self.iface, self.cs, self.rst)
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Run `f` with the chip selected. The chip is deselected again even if `f` fails.
    fn selected<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut DI, &Config) -> Result<(), Error>,
    {
        self.cs.set_low().map_err(|_| Error::ChipSelect)?;
        let result = f(&mut self.iface, &self.config);
        self.cs.set_high().map_err(|_| Error::ChipSelect)?;
        result
    }

    /// Pulse the reset line and send the init tables. The caller holds the chip selected.
    fn reset_and_configure<D>(&mut self, delay: &mut D) -> Result<(), Error>
    where
        D: DelayMs<u16>,
    {
        self.rst.set_low().map_err(|_| Error::Reset)?;
        delay.delay_ms(5);
        self.rst.set_high().map_err(|_| Error::Reset)?;

        self.state = State::ConfigSequence;
        table::RCMD1.send(&mut self.iface, delay)?;
        self.config.send(&mut self.iface)?;
        table::RCMD3.send(&mut self.iface, delay)
    }

    /// Stream `pixels` into `window`, which must lie on the canvas.
    fn blit<I>(&mut self, window: Window, pixels: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        self.selected(|iface, config| {
            set_window(iface, config.offset, window)?;
            stream(iface, pixels)
        })
    }

    /// Copy a `w` x `h` image, row by row, with its top left corner at `(x, y)`. Nothing is drawn
    /// unless the image lies entirely on the canvas and `pixels` holds exactly `w * h` colours.
    pub fn draw_image(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        pixels: &[Rgb565],
    ) -> Result<(), Error> {
        let size = self.config.size;
        let fits = w > 0
            && h > 0
            && u32::from(x) + u32::from(w) <= u32::from(size.width)
            && u32::from(y) + u32::from(h) <= u32::from(size.height);
        if !fits || pixels.len() != usize::from(w) * usize::from(h) {
            debug!("st7735: image {}x{} at ({}, {}) rejected", w, h, x, y);
            return Ok(());
        }
        let window = Window {
            left: x,
            top: y,
            right: x + (w - 1),
            bottom: y + (h - 1),
        };
        self.blit(window, pixels.iter().copied())
    }

    /// Swap the display between normal and inverted colours.
    pub fn invert_colours(&mut self, invert: bool) -> Result<(), Error> {
        self.selected(|iface, _| Command::SetInverted(invert).send(iface))
    }

    /// Select one of the predefined gamma curves.
    pub fn set_gamma(&mut self, gamma: Gamma) -> Result<(), Error> {
        self.selected(|iface, _| Command::SetGamma(gamma).send(iface))
    }
}

impl<DI, CS, RST> PixelTarget for St7735<DI, CS, RST>
where
    DI: DisplayInterface,
    CS: OutputPin,
    RST: OutputPin,
{
    fn size(&self) -> Size {
        self.config.size
    }

    fn draw_pixel(&mut self, x: u16, y: u16, colour: Rgb565) -> Result<(), Error> {
        if !self.config.size.contains(x, y) {
            return Ok(());
        }
        let window = Window {
            left: x,
            top: y,
            right: x,
            bottom: y,
        };
        self.blit(window, Some(colour))
    }
}

impl<DI, CS, RST> Display for St7735<DI, CS, RST>
where
    DI: DisplayInterface,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Pulse the reset line and send the power-up table, the settings from `Config`, and the
    /// gamma/display-on table, all within one chip-select bracket.
    fn init<D>(&mut self, delay: &mut D) -> Result<(), Error>
    where
        D: DelayMs<u16>,
    {
        debug!(
            "st7735: init {}x{} panel",
            self.config.size.width, self.config.size.height
        );
        self.state = State::Resetting;
        self.cs.set_low().map_err(|_| Error::ChipSelect)?;
        let result = self.reset_and_configure(delay);
        self.cs.set_high().map_err(|_| Error::ChipSelect)?;
        if let Err(e) = result {
            warn!("st7735: init aborted: {}", e);
            return Err(e);
        }

        self.state = State::Ready;
        debug!("st7735: ready");
        Ok(())
    }

    fn fill_screen(&mut self, colour: Rgb565) -> Result<(), Error> {
        let Size { width, height } = self.config.size;
        self.fill_rectangle(0, 0, width, height, colour)
    }

    /// Nothing is buffered, so there is nothing to send.
    fn refresh(&mut self) -> Result<(), Error> {
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

    /// Streams the whole glyph cell through a single window.
    fn write_char(&mut self, ch: char, colour: Rgb565, background: Rgb565) -> Result<(), Error> {
        let font = self.font;
        match text::layout(ch, self.cursor, &font, self.config.size) {
            Placement::Newline(next) => self.cursor = next,
            Placement::Clipped => (),
            Placement::Glyph { at, next, rows } => {
                let window = Window {
                    left: at.x,
                    top: at.y,
                    right: at.x + u16::from(font.width()) - 1,
                    bottom: at.y + u16::from(font.height()) - 1,
                };
                let pixels = text::glyph_pixels(rows, font.width(), colour, background);
                self.blit(window, pixels)?;
                self.cursor = next;
            }
        }
        Ok(())
    }

    /// Streams the clipped rectangle through a single window.
    fn fill_rectangle(
        &mut self,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        colour: Rgb565,
    ) -> Result<(), Error> {
        let window = match Window::from_corners(self.config.size, x1, y1, x2, y2) {
            Some(window) => window,
            None => return Ok(()),
        };
        trace!("st7735: fill {:?}", window);
        self.blit(window, core::iter::repeat(colour).take(window.area()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::spi::SpiInterface;
    use crate::interface::test_spy::{BrokenBus, BrokenPin, Sent, SpyPin, TestSpyInterface};

    type Spied = St7735<TestSpyInterface, SpyPin, SpyPin>;

    fn display(di: &TestSpyInterface) -> Spied {
        St7735::new(di.split(), di.pin("cs"), di.pin("rst"), Config::default())
    }

    fn pixel_data(count: usize, colour: Rgb565) -> Vec<Sent> {
        let bytes = colour.to_be_bytes();
        let all = (0..count).flat_map(|_| bytes.to_vec()).collect::<Vec<u8>>();
        all.chunks(STREAM_CHUNK)
            .map(|c| Sent::Data(c.to_vec()))
            .collect()
    }

    #[test]
    fn init_sequence() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        assert_eq!(disp.state(), State::Uninitialized);
        disp.init(&mut di.delay()).unwrap();
        assert_eq!(disp.state(), State::Ready);

        di.check_multi(sends!(
            (pin "cs" false),
            (pin "rst" false),
            (delay 5),
            (pin "rst" true),
            0x01, (delay 150),
            0x11, (delay 500),
            0xB1, [0x01, 0x2C, 0x2D],
            0xB2, [0x01, 0x2C, 0x2D],
            0xB3, [0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D],
            0xB4, [0x07],
            0xC0, [0xA2, 0x02, 0x84],
            0xC1, [0xC5],
            0xC2, [0x0A, 0x00],
            0xC3, [0x8A, 0x2A],
            0xC4, [0x8A, 0xEE],
            0xC5, [0x0E],
            0x20,
            0x36, [0xC8],
            0x3A, [0x05],
            0x2A, [0x00, 0x00, 0x00, 0x7F],
            0x2B, [0x00, 0x00, 0x00, 0x7F],
            0xE0, [0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01, 0x03, 0x10],
            0xE1, [0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00, 0x02, 0x10],
            0x13, (delay 100),
            0x29, (delay 100),
            (pin "cs" true)
        ));
    }

    #[test]
    fn init_with_inversion() {
        let di = TestSpyInterface::new();
        let mut disp = St7735::new(
            di.split(),
            di.pin("cs"),
            di.pin("rst"),
            Config::new().inverted(true),
        );
        disp.init(&mut di.delay()).unwrap();
        assert!(di.sent().contains(&Sent::Cmd(0x21)));
        assert!(!di.sent().contains(&Sent::Cmd(0x20)));
    }

    #[test]
    fn draw_pixel_windows_one_pixel() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.draw_pixel(10, 20, Rgb565::RED).unwrap();
        di.check_multi(sends!(
            (pin "cs" false),
            0x2A, [0x00, 12, 0x00, 12],
            0x2B, [0x00, 23, 0x00, 23],
            0x2C,
            [0xF8, 0x00],
            (pin "cs" true)
        ));
    }

    #[test]
    fn out_of_bounds_sends_nothing() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.draw_pixel(128, 0, Rgb565::RED).unwrap();
        disp.draw_pixel(0, 128, Rgb565::RED).unwrap();
        disp.fill_rectangle(128, 128, 200, 200, Rgb565::RED).unwrap();
        disp.draw_circle(300, 3, 2, Rgb565::RED).unwrap();
        di.check_multi(&[]);
    }

    #[test]
    fn fill_rectangle_streams_area() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.fill_rectangle(4, 6, 13, 7, Rgb565::BLUE).unwrap();

        let mut expect = sends!(
            (pin "cs" false),
            0x2A, [0x00, 6, 0x00, 15],
            0x2B, [0x00, 9, 0x00, 10],
            0x2C
        )
        .to_vec();
        expect.extend(pixel_data(20, Rgb565::BLUE));
        expect.push(Sent::Pin("cs", true));
        di.check_multi(&expect);
    }

    #[test]
    fn fill_rectangle_corner_order() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.fill_rectangle(4, 6, 13, 7, Rgb565::BLUE).unwrap();
        let canonical = di.sent();
        di.clear();
        disp.fill_rectangle(13, 7, 4, 6, Rgb565::BLUE).unwrap();
        assert_eq!(di.sent(), canonical);
        di.clear();
        disp.fill_rectangle(13, 6, 4, 7, Rgb565::BLUE).unwrap();
        assert_eq!(di.sent(), canonical);
    }

    #[test]
    fn fill_screen_is_clipped_full_canvas() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.fill_screen(Rgb565::WHITE).unwrap();
        let sent = di.sent();
        assert_eq!(
            &sent[..6],
            sends!(
                (pin "cs" false),
                0x2A, [0x00, 2, 0x00, 129],
                0x2B, [0x00, 3, 0x00, 130],
                0x2C
            )
        );
        assert_eq!(&sent[6..sent.len() - 1], &pixel_data(128 * 128, Rgb565::WHITE)[..]);
        assert_eq!(sent.last(), Some(&Sent::Pin("cs", true)));
    }

    #[test]
    fn write_char_streams_glyph_cell() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.set_cursor(8, 16);
        disp.write_char('-', Rgb565::WHITE, Rgb565::BLACK).unwrap();
        assert_eq!(disp.cursor(), Cursor { x: 16, y: 16 });

        let sent = di.sent();
        assert_eq!(
            &sent[..6],
            sends!(
                (pin "cs" false),
                0x2A, [0x00, 10, 0x00, 17],
                0x2B, [0x00, 19, 0x00, 26],
                0x2C
            )
        );
        // '-' is 0x3F on its fourth row only: six lit pixels from the left.
        let pixels = sent[6..sent.len() - 1]
            .iter()
            .flat_map(|s| match s {
                Sent::Data(d) => d.clone(),
                other => panic!("unexpected {:?}", other),
            })
            .collect::<Vec<u8>>();
        assert_eq!(pixels.len(), 8 * 8 * 2);
        let lit = pixels
            .chunks(2)
            .enumerate()
            .filter(|(_, p)| *p == [0xFF, 0xFF])
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        assert_eq!(lit, vec![24, 25, 26, 27, 28, 29]);
    }

    #[test]
    fn write_str_and_clipping() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.set_cursor(120, 0);
        disp.write_str("ab", Rgb565::WHITE, Rgb565::BLACK).unwrap();
        assert_eq!(disp.cursor(), Cursor { x: 128, y: 0 });
        let after_first = di.sent().len();
        assert!(after_first > 0);

        disp.write_str("\nc", Rgb565::WHITE, Rgb565::BLACK).unwrap();
        assert_eq!(disp.cursor(), Cursor { x: 8, y: 8 });
        disp.reset_cursor();
        assert_eq!(disp.cursor(), Cursor::default());
    }

    #[test]
    fn draw_image_checks_fit() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        let image = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::WHITE];

        disp.draw_image(126, 126, 3, 2, &image[..]).unwrap();
        disp.draw_image(0, 0, 2, 3, &image[..]).unwrap();
        disp.draw_image(0, 0, 0, 0, &[]).unwrap();
        di.check_multi(&[]);

        disp.draw_image(126, 126, 2, 2, &image[..]).unwrap();
        di.check_multi(sends!(
            (pin "cs" false),
            0x2A, [0x00, 128, 0x00, 129],
            0x2B, [0x00, 129, 0x00, 130],
            0x2C,
            [0xF8, 0x00, 0x07, 0xE0, 0x00, 0x1F, 0xFF, 0xFF],
            (pin "cs" true)
        ));
    }

    #[test]
    fn runtime_commands_are_bracketed() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.invert_colours(true).unwrap();
        disp.invert_colours(false).unwrap();
        disp.set_gamma(Gamma::G22).unwrap();
        di.check_multi(sends!(
            (pin "cs" false),
            0x21,
            (pin "cs" true),
            (pin "cs" false),
            0x20,
            (pin "cs" true),
            (pin "cs" false),
            0x26,
            [0x04],
            (pin "cs" true)
        ));
    }

    #[test]
    fn line_is_drawn_pixel_by_pixel() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.draw_line(0, 0, 2, 0, Rgb565::GREEN).unwrap();
        let brackets = di
            .sent()
            .iter()
            .filter(|s| **s == Sent::Pin("cs", false))
            .count();
        assert_eq!(brackets, 3);
    }

    #[test]
    fn colour_names() {
        let di = TestSpyInterface::new();
        let disp = display(&di);
        assert_eq!(disp.colour_by_name("WHITE"), Some(Rgb565::WHITE));
        assert_eq!(disp.colour_by_name("MAGENTA"), Some(Rgb565::MAGENTA));
        assert_eq!(disp.colour_by_name("NOT_A_COLOR"), None);
        assert_eq!(disp.width(), 128);
        assert_eq!(disp.height(), 128);
    }

    #[test]
    fn refresh_is_silent() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.refresh().unwrap();
        di.check_multi(&[]);
    }

    #[test]
    fn chip_released_after_bus_error() {
        let di = TestSpyInterface::new();
        let iface = SpiInterface::new(BrokenBus, di.pin("dc"));
        let mut disp = St7735::new(iface, di.pin("cs"), di.pin("rst"), Config::default());
        assert_eq!(disp.draw_pixel(1, 1, Rgb565::RED), Err(Error::Bus));
        di.check_multi(sends!(
            (pin "cs" false),
            (pin "dc" false),
            (pin "cs" true)
        ));

        di.clear();
        assert_eq!(disp.init(&mut di.delay()), Err(Error::Bus));
        assert_eq!(disp.state(), State::ConfigSequence);
        assert_eq!(di.sent().last(), Some(&Sent::Pin("cs", true)));
    }

    #[test]
    fn chip_released_after_reset_pin_error() {
        let di = TestSpyInterface::new();
        let mut disp = St7735::new(di.split(), di.pin("cs"), BrokenPin, Config::default());
        assert_eq!(disp.init(&mut di.delay()), Err(Error::Reset));
        assert_eq!(disp.state(), State::Resetting);
        di.check_multi(sends!((pin "cs" false), (pin "cs" true)));
    }
}
