//! The drawing contract every backend satisfies.
//!
//! A backend only has to know how to put one pixel somewhere (`PixelTarget`) and how to talk to
//! its controller; lines, circles, rectangles and text come from the shared `raster` and `text`
//! modules through the default methods of `Display`. Backends that can do better, like the colour
//! panel streaming a whole rectangle through one addressing window, override those defaults.
//!
//! Coordinates are unsigned with the origin in the top left corner. Anything at or beyond the
//! canvas edge is silently dropped rather than reported.

use hal::blocking::delay::DelayMs;
use itertools::iproduct;

use crate::color::Rgb565;
use crate::error::Error;
use crate::font::Font;
use crate::raster;
use crate::text::{self, Cursor};

/// Canvas dimensions in pixels, fixed when a backend is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Size { width, height }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }
}

/// An inclusive rectangle of pixels lying entirely on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Window {
    /// Build a window from two opposite corners given in either order, cropped to `size`.
    /// Returns `None` when nothing of it is visible.
    pub fn from_corners(size: Size, x1: u16, y1: u16, x2: u16, y2: u16) -> Option<Self> {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        if !size.contains(left, top) {
            return None;
        }
        Some(Window {
            left,
            top,
            right: right.min(size.width - 1),
            bottom: bottom.min(size.height - 1),
        })
    }

    pub fn width(&self) -> u16 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> u16 {
        self.bottom - self.top + 1
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Every covered `(x, y)`, row by row from the top left.
    pub fn points(&self) -> impl Iterator<Item = (u16, u16)> {
        iproduct!(self.top..=self.bottom, self.left..=self.right).map(|(y, x)| (x, y))
    }
}

/// Something that can have single pixels drawn onto it.
pub trait PixelTarget {
    fn size(&self) -> Size;

    /// Set one pixel. Coordinates outside `size()` are ignored.
    fn draw_pixel(&mut self, x: u16, y: u16, colour: Rgb565) -> Result<(), Error>;
}

/// The full drawing API of a panel.
pub trait Display: PixelTarget {
    /// Bring the controller from power-on into a state where it shows what is drawn.
    fn init<D>(&mut self, delay: &mut D) -> Result<(), Error>
    where
        D: DelayMs<u16>;

    fn fill_screen(&mut self, colour: Rgb565) -> Result<(), Error>;

    /// Push pending drawing to the panel. A no-op for backends that draw straight to the panel.
    fn refresh(&mut self) -> Result<(), Error>;

    fn font(&self) -> Font;

    fn set_font(&mut self, font: Font);

    fn cursor(&self) -> Cursor;

    fn set_cursor(&mut self, x: u16, y: u16);

    fn reset_cursor(&mut self) {
        self.set_cursor(0, 0)
    }

    fn width(&self) -> u16 {
        self.size().width
    }

    fn height(&self) -> u16 {
        self.size().height
    }

    /// Look up a named colour this panel can show, e.g. `"WHITE"`.
    fn colour_by_name(&self, name: &str) -> Option<Rgb565> {
        let colour = Rgb565::from_name(name);
        if colour.is_none() {
            warn!("unknown colour name {:?}", name);
        }
        colour
    }

    /// Draw one character at the cursor and advance it. See `text::write_char`.
    fn write_char(&mut self, ch: char, colour: Rgb565, background: Rgb565) -> Result<(), Error> {
        text::write_char(self, ch, colour, background)
    }

    fn write_str(&mut self, s: &str, colour: Rgb565, background: Rgb565) -> Result<(), Error> {
        for ch in s.chars() {
            self.write_char(ch, colour, background)?;
        }
        Ok(())
    }

    fn draw_line(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, colour: Rgb565) -> Result<(), Error> {
        raster::line(self, x1, y1, x2, y2, colour)
    }

    fn draw_polyline(&mut self, vertices: &[(u16, u16)], colour: Rgb565) -> Result<(), Error> {
        raster::polyline(self, vertices, colour)
    }

    fn draw_circle(&mut self, x: u16, y: u16, r: u16, colour: Rgb565) -> Result<(), Error> {
        raster::circle(self, x, y, r, colour)
    }

    fn fill_circle(&mut self, x: u16, y: u16, r: u16, colour: Rgb565) -> Result<(), Error> {
        raster::fill_circle(self, x, y, r, colour)
    }

    fn draw_rectangle(
        &mut self,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        colour: Rgb565,
    ) -> Result<(), Error> {
        raster::rectangle(self, x1, y1, x2, y2, colour)
    }

    /// Fill the rectangle between two opposite corners, inclusive. The corners may be given in
    /// either order.
    fn fill_rectangle(
        &mut self,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        colour: Rgb565,
    ) -> Result<(), Error> {
        raster::fill_rectangle(self, x1, y1, x2, y2, colour)
    }
}


#[cfg(test)]
mod tests {
    use super::test_canvas::Canvas;
    use super::*;

    #[test]
    fn window_normalises_corners() {
        let size = Size::new(128, 64);
        let canonical = Window::from_corners(size, 3, 4, 10, 20);
        assert_eq!(
            canonical,
            Some(Window {
                left: 3,
                top: 4,
                right: 10,
                bottom: 20
            })
        );
        assert_eq!(Window::from_corners(size, 10, 20, 3, 4), canonical);
        assert_eq!(Window::from_corners(size, 10, 4, 3, 20), canonical);
        assert_eq!(canonical.unwrap().area(), 8 * 17);
    }

    #[test]
    fn window_crops_to_canvas() {
        let size = Size::new(128, 64);
        let w = Window::from_corners(size, 120, 60, 500, 500).unwrap();
        assert_eq!((w.right, w.bottom), (127, 63));
        assert_eq!(w.area(), 8 * 4);
        assert_eq!(Window::from_corners(size, 128, 0, 200, 10), None);
        assert_eq!(Window::from_corners(Size::new(0, 0), 0, 0, 0, 0), None);
    }

    #[test]
    fn window_points_row_major() {
        let w = Window::from_corners(Size::new(8, 8), 1, 1, 2, 2).unwrap();
        assert_eq!(
            w.points().collect::<Vec<_>>(),
            vec![(1, 1), (2, 1), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn colour_names() {
        let canvas = Canvas::new(8, 8);
        assert_eq!(canvas.colour_by_name("WHITE"), Some(Rgb565::WHITE));
        assert_eq!(canvas.colour_by_name("NOT_A_COLOR"), None);
    }

    #[test]
    fn dimensions() {
        let canvas = Canvas::new(96, 16);
        assert_eq!(canvas.width(), 96);
        assert_eq!(canvas.height(), 16);
    }

    #[test]
    fn out_of_bounds_pixel_is_ignored() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_pixel(8, 0, Rgb565::WHITE).unwrap();
        canvas.draw_pixel(0, 8, Rgb565::WHITE).unwrap();
        canvas.draw_pixel(u16::MAX, u16::MAX, Rgb565::WHITE).unwrap();
        assert!(canvas.pixels.is_empty());
    }
}
