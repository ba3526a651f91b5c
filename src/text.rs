//! Cursor-driven text rendering.
//!
//! Text is drawn one glyph cell at a time at the cursor, which then moves right by the glyph width.
//! There is no wrapping: a glyph that would cross the right or bottom edge of the canvas is not
//! drawn at all and the cursor stays put. A newline moves the cursor to the start of the next row
//! of cells without drawing anything.

use itertools::iproduct;

use crate::color::Rgb565;
use crate::display::{Display, Size};
use crate::error::Error;
use crate::font::Font;

/// Where the next glyph cell starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: u16,
    pub y: u16,
}

/// What writing one character at a given cursor amounts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Nothing to draw; the cursor moves to the given position.
    Newline(Cursor),
    /// The glyph does not fit, or the font has no glyph for it. Nothing happens.
    Clipped,
    /// Draw `rows` in the cell whose top left corner is `at`, then move the cursor to `next`.
    Glyph {
        at: Cursor,
        next: Cursor,
        rows: &'static [u8],
    },
}

/// Work out where `ch` goes when written at `cursor` on a canvas of `size`.
pub fn layout(ch: char, cursor: Cursor, font: &Font, size: Size) -> Placement {
    let w = u32::from(font.width());
    let h = u32::from(font.height());

    if ch == '\n' {
        let y = u32::from(cursor.y) + h;
        return Placement::Newline(Cursor {
            x: 0,
            y: y.min(u32::from(u16::MAX)) as u16,
        });
    }

    if u32::from(cursor.x) + w > u32::from(size.width)
        || u32::from(cursor.y) + h > u32::from(size.height)
    {
        return Placement::Clipped;
    }

    match font.glyph_for(ch) {
        Some(rows) => Placement::Glyph {
            at: cursor,
            // Fits on the canvas, so the sum fits in a u16.
            next: Cursor {
                x: cursor.x + font.width() as u16,
                y: cursor.y,
            },
            rows,
        },
        None => Placement::Clipped,
    }
}

/// The colours of a glyph cell, row by row from the top left: `fg` where a row bit is set, `bg`
/// where it is clear.
pub fn glyph_pixels(
    rows: &'static [u8],
    width: u8,
    fg: Rgb565,
    bg: Rgb565,
) -> impl Iterator<Item = Rgb565> {
    iproduct!(rows.iter(), 0..width).map(move |(row, bit)| {
        if *row & (1u8 << bit) != 0 {
            fg
        } else {
            bg
        }
    })
}

/// Draw `ch` at the display's cursor pixel by pixel and advance the cursor.
pub fn write_char<D>(
    display: &mut D,
    ch: char,
    colour: Rgb565,
    background: Rgb565,
) -> Result<(), Error>
where
    D: Display + ?Sized,
{
    let font = display.font();
    match layout(ch, display.cursor(), &font, display.size()) {
        Placement::Newline(next) => display.set_cursor(next.x, next.y),
        Placement::Clipped => (),
        Placement::Glyph { at, next, rows } => {
            let cells = iproduct!(0..u16::from(font.height()), 0..u16::from(font.width()));
            let pixels = glyph_pixels(rows, font.width(), colour, background);
            for ((dy, dx), pixel) in cells.zip(pixels) {
                display.draw_pixel(at.x + dx, at.y + dy, pixel)?;
            }
            display.set_cursor(next.x, next.y);
        }
    }
    Ok(())
}
