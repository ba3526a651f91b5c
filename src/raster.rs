//! Rasterisation shared by every backend.
//!
//! These functions only ever call `PixelTarget::draw_pixel`, so they work the same whether the
//! pixel lands in a RAM framebuffer or goes straight out over the bus. All stepping is done in
//! `i32`; a point is narrowed back to unsigned coordinates only when it is plotted, and points that
//! fall left of or above the origin are dropped like any other off-canvas point.

use core::convert::TryFrom;

use itertools::iproduct;

use crate::color::Rgb565;
use crate::display::{PixelTarget, Window};
use crate::error::Error;

fn plot<T>(target: &mut T, x: i32, y: i32, colour: Rgb565) -> Result<(), Error>
where
    T: PixelTarget + ?Sized,
{
    match (u16::try_from(x), u16::try_from(y)) {
        (Ok(x), Ok(y)) => target.draw_pixel(x, y, colour),
        _ => Ok(()),
    }
}

/// Bresenham line between two points, both ends included.
///
/// The error term starts at `dx - dy`. Each step moves in X when `2 * err > -dy` and in Y when
/// `2 * err < dx`; both can happen in one step, giving a diagonal move. The end point is plotted
/// up front so it is drawn even when the loop exits on reaching it. Endpoints are walked from the
/// lexicographically smaller one, so swapping them never changes which pixels are drawn.
pub fn line<T>(
    target: &mut T,
    x1: u16,
    y1: u16,
    x2: u16,
    y2: u16,
    colour: Rgb565,
) -> Result<(), Error>
where
    T: PixelTarget + ?Sized,
{
    let ((x1, y1), (x2, y2)) = if (x1, y1) <= (x2, y2) {
        ((x1, y1), (x2, y2))
    } else {
        ((x2, y2), (x1, y1))
    };
    let (mut x, mut y) = (i32::from(x1), i32::from(y1));
    let (x2, y2) = (i32::from(x2), i32::from(y2));

    let dx = (x2 - x).abs();
    let dy = (y2 - y).abs();
    let sx = if x < x2 { 1 } else { -1 };
    let sy = if y < y2 { 1 } else { -1 };
    let mut err = dx - dy;

    plot(target, x2, y2, colour)?;
    while x != x2 || y != y2 {
        plot(target, x, y, colour)?;
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    Ok(())
}

/// Lines through consecutive vertices. Fewer than two vertices draw nothing.
pub fn polyline<T>(target: &mut T, vertices: &[(u16, u16)], colour: Rgb565) -> Result<(), Error>
where
    T: PixelTarget + ?Sized,
{
    for pair in vertices.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
        line(target, x1, y1, x2, y2, colour)?;
    }
    Ok(())
}

/// Walks one quadrant of a Bresenham circle, handing `(x, y)` with `x <= 0 <= y` to `visit` at
/// every step until `x` passes zero.
fn walk_circle<F>(r: u16, mut visit: F) -> Result<(), Error>
where
    F: FnMut(i32, i32) -> Result<(), Error>,
{
    let mut x = -i32::from(r);
    let mut y = 0;
    let mut err = 2 - 2 * i32::from(r);
    loop {
        visit(x, y)?;
        let mut e2 = err;
        if e2 <= y {
            y += 1;
            err += y * 2 + 1;
            if -x == y && e2 <= x {
                e2 = 0;
            }
        }
        if e2 > x {
            x += 1;
            err += x * 2 + 1;
        }
        if x > 0 {
            return Ok(());
        }
    }
}

/// Circle outline around `(cx, cy)`. Nothing is drawn if the centre is off the canvas; points of
/// the outline that fall off it are clipped individually.
pub fn circle<T>(target: &mut T, cx: u16, cy: u16, r: u16, colour: Rgb565) -> Result<(), Error>
where
    T: PixelTarget + ?Sized,
{
    if !target.size().contains(cx, cy) {
        return Ok(());
    }
    let (cx, cy) = (i32::from(cx), i32::from(cy));
    walk_circle(r, |x, y| {
        plot(target, cx - x, cy + y, colour)?;
        plot(target, cx + x, cy + y, colour)?;
        plot(target, cx + x, cy - y, colour)?;
        plot(target, cx - x, cy - y, colour)
    })
}

/// Filled circle. At every step of the outline walk the two rows through the symmetric points are
/// filled between them, cropped to the canvas. `x` only grows and `y` takes every value on the
/// way, so the first step at each `y` has the widest span and this covers the same pixels as
/// filling the whole box spanned by the four points.
pub fn fill_circle<T>(target: &mut T, cx: u16, cy: u16, r: u16, colour: Rgb565) -> Result<(), Error>
where
    T: PixelTarget + ?Sized,
{
    if !target.size().contains(cx, cy) {
        return Ok(());
    }
    let max_x = i32::from(target.size().width) - 1;
    let (cx, cy) = (i32::from(cx), i32::from(cy));
    walk_circle(r, |x, y| {
        let rows = [cy - y, cy + y];
        let rows = if y == 0 { &rows[..1] } else { &rows[..] };
        let cols = (cx + x).max(0)..=(cx - x).min(max_x);
        for (&py, px) in iproduct!(rows, cols) {
            plot(target, px, py, colour)?;
        }
        Ok(())
    })
}

/// Outline of the rectangle with opposite corners `(x1, y1)` and `(x2, y2)`.
pub fn rectangle<T>(
    target: &mut T,
    x1: u16,
    y1: u16,
    x2: u16,
    y2: u16,
    colour: Rgb565,
) -> Result<(), Error>
where
    T: PixelTarget + ?Sized,
{
    line(target, x1, y1, x2, y1, colour)?;
    line(target, x2, y1, x2, y2, colour)?;
    line(target, x2, y2, x1, y2, colour)?;
    line(target, x1, y2, x1, y1, colour)
}

/// Every pixel between two opposite corners, inclusive, in either order, cropped to the canvas.
pub fn fill_rectangle<T>(
    target: &mut T,
    x1: u16,
    y1: u16,
    x2: u16,
    y2: u16,
    colour: Rgb565,
) -> Result<(), Error>
where
    T: PixelTarget + ?Sized,
{
    let window = match Window::from_corners(target.size(), x1, y1, x2, y2) {
        Some(window) => window,
        None => return Ok(()),
    };
    for (x, y) in window.points() {
        target.draw_pixel(x, y, colour)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::test_canvas::Canvas;
    use proptest::prelude::*;

    const C: Rgb565 = Rgb565::WHITE;

    fn drawn<F>(f: F) -> Vec<(u16, u16)>
    where
        F: FnOnce(&mut Canvas),
    {
        let mut canvas = Canvas::new(64, 48);
        f(&mut canvas);
        canvas.lit(C)
    }

    #[test]
    fn degenerate_line_is_one_pixel() {
        let mut canvas = Canvas::new(64, 48);
        line(&mut canvas, 5, 7, 5, 7, C).unwrap();
        assert_eq!(canvas.lit(C), vec![(5, 7)]);
        assert_eq!(canvas.writes, 1);
    }

    #[test]
    fn horizontal_and_vertical_lines() {
        let h = drawn(|c| line(c, 2, 3, 6, 3, C).unwrap());
        assert_eq!(h, vec![(2, 3), (3, 3), (4, 3), (5, 3), (6, 3)]);
        let v = drawn(|c| line(c, 1, 4, 1, 1, C).unwrap());
        assert_eq!(v, vec![(1, 1), (1, 2), (1, 3), (1, 4)]);
    }

    #[test]
    fn diagonal_takes_both_steps() {
        let d = drawn(|c| line(c, 0, 0, 3, 3, C).unwrap());
        assert_eq!(d, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn shallow_line() {
        let l = drawn(|c| line(c, 0, 0, 4, 2, C).unwrap());
        assert_eq!(l, vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 2)]);
    }

    #[test]
    fn line_is_clipped_per_pixel() {
        let mut canvas = Canvas::new(8, 8);
        line(&mut canvas, 4, 4, 20, 4, C).unwrap();
        assert_eq!(canvas.lit(C), vec![(4, 4), (5, 4), (6, 4), (7, 4)]);
    }

    #[test]
    fn polyline_needs_two_vertices() {
        assert!(drawn(|c| polyline(c, &[], C).unwrap()).is_empty());
        assert!(drawn(|c| polyline(c, &[(3, 3)], C).unwrap()).is_empty());
    }

    #[test]
    fn polyline_joins_segments() {
        let p = drawn(|c| polyline(c, &[(0, 0), (2, 0), (2, 2)], C).unwrap());
        assert_eq!(p, vec![(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn zero_radius_circle_is_centre() {
        assert_eq!(drawn(|c| circle(c, 10, 10, 0, C).unwrap()), vec![(10, 10)]);
        assert_eq!(
            drawn(|c| fill_circle(c, 10, 10, 0, C).unwrap()),
            vec![(10, 10)]
        );
    }

    #[test]
    fn small_circle_outline() {
        let mut o = drawn(|c| circle(c, 10, 10, 1, C).unwrap());
        o.sort();
        assert_eq!(o, vec![(9, 10), (10, 9), (10, 11), (11, 10)]);
    }

    #[test]
    fn circle_outline_is_symmetric() {
        let o = drawn(|c| circle(c, 20, 20, 7, C).unwrap());
        for &(x, y) in &o {
            assert!(o.contains(&(40 - x, y)));
            assert!(o.contains(&(x, 40 - y)));
        }
        assert!(o.contains(&(13, 20)));
        assert!(o.contains(&(27, 20)));
        assert!(o.contains(&(20, 13)));
        assert!(o.contains(&(20, 27)));
    }

    #[test]
    fn filled_circle_covers_outline() {
        let outline = drawn(|c| circle(c, 20, 20, 6, C).unwrap());
        let filled = drawn(|c| fill_circle(c, 20, 20, 6, C).unwrap());
        for p in &outline {
            assert!(filled.contains(p));
        }
        assert!(filled.contains(&(20, 20)));
        assert!(filled.len() > outline.len());
    }

    #[test]
    fn circle_with_centre_off_canvas_draws_nothing() {
        assert!(drawn(|c| circle(c, 64, 10, 5, C).unwrap()).is_empty());
        assert!(drawn(|c| fill_circle(c, 10, 48, 5, C).unwrap()).is_empty());
    }

    #[test]
    fn circle_near_origin_is_clipped() {
        let o = drawn(|c| fill_circle(c, 1, 1, 4, C).unwrap());
        assert!(o.contains(&(0, 0)));
        assert!(o.contains(&(5, 1)));
        assert!(o.iter().all(|&(x, y)| x <= 5 && y <= 5));
    }

    #[test]
    fn huge_fill_circle_stays_cheap() {
        let mut canvas = Canvas::new(128, 64);
        fill_circle(&mut canvas, 64, 32, 600, C).unwrap();
        assert_eq!(canvas.pixels.len(), 128 * 64);
        // At most two cropped rows per step, and the walk takes at most 2r + 1 steps.
        assert!(canvas.writes <= 2 * 128 * 1201);
    }

    #[test]
    fn fill_circle_matches_box_fill() {
        let cases: [(u16, u16, u16); 5] = [(20, 20, 0), (20, 20, 1), (20, 20, 7), (3, 40, 12), (60, 2, 9)];
        for &(cx, cy, r) in &cases {
            let mut expect = Vec::new();
            walk_circle(r, |x, y| {
                let (cx, cy) = (i32::from(cx), i32::from(cy));
                for py in (cy - y)..=(cy + y) {
                    for px in (cx + x)..=(cx - x) {
                        if (0..64).contains(&px) && (0..48).contains(&py) {
                            expect.push((px as u16, py as u16));
                        }
                    }
                }
                Ok(())
            })
            .unwrap();
            expect.sort();
            expect.dedup();
            assert_eq!(drawn(|c| fill_circle(c, cx, cy, r, C).unwrap()), expect);
        }
    }

    #[test]
    fn rectangle_outline() {
        let mut r = drawn(|c| rectangle(c, 1, 1, 3, 3, C).unwrap());
        r.sort();
        assert_eq!(
            r,
            vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)]
        );
    }

    #[test]
    fn fill_rectangle_inclusive() {
        let f = drawn(|c| fill_rectangle(c, 2, 2, 4, 3, C).unwrap());
        assert_eq!(f.len(), 6);
    }

    #[test]
    fn fill_rectangle_off_canvas() {
        let mut canvas = Canvas::new(8, 8);
        fill_rectangle(&mut canvas, 8, 0, 12, 4, C).unwrap();
        fill_rectangle(&mut canvas, 0, 8, 4, 12, C).unwrap();
        assert!(canvas.pixels.is_empty());
        fill_rectangle(&mut canvas, 6, 6, 100, 100, C).unwrap();
        assert_eq!(canvas.lit(C), vec![(6, 6), (6, 7), (7, 6), (7, 7)]);
    }

    #[test]
    fn primitives_ignore_targets_past_the_edge() {
        let mut canvas = Canvas::new(16, 16);
        let size = canvas.size();
        line(&mut canvas, size.width, 0, size.width + 5, 9, C).unwrap();
        circle(&mut canvas, 16, 16, 3, C).unwrap();
        fill_circle(&mut canvas, 0, 16, 3, C).unwrap();
        fill_rectangle(&mut canvas, 16, 16, 30, 30, C).unwrap();
        rectangle(&mut canvas, 16, 16, 30, 30, C).unwrap();
        assert!(canvas.pixels.is_empty());
    }

    proptest! {
        #[test]
        fn line_direction_does_not_matter(
            x1 in 0u16..64, y1 in 0u16..48, x2 in 0u16..64, y2 in 0u16..48,
        ) {
            let forward = drawn(|c| line(c, x1, y1, x2, y2, C).unwrap());
            let backward = drawn(|c| line(c, x2, y2, x1, y1, C).unwrap());
            prop_assert_eq!(&forward, &backward);
            prop_assert!(forward.contains(&(x1, y1)));
            prop_assert!(forward.contains(&(x2, y2)));
        }

        #[test]
        fn fill_rectangle_corner_order_does_not_matter(
            x in 0u16..80, y in 0u16..60, w in 0u16..80, h in 0u16..60,
        ) {
            let canonical = drawn(|c| fill_rectangle(c, x.min(w), y.min(h), x.max(w), y.max(h), C).unwrap());
            let reversed = drawn(|c| fill_rectangle(c, x.max(w), y.max(h), x.min(w), y.min(h), C).unwrap());
            let mixed = drawn(|c| fill_rectangle(c, x, y, w, h, C).unwrap());
            prop_assert_eq!(&canonical, &reversed);
            prop_assert_eq!(&canonical, &mixed);
        }
    }
}
