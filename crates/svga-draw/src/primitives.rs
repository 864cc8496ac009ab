//! Lines, rectangles and circles in terms of [`Raster`] pixel and run operations.
//!
//! All of these accept geometry partly or entirely outside the viewport; clipping happens per
//! pixel or per run, so only the visible part is drawn.

use crate::surface::Raster;

pub trait DrawExt: Raster {
    /// Bresenham line, both endpoints inclusive.
    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, value: Self::Sample) {
        if y1 == y2 {
            let (lo, hi) = ordered(x1, x2);
            hrun(self, i64::from(lo), i64::from(hi), i64::from(y1), value);
            return;
        }

        let (x2, y2) = (i64::from(x2), i64::from(y2));
        let (mut x, mut y) = (i64::from(x1), i64::from(y1));
        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            // Every point lies between the two i32 endpoints.
            self.set_pixel(x as i32, y as i32, value);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Rectangle outline between two opposite corners, inclusive.
    fn rectangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, value: Self::Sample) {
        let (x1, x2) = ordered(x1, x2);
        let (y1, y2) = ordered(y1, y2);

        let (left, right) = (i64::from(x1), i64::from(x2));
        hrun(self, left, right, i64::from(y1), value);
        if y2 != y1 {
            hrun(self, left, right, i64::from(y2), value);
        }

        let viewport = self.viewport();
        let top = (i64::from(y1) + 1).max(0);
        let bottom = i64::from(y2).min(i64::from(viewport.height));
        for y in top..bottom {
            self.set_pixel(x1, y as i32, value);
            if x2 != x1 {
                self.set_pixel(x2, y as i32, value);
            }
        }
    }

    /// Solid rectangle: one horizontal run per row between normalized corners, inclusive.
    fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, value: Self::Sample) {
        let (x1, x2) = ordered(x1, x2);
        let (y1, y2) = ordered(y1, y2);

        let viewport = self.viewport();
        let top = i64::from(y1).max(0);
        let bottom = i64::from(y2).min(i64::from(viewport.height) - 1);
        for y in top..=bottom {
            hrun(self, i64::from(x1), i64::from(x2), y, value);
        }
    }

    /// Midpoint circle outline. `radius <= 0` draws nothing.
    fn circle(&mut self, cx: i32, cy: i32, radius: i32, value: Self::Sample) {
        if radius <= 0 {
            return;
        }
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let mut x: i64 = 0;
        let mut y = i64::from(radius);
        let mut d = 3 - 2 * y;

        while x <= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx - x, cy + y),
                (cx + y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
                (cx - y, cy + x),
            ] {
                plot(self, px, py, value);
            }

            if d < 0 {
                d += 4 * x + 6;
            } else {
                d += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }
    }

    /// Filled circle: four mirrored horizontal runs per step. `radius <= 0` draws nothing.
    ///
    /// Runs are half-open (`cx - x .. cx + x`), so the disc is mirror symmetric about
    /// `cx - 0.5` horizontally and about `cy` vertically.
    fn circle_filled(&mut self, cx: i32, cy: i32, radius: i32, value: Self::Sample) {
        if radius <= 0 {
            return;
        }
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let mut x: i64 = 0;
        let mut y = i64::from(radius);
        let mut dx: i64 = 3;
        let mut dy = 2 - 2 * y;
        let mut d = 1 - y;

        while x <= y {
            hrun(self, cx - x, cx + x - 1, cy - y, value);
            hrun(self, cx - y, cx + y - 1, cy - x, value);
            hrun(self, cx - y, cx + y - 1, cy + x, value);
            hrun(self, cx - x, cx + x - 1, cy + y, value);

            if d < 0 {
                d += dx;
                dx += 2;
            } else {
                d += dx + dy;
                dx += 2;
                dy += 2;
                y -= 1;
            }
            x += 1;
        }
    }
}

impl<T: Raster + ?Sized> DrawExt for T {}

#[inline]
fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Clips the inclusive column range `lo..=hi` to the viewport as `(start, length)`.
#[inline]
fn clip_columns(lo: i64, hi: i64, width: u32) -> Option<(i32, i32)> {
    let lo = lo.max(0);
    let hi = hi.min(i64::from(width) - 1);
    if lo > hi {
        return None;
    }
    Some((i32::try_from(lo).ok()?, i32::try_from(hi - lo + 1).ok()?))
}

#[inline]
fn plot<R: Raster + ?Sized>(raster: &mut R, x: i64, y: i64, value: R::Sample) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        raster.set_pixel(x, y, value);
    }
}

/// Inclusive horizontal run from `lo` to `hi` on row `y`; only the visible part is drawn.
#[inline]
fn hrun<R: Raster + ?Sized>(raster: &mut R, lo: i64, hi: i64, y: i64, value: R::Sample) {
    let Ok(y) = i32::try_from(y) else {
        return;
    };
    if let Some((x, len)) = clip_columns(lo, hi, raster.viewport().width) {
        raster.fill_run(x, y, len, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use svga_vbe::Viewport;

    /// Records every pixel touched, on an unbounded plane with a nominal viewport.
    #[derive(Default)]
    struct Recorder {
        pixels: BTreeSet<(i32, i32)>,
    }

    impl Raster for Recorder {
        type Sample = u8;

        fn viewport(&self) -> Viewport {
            Viewport::new(1024, 768)
        }

        fn set_pixel(&mut self, x: i32, y: i32, _value: u8) {
            self.pixels.insert((x, y));
        }

        fn get_pixel(&mut self, x: i32, y: i32) -> u8 {
            u8::from(self.pixels.contains(&(x, y)))
        }

        fn fill_run(&mut self, x: i32, y: i32, length: i32, _value: u8) {
            let (start, len) = if length < 0 { (x + length, -length) } else { (x, length) };
            for px in start..start + len {
                self.pixels.insert((px, y));
            }
        }
    }

    #[test]
    fn line_covers_endpoints_and_is_connected() {
        let mut r = Recorder::default();
        r.line(2, 3, 9, 7, 1);
        assert!(r.pixels.contains(&(2, 3)));
        assert!(r.pixels.contains(&(9, 7)));
        // One pixel per column for a shallow line.
        assert_eq!(r.pixels.len(), 8);
        let xs: BTreeSet<i32> = r.pixels.iter().map(|&(x, _)| x).collect();
        assert_eq!(xs, (2..=9).collect());
    }

    #[test]
    fn line_is_reversible() {
        let mut a = Recorder::default();
        let mut b = Recorder::default();
        a.line(0, 0, 3, 10, 1);
        b.line(3, 10, 0, 0, 1);
        assert_eq!(a.pixels.len(), 11);
        assert_eq!(b.pixels.len(), 11);
        assert!(a.pixels.contains(&(3, 10)) && b.pixels.contains(&(0, 0)));
    }

    #[test]
    fn horizontal_and_degenerate_lines() {
        let mut r = Recorder::default();
        r.line(5, 1, 1, 1, 1);
        assert_eq!(r.pixels, (1..=5).map(|x| (x, 1)).collect());

        let mut r = Recorder::default();
        r.line(4, 4, 4, 4, 1);
        assert_eq!(r.pixels, [(4, 4)].into_iter().collect());
    }

    #[test]
    fn fill_rect_normalizes_corners() {
        let mut r = Recorder::default();
        r.fill_rect(5, 6, 2, 4, 1);
        let expected: BTreeSet<_> = (4..=6)
            .flat_map(|y| (2..=5).map(move |x| (x, y)))
            .collect();
        assert_eq!(r.pixels, expected);
    }

    #[test]
    fn rectangle_outline_has_no_interior() {
        let mut r = Recorder::default();
        r.rectangle(0, 0, 3, 2, 1);
        assert_eq!(r.pixels.len(), 10);
        assert!(!r.pixels.contains(&(1, 1)));
        assert!(r.pixels.contains(&(3, 1)));
    }

    #[test]
    fn circle_radius_one_and_nonpositive() {
        let mut r = Recorder::default();
        r.circle(10, 10, 0, 1);
        r.circle(10, 10, -3, 1);
        r.circle_filled(10, 10, 0, 1);
        assert!(r.pixels.is_empty());

        r.circle(10, 10, 1, 1);
        let expected: BTreeSet<_> = [(10, 11), (10, 9), (11, 10), (9, 10)].into_iter().collect();
        assert_eq!(r.pixels, expected);
    }

    #[test]
    fn circle_outline_is_eight_way_symmetric() {
        for radius in [1, 2, 5, 17, 100] {
            let mut r = Recorder::default();
            r.circle(0, 0, radius, 1);
            for &(x, y) in &r.pixels {
                for p in [(y, x), (-x, y), (x, -y), (-x, -y), (-y, -x)] {
                    assert!(r.pixels.contains(&p), "r={radius}: ({x},{y}) lacks {p:?}");
                }
            }
        }
    }

    #[test]
    fn filled_circle_is_mirror_symmetric() {
        let (cx, cy) = (500, 400);
        for radius in [1, 3, 8, 40] {
            let mut r = Recorder::default();
            r.circle_filled(cx, cy, radius, 1);
            assert!(!r.pixels.is_empty());
            for &(x, y) in &r.pixels {
                let (x, y) = (x - cx, y - cy);
                assert!(r.pixels.contains(&(cx + x, cy - y)));
                assert!(r.pixels.contains(&(cx - 1 - x, cy + y)));
            }
        }
    }

    #[test]
    fn filled_circle_contains_outline_interior() {
        let mut r = Recorder::default();
        r.circle_filled(500, 400, 10, 1);
        assert!(r.pixels.contains(&(500, 400)));
        assert!(r.pixels.contains(&(490, 400)));
        assert!(r.pixels.contains(&(509, 400)));
        assert!(!r.pixels.contains(&(510, 400)));
        assert!(r.pixels.contains(&(500, 410)) || r.pixels.contains(&(499, 410)));
    }

    #[test]
    fn runs_reach_the_viewport_from_extreme_coordinates() {
        let mut r = Recorder::default();
        r.line(i32::MIN, 5, i32::MAX, 5, 1);
        assert_eq!(r.pixels, (0..1024).map(|x| (x, 5)).collect());

        let mut r = Recorder::default();
        r.fill_rect(i32::MIN, 5, 100, 6, 1);
        assert_eq!(r.pixels.len(), 2 * 101);
        assert!(r.pixels.contains(&(0, 5)) && r.pixels.contains(&(100, 6)));

        let mut r = Recorder::default();
        r.circle_filled(-1000, 300, 1500, 1);
        assert!(r.pixels.contains(&(0, 300)));
        assert!(r.pixels.iter().all(|&(x, _)| (0..1024).contains(&x)));
    }
}
