//! Save and restore a rectangle of the screen, e.g. behind a transient overlay.
//!
//! The rectangle is `|x2 - x1|` by `|y2 - y1|` samples starting at `(x1, y1)`. Pixels outside the
//! viewport read as the surface's out-of-range sentinel and are skipped on restore; pre-clip the
//! rectangle if that matters.

use crate::error::RegionError;
use crate::surface::Raster;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSnapshot<T> {
    width: usize,
    height: usize,
    samples: Vec<T>,
}

impl<T: Copy> RegionSnapshot<T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major samples.
    #[inline]
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn get(&self, col: usize, row: usize) -> Option<T> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.samples.get(row * self.width + col).copied()
    }
}

/// Number of samples a capture of the rectangle holds, saturating.
pub fn region_size(x1: i32, y1: i32, x2: i32, y2: i32) -> usize {
    let (width, height) = dimensions(x1, y1, x2, y2);
    width.saturating_mul(height)
}

/// Reads the rectangle into a new snapshot. Fails only if the snapshot cannot be allocated.
pub fn capture<R: Raster + ?Sized>(
    raster: &mut R,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
) -> Result<RegionSnapshot<R::Sample>, RegionError> {
    let (width, height) = dimensions(x1, y1, x2, y2);
    let too_large = || RegionError::TooLarge { width, height };
    let len = width.checked_mul(height).ok_or_else(too_large)?;
    let mut samples = Vec::new();
    samples.try_reserve_exact(len).map_err(|_| too_large())?;

    for row in 0..height {
        for col in 0..width {
            samples.push(raster.get_pixel(offset(x1, col), offset(y1, row)));
        }
    }
    Ok(RegionSnapshot {
        width,
        height,
        samples,
    })
}

pub fn restore<R: Raster + ?Sized>(
    raster: &mut R,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    snapshot: &RegionSnapshot<R::Sample>,
) -> Result<(), RegionError> {
    let (width, height) = dimensions(x1, y1, x2, y2);
    if (width, height) != (snapshot.width, snapshot.height) {
        return Err(RegionError::SizeMismatch {
            expected_width: width,
            expected_height: height,
            found_width: snapshot.width,
            found_height: snapshot.height,
        });
    }

    for (row, line) in snapshot.samples.chunks(width.max(1)).enumerate() {
        for (col, &value) in line.iter().enumerate() {
            raster.set_pixel(offset(x1, col), offset(y1, row), value);
        }
    }
    Ok(())
}

#[inline]
fn dimensions(x1: i32, y1: i32, x2: i32, y2: i32) -> (usize, usize) {
    (x2.abs_diff(x1) as usize, y2.abs_diff(y1) as usize)
}

/// `base + delta`, saturating; anything saturated is off-screen anyway.
#[inline]
fn offset(base: i32, delta: usize) -> i32 {
    let delta = i32::try_from(delta).unwrap_or(i32::MAX);
    base.saturating_add(delta)
}
