//! Raster graphics on banked VESA SVGA framebuffers.
//!
//! The workspace is split the way the data flows:
//! - [`vbe`]: modes, bank addressing and the hardware seams (window select, mode set, DAC),
//! - [`draw`]: clipped pixels and runs, vector primitives, region save/restore,
//! - [`bmp`]: uncompressed 8-bit and 24-bit BMP loading.
//!
//! [`start_indexed8`] and [`start_rgb565`] switch the display into one of the two drawable
//! 1024x768 modes and hand back a surface for it.

use thiserror::Error;

pub use svga_bmp as bmp;
pub use svga_draw as draw;
pub use svga_vbe as vbe;

use svga_bmp::BmpError;
use svga_draw::{IndexedSurface, RegionError, Rgb565Surface};
use svga_vbe::{enter_mode, DisplayControl, VbeError, VbeMode, VideoWindow};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Vbe(#[from] VbeError),

    #[error(transparent)]
    Bitmap(#[from] BmpError),

    #[error(transparent)]
    Region(#[from] RegionError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Enters mode `0x105` (1024x768, 256 colours) and returns a surface drawing through `window`.
pub fn start_indexed8<D, W>(display: &mut D, window: W) -> Result<IndexedSurface<W>>
where
    D: DisplayControl + ?Sized,
    W: VideoWindow,
{
    let mode = enter_mode(display, VbeMode::SVGA_1024X768X256)?;
    Ok(IndexedSurface::for_mode(window, &mode)?)
}

/// Enters mode `0x117` (1024x768, 5:6:5) and returns a surface drawing through `window`.
pub fn start_rgb565<D, W>(display: &mut D, window: W) -> Result<Rgb565Surface<W>>
where
    D: DisplayControl + ?Sized,
    W: VideoWindow,
{
    let mode = enter_mode(display, VbeMode::SVGA_1024X768X64K)?;
    Ok(Rgb565Surface::for_mode(window, &mode)?)
}
