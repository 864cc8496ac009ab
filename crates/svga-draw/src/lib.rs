//! Clipped pixel, run and vector drawing on a banked SVGA framebuffer.
//!
//! [`PixelSurface`] is the only type that touches the framebuffer. Lines, rectangles, circles
//! ([`DrawExt`]) and region save/restore ([`region`]) are built purely from its clipped
//! pixel and run operations via the [`Raster`] trait.

mod encoding;
mod error;
pub mod primitives;
pub mod region;
mod surface;

pub use encoding::{pack_rgb565, Encoding, Indexed8, Packed565};
pub use error::RegionError;
pub use primitives::DrawExt;
pub use region::{capture, region_size, restore, RegionSnapshot};
pub use surface::{IndexedSurface, PixelSurface, Raster, Rgb565Surface};
