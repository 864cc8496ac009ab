//! Windows BMP loading onto the banked SVGA surfaces.
//!
//! Two fixed formats are supported, both uncompressed:
//! - 8-bit palettized onto an [`svga_draw::IndexedSurface`], with the palette loaded into the DAC,
//! - 24-bit BGR onto an [`svga_draw::Rgb565Surface`], converted per pixel.
//!
//! Rows are stored bottom-up unless the header height is negative.

mod error;
pub mod header;
mod io;
mod loader;

pub use error::{BmpError, DecodeErrorKind, Result};
pub use header::BmpHeader;
pub use loader::{
    draw_bmp_indexed8, draw_bmp_indexed8_from_reader, draw_bmp_packed565,
    draw_bmp_packed565_from_reader, BmpInfo, LoadStage,
};
