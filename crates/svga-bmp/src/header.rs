//! Fixed-offset fields of a Windows BMP file (BITMAPFILEHEADER + BITMAPINFOHEADER).
//!
//! All fields are little-endian. The decoder only supports the layout where the palette (8-bit)
//! or the pixel rows (24-bit) follow the 54 byte header directly.

use std::io::{Read, Seek};

use crate::error::Result;
use crate::io::{ReadLeExt, SeekExt};

/// `biWidth` (`i32`), immediately followed by `biHeight` (`i32`).
pub const WIDTH_OFFSET: u64 = 18;
pub const HEIGHT_OFFSET: u64 = 22;
/// `biBitCount` (`u16`).
pub const BIT_COUNT_OFFSET: u64 = 28;
/// `biCompression` (`u32`).
pub const COMPRESSION_OFFSET: u64 = 30;
/// `biClrUsed` (`u32`).
pub const COLORS_USED_OFFSET: u64 = 46;
/// Size of both headers; the palette or the pixel data starts here.
pub const HEADER_LEN: u64 = 54;

/// `BI_RGB`.
pub const COMPRESSION_NONE: u32 = 0;

/// Bytes per palette entry (blue, green, red, reserved).
pub const PALETTE_ENTRY_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub width: i32,
    /// Positive: rows stored bottom-up. Negative: top-down.
    pub height: i32,
    pub bit_count: u16,
    pub compression: u32,
    /// 0 means "all `2^bit_count` colours".
    pub colors_used: u32,
}

impl BmpHeader {
    pub fn read_from<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Self> {
        reader.seek_to(WIDTH_OFFSET)?;
        let width = reader.read_i32_le()?;
        let height = reader.read_i32_le()?;
        reader.seek_to(BIT_COUNT_OFFSET)?;
        let bit_count = reader.read_u16_le()?;
        let compression = reader.read_u32_le()?;
        reader.seek_to(COLORS_USED_OFFSET)?;
        let colors_used = reader.read_u32_le()?;
        Ok(Self {
            width,
            height,
            bit_count,
            compression,
            colors_used,
        })
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.height.unsigned_abs()
    }

    #[inline]
    pub fn bottom_up(&self) -> bool {
        self.height >= 0
    }

    /// Palette entries an indexed image carries.
    pub fn palette_entries(&self) -> u64 {
        palette_entries(self.colors_used, self.bit_count)
    }

    /// Bytes per stored row including padding, or `None` for a non-positive width.
    pub fn row_stride(&self) -> Option<usize> {
        let width = usize::try_from(self.width).ok().filter(|&w| w > 0)?;
        let bits = width.checked_mul(usize::from(self.bit_count))?;
        Some(padded_stride(bits.div_ceil(8)))
    }
}

pub(crate) fn palette_entries(colors_used: u32, bit_count: u16) -> u64 {
    if colors_used == 0 {
        1u64 << bit_count.min(32)
    } else {
        u64::from(colors_used)
    }
}

/// Rounds a row's byte count up to the 4 byte boundary rows are stored on.
#[inline]
pub const fn padded_stride(bytes_per_row: usize) -> usize {
    (bytes_per_row + 3) & !3
}
