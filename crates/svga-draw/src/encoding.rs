use core::fmt;
use core::ops::BitXor;

use svga_vbe::{PixelFormat, VideoWindow};

/// A framebuffer sample encoding. Fixes the sample type and the window accessors a surface uses.
pub trait Encoding {
    type Sample: Copy + Default + PartialEq + fmt::Debug + BitXor<Output = Self::Sample>;

    const FORMAT: PixelFormat;

    fn read<W: VideoWindow + ?Sized>(window: &mut W, offset: u32) -> Self::Sample;
    fn write<W: VideoWindow + ?Sized>(window: &mut W, offset: u32, value: Self::Sample);
}

/// 8-bit palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexed8 {}

impl Encoding for Indexed8 {
    type Sample = u8;

    const FORMAT: PixelFormat = PixelFormat::Indexed8;

    #[inline]
    fn read<W: VideoWindow + ?Sized>(window: &mut W, offset: u32) -> u8 {
        window.read_u8(offset)
    }

    #[inline]
    fn write<W: VideoWindow + ?Sized>(window: &mut W, offset: u32, value: u8) {
        window.write_u8(offset, value)
    }
}

/// 16-bit 5:6:5 direct colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packed565 {}

impl Encoding for Packed565 {
    type Sample = u16;

    const FORMAT: PixelFormat = PixelFormat::Packed565;

    #[inline]
    fn read<W: VideoWindow + ?Sized>(window: &mut W, offset: u32) -> u16 {
        window.read_u16(offset)
    }

    #[inline]
    fn write<W: VideoWindow + ?Sized>(window: &mut W, offset: u32, value: u16) {
        window.write_u16(offset, value)
    }
}

/// Truncates 8-bit channels to 5:6:5 and packs them red-high.
#[inline]
pub const fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}
