//! VBE mode numbers and the drawing parameters they imply.

use crate::config::{FramebufferConfig, Viewport, DEFAULT_ROW_SHIFT};
use crate::error::{Result, VbeError};

/// A VESA BIOS Extension mode number (`BX` for INT 10h AX=4F02h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VbeMode(pub u16);

impl VbeMode {
    /// 1024x768, 256 colours (8-bit palette index).
    pub const SVGA_1024X768X256: VbeMode = VbeMode(0x105);
    /// 1024x768, 64K colours (5:6:5 direct colour).
    pub const SVGA_1024X768X64K: VbeMode = VbeMode(0x117);

    #[inline]
    pub fn number(self) -> u16 {
        self.0
    }

    /// Looks the mode up in the standard VESA 1.2 mode table.
    pub fn info(self) -> Option<&'static ModeInfo> {
        KNOWN_MODES.iter().find(|info| info.mode == self)
    }
}

/// How a mode stores colour in video memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLayout {
    /// Palette index; colours resolved through the DAC.
    Indexed,
    /// 4 bit planes (16 colours).
    Planar,
    /// Direct colour with the given channel widths, high bits first.
    Direct {
        reserved: u8,
        red: u8,
        green: u8,
        blue: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    pub mode: VbeMode,
    pub width: u32,
    pub height: u32,
    pub colors: u32,
    pub layout: ColorLayout,
}

impl ModeInfo {
    /// Pixel format the drawing layer can use for this mode, if any.
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        match self.layout {
            ColorLayout::Indexed if self.colors == 256 => Some(PixelFormat::Indexed8),
            ColorLayout::Direct {
                reserved: 0,
                red: 5,
                green: 6,
                blue: 5,
            } => Some(PixelFormat::Packed565),
            _ => None,
        }
    }
}

const fn direct(reserved: u8, red: u8, green: u8, blue: u8) -> ColorLayout {
    ColorLayout::Direct {
        reserved,
        red,
        green,
        blue,
    }
}

const fn mode(number: u16, width: u32, height: u32, colors: u32, layout: ColorLayout) -> ModeInfo {
    ModeInfo {
        mode: VbeMode(number),
        width,
        height,
        colors,
        layout,
    }
}

pub static KNOWN_MODES: &[ModeInfo] = &[
    mode(0x101, 640, 480, 256, ColorLayout::Indexed),
    mode(0x103, 800, 600, 256, ColorLayout::Indexed),
    mode(0x104, 1024, 768, 16, ColorLayout::Planar),
    mode(0x105, 1024, 768, 256, ColorLayout::Indexed),
    mode(0x110, 640, 480, 1 << 15, direct(1, 5, 5, 5)),
    mode(0x111, 640, 480, 1 << 16, direct(0, 5, 6, 5)),
    mode(0x112, 640, 480, 1 << 24, direct(0, 8, 8, 8)),
    mode(0x113, 800, 600, 1 << 15, direct(1, 5, 5, 5)),
    mode(0x114, 800, 600, 1 << 16, direct(0, 5, 6, 5)),
    mode(0x115, 800, 600, 1 << 24, direct(0, 8, 8, 8)),
    mode(0x116, 1024, 768, 1 << 15, direct(1, 5, 5, 5)),
    mode(0x117, 1024, 768, 1 << 16, direct(0, 5, 6, 5)),
    mode(0x118, 1024, 768, 1 << 24, direct(0, 8, 8, 8)),
];

/// Sample encodings the drawing layer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One byte per pixel, an index into the 256-entry DAC palette.
    Indexed8,
    /// Two bytes per pixel, `RRRRRGGG_GGGBBBBB`.
    Packed565,
}

impl PixelFormat {
    #[inline]
    pub const fn bytes_per_sample(self) -> u32 {
        match self {
            PixelFormat::Indexed8 => 1,
            PixelFormat::Packed565 => 2,
        }
    }
}

/// A mode the banked drawing layer can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub vbe: VbeMode,
    pub format: PixelFormat,
    pub viewport: Viewport,
}

impl DisplayMode {
    pub const INDEXED_1024X768: DisplayMode = DisplayMode {
        vbe: VbeMode::SVGA_1024X768X256,
        format: PixelFormat::Indexed8,
        viewport: Viewport::new(1024, 768),
    };

    pub const RGB565_1024X768: DisplayMode = DisplayMode {
        vbe: VbeMode::SVGA_1024X768X64K,
        format: PixelFormat::Packed565,
        viewport: Viewport::new(1024, 768),
    };

    /// Resolves the drawing parameters for `mode`.
    ///
    /// Only modes whose scanline is exactly one row pitch wide (1024 samples) are accepted: the
    /// addressing model uses a fixed shift for the row pitch, which is wrong for narrower modes.
    pub fn from_vbe(mode: VbeMode) -> Result<Self> {
        let info = mode.info().ok_or(VbeError::UnsupportedMode(mode.0))?;
        let format = info
            .pixel_format()
            .ok_or(VbeError::UnsupportedMode(mode.0))?;
        if info.width != 1 << DEFAULT_ROW_SHIFT {
            return Err(VbeError::UnsupportedMode(mode.0));
        }
        Ok(Self {
            vbe: mode,
            format,
            viewport: Viewport::new(info.width, info.height),
        })
    }

    pub fn config(&self) -> FramebufferConfig {
        FramebufferConfig {
            viewport: self.viewport,
            ..FramebufferConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup_reports_resolution_and_layout() {
        let info = VbeMode(0x114).info().unwrap();
        assert_eq!((info.width, info.height), (800, 600));
        assert_eq!(info.pixel_format(), Some(PixelFormat::Packed565));

        let info = VbeMode(0x116).info().unwrap();
        assert_eq!(info.pixel_format(), None, "1:5:5:5 is not drawable");

        assert!(VbeMode(0x1FF).info().is_none());
    }

    #[test]
    fn supported_modes_resolve_to_their_constants() {
        assert_eq!(
            DisplayMode::from_vbe(VbeMode::SVGA_1024X768X256),
            Ok(DisplayMode::INDEXED_1024X768)
        );
        assert_eq!(
            DisplayMode::from_vbe(VbeMode::SVGA_1024X768X64K),
            Ok(DisplayMode::RGB565_1024X768)
        );
    }

    #[test]
    fn narrow_and_truecolor_modes_are_rejected() {
        // 800x600x256 would need an 800 sample pitch.
        assert_eq!(
            DisplayMode::from_vbe(VbeMode(0x103)),
            Err(VbeError::UnsupportedMode(0x103))
        );
        assert_eq!(
            DisplayMode::from_vbe(VbeMode(0x118)),
            Err(VbeError::UnsupportedMode(0x118))
        );
        assert_eq!(
            DisplayMode::from_vbe(VbeMode(0x104)),
            Err(VbeError::UnsupportedMode(0x104))
        );
    }
}
