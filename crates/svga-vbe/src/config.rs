use crate::error::{Result, VbeError};
use crate::mode::PixelFormat;

/// Row pitch used by the 1024-wide banked modes: `1 << 10` samples per scanline.
pub const DEFAULT_ROW_SHIFT: u32 = 10;

/// Size of the banked aperture at `A000:0000`.
pub const DEFAULT_WINDOW_SIZE: u32 = 64 * 1024;

/// Visible drawing area; coordinates outside it are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the coordinate as unsigned values if it lies inside the viewport.
    #[inline]
    pub fn clip(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.clip(x, y).is_some()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferConfig {
    pub viewport: Viewport,
    /// Scanline pitch as a power of two, in samples. This is a property of the video mode and is
    /// NOT derived from the viewport width: a 1000-wide viewport still uses a 1024 sample pitch.
    pub row_shift: u32,
    /// Bytes addressable through the window at once.
    pub window_size: u32,
}

impl Default for FramebufferConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            row_shift: DEFAULT_ROW_SHIFT,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Validated addressing parameters for one pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferLayout {
    viewport: Viewport,
    format: PixelFormat,
    row_shift: u32,
    window_shift: u32,
}

impl FramebufferLayout {
    pub fn new(config: &FramebufferConfig, format: PixelFormat) -> Result<Self> {
        let FramebufferConfig {
            viewport,
            row_shift,
            window_size,
        } = *config;

        if viewport.width == 0 || viewport.height == 0 {
            return Err(VbeError::InvalidLayout("viewport must not be empty"));
        }
        if row_shift > 16 {
            return Err(VbeError::InvalidLayout("row pitch above 64K samples"));
        }
        if u64::from(viewport.width) > 1u64 << row_shift {
            return Err(VbeError::InvalidLayout("viewport wider than the row pitch"));
        }
        if !window_size.is_power_of_two() || window_size < format.bytes_per_sample() {
            return Err(VbeError::InvalidLayout(
                "window size must be a power of two of at least one sample",
            ));
        }
        let window_shift =
            window_size.trailing_zeros() - format.bytes_per_sample().trailing_zeros();

        let last_linear =
            (u64::from(viewport.height - 1) << row_shift) + u64::from(viewport.width - 1);
        if last_linear > u64::from(u32::MAX) || (last_linear >> window_shift) > u64::from(u16::MAX)
        {
            return Err(VbeError::InvalidLayout("viewport needs more than 65536 banks"));
        }

        Ok(Self {
            viewport,
            format,
            row_shift,
            window_shift,
        })
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn row_shift(&self) -> u32 {
        self.row_shift
    }

    /// log2 of the number of samples one bank holds.
    #[inline]
    pub fn window_shift(&self) -> u32 {
        self.window_shift
    }

    #[inline]
    pub fn samples_per_bank(&self) -> u32 {
        1 << self.window_shift
    }

    /// Bytes of video memory the viewport spans, including row padding.
    pub fn vram_span(&self) -> usize {
        ((self.viewport.height as usize) << self.row_shift)
            * self.format.bytes_per_sample() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layouts_use_the_window_in_samples() {
        let config = FramebufferConfig::default();

        let indexed = FramebufferLayout::new(&config, PixelFormat::Indexed8).unwrap();
        assert_eq!(indexed.row_shift(), 10);
        assert_eq!(indexed.window_shift(), 16);
        assert_eq!(indexed.samples_per_bank(), 65536);

        let packed = FramebufferLayout::new(&config, PixelFormat::Packed565).unwrap();
        assert_eq!(packed.window_shift(), 15);
        assert_eq!(packed.samples_per_bank(), 32768);
        assert_eq!(packed.vram_span(), 1024 * 768 * 2);
    }

    #[test]
    fn viewport_narrower_than_pitch_keeps_pitch() {
        let config = FramebufferConfig {
            viewport: Viewport::new(1000, 10),
            ..FramebufferConfig::default()
        };
        let layout = FramebufferLayout::new(&config, PixelFormat::Indexed8).unwrap();
        assert_eq!(layout.row_shift(), 10);
        assert_eq!(layout.vram_span(), 10 * 1024);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let wide = FramebufferConfig {
            viewport: Viewport::new(1025, 768),
            ..FramebufferConfig::default()
        };
        assert!(matches!(
            FramebufferLayout::new(&wide, PixelFormat::Indexed8),
            Err(VbeError::InvalidLayout(_))
        ));

        let odd_window = FramebufferConfig {
            window_size: 48 * 1024,
            ..FramebufferConfig::default()
        };
        assert!(FramebufferLayout::new(&odd_window, PixelFormat::Packed565).is_err());

        let empty = FramebufferConfig {
            viewport: Viewport::new(0, 768),
            ..FramebufferConfig::default()
        };
        assert!(FramebufferLayout::new(&empty, PixelFormat::Indexed8).is_err());

        let tiny_window = FramebufferConfig {
            window_size: 1,
            ..FramebufferConfig::default()
        };
        assert!(FramebufferLayout::new(&tiny_window, PixelFormat::Packed565).is_err());
    }

    #[test]
    fn viewport_clip() {
        let vp = Viewport::new(4, 3);
        assert_eq!(vp.clip(0, 0), Some((0, 0)));
        assert_eq!(vp.clip(3, 2), Some((3, 2)));
        assert_eq!(vp.clip(4, 2), None);
        assert_eq!(vp.clip(-1, 0), None);
        assert_eq!(vp.clip(0, 3), None);
    }
}
