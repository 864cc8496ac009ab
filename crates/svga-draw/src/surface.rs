use core::marker::PhantomData;

use svga_vbe::{
    BankedFramebuffer, DisplayMode, FramebufferConfig, FramebufferLayout, PixelFormat, VbeError,
    VideoWindow, Viewport,
};

use crate::encoding::{Encoding, Indexed8, Packed565};

/// Clipped pixel access. Everything in [`crate::primitives`] and [`crate::region`] is written
/// against this trait.
pub trait Raster {
    type Sample: Copy + Default;

    fn viewport(&self) -> Viewport;

    /// No-op outside the viewport.
    fn set_pixel(&mut self, x: i32, y: i32, value: Self::Sample);

    /// `Sample::default()` outside the viewport.
    fn get_pixel(&mut self, x: i32, y: i32) -> Self::Sample;

    /// Horizontal run of `length` pixels starting at `x`. A negative `length` extends left
    /// (the run covers `x + length .. x`).
    fn fill_run(&mut self, x: i32, y: i32, length: i32, value: Self::Sample);
}

/// A viewport-clipped drawing surface over a banked framebuffer with a fixed encoding.
#[derive(Debug)]
pub struct PixelSurface<W, E> {
    fb: BankedFramebuffer<W>,
    _encoding: PhantomData<E>,
}

pub type IndexedSurface<W> = PixelSurface<W, Indexed8>;
pub type Rgb565Surface<W> = PixelSurface<W, Packed565>;

impl<W: VideoWindow, E: Encoding> PixelSurface<W, E> {
    pub fn new(window: W, config: &FramebufferConfig) -> Result<Self, VbeError> {
        let layout = FramebufferLayout::new(config, E::FORMAT)?;
        Self::with_layout(window, layout)
    }

    /// Surface for a mode returned by [`svga_vbe::enter_mode`].
    pub fn for_mode(window: W, mode: &DisplayMode) -> Result<Self, VbeError> {
        if mode.format != E::FORMAT {
            return Err(VbeError::UnsupportedMode(mode.vbe.number()));
        }
        Self::new(window, &mode.config())
    }

    /// Fails if `layout` was built for a different pixel format than `E`.
    pub fn with_layout(window: W, layout: FramebufferLayout) -> Result<Self, VbeError> {
        if layout.format() != E::FORMAT {
            return Err(VbeError::InvalidLayout(
                "layout pixel format does not match the surface encoding",
            ));
        }
        Ok(Self {
            fb: BankedFramebuffer::new(window, layout),
            _encoding: PhantomData,
        })
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.fb.layout().viewport()
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        E::FORMAT
    }

    #[inline]
    pub fn framebuffer(&self) -> &BankedFramebuffer<W> {
        &self.fb
    }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut BankedFramebuffer<W> {
        &mut self.fb
    }

    #[inline]
    pub fn window(&self) -> &W {
        self.fb.window()
    }

    pub fn into_inner(self) -> W {
        self.fb.into_window()
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, value: E::Sample) {
        let Some((x, y)) = self.viewport().clip(x, y) else {
            return;
        };
        let offset = self.fb.map(x, y);
        E::write(self.fb.window_mut(), offset, value);
    }

    pub fn get_pixel(&mut self, x: i32, y: i32) -> E::Sample {
        let Some((x, y)) = self.viewport().clip(x, y) else {
            return E::Sample::default();
        };
        let offset = self.fb.map(x, y);
        E::read(self.fb.window_mut(), offset)
    }

    /// Writes `current ^ value`.
    pub fn xor_pixel(&mut self, x: i32, y: i32, value: E::Sample) {
        let Some((x, y)) = self.viewport().clip(x, y) else {
            return;
        };
        let offset = self.fb.map(x, y);
        let window = self.fb.window_mut();
        let current = E::read(window, offset);
        E::write(window, offset, current ^ value);
    }

    pub fn fill_run(&mut self, x: i32, y: i32, length: i32, value: E::Sample) {
        let viewport = self.viewport();
        let Ok(y) = u32::try_from(y) else {
            return;
        };
        if y >= viewport.height {
            return;
        }

        let (mut start, mut length) = (i64::from(x), i64::from(length));
        if length < 0 {
            start += length;
            length = -length;
        }
        let end = (start + length).min(i64::from(viewport.width));
        let start = start.max(0);
        if start >= end {
            return;
        }

        let mut linear = self.fb.linear(start as u32, y);
        let mut remaining = (end - start) as u32;
        // Split at bank boundaries. With a 1024 sample pitch and a 64KiB window rows never
        // straddle, so this is one chunk in practice.
        while remaining > 0 {
            let chunk = remaining.min(self.fb.samples_left_in_bank(linear));
            self.fb.switch_bank(self.fb.bank_of(linear));
            let window = self.fb.window_mut();
            for offset in linear..linear + chunk {
                E::write(window, offset, value);
            }
            linear += chunk;
            remaining -= chunk;
        }
    }
}

impl<W: VideoWindow, E: Encoding> Raster for PixelSurface<W, E> {
    type Sample = E::Sample;

    fn viewport(&self) -> Viewport {
        PixelSurface::viewport(self)
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: E::Sample) {
        PixelSurface::set_pixel(self, x, y, value)
    }

    fn get_pixel(&mut self, x: i32, y: i32) -> E::Sample {
        PixelSurface::get_pixel(self, x, y)
    }

    fn fill_run(&mut self, x: i32, y: i32, length: i32, value: E::Sample) {
        PixelSurface::fill_run(self, x, y, length, value)
    }
}
