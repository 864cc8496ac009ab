//! Coordinate to (bank, offset) resolution over a windowed framebuffer.
//!
//! Video memory is one flat array of samples. Row `y` starts at `y << row_shift` regardless of
//! the viewport width, so callers must not assume rows are packed at the viewport width. Only one
//! `1 << window_shift` sample slice of that array is visible through the window at a time.

use tracing::trace;

use crate::config::FramebufferLayout;
use crate::hw::VideoWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankAddress {
    pub bank: u16,
    /// Full linear sample index. The window only decodes the low bits.
    pub offset: u32,
}

/// A [`VideoWindow`] plus the record of which bank it currently shows.
///
/// Bank selects cost a BIOS call on real hardware while the memory access itself is a single
/// store, so the select is only issued when the target bank differs from the last one.
#[derive(Debug)]
pub struct BankedFramebuffer<W> {
    window: W,
    layout: FramebufferLayout,
    active_bank: Option<u16>,
}

impl<W: VideoWindow> BankedFramebuffer<W> {
    pub fn new(window: W, layout: FramebufferLayout) -> Self {
        Self {
            window,
            layout,
            active_bank: None,
        }
    }

    #[inline]
    pub fn layout(&self) -> &FramebufferLayout {
        &self.layout
    }

    /// Linear sample index of an in-viewport coordinate.
    #[inline]
    pub fn linear(&self, x: u32, y: u32) -> u32 {
        (y << self.layout.row_shift()) + x
    }

    #[inline]
    pub fn bank_of(&self, linear: u32) -> u16 {
        (linear >> self.layout.window_shift()) as u16
    }

    /// Resolves an in-viewport coordinate. Callers clip first.
    #[inline]
    pub fn resolve(&self, x: u32, y: u32) -> BankAddress {
        let linear = self.linear(x, y);
        BankAddress {
            bank: self.bank_of(linear),
            offset: linear,
        }
    }

    /// Samples from `linear` up to the end of its bank.
    #[inline]
    pub fn samples_left_in_bank(&self, linear: u32) -> u32 {
        let mask = self.layout.samples_per_bank() - 1;
        self.layout.samples_per_bank() - (linear & mask)
    }

    /// Selects `bank` unless it is already the active one. The first call always selects.
    #[inline]
    pub fn switch_bank(&mut self, bank: u16) {
        if self.active_bank != Some(bank) {
            self.force_switch(bank);
        }
    }

    /// Selects `bank` even if it is believed to be active already.
    pub fn force_switch(&mut self, bank: u16) {
        trace!(bank, "select window bank");
        self.window.select_window(bank);
        self.active_bank = Some(bank);
    }

    /// Forgets the active bank; the next switch always reaches the hardware.
    pub fn reinit(&mut self) {
        self.active_bank = None;
    }

    #[inline]
    pub fn active_bank(&self) -> Option<u16> {
        self.active_bank
    }

    /// Resolves `(x, y)`, maps its bank and returns the window offset.
    #[inline]
    pub fn map(&mut self, x: u32, y: u32) -> u32 {
        let addr = self.resolve(x, y);
        self.switch_bank(addr.bank);
        addr.offset
    }

    /// The window as last mapped. Accesses through it must stay inside the active bank.
    #[inline]
    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    #[inline]
    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn into_window(self) -> W {
        self.window
    }
}
