//! Seams to the display hardware.
//!
//! The drawing layer never touches ports, BIOS services or physical memory directly. Everything
//! goes through these traits so the same code drives real hardware, an emulator, or the
//! in-memory simulation in [`crate::sim`].

use tracing::debug;

use crate::error::{Result, VbeError};
use crate::mode::{DisplayMode, VbeMode};

/// The banked video memory aperture.
///
/// `offset` counts samples of the accessed width (bytes for the `u8` accessors, 16-bit words for
/// the `u16` accessors). Only the bits that fall inside the currently selected window are
/// meaningful; implementations ignore the rest, the way the A0000 aperture ignores address bits
/// above its size.
pub trait VideoWindow {
    /// Maps bank `bank` into the aperture (VBE 4F05h, window A).
    fn select_window(&mut self, bank: u16);

    fn read_u8(&mut self, offset: u32) -> u8;
    fn write_u8(&mut self, offset: u32, value: u8);

    fn read_u16(&mut self, offset: u32) -> u16;
    fn write_u16(&mut self, offset: u32, value: u16);
}

impl<T: VideoWindow + ?Sized> VideoWindow for &mut T {
    fn select_window(&mut self, bank: u16) {
        (**self).select_window(bank)
    }

    fn read_u8(&mut self, offset: u32) -> u8 {
        (**self).read_u8(offset)
    }

    fn write_u8(&mut self, offset: u32, value: u8) {
        (**self).write_u8(offset, value)
    }

    fn read_u16(&mut self, offset: u32) -> u16 {
        (**self).read_u16(offset)
    }

    fn write_u16(&mut self, offset: u32, value: u16) {
        (**self).write_u16(offset, value)
    }
}

/// Status word returned in `AX` by VBE functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VbeStatus(pub u16);

impl VbeStatus {
    pub const SUCCESS: VbeStatus = VbeStatus(0x004F);
    pub const FAILED: VbeStatus = VbeStatus(0x014F);

    #[inline]
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

/// Mode and palette control (VBE 4F02h/4F03h plus the DAC register pair).
pub trait DisplayControl {
    fn set_mode(&mut self, mode: VbeMode) -> Result<()>;
    fn current_mode(&mut self) -> Result<VbeMode>;

    /// Programs one DAC palette entry. Channels are 6-bit (0..=63).
    fn program_palette_entry(&mut self, index: u8, rgb6: [u8; 3]);
}

impl<T: DisplayControl + ?Sized> DisplayControl for &mut T {
    fn set_mode(&mut self, mode: VbeMode) -> Result<()> {
        (**self).set_mode(mode)
    }

    fn current_mode(&mut self) -> Result<VbeMode> {
        (**self).current_mode()
    }

    fn program_palette_entry(&mut self, index: u8, rgb6: [u8; 3]) {
        (**self).program_palette_entry(index, rgb6)
    }
}

/// Switches the display into `mode` and returns the parameters to draw in it.
///
/// Modes the drawing layer cannot address are rejected before the hardware is touched.
pub fn enter_mode<D>(display: &mut D, mode: VbeMode) -> Result<DisplayMode>
where
    D: DisplayControl + ?Sized,
{
    let target = DisplayMode::from_vbe(mode)?;
    display.set_mode(mode)?;
    debug!(
        mode = mode.number(),
        width = target.viewport.width,
        height = target.viewport.height,
        "entered banked display mode"
    );
    Ok(target)
}

/// Maps a raw status word to the mode-set result.
pub fn mode_set_result(mode: VbeMode, status: VbeStatus) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(VbeError::ModeSet {
            mode: mode.number(),
            status: status.0,
        })
    }
}
