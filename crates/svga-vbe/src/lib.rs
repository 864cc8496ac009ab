//! Banked SVGA framebuffer addressing.
//!
//! VESA "windowed" modes expose video memory through a 64KiB aperture at `A000:0000`; a
//! 1024x768 frame spans 12 (8-bit) or 24 (16-bit) such banks. This crate provides:
//! - the VBE mode table and the two drawable modes (`0x105`, `0x117`),
//! - [`FramebufferLayout`]: row pitch and window geometry per pixel format,
//! - [`BankedFramebuffer`]: coordinate to `(bank, offset)` resolution with memoized bank selects,
//! - hardware seams ([`VideoWindow`], [`DisplayControl`], [`DacPorts`]) and the DAC palette
//!   protocol,
//! - an in-memory simulation of the hardware ([`sim`]) and an MMIO-backed window ([`MmioWindow`]).

pub mod bank;
pub mod config;
pub mod dac;
mod error;
pub mod hw;
pub mod mmio;
pub mod mode;
pub mod sim;

pub use bank::{BankAddress, BankedFramebuffer};
pub use config::{FramebufferConfig, FramebufferLayout, Viewport};
pub use dac::{program_dac_entry, read_dac_entry, to_dac6, DacPorts};
pub use error::{Result, VbeError};
pub use hw::{enter_mode, DisplayControl, VbeStatus, VideoWindow};
pub use mmio::MmioWindow;
pub use mode::{DisplayMode, PixelFormat, VbeMode};
pub use sim::{SimDac, SimDisplay, SimVram};
