#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;
use svga_vbe::{
    BankedFramebuffer, FramebufferConfig, FramebufferLayout, PixelFormat, SimVram, VideoWindow,
};

fn framebuffer(format: PixelFormat) -> BankedFramebuffer<SimVram> {
    let layout = FramebufferLayout::new(&FramebufferConfig::default(), format).unwrap();
    BankedFramebuffer::new(SimVram::for_layout(&layout), layout)
}

fn format_strategy() -> impl Strategy<Value = PixelFormat> {
    prop_oneof![Just(PixelFormat::Indexed8), Just(PixelFormat::Packed565)]
}

proptest! {
    #[test]
    fn bank_is_monotonic_in_linear_offset(
        format in format_strategy(),
        a in (0u32..1024, 0u32..768),
        b in (0u32..1024, 0u32..768),
    ) {
        let fb = framebuffer(format);
        let ra = fb.resolve(a.0, a.1);
        let rb = fb.resolve(b.0, b.1);
        if ra.offset <= rb.offset {
            prop_assert!(ra.bank <= rb.bank);
        } else {
            prop_assert!(ra.bank >= rb.bank);
        }
    }

    #[test]
    fn resolve_is_idempotent(format in format_strategy(), x in 0u32..1024, y in 0u32..768) {
        let fb = framebuffer(format);
        prop_assert_eq!(fb.resolve(x, y), fb.resolve(x, y));
    }

    #[test]
    fn mapped_offset_addresses_the_linear_sample(
        x in 0u32..1024,
        y in 0u32..768,
        value in any::<u8>(),
    ) {
        let mut fb = framebuffer(PixelFormat::Indexed8);
        let offset = fb.map(x, y);
        fb.window_mut().write_u8(offset, value);
        let vram = fb.into_window();
        prop_assert_eq!(vram.data()[(y as usize) * 1024 + x as usize], value);
    }
}

#[test]
fn same_bank_accesses_switch_once() {
    let mut fb = framebuffer(PixelFormat::Indexed8);
    // Rows 0..64 all live in bank 0.
    for y in 0..64 {
        for x in (0..1024).step_by(97) {
            fb.map(x, y);
        }
    }
    assert_eq!(fb.window().selects(), 1);
}

#[test]
fn alternating_banks_switch_every_time() {
    let mut fb = framebuffer(PixelFormat::Packed565);
    for i in 0..20 {
        let y = if i % 2 == 0 { 0 } else { 32 };
        fb.map(0, y);
    }
    assert_eq!(fb.window().selects(), 20);
}
