use core::ptr::{self, NonNull};

use crate::hw::VideoWindow;

/// A [`VideoWindow`] over a memory-mapped aperture (e.g. physical `0xA0000` mapped into the
/// address space). Bank selection is delegated to `select`, typically a VBE 4F05h call.
pub struct MmioWindow<S> {
    base: NonNull<u8>,
    size: u32,
    select: S,
}

impl<S: FnMut(u16)> MmioWindow<S> {
    /// # Safety
    ///
    /// `base` must be valid for volatile reads and writes of `size` bytes for the lifetime of the
    /// returned value, and `size` must be a power of two.
    pub unsafe fn new(base: *mut u8, size: u32, select: S) -> Option<Self> {
        if !size.is_power_of_two() {
            return None;
        }
        Some(Self {
            base: NonNull::new(base)?,
            size,
            select,
        })
    }

    #[inline]
    fn byte_ptr(&self, byte_offset: u32) -> *mut u8 {
        let byte_offset = byte_offset & (self.size - 1);
        // SAFETY: masked into `0..size`, which `new`'s contract makes valid.
        unsafe { self.base.as_ptr().add(byte_offset as usize) }
    }
}

impl<S: FnMut(u16)> VideoWindow for MmioWindow<S> {
    fn select_window(&mut self, bank: u16) {
        (self.select)(bank)
    }

    fn read_u8(&mut self, offset: u32) -> u8 {
        // SAFETY: see `byte_ptr`.
        unsafe { ptr::read_volatile(self.byte_ptr(offset)) }
    }

    fn write_u8(&mut self, offset: u32, value: u8) {
        // SAFETY: see `byte_ptr`.
        unsafe { ptr::write_volatile(self.byte_ptr(offset), value) }
    }

    fn read_u16(&mut self, offset: u32) -> u16 {
        let byte = offset.wrapping_mul(2);
        // SAFETY: see `byte_ptr`; the window size is even so `byte + 1` stays inside.
        unsafe {
            u16::from_le_bytes([
                ptr::read_volatile(self.byte_ptr(byte)),
                ptr::read_volatile(self.byte_ptr(byte + 1)),
            ])
        }
    }

    fn write_u16(&mut self, offset: u32, value: u16) {
        let byte = offset.wrapping_mul(2);
        let [lo, hi] = value.to_le_bytes();
        // SAFETY: see `byte_ptr`.
        unsafe {
            ptr::write_volatile(self.byte_ptr(byte), lo);
            ptr::write_volatile(self.byte_ptr(byte + 1), hi);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accesses_wrap_inside_the_aperture() {
        let mut backing = vec![0u8; 16];
        let mut selected = Vec::new();
        {
            let select = |bank: u16| selected.push(bank);
            let mut window = unsafe { MmioWindow::new(backing.as_mut_ptr(), 16, select) }.unwrap();
            window.select_window(4);
            window.write_u8(0x14, 0x5A);
            window.write_u16(0x11, 0xBEEF);
            assert_eq!(window.read_u8(4), 0x5A);
            assert_eq!(window.read_u16(1), 0xBEEF);
        }
        assert_eq!(selected, vec![4]);
        assert_eq!(backing[4], 0x5A);
        assert_eq!(&backing[2..4], &[0xEF, 0xBE]);
    }

    #[test]
    fn rejects_null_and_odd_sizes() {
        let mut backing = vec![0u8; 12];
        assert!(unsafe { MmioWindow::new(backing.as_mut_ptr(), 12, |_: u16| {}) }.is_none());
        assert!(unsafe { MmioWindow::new(ptr::null_mut(), 16, |_: u16| {}) }.is_none());
    }
}
