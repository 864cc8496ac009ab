//! In-memory stand-ins for the display hardware.
//!
//! [`SimVram`] behaves like the A0000 aperture in front of a flat VRAM array, [`SimDac`] follows
//! the DAC port protocol and [`SimDisplay`] answers the VBE mode calls. They count the
//! operations that are expensive on real hardware so tests can assert on them.

use crate::config::{FramebufferLayout, DEFAULT_WINDOW_SIZE};
use crate::dac::{
    program_dac_entry, DacPorts, DAC_DATA_PORT, DAC_PEL_MASK_PORT, DAC_READ_INDEX_PORT,
    DAC_WRITE_INDEX_PORT,
};
use crate::error::{Result, VbeError};
use crate::hw::{mode_set_result, DisplayControl, VbeStatus, VideoWindow};
use crate::mode::VbeMode;

#[derive(Debug, Clone)]
pub struct SimVram {
    vram: Vec<u8>,
    window_size: u32,
    bank: u16,
    selects: usize,
    writes: usize,
}

impl SimVram {
    /// `vram_size` bytes of video memory behind a 64KiB window.
    pub fn new(vram_size: usize) -> Self {
        Self::with_window_size(vram_size, DEFAULT_WINDOW_SIZE)
    }

    pub fn with_window_size(vram_size: usize, window_size: u32) -> Self {
        debug_assert!(window_size.is_power_of_two());
        Self {
            vram: vec![0u8; vram_size],
            window_size,
            bank: 0,
            selects: 0,
            writes: 0,
        }
    }

    /// Exactly enough memory for every row of `layout`.
    pub fn for_layout(layout: &FramebufferLayout) -> Self {
        let window_size = layout.samples_per_bank() * layout.format().bytes_per_sample();
        Self::with_window_size(layout.vram_span(), window_size)
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.vram
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.vram
    }

    /// Currently selected bank.
    #[inline]
    pub fn bank(&self) -> u16 {
        self.bank
    }

    /// Number of bank selects issued so far.
    #[inline]
    pub fn selects(&self) -> usize {
        self.selects
    }

    /// Number of sample writes issued so far.
    #[inline]
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn reset_counters(&mut self) {
        self.selects = 0;
        self.writes = 0;
    }

    #[inline]
    fn addr(&self, byte_in_window: u32) -> usize {
        let byte_in_window = byte_in_window & (self.window_size - 1);
        self.bank as usize * self.window_size as usize + byte_in_window as usize
    }
}

impl VideoWindow for SimVram {
    fn select_window(&mut self, bank: u16) {
        self.bank = bank;
        self.selects += 1;
    }

    fn read_u8(&mut self, offset: u32) -> u8 {
        let addr = self.addr(offset);
        self.vram.get(addr).copied().unwrap_or(0xFF)
    }

    fn write_u8(&mut self, offset: u32, value: u8) {
        let addr = self.addr(offset);
        self.writes += 1;
        if let Some(byte) = self.vram.get_mut(addr) {
            *byte = value;
        }
    }

    fn read_u16(&mut self, offset: u32) -> u16 {
        let addr = self.addr(offset.wrapping_mul(2));
        match self.vram.get(addr..addr + 2) {
            Some(bytes) => u16::from_le_bytes([bytes[0], bytes[1]]),
            None => 0xFFFF,
        }
    }

    fn write_u16(&mut self, offset: u32, value: u16) {
        let addr = self.addr(offset.wrapping_mul(2));
        self.writes += 1;
        if let Some(bytes) = self.vram.get_mut(addr..addr + 2) {
            bytes.copy_from_slice(&value.to_le_bytes());
        }
    }
}

/// The 256-entry, 6-bit-per-channel DAC behind ports 0x3C6..=0x3C9.
#[derive(Debug, Clone)]
pub struct SimDac {
    palette_rgb6: [[u8; 3]; 256],
    pel_mask: u8,
    write_index: u8,
    read_index: u8,
    component_index: u8,
    write_latch: [u8; 3],
    entries_written: usize,
}

impl Default for SimDac {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDac {
    pub fn new() -> Self {
        Self {
            palette_rgb6: [[0u8; 3]; 256],
            pel_mask: 0xFF,
            write_index: 0,
            read_index: 0,
            component_index: 0,
            write_latch: [0; 3],
            entries_written: 0,
        }
    }

    #[inline]
    pub fn palette_rgb6(&self) -> &[[u8; 3]; 256] {
        &self.palette_rgb6
    }

    #[inline]
    pub fn entry(&self, index: u8) -> [u8; 3] {
        self.palette_rgb6[index as usize]
    }

    #[inline]
    pub fn pel_mask(&self) -> u8 {
        self.pel_mask
    }

    /// Current write index (address register written via port `0x3C8`).
    #[inline]
    pub fn write_index(&self) -> u8 {
        self.write_index
    }

    /// Completed entry writes (every third data port write).
    #[inline]
    pub fn entries_written(&self) -> usize {
        self.entries_written
    }

    fn write_data(&mut self, value: u8) {
        self.write_latch[self.component_index as usize] = value & 0x3F;
        self.component_index += 1;
        if self.component_index < 3 {
            return;
        }

        self.palette_rgb6[self.write_index as usize] = self.write_latch;
        self.entries_written += 1;
        self.write_index = self.write_index.wrapping_add(1);
        self.component_index = 0;
    }

    fn read_data(&mut self) -> u8 {
        let out = self.palette_rgb6[self.read_index as usize][self.component_index as usize];
        self.component_index += 1;
        if self.component_index == 3 {
            self.component_index = 0;
            self.read_index = self.read_index.wrapping_add(1);
        }
        out
    }
}

impl DacPorts for SimDac {
    fn write_port(&mut self, port: u16, value: u8) {
        match port {
            DAC_PEL_MASK_PORT => self.pel_mask = value,
            DAC_READ_INDEX_PORT => {
                self.read_index = value;
                self.component_index = 0;
            }
            DAC_WRITE_INDEX_PORT => {
                self.write_index = value;
                self.component_index = 0;
            }
            DAC_DATA_PORT => self.write_data(value),
            _ => {}
        }
    }

    fn read_port(&mut self, port: u16) -> u8 {
        match port {
            DAC_PEL_MASK_PORT => self.pel_mask,
            DAC_DATA_PORT => self.read_data(),
            _ => 0xFF,
        }
    }
}

/// VBE mode register plus DAC.
#[derive(Debug, Clone)]
pub struct SimDisplay {
    mode: VbeMode,
    dac: SimDac,
    failure: Option<VbeStatus>,
    mode_sets: usize,
}

impl Default for SimDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDisplay {
    /// Starts in VGA text mode 3.
    pub fn new() -> Self {
        Self {
            mode: VbeMode(0x0003),
            dac: SimDac::new(),
            failure: None,
            mode_sets: 0,
        }
    }

    /// Makes every following VBE call fail with `status`.
    pub fn fail_with(&mut self, status: VbeStatus) {
        self.failure = Some(status);
    }

    #[inline]
    pub fn dac(&self) -> &SimDac {
        &self.dac
    }

    #[inline]
    pub fn dac_mut(&mut self) -> &mut SimDac {
        &mut self.dac
    }

    /// Successful mode sets so far.
    #[inline]
    pub fn mode_sets(&self) -> usize {
        self.mode_sets
    }
}

impl DisplayControl for SimDisplay {
    fn set_mode(&mut self, mode: VbeMode) -> Result<()> {
        mode_set_result(mode, self.failure.unwrap_or(VbeStatus::SUCCESS))?;
        self.mode = mode;
        self.mode_sets += 1;
        Ok(())
    }

    fn current_mode(&mut self) -> Result<VbeMode> {
        match self.failure {
            Some(status) => Err(VbeError::ModeQuery { status: status.0 }),
            None => Ok(self.mode),
        }
    }

    fn program_palette_entry(&mut self, index: u8, rgb6: [u8; 3]) {
        program_dac_entry(&mut self.dac, index, rgb6);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dac::read_dac_entry;

    #[test]
    fn window_offset_is_masked_into_selected_bank() {
        let mut vram = SimVram::new(256 * 1024);
        vram.select_window(2);
        vram.write_u8(0x1234, 0xAB);
        assert_eq!(vram.data()[2 * 65536 + 0x1234], 0xAB);

        // High bits above the window are ignored.
        vram.write_u8(0x3_0010, 0xCD);
        assert_eq!(vram.data()[2 * 65536 + 0x10], 0xCD);
        assert_eq!(vram.read_u8(0x10), 0xCD);
    }

    #[test]
    fn word_access_is_little_endian_and_word_indexed() {
        let mut vram = SimVram::new(256 * 1024);
        vram.select_window(1);
        // Word 32768 + 3 lives in the second bank at byte 6.
        vram.write_u16(32768 + 3, 0xF7BE);
        assert_eq!(&vram.data()[65536 + 6..65536 + 8], &[0xBE, 0xF7]);
        assert_eq!(vram.read_u16(3), 0xF7BE);
    }

    #[test]
    fn access_past_vram_end_is_dropped() {
        let mut vram = SimVram::new(1024);
        vram.select_window(5);
        vram.write_u8(0, 1);
        assert_eq!(vram.read_u8(0), 0xFF);
        assert_eq!(vram.read_u16(0), 0xFFFF);
        assert_eq!(vram.writes(), 1);
    }

    #[test]
    fn dac_protocol_auto_increments() {
        let mut dac = SimDac::new();
        dac.write_port(0x3C8, 10);
        for v in [1, 2, 3, 4, 5, 6] {
            dac.write_port(0x3C9, v);
        }
        assert_eq!(dac.entry(10), [1, 2, 3]);
        assert_eq!(dac.entry(11), [4, 5, 6]);
        assert_eq!(dac.write_index(), 12);
        assert_eq!(dac.entries_written(), 2);
        assert_eq!(read_dac_entry(&mut dac, 11), [4, 5, 6]);
    }

    #[test]
    fn dac_keeps_six_bits() {
        let mut dac = SimDac::new();
        program_dac_entry(&mut dac, 0, [0xFF, 0x40, 0x3F]);
        assert_eq!(dac.entry(0), [0x3F, 0x00, 0x3F]);
    }

    #[test]
    fn display_programs_palette_through_dac_ports() {
        let mut display = SimDisplay::new();
        display.program_palette_entry(200, [63, 31, 0]);
        assert_eq!(display.dac().entry(200), [63, 31, 0]);
        assert_eq!(display.dac().write_index(), 201);
    }

    #[test]
    fn failing_display_reports_status() {
        let mut display = SimDisplay::new();
        display.fail_with(VbeStatus(0x0100));
        assert_eq!(
            display.current_mode(),
            Err(VbeError::ModeQuery { status: 0x0100 })
        );
        assert_eq!(
            display.set_mode(VbeMode(0x105)),
            Err(VbeError::ModeSet {
                mode: 0x105,
                status: 0x0100
            })
        );
        assert_eq!(display.mode_sets(), 0);
        assert_eq!(display.mode, VbeMode(0x0003));
    }
}
