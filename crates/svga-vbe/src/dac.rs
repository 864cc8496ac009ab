//! VGA DAC palette register protocol.
//!
//! Writing an entry is a two-register sequence: the entry index goes to the write-index port,
//! then red, green and blue go to the data port one after another. The DAC advances its index
//! after the third channel.

/// PEL mask register.
pub const DAC_PEL_MASK_PORT: u16 = 0x3C6;
/// Read-index register.
pub const DAC_READ_INDEX_PORT: u16 = 0x3C7;
/// Write-index register.
pub const DAC_WRITE_INDEX_PORT: u16 = 0x3C8;
/// Data register, three accesses per entry.
pub const DAC_DATA_PORT: u16 = 0x3C9;

/// Byte-wide port I/O to the DAC registers.
pub trait DacPorts {
    fn write_port(&mut self, port: u16, value: u8);
    fn read_port(&mut self, port: u16) -> u8;
}

impl<T: DacPorts + ?Sized> DacPorts for &mut T {
    fn write_port(&mut self, port: u16, value: u8) {
        (**self).write_port(port, value)
    }

    fn read_port(&mut self, port: u16) -> u8 {
        (**self).read_port(port)
    }
}

/// Scales an 8-bit colour channel down to the DAC's 6 bits.
#[inline]
pub const fn to_dac6(channel: u8) -> u8 {
    channel >> 2
}

pub fn program_dac_entry<P: DacPorts + ?Sized>(ports: &mut P, index: u8, rgb6: [u8; 3]) {
    ports.write_port(DAC_WRITE_INDEX_PORT, index);
    for channel in rgb6 {
        ports.write_port(DAC_DATA_PORT, channel);
    }
}

pub fn read_dac_entry<P: DacPorts + ?Sized>(ports: &mut P, index: u8) -> [u8; 3] {
    ports.write_port(DAC_READ_INDEX_PORT, index);
    let r = ports.read_port(DAC_DATA_PORT);
    let g = ports.read_port(DAC_DATA_PORT);
    let b = ports.read_port(DAC_DATA_PORT);
    [r, g, b]
}
