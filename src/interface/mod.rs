// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Register-level access to a sensor over SPI or I2C.
//!
//! The sensor drivers only know about [`SensorInterface`]. The transport
//! specific framing (SPI read bit, I2C repeated start) lives in
//! [`SpiInterface`] and [`I2cInterface`], which in turn sit on top of the
//! blocking [`Transfer`], [`Write`] and [`WriteRead`] traits.

pub mod delay;
pub mod gpio;
pub mod i2cdev;
pub mod mock;
pub mod spidev;

use log::trace;

/// Set on the address byte of an SPI read
pub const SPI_READ_FLAG: u8 = 0x80;

/// Largest burst sent in one bus transaction. Longer accesses are split
/// into consecutive transactions, relying on address auto-increment.
pub const MAX_BURST_LEN: usize = 16;

/// First register of the `index`-th burst of an access starting at `reg`
fn burst_start(reg: u8, index: usize) -> u8 {
    reg.wrapping_add((index * MAX_BURST_LEN) as u8)
}

/// Blocking full-duplex transfer
pub trait Transfer {
    /// Error type
    type Error;

    /// Sends `words` to the slave, overwriting them with the words received
    fn transfer<'a>(&'a mut self, words: &'a mut [u8]) -> Result<&'a [u8], Self::Error>;
}

/// Blocking write
pub trait Write {
    /// Error type
    type Error;

    /// Sends `words` to the slave, ignoring all the incoming words
    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error>;
}

/// Blocking write followed by a read, joined by a repeated start
pub trait WriteRead {
    /// Error type
    type Error;

    /// Sends `bytes` then fills `buffer` from the slave
    fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error>;
}

/// The register contract every sensor driver is written against.
///
/// Auto-increment of the register address on multi-byte access is assumed
/// to be enabled on the device (`IF_INC` / `IF_ADD_INC`), which is the
/// power-on default for all supported parts.
pub trait SensorInterface {
    /// Transport error
    type InterfaceError: core::fmt::Debug;

    /// Read `buf.len()` consecutive registers starting at `reg`
    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::InterfaceError>;

    /// Write `data` to consecutive registers starting at `reg`
    fn write_registers(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::InterfaceError>;

    fn read_register(&mut self, reg: u8) -> Result<u8, Self::InterfaceError> {
        let mut buf = [0u8; 1];
        self.read_registers(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::InterfaceError> {
        self.write_registers(reg, &[value])
    }

    /// Read-modify-write of a single register
    fn modify_register<F>(&mut self, reg: u8, f: F) -> Result<(), Self::InterfaceError>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_register(reg)?;
        self.write_register(reg, f(value))
    }

    /// Three little-endian `i16` words starting at `reg` (X, Y, Z output blocks)
    fn read_i16x3(&mut self, reg: u8) -> Result<[i16; 3], Self::InterfaceError> {
        let mut buf = [0u8; 6];
        self.read_registers(reg, &mut buf)?;
        Ok([
            i16::from_le_bytes([buf[0], buf[1]]),
            i16::from_le_bytes([buf[2], buf[3]]),
            i16::from_le_bytes([buf[4], buf[5]]),
        ])
    }
}

/// Set or clear `mask` in `value`
#[inline]
pub fn with_bits(value: u8, mask: u8, enable: bool) -> u8 {
    if enable {
        value | mask
    } else {
        value & !mask
    }
}

/// Replace the bit field `mask` of `value` with `field`, shifted into place
#[inline]
pub fn with_field(value: u8, mask: u8, field: u8) -> u8 {
    let shift = mask.trailing_zeros();
    (value & !mask) | ((field << shift) & mask)
}

/// Extract the bit field `mask` from `value`
#[inline]
pub fn field(value: u8, mask: u8) -> u8 {
    (value & mask) >> mask.trailing_zeros()
}

/// Sensor attached to a 4-wire SPI bus; chip select is handled by spidev
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Returns the consumed SPI device
    pub fn free(self) -> SPI {
        self.spi
    }
}

impl<SPI, CommE> SensorInterface for SpiInterface<SPI>
where
    SPI: Write<Error = CommE> + Transfer<Error = CommE>,
    CommE: core::fmt::Debug,
{
    type InterfaceError = CommE;

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), CommE> {
        let mut frame = [0u8; MAX_BURST_LEN + 1];
        for (i, chunk) in buf.chunks_mut(MAX_BURST_LEN).enumerate() {
            let start = burst_start(reg, i);
            let len = chunk.len();
            frame[0] = start | SPI_READ_FLAG;
            frame[1..=len].fill(0);
            let rx = self.spi.transfer(&mut frame[..=len])?;
            chunk.copy_from_slice(&rx[1..=len]);
            trace!("spi rd 0x{:02X}: {:02x?}", start, chunk);
        }
        Ok(())
    }

    fn write_registers(&mut self, reg: u8, data: &[u8]) -> Result<(), CommE> {
        let mut frame = [0u8; MAX_BURST_LEN + 1];
        for (i, chunk) in data.chunks(MAX_BURST_LEN).enumerate() {
            let start = burst_start(reg, i);
            let len = chunk.len();
            frame[0] = start & !SPI_READ_FLAG;
            frame[1..=len].copy_from_slice(chunk);
            trace!("spi wr 0x{:02X}: {:02x?}", start, chunk);
            self.spi.write(&frame[..=len])?;
        }
        Ok(())
    }
}

/// Sensor attached to an I2C bus at a fixed 7-bit address
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Returns the consumed I2C device
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, CommE> SensorInterface for I2cInterface<I2C>
where
    I2C: Write<Error = CommE> + WriteRead<Error = CommE>,
    CommE: core::fmt::Debug,
{
    type InterfaceError = CommE;

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), CommE> {
        self.i2c.write_read(&[reg], buf)?;
        trace!("i2c rd 0x{:02X}: {:02x?}", reg, buf);
        Ok(())
    }

    fn write_registers(&mut self, reg: u8, data: &[u8]) -> Result<(), CommE> {
        let mut frame = [0u8; MAX_BURST_LEN + 1];
        for (i, chunk) in data.chunks(MAX_BURST_LEN).enumerate() {
            let start = burst_start(reg, i);
            let len = chunk.len();
            frame[0] = start;
            frame[1..=len].copy_from_slice(chunk);
            trace!("i2c wr 0x{:02X}: {:02x?}", start, chunk);
            self.i2c.write(&frame[..=len])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// Echoes register 0x0F as 0x6C and records raw frames
    #[derive(Default)]
    struct LoopbackSpi {
        frames: Vec<Vec<u8>>,
    }

    impl Transfer for LoopbackSpi {
        type Error = Infallible;

        fn transfer<'a>(&'a mut self, words: &'a mut [u8]) -> Result<&'a [u8], Infallible> {
            self.frames.push(words.to_vec());
            for (i, w) in words.iter_mut().enumerate().skip(1) {
                *w = 0x6B + i as u8;
            }
            Ok(words)
        }
    }

    impl Write for LoopbackSpi {
        type Error = Infallible;

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            self.frames.push(words.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingI2c {
        writes: Vec<Vec<u8>>,
        reads: Vec<(Vec<u8>, usize)>,
    }

    impl Write for RecordingI2c {
        type Error = Infallible;

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            self.writes.push(words.to_vec());
            Ok(())
        }
    }

    impl WriteRead for RecordingI2c {
        type Error = Infallible;

        fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Infallible> {
            self.reads.push((bytes.to_vec(), buffer.len()));
            buffer.fill(0xA5);
            Ok(())
        }
    }

    #[test]
    fn spi_read_sets_read_flag() {
        let mut spi = SpiInterface::new(LoopbackSpi::default());
        let mut buf = [0u8; 2];
        spi.read_registers(0x0F, &mut buf).unwrap();
        assert_eq!(buf, [0x6C, 0x6D]);

        let spi = spi.free();
        assert_eq!(spi.frames, vec![vec![0x8F, 0, 0]]);
    }

    #[test]
    fn spi_write_clears_read_flag() {
        let mut spi = SpiInterface::new(LoopbackSpi::default());
        spi.write_registers(0x10, &[0x12, 0x34]).unwrap();
        assert_eq!(spi.free().frames, vec![vec![0x10, 0x12, 0x34]]);
    }

    #[test]
    fn spi_long_burst_is_split() {
        let mut spi = SpiInterface::new(LoopbackSpi::default());
        let mut buf = [0xAAu8; 20];
        spi.read_registers(0x10, &mut buf).unwrap();
        // every byte comes from the bus, none left over from the caller
        assert_eq!(buf[15], 0x7B);
        assert_eq!(&buf[16..], &[0x6C, 0x6D, 0x6E, 0x6F]);

        let data: Vec<u8> = (0..20).collect();
        spi.write_registers(0x10, &data).unwrap();

        let frames = spi.free().frames;
        assert_eq!(frames.len(), 4);
        assert_eq!((frames[0][0], frames[0].len()), (0x90, 17));
        assert_eq!((frames[1][0], frames[1].len()), (0xA0, 5));
        assert_eq!(frames[2][0], 0x10);
        assert_eq!(&frames[2][1..], &data[..16]);
        assert_eq!(frames[3], vec![0x20, 16, 17, 18, 19]);
    }

    #[test]
    fn i2c_long_write_is_split() {
        let mut i2c = I2cInterface::new(RecordingI2c::default());
        let data: Vec<u8> = (0..20).collect();
        i2c.write_registers(0x30, &data).unwrap();

        let writes = i2c.free().writes;
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0][0], 0x30);
        assert_eq!(&writes[0][1..], &data[..16]);
        assert_eq!(writes[1], vec![0x40, 16, 17, 18, 19]);
    }

    #[test]
    fn i2c_framing() {
        let mut i2c = I2cInterface::new(RecordingI2c::default());
        i2c.write_register(0x12, 0x44).unwrap();
        assert_eq!(i2c.read_register(0x1E).unwrap(), 0xA5);

        let i2c = i2c.free();
        assert_eq!(i2c.writes, vec![vec![0x12, 0x44]]);
        assert_eq!(i2c.reads, vec![(vec![0x1E], 1)]);
    }

    #[test]
    fn read_i16x3_is_little_endian() {
        let mut bus = mock::MockRegisters::new();
        bus.set_registers(0x28, &[0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80]);
        assert_eq!(bus.read_i16x3(0x28).unwrap(), [1, -1, i16::MIN]);
    }

    #[test]
    fn bit_helpers() {
        assert_eq!(with_bits(0b0000_0001, 0b0100_0000, true), 0b0100_0001);
        assert_eq!(with_bits(0b0100_0001, 0b0100_0000, false), 0b0000_0001);
        assert_eq!(with_field(0xFF, 0xF0, 0x3), 0x3F);
        assert_eq!(with_field(0x00, 0x0C, 0x2), 0x08);
        assert_eq!(field(0x5C, 0xF0), 0x5);
        assert_eq!(field(0x5C, 0x0C), 0x3);
    }
}
