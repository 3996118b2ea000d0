use ::i2cdev::core::{I2CDevice, I2CMessage, I2CTransfer};
use ::i2cdev::linux::{LinuxI2CDevice, LinuxI2CError, LinuxI2CMessage};
use std::io::{self, ErrorKind};
use std::path::Path;

use super::{Write, WriteRead};

fn to_io(e: LinuxI2CError) -> io::Error {
    io::Error::new(ErrorKind::Other, e.to_string())
}

/// Linux i2c-dev character device bound to one slave address
pub struct I2cDevice {
    dev: LinuxI2CDevice,
}

impl I2cDevice {
    /// Open `path` (e.g. "/dev/i2c-1") for the 7-bit slave `address`
    pub fn new<P: AsRef<Path>>(path: P, address: u8) -> io::Result<I2cDevice> {
        let dev = LinuxI2CDevice::new(path, u16::from(address)).map_err(to_io)?;
        Ok(I2cDevice { dev })
    }
}

impl Write for I2cDevice {
    type Error = io::Error;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.dev.write(words).map_err(to_io)
    }
}

impl WriteRead for I2cDevice {
    type Error = io::Error;

    fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error> {
        let mut msgs = [LinuxI2CMessage::write(bytes), LinuxI2CMessage::read(buffer)];
        self.dev.transfer(&mut msgs).map_err(to_io)?;
        Ok(())
    }
}
