use ::spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};
use std::io;
use std::path::Path;

use super::{Transfer, Write};

/// Default SPI clock; every supported sensor accepts up to 10 MHz
pub const DEFAULT_SPI_SPEED_HZ: u32 = 1_000_000;

/// Linux spidev character device
pub struct SpiDevice {
    spi: Spidev,
}

impl SpiDevice {
    /// Open `path` in SPI mode 3, MSB first, 8 bits per word
    pub fn new<P: AsRef<Path>>(path: P, max_speed_hz: u32) -> io::Result<SpiDevice> {
        let mut spi = Spidev::open(path)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(max_speed_hz)
            .mode(SpiModeFlags::SPI_MODE_3)
            .lsb_first(false)
            .build();
        spi.configure(&options)?;

        Ok(SpiDevice { spi })
    }
}

impl Transfer for SpiDevice {
    type Error = io::Error;

    fn transfer<'a>(&'a mut self, words: &'a mut [u8]) -> Result<&'a [u8], Self::Error> {
        let mut rx_buf = vec![0_u8; words.len()];
        {
            let mut transfer = SpidevTransfer::read_write(words, &mut rx_buf);
            self.spi.transfer(&mut transfer)?;
        }
        words.copy_from_slice(&rx_buf);
        Ok(words)
    }
}

impl Write for SpiDevice {
    type Error = io::Error;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut transfer = SpidevTransfer::write(words);
        self.spi.transfer(&mut transfer)
    }
}
