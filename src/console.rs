// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Human-readable measurement lines sent to the host link.
//!
//! Lines are terminated with `\r\n` so they render correctly on a plain
//! serial terminal.

use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

/// Text console over any byte sink
pub struct Console<W> {
    out: W,
    tx_buffer: String,
}

impl Console<Box<dyn Write + Send>> {
    pub fn stdout() -> Self {
        let out: Box<dyn Write + Send> = Box::new(io::stdout());
        Console::new(out)
    }

    /// Write to an already configured serial device, e.g. "/dev/ttyACM0"
    pub fn serial<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let tty = OpenOptions::new().write(true).open(path)?;
        let out: Box<dyn Write + Send> = Box::new(tty);
        Ok(Console::new(out))
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tx_buffer: String::with_capacity(128),
        }
    }

    /// Returns the consumed sink
    pub fn free(self) -> W {
        self.out
    }

    pub fn acceleration_mg(&mut self, mg: [f32; 3]) -> io::Result<()> {
        self.tx_buffer.clear();
        self.tx_buffer.push_str(&format!(
            "Acceleration [mg]:{:4.2}\t{:4.2}\t{:4.2}\r\n",
            mg[0], mg[1], mg[2]
        ));
        self.tx_com()
    }

    pub fn angular_rate_mdps(&mut self, mdps: [f32; 3]) -> io::Result<()> {
        self.tx_buffer.clear();
        self.tx_buffer.push_str(&format!(
            "Angular rate [mdps]:{:4.2}\t{:4.2}\t{:4.2}\r\n",
            mdps[0], mdps[1], mdps[2]
        ));
        self.tx_com()
    }

    pub fn temperature_degc(&mut self, deg_c: f32) -> io::Result<()> {
        self.tx_buffer.clear();
        self.tx_buffer
            .push_str(&format!("Temperature [degC]:{:6.2}\r\n", deg_c));
        self.tx_com()
    }

    /// Short temperature form printed by the accelerometer-only demos
    pub fn temp_degc(&mut self, deg_c: f32) -> io::Result<()> {
        self.tx_buffer.clear();
        self.tx_buffer.push_str(&format!("Temp[degC]:{:3.2}\r\n", deg_c));
        self.tx_com()
    }

    fn tx_com(&mut self) -> io::Result<()> {
        self.out.write_all(self.tx_buffer.as_bytes())?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.free()).unwrap()
    }

    #[test]
    fn acceleration_line() {
        let mut c = Console::new(Vec::new());
        c.acceleration_mg([12.2, -0.5, 1000.0]).unwrap();
        assert_eq!(text(c), "Acceleration [mg]:12.20\t-0.50\t1000.00\r\n");
    }

    #[test]
    fn angular_rate_line() {
        let mut c = Console::new(Vec::new());
        c.angular_rate_mdps([70.0, 0.0, -140.0]).unwrap();
        assert_eq!(text(c), "Angular rate [mdps]:70.00\t0.00\t-140.00\r\n");
    }

    #[test]
    fn temperature_lines_are_padded() {
        let mut c = Console::new(Vec::new());
        c.temperature_degc(25.0).unwrap();
        c.temp_degc(3.5).unwrap();
        assert_eq!(text(c), "Temperature [degC]: 25.00\r\nTemp[degC]:3.50\r\n");
    }
}
