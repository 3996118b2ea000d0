// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Linux userspace drivers for ST MEMS inertial sensors, plus the
//! bring-up demos that exercise them.
//!
//! Each sensor driver talks to the device through a [`SensorInterface`],
//! which is implemented for SPI (`spidev`), I2C (`i2cdev`) and an in-memory
//! register file used for host-side testing.
//!
//! [`SensorInterface`]: interface::SensorInterface

use interface::delay::DelayMs;
use log::warn;
use std::{fmt, io};

pub mod board;
pub mod console;
pub mod demos;
pub mod drdy;
pub mod iis2dulpx;
pub mod interface;
pub mod lsm6dso16is;
pub mod lsm6dso32x;

/// Status reads a software reset is given, 1 ms apart, before it is
/// reported as stuck
pub const RESET_POLL_LIMIT: u32 = 50;

/// Errors in this crate
#[derive(Debug)]
pub enum Error<CommE> {
    /// Sensor communication error
    Comm(CommE),

    /// `WHO_AM_I` did not match the expected device
    InvalidDeviceId { expected: u8, found: u8 },

    /// Software reset bit never cleared
    ResetTimeout,

    /// Console write failed
    Output(io::Error),
}

impl<CommE: fmt::Debug> fmt::Display for Error<CommE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Comm(e) => write!(f, "sensor communication error: {:?}", e),
            Error::InvalidDeviceId { expected, found } => write!(
                f,
                "unexpected device id 0x{:02X} (expected 0x{:02X})",
                found, expected
            ),
            Error::ResetTimeout => write!(f, "sensor did not complete software reset"),
            Error::Output(e) => write!(f, "console output failed: {}", e),
        }
    }
}

impl<CommE: fmt::Debug> std::error::Error for Error<CommE> {}

impl<CommE> From<io::Error> for Error<CommE> {
    fn from(e: io::Error) -> Self {
        Error::Output(e)
    }
}

/// Poll `in_progress` until it reports `false`, at most
/// [`RESET_POLL_LIMIT`] times with 1 ms between reads.
pub fn wait_reset_done<CommE, F>(
    delay_source: &mut impl DelayMs,
    mut in_progress: F,
) -> Result<(), Error<CommE>>
where
    F: FnMut() -> Result<bool, Error<CommE>>,
{
    for _ in 0..RESET_POLL_LIMIT {
        if !in_progress()? {
            return Ok(());
        }
        delay_source.delay_ms(1);
    }
    warn!("reset still pending after {} polls", RESET_POLL_LIMIT);
    Err(Error::ResetTimeout)
}
