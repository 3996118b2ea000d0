// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Evaluation-board profiles.
//!
//! The reference setups pair each sensor adapter with one of three
//! motherboards. The board decides the default sensor bus, the host link,
//! how long the sensor supply needs to settle, and (for the SPC584B) which
//! I2C address strap is used.

use std::{fmt, str::FromStr};

/// Time the sensors need after power-up before their registers respond
pub const BOOT_TIME_MS: u32 = 10;

/// Sensor bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
    Spi,
    I2c,
    /// In-memory register file, no hardware
    Mock,
}

impl FromStr for BusKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spi" => Ok(BusKind::Spi),
            "i2c" => Ok(BusKind::I2c),
            "mock" => Ok(BusKind::Mock),
            _ => Err(format!("unknown bus '{}' (spi, i2c or mock)", s)),
        }
    }
}

/// Supported sensor parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Iis2dulpx,
    Lsm6dso16is,
    Lsm6dso32x,
}

impl Sensor {
    /// 7-bit I2C address for the given SA0 strap
    pub fn i2c_address(self, sa0_high: bool) -> u8 {
        let (low, high) = match self {
            Sensor::Iis2dulpx => (
                crate::iis2dulpx::I2C_ADDR_SA0_LOW,
                crate::iis2dulpx::I2C_ADDR_SA0_HIGH,
            ),
            Sensor::Lsm6dso16is => (
                crate::lsm6dso16is::I2C_ADDR_SA0_LOW,
                crate::lsm6dso16is::I2C_ADDR_SA0_HIGH,
            ),
            Sensor::Lsm6dso32x => (
                crate::lsm6dso32x::I2C_ADDR_SA0_LOW,
                crate::lsm6dso32x::I2C_ADDR_SA0_HIGH,
            ),
        };
        if sa0_high {
            high
        } else {
            low
        }
    }
}

/// ST evaluation motherboards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    /// STEVAL-MKI109V3 professional MEMS tool board
    StevalMki109v3,
    /// NUCLEO-F401RE
    NucleoF401re,
    /// DISCOVERY-SPC584B
    Spc584bDis,
}

impl Board {
    pub fn default_bus(self) -> BusKind {
        match self {
            Board::StevalMki109v3 => BusKind::Spi,
            Board::NucleoF401re | Board::Spc584bDis => BusKind::I2c,
        }
    }

    /// Supply settling time. The MKI109V3 drives Vdd/Vddio from a PWM and
    /// needs a full second before the adapter is powered.
    pub fn power_up_delay_ms(self) -> u32 {
        match self {
            Board::StevalMki109v3 => 1000,
            Board::NucleoF401re | Board::Spc584bDis => 0,
        }
    }

    pub fn host_link(self) -> &'static str {
        match self {
            Board::StevalMki109v3 => "USB (Virtual COM)",
            Board::NucleoF401re | Board::Spc584bDis => "UART(COM) to USB bridge",
        }
    }

    /// Whether the sensor adapter is strapped to its SA0-high address
    pub fn sa0_high(self, sensor: Sensor) -> bool {
        matches!((self, sensor), (Board::Spc584bDis, Sensor::Lsm6dso16is))
    }

    /// Default 7-bit I2C address of `sensor` on this board
    pub fn i2c_address(self, sensor: Sensor) -> u8 {
        sensor.i2c_address(self.sa0_high(sensor))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Board::StevalMki109v3 => "STEVAL-MKI109V3",
            Board::NucleoF401re => "NUCLEO-F401RE",
            Board::Spc584bDis => "DISCOVERY-SPC584B",
        };
        f.write_str(name)
    }
}

impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "steval-mki109v3" | "steval_mki109v3" => Ok(Board::StevalMki109v3),
            "nucleo-f401re" | "nucleo_f401re" => Ok(Board::NucleoF401re),
            "spc584b-dis" | "spc584b_dis" | "discovery-spc584b" => Ok(Board::Spc584bDis),
            _ => Err(format!(
                "unknown board '{}' (steval-mki109v3, nucleo-f401re or spc584b-dis)",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_defaults() {
        assert_eq!(Board::StevalMki109v3.default_bus(), BusKind::Spi);
        assert_eq!(Board::NucleoF401re.default_bus(), BusKind::I2c);
        assert_eq!(Board::Spc584bDis.default_bus(), BusKind::I2c);
        assert_eq!(Board::StevalMki109v3.power_up_delay_ms(), 1000);
        assert_eq!(Board::NucleoF401re.power_up_delay_ms(), 0);
    }

    #[test]
    fn i2c_addresses() {
        assert_eq!(Board::NucleoF401re.i2c_address(Sensor::Iis2dulpx), 0x18);
        assert_eq!(Board::NucleoF401re.i2c_address(Sensor::Lsm6dso16is), 0x6A);
        assert_eq!(Board::Spc584bDis.i2c_address(Sensor::Lsm6dso16is), 0x6B);
        assert_eq!(Board::Spc584bDis.i2c_address(Sensor::Lsm6dso32x), 0x6A);
        assert_eq!(Sensor::Iis2dulpx.i2c_address(true), 0x19);
    }

    #[test]
    fn parse_names() {
        assert_eq!("STEVAL-MKI109V3".parse::<Board>(), Ok(Board::StevalMki109v3));
        assert_eq!("spc584b_dis".parse::<Board>(), Ok(Board::Spc584bDis));
        assert_eq!(Board::Spc584bDis.to_string().parse::<Board>(), Ok(Board::Spc584bDis));
        assert_eq!("I2C".parse::<BusKind>(), Ok(BusKind::I2c));
        assert!("uart".parse::<BusKind>().is_err());
    }
}
