// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

/// `WHO_AM_I` value
pub const IIS2DULPX_ID: u8 = 0x47;

// Registers
pub const PIN_CTRL: u8 = 0x0C;
pub const WHO_AM_I: u8 = 0x0F;
pub const CTRL1: u8 = 0x10;
pub const CTRL2: u8 = 0x11;
pub const CTRL3: u8 = 0x12;
pub const CTRL4: u8 = 0x13;
pub const CTRL5: u8 = 0x14;
pub const FIFO_CTRL: u8 = 0x15;
pub const STATUS: u8 = 0x25;
pub const OUT_X_L: u8 = 0x28;
pub const OUT_T_AH_QVAR_L: u8 = 0x2E;
pub const EN_DEVICE_CONFIG: u8 = 0x3E;

// CTRL1
pub const SMART_POWER_EN: u8 = 0x80;
pub const SW_RESET: u8 = 0x20;
pub const IF_ADD_INC: u8 = 0x10;
pub const DRDY_PULSED: u8 = 0x08;

// CTRL2 (INT1) and CTRL3 (INT2) share the routing layout
pub const INT_DRDY: u8 = 0x08;
pub const INT_FIFO_OVR: u8 = 0x10;
pub const INT_FIFO_TH: u8 = 0x20;
pub const INT_FIFO_FULL: u8 = 0x40;
pub const INT_BOOT: u8 = 0x80;

// CTRL3
pub const HP_EN: u8 = 0x04;

// CTRL4
pub const BOOT: u8 = 0x01;
pub const SOC: u8 = 0x02;
pub const FIFO_EN: u8 = 0x08;
pub const EMB_FUNC_EN: u8 = 0x10;
pub const BDU: u8 = 0x20;

// CTRL5
pub const FS_MASK: u8 = 0x03;
pub const BW_MASK: u8 = 0x0C;
pub const ODR_MASK: u8 = 0xF0;

// STATUS
pub const DRDY: u8 = 0x01;

// EN_DEVICE_CONFIG
pub const SOFT_PD: u8 = 0x01;

/// Settle time after leaving deep power-down
pub const DEEP_PD_EXIT_MS: u32 = 25;

/// Output data rate and power mode.
///
/// The low nibble is `CTRL5.ODR`; bit 4 marks the high-performance
/// variants, which additionally need `CTRL3.HP_EN`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Odr {
    Off = 0x00,
    At1Hz6Ulp = 0x01,
    At3HzUlp = 0x02,
    At25HzUlp = 0x03,
    At6HzLp = 0x04,
    At12Hz5Lp = 0x05,
    At25HzLp = 0x06,
    At50HzLp = 0x07,
    At100HzLp = 0x08,
    At200HzLp = 0x09,
    At400HzLp = 0x0A,
    At800HzLp = 0x0B,
    /// Single conversion on the INT pin
    TrigPin = 0x0E,
    /// Single conversion on [`SOC`]
    TrigSw = 0x0F,
    At6HzHp = 0x14,
    At12Hz5Hp = 0x15,
    At25HzHp = 0x16,
    At50HzHp = 0x17,
    At100HzHp = 0x18,
    At200HzHp = 0x19,
    At400HzHp = 0x1A,
    At800HzHp = 0x1B,
}

impl Odr {
    pub fn is_high_performance(self) -> bool {
        self as u8 & 0x10 != 0
    }

    pub(crate) fn from_bits(odr: u8, hp_en: bool) -> Odr {
        let code = (odr & 0x0F) | if hp_en { 0x10 } else { 0 };
        match code {
            0x01 => Odr::At1Hz6Ulp,
            0x02 => Odr::At3HzUlp,
            0x03 => Odr::At25HzUlp,
            0x04 => Odr::At6HzLp,
            0x05 => Odr::At12Hz5Lp,
            0x06 => Odr::At25HzLp,
            0x07 => Odr::At50HzLp,
            0x08 => Odr::At100HzLp,
            0x09 => Odr::At200HzLp,
            0x0A => Odr::At400HzLp,
            0x0B => Odr::At800HzLp,
            0x0E | 0x1E => Odr::TrigPin,
            0x0F | 0x1F => Odr::TrigSw,
            0x14 => Odr::At6HzHp,
            0x15 => Odr::At12Hz5Hp,
            0x16 => Odr::At25HzHp,
            0x17 => Odr::At50HzHp,
            0x18 => Odr::At100HzHp,
            0x19 => Odr::At200HzHp,
            0x1A => Odr::At400HzHp,
            0x1B => Odr::At800HzHp,
            _ => Odr::Off,
        }
    }
}

/// Full scale
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fs {
    G2 = 0,
    G4 = 1,
    G8 = 2,
    G16 = 3,
}

impl Fs {
    /// Sensitivity in mg/LSB
    pub fn sensitivity(self) -> f32 {
        match self {
            Fs::G2 => 0.061,
            Fs::G4 => 0.122,
            Fs::G8 => 0.244,
            Fs::G16 => 0.488,
        }
    }

    pub fn to_mg(self, lsb: i16) -> f32 {
        f32::from(lsb) * self.sensitivity()
    }

    pub(crate) fn from_bits(bits: u8) -> Fs {
        match bits & 0x03 {
            0 => Fs::G2,
            1 => Fs::G4,
            2 => Fs::G8,
            _ => Fs::G16,
        }
    }
}

/// Anti-aliasing filter bandwidth, as a fraction of the ODR
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bw {
    OdrDiv2 = 0,
    OdrDiv4 = 1,
    OdrDiv8 = 2,
    OdrDiv16 = 3,
}

impl Bw {
    pub(crate) fn from_bits(bits: u8) -> Bw {
        match bits & 0x03 {
            0 => Bw::OdrDiv2,
            1 => Bw::OdrDiv4,
            2 => Bw::OdrDiv8,
            _ => Bw::OdrDiv16,
        }
    }
}

/// Temperature in °C from the 12-bit temperature sample
pub fn from_lsb_to_celsius(lsb: i16) -> f32 {
    f32::from(lsb) / 355.5 + 25.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odr_bits() {
        assert!(Odr::At25HzHp.is_high_performance());
        assert!(!Odr::At25HzLp.is_high_performance());
        assert_eq!(Odr::from_bits(0x06, false), Odr::At25HzLp);
        assert_eq!(Odr::from_bits(0x06, true), Odr::At25HzHp);
        // ULP rates have no high-performance counterpart
        assert_eq!(Odr::from_bits(0x01, true), Odr::Off);
    }

    #[test]
    fn test_conversions() {
        assert!((Fs::G4.to_mg(8197) - 1000.03).abs() < 0.01);
        assert!((Fs::G16.to_mg(-1000) + 488.0).abs() < 0.01);
        assert!((from_lsb_to_celsius(0) - 25.0).abs() < 0.001);
        assert!((from_lsb_to_celsius(711) - 27.0).abs() < 0.001);
    }
}
