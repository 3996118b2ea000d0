// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Register map and setting encodings for the LSM6DSO16IS.

/// `WHO_AM_I` value
pub const LSM6DSO16IS_ID: u8 = 0x22;

// =============================================================================
// Register addresses
// =============================================================================

pub const FUNC_CFG_ACCESS: u8 = 0x01;
pub const PIN_CTRL: u8 = 0x02;
pub const DRDY_PULSED_REG: u8 = 0x0B;
pub const INT1_CTRL: u8 = 0x0D;
pub const INT2_CTRL: u8 = 0x0E;
pub const WHO_AM_I: u8 = 0x0F;
pub const CTRL1_XL: u8 = 0x10;
pub const CTRL2_G: u8 = 0x11;
pub const CTRL3_C: u8 = 0x12;
pub const CTRL4_C: u8 = 0x13;
pub const CTRL5_C: u8 = 0x14;
pub const CTRL6_C: u8 = 0x15;
pub const CTRL7_G: u8 = 0x16;
pub const CTRL9_C: u8 = 0x18;
pub const CTRL10_C: u8 = 0x19;
pub const STATUS_REG: u8 = 0x1E;
pub const OUT_TEMP_L: u8 = 0x20;
pub const OUTX_L_G: u8 = 0x22;
pub const OUTX_L_A: u8 = 0x28;

// =============================================================================
// Bit fields
// =============================================================================

/// DRDY_PULSED_REG: data-ready signals pulsed instead of latched
pub const DRDY_PULSED: u8 = 0x80;

/// INT1_CTRL
pub const INT1_BOOT: u8 = 0x04;
pub const INT1_DRDY_G: u8 = 0x02;
pub const INT1_DRDY_XL: u8 = 0x01;

/// INT2_CTRL
pub const INT2_DRDY_TEMP: u8 = 0x04;
pub const INT2_DRDY_G: u8 = 0x02;
pub const INT2_DRDY_XL: u8 = 0x01;

/// CTRL1_XL
pub const ODR_XL_MASK: u8 = 0xF0;
pub const FS_XL_MASK: u8 = 0x0C;

/// CTRL2_G: `FS_G` together with `FS_125`
pub const ODR_G_MASK: u8 = 0xF0;
pub const FS_G_MASK: u8 = 0x0E;

/// CTRL3_C
pub const BOOT: u8 = 0x80;
pub const BDU: u8 = 0x40;
pub const H_LACTIVE: u8 = 0x20;
pub const PP_OD: u8 = 0x10;
pub const IF_INC: u8 = 0x04;
pub const SW_RESET: u8 = 0x01;

/// CTRL6_C: accelerometer high-performance mode disabled
pub const XL_HM_MODE: u8 = 0x10;

/// CTRL7_G: gyroscope high-performance mode disabled
pub const G_HM_MODE: u8 = 0x80;

/// CTRL9_C: MIPI I3C interface disabled
pub const I3C_DISABLE: u8 = 0x02;

/// STATUS_REG
pub const TDA: u8 = 0x04;
pub const GDA: u8 = 0x02;
pub const XLDA: u8 = 0x01;

// =============================================================================
// Settings
// =============================================================================

/// Accelerometer output data rate. Bit 4 selects the low-power variant
/// (`XL_HM_MODE`), the low nibble goes to `ODR_XL`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XlOdr {
    Off = 0x00,
    At12Hz5Hp = 0x01,
    At26HzHp = 0x02,
    At52HzHp = 0x03,
    At104HzHp = 0x04,
    At208HzHp = 0x05,
    At416HzHp = 0x06,
    At833HzHp = 0x07,
    At1667HzHp = 0x08,
    At3333HzHp = 0x09,
    At6667HzHp = 0x0A,
    At12Hz5Lp = 0x11,
    At26HzLp = 0x12,
    At52HzLp = 0x13,
    At104HzLp = 0x14,
    At208HzLp = 0x15,
    At1Hz6Lp = 0x1B,
}

/// Gyroscope output data rate, encoded like [`XlOdr`] with `G_HM_MODE`
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyOdr {
    Off = 0x00,
    At12Hz5Hp = 0x01,
    At26HzHp = 0x02,
    At52HzHp = 0x03,
    At104HzHp = 0x04,
    At208HzHp = 0x05,
    At416HzHp = 0x06,
    At833HzHp = 0x07,
    At1667HzHp = 0x08,
    At3333HzHp = 0x09,
    At6667HzHp = 0x0A,
    At12Hz5Lp = 0x11,
    At26HzLp = 0x12,
    At52HzLp = 0x13,
    At104HzLp = 0x14,
    At208HzLp = 0x15,
}

/// Accelerometer full scale
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XlFullScale {
    G2 = 0,
    G16 = 1,
    G4 = 2,
    G8 = 3,
}

impl XlFullScale {
    /// Sensitivity in mg/LSB
    pub fn sensitivity(self) -> f32 {
        match self {
            XlFullScale::G2 => 0.061,
            XlFullScale::G4 => 0.122,
            XlFullScale::G8 => 0.244,
            XlFullScale::G16 => 0.488,
        }
    }

    pub fn to_mg(self, lsb: i16) -> f32 {
        f32::from(lsb) * self.sensitivity()
    }
}

/// Gyroscope full scale, encoded over `FS_G[1:0]` and `FS_125`
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyFullScale {
    Dps250 = 0,
    Dps125 = 1,
    Dps500 = 2,
    Dps1000 = 4,
    Dps2000 = 6,
}

impl GyFullScale {
    /// Sensitivity in mdps/LSB
    pub fn sensitivity(self) -> f32 {
        match self {
            GyFullScale::Dps125 => 4.375,
            GyFullScale::Dps250 => 8.75,
            GyFullScale::Dps500 => 17.5,
            GyFullScale::Dps1000 => 35.0,
            GyFullScale::Dps2000 => 70.0,
        }
    }

    pub fn to_mdps(self, lsb: i16) -> f32 {
        f32::from(lsb) * self.sensitivity()
    }
}

/// I3C interface on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I3cMode {
    Enable,
    Disable,
}

/// Temperature in °C from `OUT_TEMP`
pub fn from_lsb_to_celsius(lsb: i16) -> f32 {
    f32::from(lsb) / 256.0 + 25.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert!((XlFullScale::G2.to_mg(1000) - 61.0).abs() < 0.01);
        assert!((XlFullScale::G16.to_mg(-2) + 0.976).abs() < 0.001);
        assert!((GyFullScale::Dps2000.to_mdps(-10) + 700.0).abs() < 0.01);
        assert!((from_lsb_to_celsius(-6400) - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_odr_encoding() {
        // low nibble is the register value, bit 4 the power mode
        assert_eq!(XlOdr::At12Hz5Hp as u8 & 0x0F, XlOdr::At12Hz5Lp as u8 & 0x0F);
        assert_eq!(XlOdr::At1Hz6Lp as u8 & 0x10, 0x10);
        assert_eq!(GyOdr::At208HzHp as u8 & 0x10, 0);
    }
}
