// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Register map and setting encodings for the LSM6DSO32X.

/// `WHO_AM_I` value
pub const LSM6DSO32X_ID: u8 = 0x6C;

// =============================================================================
// Register addresses
// =============================================================================

pub const FUNC_CFG_ACCESS: u8 = 0x01;
pub const PIN_CTRL: u8 = 0x02;
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
pub const CTRL8_XL: u8 = 0x17;
pub const CTRL9_XL: u8 = 0x18;
pub const CTRL10_C: u8 = 0x19;
pub const STATUS_REG: u8 = 0x1E;
pub const OUT_TEMP_L: u8 = 0x20;
pub const OUTX_L_G: u8 = 0x22;
pub const OUTX_L_A: u8 = 0x28;
pub const I3C_BUS_AVB: u8 = 0x62;
pub const X_OFS_USR: u8 = 0x73;
pub const Y_OFS_USR: u8 = 0x74;
pub const Z_OFS_USR: u8 = 0x75;

// =============================================================================
// Bit fields
// =============================================================================

/// CTRL1_XL: accelerometer ODR
pub const ODR_XL_MASK: u8 = 0xF0;
/// CTRL1_XL: accelerometer full scale
pub const FS_XL_MASK: u8 = 0x0C;
/// CTRL1_XL: second low-pass filter on the output path
pub const LPF2_XL_EN: u8 = 0x02;

/// CTRL2_G: gyroscope ODR
pub const ODR_G_MASK: u8 = 0xF0;
/// CTRL2_G: `FS_G` together with `FS_125`
pub const FS_G_MASK: u8 = 0x0E;

/// CTRL3_C
pub const BOOT: u8 = 0x80;
pub const BDU: u8 = 0x40;
pub const IF_INC: u8 = 0x04;
pub const SW_RESET: u8 = 0x01;

/// CTRL6_C: high-performance mode disabled for the accelerometer
pub const XL_HM_MODE: u8 = 0x10;
/// CTRL6_C: weight of the user offset registers
pub const USR_OFF_W: u8 = 0x08;

/// CTRL7_G: high-performance mode disabled for the gyroscope
pub const G_HM_MODE: u8 = 0x80;
/// CTRL7_G: apply user offsets to the output registers
pub const USR_OFF_ON_OUT: u8 = 0x02;

/// CTRL8_XL
pub const HPCF_XL_MASK: u8 = 0xE0;
pub const HP_REF_MODE_XL: u8 = 0x10;
pub const HP_SLOPE_XL_EN: u8 = 0x04;

/// CTRL9_XL: MIPI I3C interface disabled
pub const I3C_DISABLE: u8 = 0x02;

/// I3C_BUS_AVB: bus-available time selection
pub const I3C_BUS_AVB_SEL_MASK: u8 = 0x18;

/// STATUS_REG
pub const TDA: u8 = 0x04;
pub const GDA: u8 = 0x02;
pub const XLDA: u8 = 0x01;

/// INT1_CTRL
pub const INT1_BOOT: u8 = 0x04;
pub const INT1_DRDY_G: u8 = 0x02;
pub const INT1_DRDY_XL: u8 = 0x01;

// =============================================================================
// Settings
// =============================================================================

/// Accelerometer output data rate
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XlOdr {
    Off = 0,
    Hz12_5 = 1,
    Hz26 = 2,
    Hz52 = 3,
    Hz104 = 4,
    Hz208 = 5,
    Hz417 = 6,
    Hz833 = 7,
    Hz1667 = 8,
    Hz3333 = 9,
    Hz6667 = 10,
    /// Only valid with the high-performance mode disabled
    Hz1_6 = 11,
}

/// Gyroscope output data rate
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyOdr {
    Off = 0,
    Hz12_5 = 1,
    Hz26 = 2,
    Hz52 = 3,
    Hz104 = 4,
    Hz208 = 5,
    Hz417 = 6,
    Hz833 = 7,
    Hz1667 = 8,
    Hz3333 = 9,
    Hz6667 = 10,
}

/// Accelerometer full scale
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XlFullScale {
    G4 = 0,
    G32 = 1,
    G8 = 2,
    G16 = 3,
}

impl XlFullScale {
    /// Sensitivity in mg/LSB
    pub fn sensitivity(self) -> f32 {
        match self {
            XlFullScale::G4 => 0.122,
            XlFullScale::G8 => 0.244,
            XlFullScale::G16 => 0.488,
            XlFullScale::G32 => 0.976,
        }
    }

    pub fn to_mg(self, lsb: i16) -> f32 {
        f32::from(lsb) * self.sensitivity()
    }

    pub(crate) fn from_bits(bits: u8) -> XlFullScale {
        match bits & 0x03 {
            0 => XlFullScale::G4,
            1 => XlFullScale::G32,
            2 => XlFullScale::G8,
            _ => XlFullScale::G16,
        }
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

    pub(crate) fn from_bits(bits: u8) -> GyFullScale {
        match bits & 0x07 {
            1 | 3 | 5 | 7 => GyFullScale::Dps125,
            2 => GyFullScale::Dps500,
            4 => GyFullScale::Dps1000,
            6 => GyFullScale::Dps2000,
            _ => GyFullScale::Dps250,
        }
    }
}

/// Weight of the accelerometer user offset registers
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetWeight {
    /// 2^-10 g/LSB
    Lsb1mg = 0,
    /// 2^-6 g/LSB
    Lsb16mg = 1,
}

impl OffsetWeight {
    /// Offset in mg represented by one LSB
    pub fn mg_per_lsb(self) -> f32 {
        match self {
            OffsetWeight::Lsb1mg => 1000.0 / 1024.0,
            OffsetWeight::Lsb16mg => 1000.0 / 64.0,
        }
    }

    /// Value in mg of a two's complement offset register
    pub fn to_mg(self, raw: u8) -> f32 {
        f32::from(raw as i8) * self.mg_per_lsb()
    }
}

/// Accelerometer output filter path.
///
/// Bits `[2:0]` are the `HPCF_XL` cutoff, bit 4 selects the high-pass
/// (slope) path and bit 5 the high-pass reference mode.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpSlopeXlEn {
    HpPathDisableOnOut = 0x00,
    SlopeOdrDiv4 = 0x10,
    HpOdrDiv10 = 0x11,
    HpOdrDiv20 = 0x12,
    HpOdrDiv45 = 0x13,
    HpOdrDiv100 = 0x14,
    HpOdrDiv200 = 0x15,
    HpOdrDiv400 = 0x16,
    HpOdrDiv800 = 0x17,
    HpRefMdOdrDiv10 = 0x31,
    HpRefMdOdrDiv20 = 0x32,
    HpRefMdOdrDiv45 = 0x33,
    HpRefMdOdrDiv100 = 0x34,
    HpRefMdOdrDiv200 = 0x35,
    HpRefMdOdrDiv400 = 0x36,
    HpRefMdOdrDiv800 = 0x37,
    LpOdrDiv10 = 0x01,
    LpOdrDiv20 = 0x02,
    LpOdrDiv45 = 0x03,
    LpOdrDiv100 = 0x04,
    LpOdrDiv200 = 0x05,
    LpOdrDiv400 = 0x06,
    LpOdrDiv800 = 0x07,
}

/// I3C interface setting: disabled, or enabled with a bus-available time
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I3cMode {
    Disable = 0x80,
    EnableT50us = 0x00,
    EnableT2us = 0x01,
    EnableT1ms = 0x02,
    EnableT25ms = 0x03,
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
        assert!((XlFullScale::G4.to_mg(1000) - 122.0).abs() < 0.01);
        assert!((XlFullScale::G32.to_mg(-1000) + 976.0).abs() < 0.01);
        assert!((GyFullScale::Dps2000.to_mdps(100) - 7000.0).abs() < 0.01);
        assert!((GyFullScale::Dps125.to_mdps(-8) + 35.0).abs() < 0.01);
        assert!((from_lsb_to_celsius(0) - 25.0).abs() < 0.001);
        assert!((from_lsb_to_celsius(512) - 27.0).abs() < 0.001);
        assert!((from_lsb_to_celsius(-256) - 24.0).abs() < 0.001);
    }

    #[test]
    fn test_full_scale_bits_roundtrip() {
        for fs in [
            XlFullScale::G4,
            XlFullScale::G8,
            XlFullScale::G16,
            XlFullScale::G32,
        ] {
            assert_eq!(XlFullScale::from_bits(fs as u8), fs);
        }
        for fs in [
            GyFullScale::Dps125,
            GyFullScale::Dps250,
            GyFullScale::Dps500,
            GyFullScale::Dps1000,
            GyFullScale::Dps2000,
        ] {
            assert_eq!(GyFullScale::from_bits(fs as u8), fs);
        }
    }

    #[test]
    fn test_offset_weight() {
        // 0x30 = 48 LSB at 2^-10 g
        assert!((OffsetWeight::Lsb1mg.to_mg(0x30) - 46.875).abs() < 0.001);
        // 0x80 = -128 LSB at 2^-6 g
        assert!((OffsetWeight::Lsb16mg.to_mg(0x80) + 2000.0).abs() < 0.001);
    }
}
