// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! LSM6DSO32X 6-axis IMU driver.
//!
//! Covers the register set needed for basic bring-up: identification,
//! reset, data rates, full scales, output filtering, user offsets and the
//! data-ready flags.

pub mod constants;

pub use constants::{
    from_lsb_to_celsius, GyFullScale, GyOdr, HpSlopeXlEn, I3cMode, OffsetWeight, XlFullScale,
    XlOdr, LSM6DSO32X_ID,
};

use crate::{
    interface::{
        field,
        i2cdev::I2cDevice,
        spidev::SpiDevice,
        with_bits, with_field, I2cInterface, SensorInterface, SpiInterface,
    },
    Error,
};
use constants::*;
use log::{debug, trace};
use std::io;

/// 7-bit I2C address with SA0 tied low
pub const I2C_ADDR_SA0_LOW: u8 = 0x6A;
/// 7-bit I2C address with SA0 tied high
pub const I2C_ADDR_SA0_HIGH: u8 = 0x6B;

/// Events routed to the INT1 pin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinInt1Route {
    pub drdy_xl: bool,
    pub drdy_g: bool,
    pub boot: bool,
}

/// Data-ready state decoded from `STATUS_REG`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataReady {
    pub xl: bool,
    pub gy: bool,
    pub temp: bool,
}

/// LSM6DSO32X driver
pub struct Lsm6dso32x<SI> {
    pub(crate) sensor_interface: SI,
}

impl<SI> Lsm6dso32x<SI> {
    /// Create a new driver with the given sensor interface
    pub fn new_with_interface(sensor_interface: SI) -> Self {
        Self { sensor_interface }
    }

    /// Returns previously consumed sensor interface instance.
    pub fn free(self) -> SI {
        self.sensor_interface
    }
}

impl Lsm6dso32x<SpiInterface<SpiDevice>> {
    /// Create a driver on a spidev node, e.g. "/dev/spidev0.0"
    pub fn new_spi(spidevice: &str, max_speed_hz: u32) -> io::Result<Self> {
        let spi = SpiDevice::new(spidevice, max_speed_hz)?;
        Ok(Self::new_with_interface(SpiInterface::new(spi)))
    }
}

impl Lsm6dso32x<I2cInterface<I2cDevice>> {
    /// Create a driver on an i2c-dev node, e.g. "/dev/i2c-1"
    pub fn new_i2c(i2cdevice: &str, address: u8) -> io::Result<Self> {
        let i2c = I2cDevice::new(i2cdevice, address)?;
        Ok(Self::new_with_interface(I2cInterface::new(i2c)))
    }
}

impl<SI, SE> Lsm6dso32x<SI>
where
    SI: SensorInterface<InterfaceError = SE>,
    SE: core::fmt::Debug,
{
    fn read(&mut self, reg: u8) -> Result<u8, Error<SE>> {
        self.sensor_interface
            .read_register(reg)
            .map_err(Error::Comm)
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Error<SE>> {
        self.sensor_interface
            .write_register(reg, value)
            .map_err(Error::Comm)
    }

    fn modify<F: FnOnce(u8) -> u8>(&mut self, reg: u8, f: F) -> Result<(), Error<SE>> {
        self.sensor_interface
            .modify_register(reg, f)
            .map_err(Error::Comm)
    }

    /// Read `WHO_AM_I`
    pub fn device_id(&mut self) -> Result<u8, Error<SE>> {
        self.read(WHO_AM_I)
    }

    /// Verify that the sensor returns the expected device ID
    pub fn check_device_id(&mut self) -> Result<(), Error<SE>> {
        let found = self.device_id()?;
        trace!("WHO_AM_I 0x{:02X}", found);
        if found != LSM6DSO32X_ID {
            return Err(Error::InvalidDeviceId {
                expected: LSM6DSO32X_ID,
                found,
            });
        }
        Ok(())
    }

    /// Request a software reset; the bit clears itself once the device
    /// has restored its default configuration
    pub fn reset_set(&mut self, enable: bool) -> Result<(), Error<SE>> {
        debug!("software reset");
        self.modify(CTRL3_C, |v| with_bits(v, SW_RESET, enable))
    }

    /// Whether a software reset is still in progress
    pub fn reset_get(&mut self) -> Result<bool, Error<SE>> {
        Ok(self.read(CTRL3_C)? & SW_RESET != 0)
    }

    /// Block data update: output registers are not updated until both
    /// bytes of a sample have been read
    pub fn block_data_update_set(&mut self, enable: bool) -> Result<(), Error<SE>> {
        self.modify(CTRL3_C, |v| with_bits(v, BDU, enable))
    }

    pub fn block_data_update_get(&mut self) -> Result<bool, Error<SE>> {
        Ok(self.read(CTRL3_C)? & BDU != 0)
    }

    /// Enable or disable the MIPI I3C interface
    pub fn i3c_disable_set(&mut self, mode: I3cMode) -> Result<(), Error<SE>> {
        let val = mode as u8;
        self.modify(CTRL9_XL, |v| with_bits(v, I3C_DISABLE, val & 0x80 != 0))?;
        self.modify(I3C_BUS_AVB, |v| {
            with_field(v, I3C_BUS_AVB_SEL_MASK, val & 0x03)
        })
    }

    pub fn xl_data_rate_set(&mut self, odr: XlOdr) -> Result<(), Error<SE>> {
        debug!("xl odr {:?}", odr);
        self.modify(CTRL1_XL, |v| with_field(v, ODR_XL_MASK, odr as u8))
    }

    pub fn gy_data_rate_set(&mut self, odr: GyOdr) -> Result<(), Error<SE>> {
        debug!("gy odr {:?}", odr);
        self.modify(CTRL2_G, |v| with_field(v, ODR_G_MASK, odr as u8))
    }

    /// Accelerometer high-performance mode (disabled means low-power or
    /// normal mode depending on the ODR)
    pub fn xl_high_performance_set(&mut self, enable: bool) -> Result<(), Error<SE>> {
        self.modify(CTRL6_C, |v| with_bits(v, XL_HM_MODE, !enable))
    }

    /// Gyroscope high-performance mode
    pub fn gy_high_performance_set(&mut self, enable: bool) -> Result<(), Error<SE>> {
        self.modify(CTRL7_G, |v| with_bits(v, G_HM_MODE, !enable))
    }

    pub fn xl_full_scale_set(&mut self, fs: XlFullScale) -> Result<(), Error<SE>> {
        debug!("xl full scale {:?}", fs);
        self.modify(CTRL1_XL, |v| with_field(v, FS_XL_MASK, fs as u8))
    }

    pub fn xl_full_scale_get(&mut self) -> Result<XlFullScale, Error<SE>> {
        Ok(XlFullScale::from_bits(field(self.read(CTRL1_XL)?, FS_XL_MASK)))
    }

    pub fn gy_full_scale_set(&mut self, fs: GyFullScale) -> Result<(), Error<SE>> {
        debug!("gy full scale {:?}", fs);
        self.modify(CTRL2_G, |v| with_field(v, FS_G_MASK, fs as u8))
    }

    pub fn gy_full_scale_get(&mut self) -> Result<GyFullScale, Error<SE>> {
        Ok(GyFullScale::from_bits(field(self.read(CTRL2_G)?, FS_G_MASK)))
    }

    /// Weight of the user offset registers
    pub fn xl_offset_weight_set(&mut self, weight: OffsetWeight) -> Result<(), Error<SE>> {
        self.modify(CTRL6_C, |v| {
            with_bits(v, USR_OFF_W, weight == OffsetWeight::Lsb16mg)
        })
    }

    pub fn xl_offset_weight_get(&mut self) -> Result<OffsetWeight, Error<SE>> {
        if self.read(CTRL6_C)? & USR_OFF_W != 0 {
            Ok(OffsetWeight::Lsb16mg)
        } else {
            Ok(OffsetWeight::Lsb1mg)
        }
    }

    /// X-axis user offset, two's complement
    pub fn xl_usr_offset_x_set(&mut self, offset: u8) -> Result<(), Error<SE>> {
        self.write(X_OFS_USR, offset)
    }

    /// Y-axis user offset, two's complement
    pub fn xl_usr_offset_y_set(&mut self, offset: u8) -> Result<(), Error<SE>> {
        self.write(Y_OFS_USR, offset)
    }

    /// Z-axis user offset, two's complement
    pub fn xl_usr_offset_z_set(&mut self, offset: u8) -> Result<(), Error<SE>> {
        self.write(Z_OFS_USR, offset)
    }

    /// Current user offsets [x, y, z]
    pub fn xl_usr_offset_get(&mut self) -> Result<[u8; 3], Error<SE>> {
        let mut buf = [0u8; 3];
        self.sensor_interface
            .read_registers(X_OFS_USR, &mut buf)
            .map_err(Error::Comm)?;
        Ok(buf)
    }

    /// Apply the user offsets to the output registers
    pub fn xl_usr_offset_set(&mut self, enable: bool) -> Result<(), Error<SE>> {
        self.modify(CTRL7_G, |v| with_bits(v, USR_OFF_ON_OUT, enable))
    }

    /// Accelerometer output path: low-pass cutoff, high-pass/slope filter
    /// and reference mode
    pub fn xl_hp_path_on_out_set(&mut self, path: HpSlopeXlEn) -> Result<(), Error<SE>> {
        let val = path as u8;
        self.modify(CTRL8_XL, |v| {
            let v = with_field(v, HPCF_XL_MASK, val & 0x07);
            let v = with_bits(v, HP_SLOPE_XL_EN, val & 0x10 != 0);
            with_bits(v, HP_REF_MODE_XL, val & 0x20 != 0)
        })
    }

    /// Second low-pass filter on the accelerometer output
    pub fn xl_filter_lp2_set(&mut self, enable: bool) -> Result<(), Error<SE>> {
        self.modify(CTRL1_XL, |v| with_bits(v, LPF2_XL_EN, enable))
    }

    pub fn pin_int1_route_get(&mut self) -> Result<PinInt1Route, Error<SE>> {
        let v = self.read(INT1_CTRL)?;
        Ok(PinInt1Route {
            drdy_xl: v & INT1_DRDY_XL != 0,
            drdy_g: v & INT1_DRDY_G != 0,
            boot: v & INT1_BOOT != 0,
        })
    }

    pub fn pin_int1_route_set(&mut self, route: PinInt1Route) -> Result<(), Error<SE>> {
        self.modify(INT1_CTRL, |v| {
            let v = with_bits(v, INT1_DRDY_XL, route.drdy_xl);
            let v = with_bits(v, INT1_DRDY_G, route.drdy_g);
            with_bits(v, INT1_BOOT, route.boot)
        })
    }

    /// All three data-ready flags with a single `STATUS_REG` read
    pub fn status(&mut self) -> Result<DataReady, Error<SE>> {
        let v = self.read(STATUS_REG)?;
        Ok(DataReady {
            xl: v & XLDA != 0,
            gy: v & GDA != 0,
            temp: v & TDA != 0,
        })
    }

    pub fn xl_flag_data_ready(&mut self) -> Result<bool, Error<SE>> {
        Ok(self.status()?.xl)
    }

    pub fn gy_flag_data_ready(&mut self) -> Result<bool, Error<SE>> {
        Ok(self.status()?.gy)
    }

    pub fn temp_flag_data_ready(&mut self) -> Result<bool, Error<SE>> {
        Ok(self.status()?.temp)
    }

    /// Raw accelerometer sample [x, y, z]
    pub fn acceleration_raw(&mut self) -> Result<[i16; 3], Error<SE>> {
        self.sensor_interface
            .read_i16x3(OUTX_L_A)
            .map_err(Error::Comm)
    }

    /// Raw gyroscope sample [x, y, z]
    pub fn angular_rate_raw(&mut self) -> Result<[i16; 3], Error<SE>> {
        self.sensor_interface
            .read_i16x3(OUTX_L_G)
            .map_err(Error::Comm)
    }

    /// Raw temperature sample
    pub fn temperature_raw(&mut self) -> Result<i16, Error<SE>> {
        let mut buf = [0u8; 2];
        self.sensor_interface
            .read_registers(OUT_TEMP_L, &mut buf)
            .map_err(Error::Comm)?;
        Ok(i16::from_le_bytes(buf))
    }
}
