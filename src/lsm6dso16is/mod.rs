// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! LSM6DSO16IS 6-axis IMU driver.

pub mod constants;

pub use constants::{
    from_lsb_to_celsius, GyFullScale, GyOdr, I3cMode, XlFullScale, XlOdr, LSM6DSO16IS_ID,
};

use crate::{
    interface::{
        delay::DelayMs, i2cdev::I2cDevice, spidev::SpiDevice, with_bits, with_field,
        I2cInterface, SensorInterface, SpiInterface,
    },
    wait_reset_done, Error,
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
    pub drdy_gy: bool,
    pub boot: bool,
}

/// Events routed to the INT2 pin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinInt2Route {
    pub drdy_xl: bool,
    pub drdy_gy: bool,
    pub drdy_temp: bool,
}

/// LSM6DSO16IS driver
pub struct Lsm6dso16is<SI> {
    pub(crate) sensor_interface: SI,
}

impl<SI> Lsm6dso16is<SI> {
    /// Create a new driver with the given sensor interface
    pub fn new_with_interface(sensor_interface: SI) -> Self {
        Self { sensor_interface }
    }

    /// Returns previously consumed sensor interface instance.
    pub fn free(self) -> SI {
        self.sensor_interface
    }
}

impl Lsm6dso16is<SpiInterface<SpiDevice>> {
    pub fn new_spi(spidevice: &str, max_speed_hz: u32) -> io::Result<Self> {
        let spi = SpiDevice::new(spidevice, max_speed_hz)?;
        Ok(Self::new_with_interface(SpiInterface::new(spi)))
    }
}

impl Lsm6dso16is<I2cInterface<I2cDevice>> {
    pub fn new_i2c(i2cdevice: &str, address: u8) -> io::Result<Self> {
        let i2c = I2cDevice::new(i2cdevice, address)?;
        Ok(Self::new_with_interface(I2cInterface::new(i2c)))
    }
}

impl<SI, SE> Lsm6dso16is<SI>
where
    SI: SensorInterface<InterfaceError = SE>,
    SE: core::fmt::Debug,
{
    fn read(&mut self, reg: u8) -> Result<u8, Error<SE>> {
        self.sensor_interface
            .read_register(reg)
            .map_err(Error::Comm)
    }

    fn modify<F: FnOnce(u8) -> u8>(&mut self, reg: u8, f: F) -> Result<(), Error<SE>> {
        self.sensor_interface
            .modify_register(reg, f)
            .map_err(Error::Comm)
    }

    pub fn device_id(&mut self) -> Result<u8, Error<SE>> {
        self.read(WHO_AM_I)
    }

    /// Verify that the sensor returns the expected device ID
    pub fn check_device_id(&mut self) -> Result<(), Error<SE>> {
        let found = self.device_id()?;
        trace!("WHO_AM_I 0x{:02X}", found);
        if found != LSM6DSO16IS_ID {
            return Err(Error::InvalidDeviceId {
                expected: LSM6DSO16IS_ID,
                found,
            });
        }
        Ok(())
    }

    /// Restore the default configuration.
    ///
    /// Both sensors are powered down first, then `SW_RESET` is set and
    /// polled until the device clears it.
    pub fn software_reset(&mut self, delay_source: &mut impl DelayMs) -> Result<(), Error<SE>> {
        debug!("software reset");
        self.xl_data_rate_set(XlOdr::Off)?;
        self.gy_data_rate_set(GyOdr::Off)?;
        self.modify(CTRL3_C, |v| v | SW_RESET)?;

        wait_reset_done(delay_source, || Ok(self.read(CTRL3_C)? & SW_RESET != 0))
    }

    /// Reboot the memory content (trimming parameters)
    pub fn boot_set(&mut self) -> Result<(), Error<SE>> {
        self.modify(CTRL3_C, |v| v | BOOT)
    }

    pub fn block_data_update_set(&mut self, enable: bool) -> Result<(), Error<SE>> {
        self.modify(CTRL3_C, |v| with_bits(v, BDU, enable))
    }

    pub fn i3c_disable_set(&mut self, mode: I3cMode) -> Result<(), Error<SE>> {
        self.modify(CTRL9_C, |v| with_bits(v, I3C_DISABLE, mode == I3cMode::Disable))
    }

    /// Data-ready signals pulsed (75 µs) instead of latched until read
    pub fn data_ready_pulsed_set(&mut self, pulsed: bool) -> Result<(), Error<SE>> {
        self.modify(DRDY_PULSED_REG, |v| with_bits(v, DRDY_PULSED, pulsed))
    }

    pub fn xl_data_rate_set(&mut self, odr: XlOdr) -> Result<(), Error<SE>> {
        debug!("xl odr {:?}", odr);
        let val = odr as u8;
        self.modify(CTRL6_C, |v| with_bits(v, XL_HM_MODE, val & 0x10 != 0))?;
        self.modify(CTRL1_XL, |v| with_field(v, ODR_XL_MASK, val & 0x0F))
    }

    pub fn gy_data_rate_set(&mut self, odr: GyOdr) -> Result<(), Error<SE>> {
        debug!("gy odr {:?}", odr);
        let val = odr as u8;
        self.modify(CTRL7_G, |v| with_bits(v, G_HM_MODE, val & 0x10 != 0))?;
        self.modify(CTRL2_G, |v| with_field(v, ODR_G_MASK, val & 0x0F))
    }

    pub fn xl_full_scale_set(&mut self, fs: XlFullScale) -> Result<(), Error<SE>> {
        debug!("xl full scale {:?}", fs);
        self.modify(CTRL1_XL, |v| with_field(v, FS_XL_MASK, fs as u8))
    }

    pub fn gy_full_scale_set(&mut self, fs: GyFullScale) -> Result<(), Error<SE>> {
        debug!("gy full scale {:?}", fs);
        self.modify(CTRL2_G, |v| with_field(v, FS_G_MASK, fs as u8))
    }

    pub fn pin_int1_route_get(&mut self) -> Result<PinInt1Route, Error<SE>> {
        let v = self.read(INT1_CTRL)?;
        Ok(PinInt1Route {
            drdy_xl: v & INT1_DRDY_XL != 0,
            drdy_gy: v & INT1_DRDY_G != 0,
            boot: v & INT1_BOOT != 0,
        })
    }

    pub fn pin_int1_route_set(&mut self, route: PinInt1Route) -> Result<(), Error<SE>> {
        self.modify(INT1_CTRL, |v| {
            let v = with_bits(v, INT1_DRDY_XL, route.drdy_xl);
            let v = with_bits(v, INT1_DRDY_G, route.drdy_gy);
            with_bits(v, INT1_BOOT, route.boot)
        })
    }

    pub fn pin_int2_route_get(&mut self) -> Result<PinInt2Route, Error<SE>> {
        let v = self.read(INT2_CTRL)?;
        Ok(PinInt2Route {
            drdy_xl: v & INT2_DRDY_XL != 0,
            drdy_gy: v & INT2_DRDY_G != 0,
            drdy_temp: v & INT2_DRDY_TEMP != 0,
        })
    }

    pub fn pin_int2_route_set(&mut self, route: PinInt2Route) -> Result<(), Error<SE>> {
        self.modify(INT2_CTRL, |v| {
            let v = with_bits(v, INT2_DRDY_XL, route.drdy_xl);
            let v = with_bits(v, INT2_DRDY_G, route.drdy_gy);
            with_bits(v, INT2_DRDY_TEMP, route.drdy_temp)
        })
    }

    pub fn xl_flag_data_ready(&mut self) -> Result<bool, Error<SE>> {
        Ok(self.read(STATUS_REG)? & XLDA != 0)
    }

    pub fn gy_flag_data_ready(&mut self) -> Result<bool, Error<SE>> {
        Ok(self.read(STATUS_REG)? & GDA != 0)
    }

    pub fn temp_flag_data_ready(&mut self) -> Result<bool, Error<SE>> {
        Ok(self.read(STATUS_REG)? & TDA != 0)
    }

    pub fn acceleration_raw(&mut self) -> Result<[i16; 3], Error<SE>> {
        self.sensor_interface
            .read_i16x3(OUTX_L_A)
            .map_err(Error::Comm)
    }

    pub fn angular_rate_raw(&mut self) -> Result<[i16; 3], Error<SE>> {
        self.sensor_interface
            .read_i16x3(OUTX_L_G)
            .map_err(Error::Comm)
    }

    pub fn temperature_raw(&mut self) -> Result<i16, Error<SE>> {
        let mut buf = [0u8; 2];
        self.sensor_interface
            .read_registers(OUT_TEMP_L, &mut buf)
            .map_err(Error::Comm)?;
        Ok(i16::from_le_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        interface::{delay::NoDelay, mock::MockRegisters},
        RESET_POLL_LIMIT,
    };

    fn driver() -> Lsm6dso16is<MockRegisters> {
        let mut bus = MockRegisters::new();
        bus.set_register(WHO_AM_I, LSM6DSO16IS_ID);
        bus.self_clearing(CTRL3_C, SW_RESET | BOOT);
        Lsm6dso16is::new_with_interface(bus)
    }

    #[test]
    fn test_software_reset_powers_down_first() {
        let mut imu = driver();
        imu.sensor_interface.set_register(CTRL1_XL, 0x50);
        imu.sensor_interface.set_register(CTRL2_G, 0x50);
        let mut delay = NoDelay::default();
        imu.software_reset(&mut delay).unwrap();

        assert_eq!(imu.sensor_interface.register(CTRL1_XL), 0x00);
        assert_eq!(imu.sensor_interface.register(CTRL2_G), 0x00);
        let writes = imu.sensor_interface.writes();
        assert_eq!(writes.last(), Some(&(CTRL3_C, vec![SW_RESET])));
        assert!(delay.requested.is_empty());
    }

    #[test]
    fn test_software_reset_waits_for_clear() {
        let mut bus = MockRegisters::new();
        // first read feeds the read-modify-write, then three polls see the bit
        bus.script_reads(CTRL3_C, &[0x00, SW_RESET, SW_RESET, SW_RESET, 0x00]);
        let mut imu = Lsm6dso16is::new_with_interface(bus);

        let mut delay = NoDelay::default();
        imu.software_reset(&mut delay).unwrap();
        assert_eq!(delay.requested, vec![1, 1, 1]);
    }

    #[test]
    fn test_software_reset_timeout() {
        let mut bus = MockRegisters::new();
        bus.set_register(WHO_AM_I, LSM6DSO16IS_ID);
        let mut imu = Lsm6dso16is::new_with_interface(bus);
        let mut delay = NoDelay::default();
        assert!(matches!(
            imu.software_reset(&mut delay),
            Err(Error::ResetTimeout)
        ));
        assert_eq!(delay.requested.len(), RESET_POLL_LIMIT as usize);
    }

    #[test]
    fn test_high_performance_odr() {
        let mut imu = driver();
        imu.xl_data_rate_set(XlOdr::At12Hz5Lp).unwrap();
        assert_eq!(imu.sensor_interface.register(CTRL6_C), XL_HM_MODE);
        assert_eq!(imu.sensor_interface.register(CTRL1_XL), 0x10);

        imu.xl_data_rate_set(XlOdr::At12Hz5Hp).unwrap();
        assert_eq!(imu.sensor_interface.register(CTRL6_C), 0);

        imu.gy_data_rate_set(GyOdr::At104HzLp).unwrap();
        assert_eq!(imu.sensor_interface.register(CTRL7_G), G_HM_MODE);
        assert_eq!(imu.sensor_interface.register(CTRL2_G), 0x40);
    }

    #[test]
    fn test_full_scale() {
        let mut imu = driver();
        imu.xl_data_rate_set(XlOdr::At12Hz5Hp).unwrap();
        imu.xl_full_scale_set(XlFullScale::G2).unwrap();
        assert_eq!(imu.sensor_interface.register(CTRL1_XL), 0x10);
        imu.xl_full_scale_set(XlFullScale::G8).unwrap();
        assert_eq!(imu.sensor_interface.register(CTRL1_XL), 0x1C);

        imu.gy_full_scale_set(GyFullScale::Dps2000).unwrap();
        assert_eq!(imu.sensor_interface.register(CTRL2_G), 0x0C);
    }

    #[test]
    fn test_route_read_modify_write() {
        let mut imu = driver();
        imu.sensor_interface.set_register(INT1_CTRL, INT1_BOOT);

        let mut route = imu.pin_int1_route_get().unwrap();
        assert!(route.boot);
        route.drdy_xl = true;
        imu.pin_int1_route_set(route).unwrap();
        assert_eq!(
            imu.sensor_interface.register(INT1_CTRL),
            INT1_BOOT | INT1_DRDY_XL
        );

        imu.pin_int2_route_set(PinInt2Route {
            drdy_temp: true,
            ..Default::default()
        })
        .unwrap();
        assert!(imu.pin_int2_route_get().unwrap().drdy_temp);
    }

    #[test]
    fn test_ctrl3_bits_are_independent() {
        let mut imu = driver();
        imu.block_data_update_set(true).unwrap();
        imu.boot_set().unwrap();
        // BOOT clears itself, BDU stays
        assert_eq!(imu.sensor_interface.register(CTRL3_C), BDU);

        imu.data_ready_pulsed_set(true).unwrap();
        imu.i3c_disable_set(I3cMode::Disable).unwrap();
        assert_eq!(imu.sensor_interface.register(DRDY_PULSED_REG), DRDY_PULSED);
        assert_eq!(imu.sensor_interface.register(CTRL9_C), I3C_DISABLE);
    }

    #[test]
    fn test_flags() {
        let mut imu = driver();
        imu.sensor_interface.set_register(STATUS_REG, GDA);
        assert!(!imu.xl_flag_data_ready().unwrap());
        assert!(imu.gy_flag_data_ready().unwrap());
        assert!(!imu.temp_flag_data_ready().unwrap());
    }
}
