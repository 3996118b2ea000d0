// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! IIS2DULPX ultra-low-power 3-axis accelerometer driver.
//!
//! The device starts in deep power-down and only answers on the bus after
//! [`Iis2dulpx::exit_deep_power_down`]. Output and power mode are set
//! together through [`Mode`].

pub mod constants;

pub use constants::{from_lsb_to_celsius, Bw, Fs, Odr, IIS2DULPX_ID};

use crate::{
    interface::{
        delay::DelayMs, i2cdev::I2cDevice, spidev::SpiDevice, with_bits, with_field,
        I2cInterface, SensorInterface, SpiInterface,
    },
    Error,
};
use constants::*;
use log::{debug, trace};
use std::io;

/// 7-bit I2C address with SA0 tied low
pub const I2C_ADDR_SA0_LOW: u8 = 0x18;
/// 7-bit I2C address with SA0 tied high
pub const I2C_ADDR_SA0_HIGH: u8 = 0x19;

/// Initialisation step for [`Iis2dulpx::init_set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Init {
    /// Restore the default register content
    Reset,
    /// Reload the trimming parameters
    Boot,
    /// BDU and address auto-increment on, embedded functions and FIFO off
    SensorOnlyOn,
    /// Same as `SensorOnlyOn` but with the embedded functions kept on
    SensorEmbFuncOn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub sw_reset: bool,
    pub boot: bool,
    pub drdy: bool,
}

/// Events routed to an interrupt pin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinIntRoute {
    pub drdy: bool,
    pub fifo_ovr: bool,
    pub fifo_th: bool,
    pub fifo_full: bool,
    pub boot: bool,
}

impl PinIntRoute {
    fn apply(self, reg: u8) -> u8 {
        let reg = with_bits(reg, INT_DRDY, self.drdy);
        let reg = with_bits(reg, INT_FIFO_OVR, self.fifo_ovr);
        let reg = with_bits(reg, INT_FIFO_TH, self.fifo_th);
        let reg = with_bits(reg, INT_FIFO_FULL, self.fifo_full);
        with_bits(reg, INT_BOOT, self.boot)
    }

    fn from_reg(reg: u8) -> PinIntRoute {
        PinIntRoute {
            drdy: reg & INT_DRDY != 0,
            fifo_ovr: reg & INT_FIFO_OVR != 0,
            fifo_th: reg & INT_FIFO_TH != 0,
            fifo_full: reg & INT_FIFO_FULL != 0,
            boot: reg & INT_BOOT != 0,
        }
    }
}

/// Sensor operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub odr: Odr,
    pub fs: Fs,
    pub bw: Bw,
}

impl Default for Mode {
    fn default() -> Self {
        Mode {
            odr: Odr::Off,
            fs: Fs::G2,
            bw: Bw::OdrDiv2,
        }
    }
}

/// Acceleration sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct XlData {
    pub raw: [i16; 3],
    pub mg: [f32; 3],
}

/// Temperature sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TempData {
    /// 12-bit sample
    pub raw: i16,
    pub deg_c: f32,
}

/// IIS2DULPX driver
pub struct Iis2dulpx<SI> {
    pub(crate) sensor_interface: SI,
}

impl<SI> Iis2dulpx<SI> {
    pub fn new_with_interface(sensor_interface: SI) -> Self {
        Self { sensor_interface }
    }

    /// Returns previously consumed sensor interface instance.
    pub fn free(self) -> SI {
        self.sensor_interface
    }
}

impl Iis2dulpx<SpiInterface<SpiDevice>> {
    pub fn new_spi(spidevice: &str, max_speed_hz: u32) -> io::Result<Self> {
        let spi = SpiDevice::new(spidevice, max_speed_hz)?;
        Ok(Self::new_with_interface(SpiInterface::new(spi)))
    }
}

impl Iis2dulpx<I2cInterface<I2cDevice>> {
    pub fn new_i2c(i2cdevice: &str, address: u8) -> io::Result<Self> {
        let i2c = I2cDevice::new(i2cdevice, address)?;
        Ok(Self::new_with_interface(I2cInterface::new(i2c)))
    }
}

impl<SI, SE> Iis2dulpx<SI>
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

    /// Wake the device from deep power-down
    pub fn exit_deep_power_down(
        &mut self,
        delay_source: &mut impl DelayMs,
    ) -> Result<(), Error<SE>> {
        debug!("leaving deep power-down");
        self.sensor_interface
            .write_register(EN_DEVICE_CONFIG, SOFT_PD)
            .map_err(Error::Comm)?;
        delay_source.delay_ms(DEEP_PD_EXIT_MS);
        Ok(())
    }

    pub fn device_id(&mut self) -> Result<u8, Error<SE>> {
        self.read(WHO_AM_I)
    }

    pub fn check_device_id(&mut self) -> Result<(), Error<SE>> {
        let found = self.device_id()?;
        trace!("WHO_AM_I 0x{:02X}", found);
        if found != IIS2DULPX_ID {
            return Err(Error::InvalidDeviceId {
                expected: IIS2DULPX_ID,
                found,
            });
        }
        Ok(())
    }

    pub fn init_set(&mut self, init: Init) -> Result<(), Error<SE>> {
        debug!("init {:?}", init);
        match init {
            Init::Reset => self.modify(CTRL1, |v| v | SW_RESET),
            Init::Boot => self.modify(CTRL4, |v| v | BOOT),
            Init::SensorOnlyOn => {
                self.modify(CTRL1, |v| v | IF_ADD_INC)?;
                self.modify(CTRL4, |v| (v | BDU) & !(EMB_FUNC_EN | FIFO_EN))
            }
            Init::SensorEmbFuncOn => {
                self.modify(CTRL1, |v| v | IF_ADD_INC)?;
                self.modify(CTRL4, |v| (v | BDU | EMB_FUNC_EN) & !FIFO_EN)
            }
        }
    }

    pub fn status(&mut self) -> Result<Status, Error<SE>> {
        let ctrl1 = self.read(CTRL1)?;
        let ctrl4 = self.read(CTRL4)?;
        let status = self.read(STATUS)?;
        Ok(Status {
            sw_reset: ctrl1 & SW_RESET != 0,
            boot: ctrl4 & BOOT != 0,
            drdy: status & DRDY != 0,
        })
    }

    pub fn pin_int1_route_set(&mut self, route: PinIntRoute) -> Result<(), Error<SE>> {
        self.modify(CTRL2, |v| route.apply(v))
    }

    pub fn pin_int1_route_get(&mut self) -> Result<PinIntRoute, Error<SE>> {
        Ok(PinIntRoute::from_reg(self.read(CTRL2)?))
    }

    pub fn pin_int2_route_set(&mut self, route: PinIntRoute) -> Result<(), Error<SE>> {
        self.modify(CTRL3, |v| route.apply(v))
    }

    pub fn pin_int2_route_get(&mut self) -> Result<PinIntRoute, Error<SE>> {
        Ok(PinIntRoute::from_reg(self.read(CTRL3)?))
    }

    pub fn mode_set(&mut self, mode: &Mode) -> Result<(), Error<SE>> {
        debug!("mode {:?}", mode);
        let odr = mode.odr as u8 & 0x0F;
        self.modify(CTRL5, |v| {
            let v = with_field(v, ODR_MASK, odr);
            let v = with_field(v, BW_MASK, mode.bw as u8);
            with_field(v, FS_MASK, mode.fs as u8)
        })?;
        self.modify(CTRL3, |v| with_bits(v, HP_EN, mode.odr.is_high_performance()))
    }

    pub fn mode_get(&mut self) -> Result<Mode, Error<SE>> {
        let ctrl5 = self.read(CTRL5)?;
        let ctrl3 = self.read(CTRL3)?;
        Ok(Mode {
            odr: Odr::from_bits(ctrl5 >> 4, ctrl3 & HP_EN != 0),
            fs: Fs::from_bits(ctrl5 & FS_MASK),
            bw: Bw::from_bits((ctrl5 & BW_MASK) >> 2),
        })
    }

    /// Start a single conversion in [`Odr::TrigSw`] mode
    pub fn trigger_sw(&mut self) -> Result<(), Error<SE>> {
        self.modify(CTRL4, |v| v | SOC)
    }

    /// Read one acceleration sample, scaled for the full scale in `mode`
    pub fn xl_data_get(&mut self, mode: &Mode) -> Result<XlData, Error<SE>> {
        let raw = self
            .sensor_interface
            .read_i16x3(OUT_X_L)
            .map_err(Error::Comm)?;
        let mg = [
            mode.fs.to_mg(raw[0]),
            mode.fs.to_mg(raw[1]),
            mode.fs.to_mg(raw[2]),
        ];
        trace!("xl raw {:?}", raw);
        Ok(XlData { raw, mg })
    }

    pub fn outt_data_get(&mut self) -> Result<TempData, Error<SE>> {
        let mut buf = [0u8; 2];
        self.sensor_interface
            .read_registers(OUT_T_AH_QVAR_L, &mut buf)
            .map_err(Error::Comm)?;
        let raw = i16::from_le_bytes(buf) >> 4;
        Ok(TempData {
            raw,
            deg_c: from_lsb_to_celsius(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{delay::NoDelay, mock::MockRegisters};

    fn driver() -> Iis2dulpx<MockRegisters> {
        let mut bus = MockRegisters::new();
        bus.set_register(WHO_AM_I, IIS2DULPX_ID);
        Iis2dulpx::new_with_interface(bus)
    }

    #[test]
    fn test_exit_deep_power_down() {
        let mut xl = driver();
        let mut delay = NoDelay::default();
        xl.exit_deep_power_down(&mut delay).unwrap();

        assert_eq!(
            xl.sensor_interface.writes(),
            vec![(EN_DEVICE_CONFIG, vec![SOFT_PD])]
        );
        assert_eq!(delay.requested, vec![DEEP_PD_EXIT_MS]);
    }

    #[test]
    fn test_device_id_mismatch() {
        let mut xl = driver();
        xl.sensor_interface.set_register(WHO_AM_I, 0x44);
        match xl.check_device_id() {
            Err(Error::InvalidDeviceId { expected, found }) => {
                assert_eq!(expected, 0x47);
                assert_eq!(found, 0x44);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_init_sensor_only_on() {
        let mut xl = driver();
        xl.sensor_interface
            .set_register(CTRL4, EMB_FUNC_EN | FIFO_EN);
        xl.init_set(Init::SensorOnlyOn).unwrap();
        assert_eq!(xl.sensor_interface.register(CTRL1), IF_ADD_INC);
        assert_eq!(xl.sensor_interface.register(CTRL4), BDU);

        xl.init_set(Init::SensorEmbFuncOn).unwrap();
        assert_eq!(xl.sensor_interface.register(CTRL4), BDU | EMB_FUNC_EN);
    }

    #[test]
    fn test_status() {
        let mut xl = driver();
        xl.init_set(Init::Reset).unwrap();
        xl.sensor_interface.set_register(STATUS, DRDY);
        let status = xl.status().unwrap();
        assert!(status.sw_reset);
        assert!(!status.boot);
        assert!(status.drdy);
    }

    #[test]
    fn test_mode_set_get() {
        let mut xl = driver();
        let mode = Mode {
            odr: Odr::At25HzLp,
            fs: Fs::G4,
            bw: Bw::OdrDiv4,
        };
        xl.mode_set(&mode).unwrap();
        assert_eq!(xl.sensor_interface.register(CTRL5), 0x65);
        assert_eq!(xl.sensor_interface.register(CTRL3) & HP_EN, 0);
        assert_eq!(xl.mode_get().unwrap(), mode);

        let hp = Mode {
            odr: Odr::At100HzHp,
            ..mode
        };
        xl.mode_set(&hp).unwrap();
        assert_eq!(xl.sensor_interface.register(CTRL5), 0x85);
        assert_eq!(xl.sensor_interface.register(CTRL3) & HP_EN, HP_EN);
        assert_eq!(xl.mode_get().unwrap(), hp);
    }

    #[test]
    fn test_single_shot() {
        let mut xl = driver();
        xl.sensor_interface.self_clearing(CTRL4, SOC);
        xl.sensor_interface.set_register(CTRL4, BDU);
        xl.mode_set(&Mode {
            odr: Odr::TrigSw,
            ..Default::default()
        })
        .unwrap();
        xl.trigger_sw().unwrap();

        assert_eq!(
            xl.sensor_interface.writes().last(),
            Some(&(CTRL4, vec![BDU | SOC]))
        );
        assert_eq!(xl.sensor_interface.register(CTRL4), BDU);
        assert_eq!(xl.mode_get().unwrap().odr, Odr::TrigSw);
    }

    #[test]
    fn test_route_keeps_other_bits() {
        let mut xl = driver();
        xl.sensor_interface.set_register(CTRL3, HP_EN);
        xl.pin_int2_route_set(PinIntRoute {
            drdy: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(xl.sensor_interface.register(CTRL3), HP_EN | INT_DRDY);
        assert!(xl.pin_int2_route_get().unwrap().drdy);
        assert!(!xl.pin_int1_route_get().unwrap().drdy);
    }

    #[test]
    fn test_samples() {
        let mut xl = driver();
        // 8197 = 0x2005
        xl.sensor_interface
            .set_registers(OUT_X_L, &[0x05, 0x20, 0x00, 0x00, 0xFB, 0xDF]);
        xl.sensor_interface
            .set_registers(OUT_T_AH_QVAR_L, &[0x70, 0x2C]);
        let mode = Mode {
            fs: Fs::G4,
            ..Default::default()
        };

        let data = xl.xl_data_get(&mode).unwrap();
        assert_eq!(data.raw, [8197, 0, -8197]);
        assert!((data.mg[0] - 1000.03).abs() < 0.01);
        assert!((data.mg[2] + 1000.03).abs() < 0.01);

        let temp = xl.outt_data_get().unwrap();
        assert_eq!(temp.raw, 711);
        assert!((temp.deg_c - 27.0).abs() < 0.001);
    }
}
