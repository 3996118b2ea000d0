// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    board::BOOT_TIME_MS,
    console::Console,
    drdy::DrdyFlag,
    interface::{delay::DelayMs, mock::MockRegisters, SensorInterface},
    lsm6dso16is::{
        constants::{
            BOOT, CTRL3_C, GDA, OUTX_L_A, OUTX_L_G, OUT_TEMP_L, STATUS_REG, SW_RESET, TDA,
            WHO_AM_I, XLDA,
        },
        from_lsb_to_celsius, GyFullScale, GyOdr, Lsm6dso16is, XlFullScale, XlOdr,
        LSM6DSO16IS_ID,
    },
    Error,
};
use log::{debug, info};
use std::io::Write;

const XL_FS: XlFullScale = XlFullScale::G2;
const GY_FS: GyFullScale = GyFullScale::Dps2000;

/// Accelerometer, gyroscope and temperature read from the data-ready
/// handler.
///
/// Both sensors run at 12.5 Hz in high-performance mode, ±2 g and
/// ±2000 dps. The accelerometer data-ready drives INT1; on each event only
/// the channels whose status flag is set get printed.
pub struct Lsm6dso16isReadDataDrdy<SI, W> {
    sensor: Lsm6dso16is<SI>,
    console: Console<W>,
    drdy: DrdyFlag,
}

impl<SI, W> Lsm6dso16isReadDataDrdy<SI, W> {
    pub fn new(sensor: Lsm6dso16is<SI>, console: Console<W>, drdy: DrdyFlag) -> Self {
        Self {
            sensor,
            console,
            drdy,
        }
    }

    pub fn free(self) -> (Lsm6dso16is<SI>, Console<W>) {
        (self.sensor, self.console)
    }
}

impl<SI, SE, W> Lsm6dso16isReadDataDrdy<SI, W>
where
    SI: SensorInterface<InterfaceError = SE>,
    SE: core::fmt::Debug,
    W: Write,
{
    pub fn setup(&mut self, delay_source: &mut impl DelayMs) -> Result<(), Error<SE>> {
        delay_source.delay_ms(BOOT_TIME_MS);
        self.sensor.check_device_id()?;
        self.sensor.software_reset(delay_source)?;

        let mut route = self.sensor.pin_int1_route_get()?;
        route.drdy_xl = true;
        self.sensor.pin_int1_route_set(route)?;

        self.sensor.xl_data_rate_set(XlOdr::At12Hz5Hp)?;
        self.sensor.gy_data_rate_set(GyOdr::At12Hz5Hp)?;
        self.sensor.xl_full_scale_set(XL_FS)?;
        self.sensor.gy_full_scale_set(GY_FS)?;
        info!("lsm6dso16is configured: 12.5 Hz, {:?}, {:?}", XL_FS, GY_FS);
        Ok(())
    }

    /// Data-ready handler body
    pub fn step(&mut self) -> Result<bool, Error<SE>> {
        self.drdy.check()?;
        if !self.drdy.take() {
            return Ok(false);
        }

        if self.sensor.xl_flag_data_ready()? {
            let raw = self.sensor.acceleration_raw()?;
            self.console.acceleration_mg([
                XL_FS.to_mg(raw[0]),
                XL_FS.to_mg(raw[1]),
                XL_FS.to_mg(raw[2]),
            ])?;
        }

        if self.sensor.gy_flag_data_ready()? {
            let raw = self.sensor.angular_rate_raw()?;
            self.console.angular_rate_mdps([
                GY_FS.to_mdps(raw[0]),
                GY_FS.to_mdps(raw[1]),
                GY_FS.to_mdps(raw[2]),
            ])?;
        }

        if self.sensor.temp_flag_data_ready()? {
            let raw = self.sensor.temperature_raw()?;
            self.console.temperature_degc(from_lsb_to_celsius(raw))?;
        }
        Ok(true)
    }

    pub fn run(&mut self, limit: Option<usize>) -> Result<usize, Error<SE>> {
        let handled = super::run_loop(limit, || self.step())?;
        debug!("handled {} data-ready events", handled);
        Ok(handled)
    }
}

/// Register file of an LSM6DSO16IS with all three channels ready
pub fn simulated_lsm6dso16is() -> MockRegisters {
    let mut regs = MockRegisters::new();
    regs.set_register(WHO_AM_I, LSM6DSO16IS_ID);
    regs.self_clearing(CTRL3_C, SW_RESET | BOOT);
    regs.set_register(STATUS_REG, XLDA | GDA | TDA);
    // 512 -> 27 degC
    regs.set_registers(OUT_TEMP_L, &[0x00, 0x02]);
    // 5, -3, 0
    regs.set_registers(OUTX_L_G, &[0x05, 0x00, 0xFD, 0xFF, 0x00, 0x00]);
    // 16, -33, 16390
    regs.set_registers(OUTX_L_A, &[0x10, 0x00, 0xDF, 0xFF, 0x06, 0x40]);
    regs
}
