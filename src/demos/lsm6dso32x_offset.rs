// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    board::BOOT_TIME_MS,
    console::Console,
    interface::{delay::DelayMs, mock::MockRegisters, SensorInterface},
    lsm6dso32x::{
        constants::{
            BOOT, CTRL3_C, GDA, OUTX_L_A, OUTX_L_G, OUT_TEMP_L, STATUS_REG, SW_RESET, TDA,
            WHO_AM_I, XLDA,
        },
        from_lsb_to_celsius, GyFullScale, GyOdr, HpSlopeXlEn, I3cMode, Lsm6dso32x, OffsetWeight,
        XlFullScale, XlOdr, LSM6DSO32X_ID,
    },
    wait_reset_done, Error,
};
use log::{debug, info};
use std::io::Write;

/// User offsets applied to X, Y and Z, two's complement at 2^-10 g/LSB
pub const USER_OFFSET: [u8; 3] = [0x30, 0x40, 0x7E];

const XL_FS: XlFullScale = XlFullScale::G4;
const GY_FS: GyFullScale = GyFullScale::Dps2000;

/// Accelerometer user-offset correction, read in polling mode.
///
/// The offsets in [`USER_OFFSET`] are subtracted from the accelerometer
/// output by the device itself. Output runs through LPF1 and LPF2 with
/// the cutoff at ODR/100.
pub struct Lsm6dso32xOffset<SI, W> {
    sensor: Lsm6dso32x<SI>,
    console: Console<W>,
}

impl<SI, W> Lsm6dso32xOffset<SI, W> {
    pub fn new(sensor: Lsm6dso32x<SI>, console: Console<W>) -> Self {
        Self { sensor, console }
    }

    pub fn free(self) -> (Lsm6dso32x<SI>, Console<W>) {
        (self.sensor, self.console)
    }
}

impl<SI, SE, W> Lsm6dso32xOffset<SI, W>
where
    SI: SensorInterface<InterfaceError = SE>,
    SE: core::fmt::Debug,
    W: Write,
{
    pub fn setup(&mut self, delay_source: &mut impl DelayMs) -> Result<(), Error<SE>> {
        delay_source.delay_ms(BOOT_TIME_MS);
        self.sensor.check_device_id()?;

        self.sensor.reset_set(true)?;
        let sensor = &mut self.sensor;
        wait_reset_done(delay_source, || sensor.reset_get())?;

        self.sensor.i3c_disable_set(I3cMode::Disable)?;
        self.sensor.block_data_update_set(true)?;

        self.sensor.xl_offset_weight_set(OffsetWeight::Lsb1mg)?;
        self.sensor.xl_usr_offset_x_set(USER_OFFSET[0])?;
        self.sensor.xl_usr_offset_y_set(USER_OFFSET[1])?;
        self.sensor.xl_usr_offset_z_set(USER_OFFSET[2])?;
        self.sensor.xl_usr_offset_set(true)?;

        self.sensor.xl_data_rate_set(XlOdr::Hz12_5)?;
        self.sensor.gy_data_rate_set(GyOdr::Hz12_5)?;
        self.sensor.xl_full_scale_set(XL_FS)?;
        self.sensor.gy_full_scale_set(GY_FS)?;

        self.sensor.xl_hp_path_on_out_set(HpSlopeXlEn::LpOdrDiv100)?;
        self.sensor.xl_filter_lp2_set(true)?;
        info!(
            "lsm6dso32x configured: offsets {:?} mg",
            USER_OFFSET.map(|o| OffsetWeight::Lsb1mg.to_mg(o))
        );
        Ok(())
    }

    /// Poll the status flags once and print every channel that is ready
    pub fn step(&mut self) -> Result<bool, Error<SE>> {
        let mut ready = false;

        if self.sensor.xl_flag_data_ready()? {
            let raw = self.sensor.acceleration_raw()?;
            self.console.acceleration_mg([
                XL_FS.to_mg(raw[0]),
                XL_FS.to_mg(raw[1]),
                XL_FS.to_mg(raw[2]),
            ])?;
            ready = true;
        }

        if self.sensor.gy_flag_data_ready()? {
            let raw = self.sensor.angular_rate_raw()?;
            self.console.angular_rate_mdps([
                GY_FS.to_mdps(raw[0]),
                GY_FS.to_mdps(raw[1]),
                GY_FS.to_mdps(raw[2]),
            ])?;
            ready = true;
        }

        if self.sensor.temp_flag_data_ready()? {
            let raw = self.sensor.temperature_raw()?;
            self.console.temperature_degc(from_lsb_to_celsius(raw))?;
            ready = true;
        }
        Ok(ready)
    }

    pub fn run(&mut self, limit: Option<usize>) -> Result<usize, Error<SE>> {
        let handled = super::run_loop(limit, || self.step())?;
        debug!("handled {} samples", handled);
        Ok(handled)
    }
}

/// Register file of an LSM6DSO32X with all three channels ready
pub fn simulated_lsm6dso32x() -> MockRegisters {
    let mut regs = MockRegisters::new();
    regs.set_register(WHO_AM_I, LSM6DSO32X_ID);
    regs.self_clearing(CTRL3_C, SW_RESET | BOOT);
    regs.set_register(STATUS_REG, XLDA | GDA | TDA);
    // -256 -> 24 degC
    regs.set_registers(OUT_TEMP_L, &[0x00, 0xFF]);
    // 1, 0, -2
    regs.set_registers(OUTX_L_G, &[0x01, 0x00, 0x00, 0x00, 0xFE, 0xFF]);
    // 384, 512, 8196
    regs.set_registers(OUTX_L_A, &[0x80, 0x01, 0x00, 0x02, 0x04, 0x20]);
    regs
}
