// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    board::BOOT_TIME_MS,
    console::Console,
    drdy::DrdyFlag,
    iis2dulpx::{
        constants::{
            BOOT, CTRL1, CTRL4, DRDY, OUT_T_AH_QVAR_L, OUT_X_L, SOC, STATUS, SW_RESET, WHO_AM_I,
        },
        Bw, Fs, Iis2dulpx, Init, Mode, Odr, PinIntRoute, IIS2DULPX_ID,
    },
    interface::{delay::DelayMs, mock::MockRegisters, SensorInterface},
    wait_reset_done, Error,
};
use log::{debug, info};
use std::io::Write;

/// Accelerometer and temperature read on every data-ready interrupt.
///
/// The sensor runs at 25 Hz low-power, ±4 g, with the anti-aliasing
/// bandwidth at ODR/4, and signals new samples on INT1.
pub struct Iis2dulpxReadDataDrdy<SI, W> {
    sensor: Iis2dulpx<SI>,
    console: Console<W>,
    drdy: DrdyFlag,
    mode: Mode,
}

impl<SI, W> Iis2dulpxReadDataDrdy<SI, W> {
    pub fn new(sensor: Iis2dulpx<SI>, console: Console<W>, drdy: DrdyFlag) -> Self {
        Self {
            sensor,
            console,
            drdy,
            mode: Mode {
                odr: Odr::At25HzLp,
                fs: Fs::G4,
                bw: Bw::OdrDiv4,
            },
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn free(self) -> (Iis2dulpx<SI>, Console<W>) {
        (self.sensor, self.console)
    }
}

impl<SI, SE, W> Iis2dulpxReadDataDrdy<SI, W>
where
    SI: SensorInterface<InterfaceError = SE>,
    SE: core::fmt::Debug,
    W: Write,
{
    pub fn setup(&mut self, delay_source: &mut impl DelayMs) -> Result<(), Error<SE>> {
        delay_source.delay_ms(BOOT_TIME_MS);
        self.sensor.exit_deep_power_down(delay_source)?;
        self.sensor.check_device_id()?;

        self.sensor.init_set(Init::Reset)?;
        let sensor = &mut self.sensor;
        wait_reset_done(delay_source, || Ok(sensor.status()?.sw_reset))?;

        self.sensor.init_set(Init::SensorOnlyOn)?;
        self.sensor.pin_int1_route_set(PinIntRoute {
            drdy: true,
            ..Default::default()
        })?;
        self.sensor.mode_set(&self.mode)?;
        info!("iis2dulpx configured: {:?}", self.mode);
        Ok(())
    }

    /// Print one acceleration and temperature sample if an interrupt came in
    pub fn step(&mut self) -> Result<bool, Error<SE>> {
        self.drdy.check()?;
        if !self.drdy.take() {
            return Ok(false);
        }
        let xl = self.sensor.xl_data_get(&self.mode)?;
        self.console.acceleration_mg(xl.mg)?;

        let temp = self.sensor.outt_data_get()?;
        self.console.temp_degc(temp.deg_c)?;
        Ok(true)
    }

    pub fn run(&mut self, limit: Option<usize>) -> Result<usize, Error<SE>> {
        let handled = super::run_loop(limit, || self.step())?;
        debug!("handled {} data-ready events", handled);
        Ok(handled)
    }
}

/// Register file of an IIS2DULPX that always has a fresh sample
pub fn simulated_iis2dulpx() -> MockRegisters {
    let mut regs = MockRegisters::new();
    regs.set_register(WHO_AM_I, IIS2DULPX_ID);
    regs.self_clearing(CTRL1, SW_RESET);
    regs.self_clearing(CTRL4, BOOT | SOC);
    regs.set_register(STATUS, DRDY);
    // 120, -85, 8190
    regs.set_registers(OUT_X_L, &[0x78, 0x00, 0xAB, 0xFF, 0xFE, 0x1F]);
    // 180 in the upper 12 bits
    regs.set_registers(OUT_T_AH_QVAR_L, &[0x40, 0x0B]);
    regs
}
