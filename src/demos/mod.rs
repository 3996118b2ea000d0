// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Bring-up programs for each supported sensor.
//!
//! Every demo owns its driver and a [`Console`](crate::console::Console).
//! `setup` runs the one-time configuration sequence (boot wait, identity
//! check, reset, output configuration) and `step` handles at most one
//! data event. `run` loops over `step` until `limit` events were handled,
//! or forever when no limit is given.

mod iis2dulpx_read_data_drdy;
mod lsm6dso16is_read_data_drdy;
mod lsm6dso32x_offset;

pub use iis2dulpx_read_data_drdy::{simulated_iis2dulpx, Iis2dulpxReadDataDrdy};
pub use lsm6dso16is_read_data_drdy::{simulated_lsm6dso16is, Lsm6dso16isReadDataDrdy};
pub use lsm6dso32x_offset::{simulated_lsm6dso32x, Lsm6dso32xOffset, USER_OFFSET};

use crate::board::Sensor;
use std::{fmt, str::FromStr, thread, time::Duration};

/// Sleep between two checks of an idle data-ready source
pub const IDLE_POLL: Duration = Duration::from_millis(1);

/// Period of the simulated data-ready interrupt on the mock bus (12.5 Hz)
pub const SIMULATED_DRDY_PERIOD: Duration = Duration::from_millis(80);

/// Available demo programs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Iis2dulpxReadDataDrdy,
    Lsm6dso16isReadDataDrdy,
    Lsm6dso32xOffset,
}

impl Demo {
    pub const ALL: [Demo; 3] = [
        Demo::Iis2dulpxReadDataDrdy,
        Demo::Lsm6dso16isReadDataDrdy,
        Demo::Lsm6dso32xOffset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Demo::Iis2dulpxReadDataDrdy => "iis2dulpx_read_data_drdy",
            Demo::Lsm6dso16isReadDataDrdy => "lsm6dso16is_read_data_drdy",
            Demo::Lsm6dso32xOffset => "lsm6dso32x_offset",
        }
    }

    pub fn sensor(self) -> Sensor {
        match self {
            Demo::Iis2dulpxReadDataDrdy => Sensor::Iis2dulpx,
            Demo::Lsm6dso16isReadDataDrdy => Sensor::Lsm6dso16is,
            Demo::Lsm6dso32xOffset => Sensor::Lsm6dso32x,
        }
    }

    /// Whether the demo waits for a data-ready interrupt instead of polling
    pub fn uses_drdy(self) -> bool {
        !matches!(self, Demo::Lsm6dso32xOffset)
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Demo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Demo::ALL
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown demo '{}'", s))
    }
}

/// Drive `step` until `limit` events were handled.
///
/// `step` returns whether it handled an event. Idle iterations sleep for
/// [`IDLE_POLL`] so a quiet sensor does not spin a core.
pub(crate) fn run_loop<E, F>(limit: Option<usize>, mut step: F) -> Result<usize, E>
where
    F: FnMut() -> Result<bool, E>,
{
    let mut handled = 0;
    while limit.map_or(true, |n| handled < n) {
        if step()? {
            handled += 1;
        } else {
            thread::sleep(IDLE_POLL);
        }
    }
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_names_parse() {
        for demo in Demo::ALL {
            assert_eq!(demo.name().parse::<Demo>(), Ok(demo));
        }
        assert!("lsm6dso32x_fifo".parse::<Demo>().is_err());
    }

    #[test]
    fn run_loop_counts_only_handled_events() {
        let mut calls = 0;
        let handled = run_loop::<(), _>(Some(2), || {
            calls += 1;
            Ok(calls % 2 == 0)
        })
        .unwrap();
        assert_eq!(handled, 2);
        assert_eq!(calls, 4);
    }

    #[test]
    fn run_loop_stops_on_error() {
        let res = run_loop(None, || Err::<bool, _>("bus fault"));
        assert_eq!(res, Err("bus fault"));
    }
}
