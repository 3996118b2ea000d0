// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use log::{info, warn};
use st_mems::{
    board::{Board, BusKind},
    console::Console,
    demos::{
        simulated_iis2dulpx, simulated_lsm6dso16is, simulated_lsm6dso32x, Demo,
        Iis2dulpxReadDataDrdy, Lsm6dso16isReadDataDrdy, Lsm6dso32xOffset, SIMULATED_DRDY_PERIOD,
    },
    drdy::{DrdyFlag, DrdySource},
    iis2dulpx::Iis2dulpx,
    interface::{
        delay::{DelayMs, TimerMs},
        gpio::LineRef,
        spidev::DEFAULT_SPI_SPEED_HZ,
        SensorInterface,
    },
    lsm6dso16is::Lsm6dso16is,
    lsm6dso32x::Lsm6dso32x,
    Error,
};
use std::{
    fmt::Debug,
    io::{self, ErrorKind, Write},
    path::PathBuf,
};

/// Samples printed by a polling demo on the mock bus when no limit is given
const MOCK_POLL_SAMPLES: usize = 10;

type HostConsole = Console<Box<dyn Write + Send>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "ST MEMS sensor bring-up demos", long_about = None)]
struct Args {
    /// iis2dulpx_read_data_drdy, lsm6dso16is_read_data_drdy or lsm6dso32x_offset
    demo: Demo,

    /// Evaluation board: steval-mki109v3, nucleo-f401re or spc584b-dis
    #[arg(long, default_value = "nucleo-f401re")]
    board: Board,

    /// Sensor bus: spi, i2c or mock (defaults to the board's bus)
    #[arg(long)]
    bus: Option<BusKind>,

    #[arg(long, default_value = "/dev/spidev0.0")]
    spidev: String,

    #[arg(long, default_value_t = DEFAULT_SPI_SPEED_HZ)]
    spi_speed: u32,

    #[arg(long, default_value = "/dev/i2c-1")]
    i2c: String,

    /// Use the SA0-high I2C address
    #[arg(long)]
    sa0_high: bool,

    /// Name of the GPIO line wired to the sensor INT1 pin
    #[arg(long, conflicts_with_all = ["drdy_chip", "drdy_line"])]
    drdy_pin: Option<String>,

    #[arg(long, requires = "drdy_line")]
    drdy_chip: Option<PathBuf>,

    #[arg(long, requires = "drdy_chip")]
    drdy_line: Option<u32>,

    /// Serial device for the measurement lines (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop after this many data events
    #[arg(short = 'n', long)]
    samples: Option<usize>,
}

fn to_io<E: Debug>(e: Error<E>) -> io::Error {
    match e {
        Error::Output(e) => e,
        other => io::Error::new(ErrorKind::Other, other.to_string()),
    }
}

fn drdy_source(args: &Args, bus: BusKind, flag: DrdyFlag) -> io::Result<DrdySource> {
    if bus == BusKind::Mock {
        return DrdySource::ticker(SIMULATED_DRDY_PERIOD, flag);
    }
    let line = match (&args.drdy_pin, &args.drdy_chip, args.drdy_line) {
        (Some(name), _, _) => LineRef::find(name)?,
        (None, Some(chip), Some(offset)) => LineRef::new(chip, offset),
        _ => {
            warn!(
                "no data-ready line configured, sampling every {:?}",
                SIMULATED_DRDY_PERIOD
            );
            return DrdySource::ticker(SIMULATED_DRDY_PERIOD, flag);
        }
    };
    DrdySource::gpio(&line, flag)
}

fn run_iis2dulpx<SI, SE>(
    sensor: Iis2dulpx<SI>,
    console: HostConsole,
    drdy: DrdyFlag,
    limit: Option<usize>,
) -> io::Result<()>
where
    SI: SensorInterface<InterfaceError = SE>,
    SE: Debug,
{
    let mut delay_source = TimerMs {};
    let mut demo = Iis2dulpxReadDataDrdy::new(sensor, console, drdy);
    demo.setup(&mut delay_source).map_err(to_io)?;
    demo.run(limit).map_err(to_io)?;
    Ok(())
}

fn run_lsm6dso16is<SI, SE>(
    sensor: Lsm6dso16is<SI>,
    console: HostConsole,
    drdy: DrdyFlag,
    limit: Option<usize>,
) -> io::Result<()>
where
    SI: SensorInterface<InterfaceError = SE>,
    SE: Debug,
{
    let mut delay_source = TimerMs {};
    let mut demo = Lsm6dso16isReadDataDrdy::new(sensor, console, drdy);
    demo.setup(&mut delay_source).map_err(to_io)?;
    demo.run(limit).map_err(to_io)?;
    Ok(())
}

fn run_lsm6dso32x<SI, SE>(
    sensor: Lsm6dso32x<SI>,
    console: HostConsole,
    limit: Option<usize>,
) -> io::Result<()>
where
    SI: SensorInterface<InterfaceError = SE>,
    SE: Debug,
{
    let mut delay_source = TimerMs {};
    let mut demo = Lsm6dso32xOffset::new(sensor, console);
    demo.setup(&mut delay_source).map_err(to_io)?;
    demo.run(limit).map_err(to_io)?;
    Ok(())
}

/// Bus, I2C address and sample limit after applying board defaults
fn resolve(args: &Args) -> (BusKind, u8, Option<usize>) {
    let bus = args.bus.unwrap_or_else(|| args.board.default_bus());
    let sensor = args.demo.sensor();
    let address = if args.sa0_high {
        sensor.i2c_address(true)
    } else {
        args.board.i2c_address(sensor)
    };
    let limit = match (args.samples, bus) {
        (Some(n), _) => Some(n),
        (None, BusKind::Mock) if !args.demo.uses_drdy() => Some(MOCK_POLL_SAMPLES),
        (None, _) => None,
    };
    (bus, address, limit)
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let board = args.board;
    let (bus, address, limit) = resolve(&args);
    info!(
        "{} on {} over {:?} (i2c 0x{:02X}), host link {}",
        args.demo,
        board,
        bus,
        address,
        board.host_link()
    );

    let console = match &args.output {
        Some(path) => Console::serial(path)?,
        None => Console::stdout(),
    };

    if bus != BusKind::Mock {
        TimerMs {}.delay_ms(board.power_up_delay_ms());
    }

    let drdy = DrdyFlag::new();
    let _drdy_source = if args.demo.uses_drdy() {
        Some(drdy_source(&args, bus, drdy.clone())?)
    } else {
        None
    };

    match (args.demo, bus) {
        (Demo::Iis2dulpxReadDataDrdy, BusKind::Spi) => run_iis2dulpx(
            Iis2dulpx::new_spi(&args.spidev, args.spi_speed)?,
            console,
            drdy,
            limit,
        ),
        (Demo::Iis2dulpxReadDataDrdy, BusKind::I2c) => run_iis2dulpx(
            Iis2dulpx::new_i2c(&args.i2c, address)?,
            console,
            drdy,
            limit,
        ),
        (Demo::Iis2dulpxReadDataDrdy, BusKind::Mock) => run_iis2dulpx(
            Iis2dulpx::new_with_interface(simulated_iis2dulpx()),
            console,
            drdy,
            limit,
        ),
        (Demo::Lsm6dso16isReadDataDrdy, BusKind::Spi) => run_lsm6dso16is(
            Lsm6dso16is::new_spi(&args.spidev, args.spi_speed)?,
            console,
            drdy,
            limit,
        ),
        (Demo::Lsm6dso16isReadDataDrdy, BusKind::I2c) => run_lsm6dso16is(
            Lsm6dso16is::new_i2c(&args.i2c, address)?,
            console,
            drdy,
            limit,
        ),
        (Demo::Lsm6dso16isReadDataDrdy, BusKind::Mock) => run_lsm6dso16is(
            Lsm6dso16is::new_with_interface(simulated_lsm6dso16is()),
            console,
            drdy,
            limit,
        ),
        (Demo::Lsm6dso32xOffset, BusKind::Spi) => run_lsm6dso32x(
            Lsm6dso32x::new_spi(&args.spidev, args.spi_speed)?,
            console,
            limit,
        ),
        (Demo::Lsm6dso32xOffset, BusKind::I2c) => {
            run_lsm6dso32x(Lsm6dso32x::new_i2c(&args.i2c, address)?, console, limit)
        }
        (Demo::Lsm6dso32xOffset, BusKind::Mock) => run_lsm6dso32x(
            Lsm6dso32x::new_with_interface(simulated_lsm6dso32x()),
            console,
            limit,
        ),
    }
}
