use gpiod::{Chip, Input, Lines, Options};
use log::trace;
use std::io::{self, Error, ErrorKind};
use std::path::PathBuf;

const CONSUMER: &str = "st-mems";

pub trait InputPin {
    /// Error type
    type Error;

    /// Is the input pin high?
    fn is_high(&self) -> Result<bool, Self::Error>;
}

/// Location of a GPIO line on the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    pub chip: PathBuf,
    pub offset: u32,
}

impl LineRef {
    pub fn new(chip: impl Into<PathBuf>, offset: u32) -> Self {
        Self {
            chip: chip.into(),
            offset,
        }
    }

    /// Search every gpiochip on the system for a line named `name`
    pub fn find(name: &str) -> io::Result<LineRef> {
        for entry in Chip::list_devices()? {
            let chip = Chip::new(&entry)?;
            for i in 0..chip.num_lines() {
                let info = chip.line_info(i)?;
                trace!("--- {} ---", info.name);
                if info.name == name {
                    return Ok(LineRef::new(entry, i));
                }
            }
        }
        Err(Error::new(
            ErrorKind::AddrNotAvailable,
            format!("Did not find gpio line \"{}\"", name),
        ))
    }
}

/// Input line, read by level
pub struct GpiodIn {
    input: Lines<Input>,
}

impl GpiodIn {
    pub fn new(line: &LineRef) -> io::Result<GpiodIn> {
        let chip = Chip::new(&line.chip)?;
        let opts = Options::input([line.offset]).consumer(CONSUMER);

        Ok(GpiodIn {
            input: chip.request_lines(opts)?,
        })
    }
}

impl InputPin for GpiodIn {
    type Error = io::Error;

    /// Is the input pin high?
    fn is_high(&self) -> Result<bool, Self::Error> {
        let values = self.input.get_values([false])?;
        Ok(values[0])
    }
}
