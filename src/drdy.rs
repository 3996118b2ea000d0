// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Data-ready signalling between an interrupt source and the main loop.
//!
//! The producer side (a GPIO edge watcher, or a fixed-rate ticker for
//! simulated runs) calls [`DrdyFlag::signal`]; the main loop consumes the
//! event with [`DrdyFlag::take`]. Several signals arriving before the main
//! loop gets to them collapse into one, the same way a latched interrupt
//! line behaves.

use crate::interface::gpio::{GpiodIn, InputPin, LineRef};
use log::{debug, warn};
use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

/// Sampling period of a watched interrupt line. Well below the shortest
/// sample interval of the demos, so no latched edge is missed.
pub const LINE_SAMPLE_PERIOD: Duration = Duration::from_micros(250);

/// One-bit data-ready event shared between a producer and the main loop
#[derive(Debug, Clone, Default)]
pub struct DrdyFlag {
    pending: Arc<AtomicBool>,
    fault: Arc<Mutex<Option<(io::ErrorKind, String)>>>,
}

impl DrdyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a new sample as available
    pub fn signal(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the pending event, returning whether there was one
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Record that the producer stopped on `e` and will not signal again
    pub fn fail(&self, e: &io::Error) {
        let mut fault = self.fault.lock().unwrap_or_else(PoisonError::into_inner);
        *fault = Some((e.kind(), e.to_string()));
    }

    /// Fails once the producer has died
    pub fn check(&self) -> io::Result<()> {
        let fault = self.fault.lock().unwrap_or_else(PoisonError::into_inner);
        match &*fault {
            Some((kind, msg)) => Err(io::Error::new(*kind, msg.clone())),
            None => Ok(()),
        }
    }
}

/// Background thread that raises a [`DrdyFlag`].
///
/// Dropping the handle stops the thread and joins it.
pub struct DrdySource {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DrdySource {
    /// Signal `flag` on every rising edge of the interrupt `line`
    pub fn gpio(line: &LineRef, flag: DrdyFlag) -> io::Result<DrdySource> {
        let pin = GpiodIn::new(line)?;
        debug!(
            "watching {}:{} for data-ready edges",
            line.chip.display(),
            line.offset
        );
        DrdySource::watch(pin, LINE_SAMPLE_PERIOD, flag)
    }

    /// Sample `pin` every `period` and signal `flag` on each low to high
    /// transition. A pin that is already high on the first sample counts
    /// as one transition, since a latched line will not produce another.
    ///
    /// A read error is recorded on `flag` and ends the watcher.
    pub fn watch<P>(pin: P, period: Duration, flag: DrdyFlag) -> io::Result<DrdySource>
    where
        P: InputPin<Error = io::Error> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("drdy-gpio".into())
            .spawn(move || {
                let mut was_high = false;
                while !thread_stop.load(Ordering::Acquire) {
                    match pin.is_high() {
                        Ok(high) => {
                            if high && !was_high {
                                flag.signal();
                            }
                            was_high = high;
                        }
                        Err(e) => {
                            warn!("data-ready line read failed: {}", e);
                            flag.fail(&e);
                            break;
                        }
                    }
                    thread::sleep(period);
                }
            })?;

        Ok(DrdySource {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal `flag` every `period`, standing in for a sensor interrupt
    pub fn ticker(period: Duration, flag: DrdyFlag) -> io::Result<DrdySource> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("drdy-ticker".into())
            .spawn(move || {
                while !thread_stop.load(Ordering::Acquire) {
                    thread::sleep(period);
                    flag.signal();
                }
            })?;

        Ok(DrdySource {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for DrdySource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("data-ready thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::ErrorKind,
        sync::atomic::AtomicUsize,
        time::Instant,
    };

    /// Interrupt line whose level and health the test controls
    #[derive(Clone, Default)]
    struct TestLine {
        level: Arc<AtomicBool>,
        broken: Arc<AtomicBool>,
        reads: Arc<AtomicUsize>,
    }

    impl TestLine {
        fn set(&self, high: bool) {
            self.level.store(high, Ordering::Release);
        }
    }

    impl InputPin for TestLine {
        type Error = io::Error;

        fn is_high(&self) -> io::Result<bool> {
            self.reads.fetch_add(1, Ordering::AcqRel);
            if self.broken.load(Ordering::Acquire) {
                return Err(io::Error::new(ErrorKind::BrokenPipe, "line released"));
            }
            Ok(self.level.load(Ordering::Acquire))
        }
    }

    const PERIOD: Duration = Duration::from_millis(1);

    fn wait_for(what: &str, mut cond: impl FnMut() -> bool) {
        let start = Instant::now();
        while !cond() {
            assert!(start.elapsed() < Duration::from_secs(2), "{} never happened", what);
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn take_consumes_once() {
        let flag = DrdyFlag::new();
        assert!(!flag.take());

        flag.signal();
        flag.signal();
        assert!(flag.is_pending());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn clones_share_state() {
        let flag = DrdyFlag::new();
        let handler = flag.clone();
        handler.signal();
        assert!(flag.take());
        assert!(!handler.is_pending());
    }

    #[test]
    fn line_high_at_start_signals_once() {
        let line = TestLine::default();
        line.set(true);
        let flag = DrdyFlag::new();
        let _source = DrdySource::watch(line.clone(), PERIOD, flag.clone()).unwrap();

        wait_for("first signal", || flag.take());
        // held high, no further edge
        let reads = line.reads.load(Ordering::Acquire);
        wait_for("more samples", || line.reads.load(Ordering::Acquire) > reads + 5);
        assert!(!flag.is_pending());

        line.set(false);
        let reads = line.reads.load(Ordering::Acquire);
        wait_for("low sample", || line.reads.load(Ordering::Acquire) > reads + 2);
        line.set(true);
        wait_for("second signal", || flag.take());
    }

    #[test]
    fn dropped_watcher_stops_sampling() {
        let line = TestLine::default();
        let flag = DrdyFlag::new();
        let source = DrdySource::watch(line.clone(), PERIOD, flag.clone()).unwrap();
        wait_for("first sample", || line.reads.load(Ordering::Acquire) > 0);
        drop(source);

        let reads = line.reads.load(Ordering::Acquire);
        line.set(true);
        thread::sleep(Duration::from_millis(10));
        assert_eq!(line.reads.load(Ordering::Acquire), reads);
        assert!(!flag.is_pending());
    }

    #[test]
    fn watcher_read_failure_is_reported() {
        let line = TestLine::default();
        line.broken.store(true, Ordering::Release);
        let flag = DrdyFlag::new();
        let _source = DrdySource::watch(line, PERIOD, flag.clone()).unwrap();

        wait_for("fault", || flag.check().is_err());
        let err = flag.check().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
        assert!(!flag.take());
    }

    #[test]
    fn ticker_signals_and_stops() {
        let flag = DrdyFlag::new();
        let source = DrdySource::ticker(Duration::from_millis(2), flag.clone()).unwrap();

        let start = Instant::now();
        while !flag.take() {
            assert!(start.elapsed() < Duration::from_secs(2), "ticker never fired");
            thread::sleep(Duration::from_millis(1));
        }
        drop(source);

        // after the join no producer is left
        flag.take();
        thread::sleep(Duration::from_millis(10));
        assert!(!flag.is_pending());
    }
}
