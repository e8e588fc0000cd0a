//! Simulated pins, LEDs and a wall clock delay.

use std::{
    cell::RefCell,
    convert::Infallible,
    rc::Rc,
    thread,
    time::{Duration, Instant},
};

use embedded_hal::{
    delay::DelayNs,
    digital::{Error, ErrorKind, ErrorType, OutputPin, PinState, StatefulOutputPin},
};
use ticklet::{Indicators, LedState, OutputLine};

/// A change observed on the simulated hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Pin(OutputLine, PinState),
    Led(OutputLine, LedState),
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub at: Instant,
    pub change: Change,
}

/// Time ordered record of every [`Change`], shared by all simulated parts.
///
/// A default timeline discards everything; only one created through [`Timeline::recording`]
/// keeps entries.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    entries: Rc<RefCell<Vec<Entry>>>,
    recording: bool,
}

impl Timeline {
    #[must_use]
    pub fn recording() -> Self {
        Self {
            entries: Rc::default(),
            recording: true,
        }
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    fn record(&self, change: Change) {
        if !self.recording {
            return;
        }

        self.entries.borrow_mut().push(Entry {
            at: Instant::now(),
            change,
        });
    }

    #[must_use]
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Returns when `change` was first seen.
    #[must_use]
    pub fn first(&self, change: Change) -> Option<Instant> {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.change == change)
            .map(|e| e.at)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InjectedFault;

impl Error for InjectedFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Simulated output line.
#[derive(Debug)]
pub struct SimPin {
    line: OutputLine,
    level: PinState,
    timeline: Timeline,
    faulty: bool,
    configured: bool,
}

impl SimPin {
    #[must_use]
    pub fn new(line: OutputLine, timeline: &Timeline) -> Self {
        Self {
            line,
            level: PinState::Low,
            timeline: timeline.clone(),
            faulty: false,
            configured: false,
        }
    }

    /// Makes every write fail once the line has been configured.
    #[must_use]
    pub fn faulty(mut self) -> Self {
        self.faulty = true;
        self
    }

    fn write(&mut self, level: PinState) -> Result<(), InjectedFault> {
        if self.faulty && self.configured {
            tracing::debug!(line = %self.line, ?level, "injected write failure");
            return Err(InjectedFault);
        }

        self.configured = true;
        self.level = level;
        self.timeline.record(Change::Pin(self.line, level));
        tracing::debug!(line = %self.line, ?level, "line level changed");
        Ok(())
    }
}

impl ErrorType for SimPin {
    type Error = InjectedFault;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High)
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level == PinState::High)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level == PinState::Low)
    }
}

/// Simulated indicator LEDs.
#[derive(Debug)]
pub struct SimLeds(Timeline);

impl SimLeds {
    #[must_use]
    pub fn new(timeline: &Timeline) -> Self {
        Self(timeline.clone())
    }
}

impl Indicators for SimLeds {
    type Error = Infallible;

    fn set(&mut self, line: OutputLine, state: LedState) -> Result<(), Self::Error> {
        self.0.record(Change::Led(line, state));
        tracing::debug!(%line, %state, "indicator changed");
        Ok(())
    }
}

/// Blocking delay backed by [`thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
