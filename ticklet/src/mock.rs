//! Recording test doubles for pins, indicators and delays.

use std::{cell::RefCell, mem, rc::Rc, vec::Vec};

use embedded_hal::{
    delay::DelayNs,
    digital::{Error, ErrorKind, ErrorType, OutputPin, PinState, StatefulOutputPin},
};

use crate::{Indicators, LedState, OutputLine};

/// Something that happened to the hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Pin(OutputLine, PinState),
    Led(OutputLine, LedState),
    Delay(u32),
}

/// Ordered record of [`Op`]s shared by all doubles of a test.
#[derive(Clone, Debug, Default)]
pub struct Journal(Rc<RefCell<Vec<Op>>>);

impl Journal {
    pub fn push(&self, op: Op) {
        self.0.borrow_mut().push(op);
    }

    pub fn take(&self) -> Vec<Op> {
        mem::take(&mut *self.0.borrow_mut())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockError;

impl Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug)]
pub struct MockPin {
    line: OutputLine,
    journal: Journal,
    level: PinState,
    /// Remaining successful writes, unlimited if `None`.
    writes_left: Option<usize>,
}

impl MockPin {
    pub fn new(line: OutputLine, journal: &Journal) -> Self {
        Self {
            line,
            journal: journal.clone(),
            level: PinState::Low,
            writes_left: None,
        }
    }

    pub fn failing(self) -> Self {
        self.failing_after(0)
    }

    pub fn failing_after(mut self, writes: usize) -> Self {
        self.writes_left = Some(writes);
        self
    }

    fn write(&mut self, level: PinState) -> Result<(), MockError> {
        if let Some(left) = &mut self.writes_left {
            if *left == 0 {
                return Err(MockError);
            }
            *left -= 1;
        }

        self.level = level;
        self.journal.push(Op::Pin(self.line, level));
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = MockError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High)
    }
}

impl StatefulOutputPin for MockPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level == PinState::High)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level == PinState::Low)
    }
}

#[derive(Debug)]
pub struct MockLeds {
    journal: Journal,
    fail: bool,
}

impl MockLeds {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Indicators for MockLeds {
    type Error = MockError;

    fn set(&mut self, line: OutputLine, state: LedState) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockError);
        }

        self.journal.push(Op::Led(line, state));
        Ok(())
    }
}

/// Records delays instead of sleeping.
#[derive(Debug)]
pub struct MockDelay(Journal);

impl MockDelay {
    pub fn new(journal: &Journal) -> Self {
        Self(journal.clone())
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.push(Op::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.push(Op::Delay(ms));
    }
}
