use embedded_hal::{
    delay::DelayNs,
    digital::{Error as _, ErrorKind, OutputPin},
};
use thiserror::Error as ThisError;

use crate::{Edge, Indicators, Key, LedState, OutputLine, OutputLines};

/// Time the target needs to observe a line change, in milliseconds.
pub const SETTLE_DELAY_MS: u32 = 200;

/// Timed output sequences, one per [`Key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
    /// Boot-select reset.
    ///
    /// Press holds BOOT. Release pulses RESET for [`SETTLE_DELAY_MS`], waits as long again and only
    /// then lets go of BOOT, so the target latches the boot mode while coming out of reset.
    AlternateReset,
    /// Plain reset.
    ///
    /// Press holds RESET. Release waits [`SETTLE_DELAY_MS`] and lets go of RESET.
    NormalReset,
}

impl Action {
    #[inline]
    #[must_use]
    pub const fn key(self) -> Key {
        match self {
            Self::AlternateReset => Key::K1,
            Self::NormalReset => Key::K2,
        }
    }

    /// Runs the sequence for `edge` to completion, blocking through its delays.
    ///
    /// Output writes are best-effort: a failed write does not stop the remaining steps, so lines
    /// asserted earlier still get deasserted. Indicator failures are only counted.
    ///
    /// # Errors
    ///
    /// Returns the first failed output write, once the whole sequence has run.
    pub fn run<P, I, D>(
        self,
        edge: Edge,
        outputs: &mut OutputLines<P>,
        indicators: &mut I,
        delay: &mut D,
    ) -> Result<Handled, SequenceError>
    where
        P: OutputPin,
        I: Indicators,
        D: DelayNs,
    {
        let mut seq = Sequencer {
            action: self,
            edge,
            outputs,
            indicators,
            delay,
            error: None,
            indicator_faults: 0,
        };

        match (self, edge) {
            (Self::AlternateReset, Edge::Pressed) => {
                seq.assert(OutputLine::Boot);
            }
            (Self::AlternateReset, Edge::Released) => {
                seq.assert(OutputLine::Reset);
                seq.settle();
                seq.deassert(OutputLine::Reset);
                seq.settle();
                seq.deassert(OutputLine::Boot);
            }
            (Self::NormalReset, Edge::Pressed) => {
                seq.assert(OutputLine::Reset);
            }
            (Self::NormalReset, Edge::Released) => {
                seq.settle();
                seq.deassert(OutputLine::Reset);
            }
        }

        seq.finish()
    }
}

/// Outcome of a sequence that ran without output failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handled {
    pub action: Action,
    pub edge: Edge,
    /// Number of indicator writes that failed. Never fatal.
    pub indicator_faults: u8,
}

impl Handled {
    #[inline]
    #[must_use]
    pub fn key(&self) -> Key {
        self.action.key()
    }

    /// Operator facing description of what just happened.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match (self.action, self.edge) {
            (Action::AlternateReset, Edge::Pressed) => "Holding boot pin...",
            (Action::AlternateReset, Edge::Released) => "Issued alternate reset",
            (Action::NormalReset, Edge::Pressed) => "Holding reset pin...",
            (Action::NormalReset, Edge::Released) => "Issued normal reset",
        }
    }
}

/// Operation on an output line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LineOp {
    Assert,
    Deassert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("{action} ({edge}): failed to {op} {line} line: {kind:?}")]
pub struct SequenceError {
    pub action: Action,
    pub edge: Edge,
    pub line: OutputLine,
    pub op: LineOp,
    pub kind: ErrorKind,
}

/// Issues the steps of a single sequence, keeping track of failures along the way.
struct Sequencer<'a, P, I, D> {
    action: Action,
    edge: Edge,
    outputs: &'a mut OutputLines<P>,
    indicators: &'a mut I,
    delay: &'a mut D,
    error: Option<SequenceError>,
    indicator_faults: u8,
}

impl<P, I, D> Sequencer<'_, P, I, D>
where
    P: OutputPin,
    I: Indicators,
    D: DelayNs,
{
    /// Asserts the line and lights its indicator.
    fn assert(&mut self, line: OutputLine) {
        let res = self.outputs.assert(line);
        self.record(line, LineOp::Assert, res);
        self.indicate(line, LedState::from(true));
    }

    /// Deasserts the line and turns its indicator off.
    fn deassert(&mut self, line: OutputLine) {
        let res = self.outputs.deassert(line);
        self.record(line, LineOp::Deassert, res);
        self.indicate(line, LedState::from(false));
    }

    #[inline]
    fn settle(&mut self) {
        self.delay.delay_ms(SETTLE_DELAY_MS);
    }

    // The indicator mirrors the write that was issued, whether or not it went through.
    fn indicate(&mut self, line: OutputLine, state: LedState) {
        if self.indicators.set(line, state).is_err() {
            self.indicator_faults = self.indicator_faults.saturating_add(1);
        }
    }

    fn record(&mut self, line: OutputLine, op: LineOp, res: Result<(), P::Error>) {
        let Err(e) = res else {
            return;
        };

        if self.error.is_none() {
            self.error = Some(SequenceError {
                action: self.action,
                edge: self.edge,
                line,
                op,
                kind: e.kind(),
            });
        }
    }

    fn finish(self) -> Result<Handled, SequenceError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Handled {
                action: self.action,
                edge: self.edge,
                indicator_faults: self.indicator_faults,
            }),
        }
    }
}
