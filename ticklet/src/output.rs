use embedded_hal::digital::{Error as _, ErrorKind, OutputPin, PinState, StatefulOutputPin};
use strum::IntoEnumIterator;
use thiserror::Error as ThisError;

/// Logical output lines of the target device.
///
/// The discriminant is the logical index of the line. Indicator channels share the same indexing,
/// so channel `n` always mirrors line `n`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum OutputLine {
    #[strum(serialize = "RESET")]
    Reset,
    #[strum(serialize = "BOOT")]
    Boot,
}

impl OutputLine {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl From<OutputLine> for u8 {
    fn from(value: OutputLine) -> Self {
        value as Self
    }
}

impl TryFrom<u8> for OutputLine {
    type Error = OutputLineConvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OutputLine::Reset),
            1 => Ok(OutputLine::Boot),
            _ => Err(OutputLineConvError),
        }
    }
}

#[derive(Clone, Copy, Debug, ThisError)]
#[cfg_attr(test, derive(PartialEq))]
#[error("integer to output line conversion failed")]
pub struct OutputLineConvError;

/// Which physical level means "asserted" for a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    #[default]
    ActiveLow,
}

impl Polarity {
    /// Returns the physical level a line must be driven to for the given logical state.
    #[inline]
    #[must_use]
    pub fn level(self, asserted: bool) -> PinState {
        PinState::from(asserted == (self == Polarity::ActiveHigh))
    }
}

/// Per line polarity. Both lines are active-low by default, as the buttons they stand in for pull
/// the target's pins to ground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Polarities {
    pub reset: Polarity,
    pub boot: Polarity,
}

impl Polarities {
    #[inline]
    #[must_use]
    pub fn get(self, line: OutputLine) -> Polarity {
        match line {
            OutputLine::Reset => self.reset,
            OutputLine::Boot => self.boot,
        }
    }
}

/// The fixed set of output lines, addressed by [`OutputLine`].
///
/// Writes take effect immediately; there is no queuing and no state kept besides what the pins
/// themselves hold.
#[derive(Debug)]
pub struct OutputLines<P> {
    pins: [P; 2],
    polarities: Polarities,
}

impl<P> OutputLines<P>
where
    P: OutputPin,
{
    /// Takes ownership of the pins and drives every line to its inactive level.
    ///
    /// # Errors
    ///
    /// Returns the first line that could not be configured. Events must not be dispatched in that
    /// case, as the line state is unknown.
    pub fn new(reset: P, boot: P, polarities: Polarities) -> Result<Self, ConfigureError> {
        let mut lines = Self {
            pins: [reset, boot],
            polarities,
        };

        for line in OutputLine::iter() {
            lines.deassert(line).map_err(|e| ConfigureError {
                line,
                kind: e.kind(),
            })?;
        }

        Ok(lines)
    }

    /// Drives the line to its active level.
    ///
    /// # Errors
    ///
    /// Propagates the pin write error.
    #[inline]
    pub fn assert(&mut self, line: OutputLine) -> Result<(), P::Error> {
        self.drive(line, true)
    }

    /// Drives the line to its inactive level.
    ///
    /// # Errors
    ///
    /// Propagates the pin write error.
    #[inline]
    pub fn deassert(&mut self, line: OutputLine) -> Result<(), P::Error> {
        self.drive(line, false)
    }

    #[inline]
    pub fn release(self) -> [P; 2] {
        self.pins
    }

    fn drive(&mut self, line: OutputLine, asserted: bool) -> Result<(), P::Error> {
        let level = self.polarities.get(line).level(asserted);
        self.pins[line.index()].set_state(level)
    }
}

impl<P> OutputLines<P>
where
    P: StatefulOutputPin,
{
    /// Reads back whether the line is currently driven to its active level.
    ///
    /// # Errors
    ///
    /// Propagates the pin read error.
    pub fn is_asserted(&mut self, line: OutputLine) -> Result<bool, P::Error> {
        let active_high = self.polarities.get(line) == Polarity::ActiveHigh;
        let high = self.pins[line.index()].is_set_high()?;
        Ok(high == active_high)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("failed to configure {line} line as inactive: {kind:?}")]
pub struct ConfigureError {
    pub line: OutputLine,
    pub kind: ErrorKind,
}

#[cfg(test)]
mod tests {
    use embedded_hal::digital::PinState;
    use strum::IntoEnumIterator;

    use super::{OutputLine, OutputLines, Polarities, Polarity};
    use crate::mock::{Journal, MockPin, Op};

    #[test]
    fn test_output_line_conversion() {
        for line in OutputLine::iter() {
            assert_eq!((line as u8).try_into(), Ok(line));
            assert_eq!(line.index(), usize::from(u8::from(line)));
        }

        assert!(OutputLine::try_from(2).is_err());
    }

    #[test]
    fn test_polarity_levels() {
        assert_eq!(Polarity::ActiveHigh.level(true), PinState::High);
        assert_eq!(Polarity::ActiveHigh.level(false), PinState::Low);
        assert_eq!(Polarity::ActiveLow.level(true), PinState::Low);
        assert_eq!(Polarity::ActiveLow.level(false), PinState::High);
    }

    #[test]
    fn test_new_drives_lines_inactive() {
        let journal = Journal::default();
        let polarities = Polarities {
            reset: Polarity::ActiveLow,
            boot: Polarity::ActiveHigh,
        };

        let mut lines = OutputLines::new(
            MockPin::new(OutputLine::Reset, &journal),
            MockPin::new(OutputLine::Boot, &journal),
            polarities,
        )
        .unwrap();

        assert_eq!(
            journal.take(),
            [
                Op::Pin(OutputLine::Reset, PinState::High),
                Op::Pin(OutputLine::Boot, PinState::Low),
            ]
        );

        for line in OutputLine::iter() {
            assert_eq!(lines.is_asserted(line), Ok(false));
        }
    }

    #[test]
    fn test_new_fails_on_unconfigurable_line() {
        let journal = Journal::default();

        let err = OutputLines::new(
            MockPin::new(OutputLine::Reset, &journal),
            MockPin::new(OutputLine::Boot, &journal).failing(),
            Polarities::default(),
        )
        .unwrap_err();

        assert_eq!(err.line, OutputLine::Boot);
    }

    #[test]
    fn test_assert_follows_polarity() {
        let journal = Journal::default();
        let polarities = Polarities {
            reset: Polarity::ActiveHigh,
            boot: Polarity::ActiveLow,
        };

        let mut lines = OutputLines::new(
            MockPin::new(OutputLine::Reset, &journal),
            MockPin::new(OutputLine::Boot, &journal),
            polarities,
        )
        .unwrap();
        journal.take();

        lines.assert(OutputLine::Reset).unwrap();
        lines.assert(OutputLine::Boot).unwrap();
        assert_eq!(lines.is_asserted(OutputLine::Reset), Ok(true));
        assert_eq!(lines.is_asserted(OutputLine::Boot), Ok(true));

        lines.deassert(OutputLine::Boot).unwrap();
        assert_eq!(lines.is_asserted(OutputLine::Boot), Ok(false));

        assert_eq!(
            journal.take(),
            [
                Op::Pin(OutputLine::Reset, PinState::High),
                Op::Pin(OutputLine::Boot, PinState::Low),
                Op::Pin(OutputLine::Boot, PinState::High),
            ]
        );
    }
}
