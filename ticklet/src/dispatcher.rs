use embedded_hal::{delay::DelayNs, digital::OutputPin};
use strum::IntoEnumIterator;

use crate::{
    ConfigureError, DEFAULT_INPUT_CODES, Handled, Indicators, InputEvent, Key, LedState,
    OutputLine, OutputLines, Polarities, SequenceError,
};

/// Static wiring handed to the [`Dispatcher`] at construction.
#[derive(Clone, Copy, Debug)]
pub struct Config<'a> {
    /// Raw input codes, indexed by [`Key::input_index`].
    pub input_codes: &'a [u16],
    pub polarities: Polarities,
}

impl Default for Config<'static> {
    fn default() -> Self {
        Self {
            input_codes: &DEFAULT_INPUT_CODES,
            polarities: Polarities::default(),
        }
    }
}

/// Routes key edges to their [`crate::Action`].
///
/// Dispatching is synchronous: the calling context is blocked for as long as the sequence takes,
/// which is up to 400ms for an alternate reset release. Edges arriving meanwhile are up to the
/// input layer to hold on to.
#[derive(Debug)]
pub struct Dispatcher<'a, P, I, D> {
    input_codes: &'a [u16],
    outputs: OutputLines<P>,
    indicators: I,
    delay: D,
}

impl<'a, P, I, D> Dispatcher<'a, P, I, D>
where
    P: OutputPin,
    I: Indicators,
    D: DelayNs,
{
    /// Configures every output line as inactive and turns the indicators off.
    ///
    /// # Errors
    ///
    /// Fails if any output line cannot be driven inactive.
    pub fn new(
        config: Config<'a>,
        reset: P,
        boot: P,
        mut indicators: I,
        delay: D,
    ) -> Result<Self, ConfigureError> {
        let outputs = OutputLines::new(reset, boot, config.polarities)?;

        for line in OutputLine::iter() {
            indicators.set(line, LedState::Off).ok();
        }

        Ok(Self {
            input_codes: config.input_codes,
            outputs,
            indicators,
            delay,
        })
    }

    /// Runs the action bound to the event's key, if any.
    ///
    /// Returns `Ok(None)` for events that are not key edges and for codes no key is bound to.
    ///
    /// # Errors
    ///
    /// Returns the first output write that failed. The sequence has still run to completion.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<Option<Handled>, SequenceError> {
        let Some(edge) = event.edge() else {
            return Ok(None);
        };

        let Some(key) = Key::from_code(self.input_codes, event.code) else {
            return Ok(None);
        };

        key.action()
            .run(
                edge,
                &mut self.outputs,
                &mut self.indicators,
                &mut self.delay,
            )
            .map(Some)
    }

    #[inline]
    pub fn outputs_mut(&mut self) -> &mut OutputLines<P> {
        &mut self.outputs
    }

    #[inline]
    pub fn release(self) -> (OutputLines<P>, I, D) {
        (self.outputs, self.indicators, self.delay)
    }
}
