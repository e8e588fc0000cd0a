use embedded_hal::{digital::OutputPin, pwm::SetDutyCycle};

use crate::OutputLine;

/// Requested state of an indicator channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LedState {
    On,
    Off,
}

impl From<bool> for LedState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// Indicator sink with one channel per [`OutputLine`].
///
/// Indicators are cosmetic. Callers never abort a sequence because of an indicator error.
pub trait Indicators {
    type Error: core::fmt::Debug;

    /// Sets the channel mirroring `line` to full or zero intensity.
    ///
    /// # Errors
    ///
    /// Returns the underlying driver error.
    fn set(&mut self, line: OutputLine, state: LedState) -> Result<(), Self::Error>;
}

impl<T> Indicators for &mut T
where
    T: Indicators + ?Sized,
{
    type Error = T::Error;

    #[inline]
    fn set(&mut self, line: OutputLine, state: LedState) -> Result<(), Self::Error> {
        T::set(self, line, state)
    }
}

/// Indicators driven by plain digital pins, lit when high.
#[derive(Debug)]
pub struct PinIndicators<P>([P; 2]);

impl<P> PinIndicators<P>
where
    P: OutputPin,
{
    #[inline]
    pub fn new(reset_led: P, boot_led: P) -> Self {
        Self([reset_led, boot_led])
    }

    #[inline]
    pub fn release(self) -> [P; 2] {
        self.0
    }
}

impl<P> Indicators for PinIndicators<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    #[inline]
    fn set(&mut self, line: OutputLine, state: LedState) -> Result<(), Self::Error> {
        let pin = &mut self.0[line.index()];

        match state {
            LedState::On => pin.set_high(),
            LedState::Off => pin.set_low(),
        }
    }
}

/// Indicators driven by PWM channels, where "on" is the maximum duty cycle.
#[derive(Debug)]
pub struct PwmIndicators<C>([C; 2]);

impl<C> PwmIndicators<C>
where
    C: SetDutyCycle,
{
    #[inline]
    pub fn new(reset_led: C, boot_led: C) -> Self {
        Self([reset_led, boot_led])
    }

    #[inline]
    pub fn release(self) -> [C; 2] {
        self.0
    }
}

impl<C> Indicators for PwmIndicators<C>
where
    C: SetDutyCycle,
{
    type Error = C::Error;

    #[inline]
    fn set(&mut self, line: OutputLine, state: LedState) -> Result<(), Self::Error> {
        let channel = &mut self.0[line.index()];

        match state {
            LedState::On => channel.set_duty_cycle_fully_on(),
            LedState::Off => channel.set_duty_cycle_fully_off(),
        }
    }
}
