#![cfg_attr(not(test), no_std)]

mod action;
mod dispatcher;
mod indicator;
mod input;
mod key;
mod output;
mod queue;

#[cfg(test)]
mod mock;

pub use action::{Action, Handled, LineOp, SETTLE_DELAY_MS, SequenceError};
pub use dispatcher::{Config, Dispatcher};
pub use indicator::{Indicators, LedState, PinIndicators, PwmIndicators};
pub use input::{DEFAULT_INPUT_CODES, Edge, EventKind, InputEvent, KEY_0, KEY_1, KEY_2};
pub use key::Key;
pub use queue::EventQueue;
pub use output::{
    ConfigureError, OutputLine, OutputLineConvError, OutputLines, Polarities, Polarity,
};
