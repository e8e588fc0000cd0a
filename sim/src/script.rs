//! Script steps understood by the simulator.
//!
//! - `k1`, `k2`: press, hold, release.
//! - `k1+`, `k1-`: press or release only.
//! - `wait:<ms>`: sleep.
//! - `<kind>:<code>:<value>`: raw input event, where `kind` is one of `syn`, `key`, `rel`, `abs`,
//!   `msc`, `vnd` or a numeric event type. Numbers may be given in hex with a `0x` prefix.

use std::{str::FromStr, time::Duration};

use thiserror::Error as ThisError;
use ticklet::{EventKind, InputEvent, Key};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Tap(Key),
    Press(Key),
    Release(Key),
    Wait(Duration),
    Event(InputEvent),
}

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        if let Some(step) = parse_key_step(&lower) {
            return Ok(step);
        }

        let parts: Vec<&str> = lower.split(':').collect();

        match parts.as_slice() {
            ["wait", ms] => Ok(Step::Wait(Duration::from_millis(parse_number(ms)?))),
            [kind, code, value] => {
                let kind = parse_kind(kind)?;
                let code = parse_code(code)?;
                let value = value
                    .parse()
                    .map_err(|_| StepParseError::Number((*value).to_owned()))?;

                Ok(Step::Event(InputEvent::new(kind, code, value)))
            }
            _ => Err(StepParseError::Unrecognized(s.to_owned())),
        }
    }
}

fn parse_key_step(s: &str) -> Option<Step> {
    let key = |name: &str| match name {
        "k1" => Some(Key::K1),
        "k2" => Some(Key::K2),
        _ => None,
    };

    if let Some(name) = s.strip_suffix('+') {
        key(name).map(Step::Press)
    } else if let Some(name) = s.strip_suffix('-') {
        key(name).map(Step::Release)
    } else {
        key(s).map(Step::Tap)
    }
}

fn parse_kind(s: &str) -> Result<EventKind, StepParseError> {
    let kind = match s {
        "syn" => EventKind::Sync,
        "key" => EventKind::Key,
        "rel" => EventKind::Relative,
        "abs" => EventKind::Absolute,
        "msc" => EventKind::Misc,
        "vnd" => EventKind::Vendor,
        other => parse_number(other)
            .ok()
            .and_then(|n| u8::try_from(n).ok())
            .map(EventKind::from)
            .ok_or_else(|| StepParseError::Kind(other.to_owned()))?,
    };

    Ok(kind)
}

fn parse_number(s: &str) -> Result<u64, StepParseError> {
    let res = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };

    res.map_err(|_| StepParseError::Number(s.to_owned()))
}

/// Parses an input code, decimal or `0x` prefixed hex.
///
/// # Errors
///
/// Fails if the value is not a number or does not fit in 16 bits.
pub fn parse_code(s: &str) -> Result<u16, StepParseError> {
    let n = parse_number(&s.to_ascii_lowercase())?;
    u16::try_from(n).map_err(|_| StepParseError::Number(s.to_owned()))
}

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StepParseError {
    #[error("unknown event kind `{0}`")]
    Kind(String),
    #[error("invalid number `{0}`")]
    Number(String),
    #[error("unrecognized step `{0}`")]
    Unrecognized(String),
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ticklet::{EventKind, InputEvent, KEY_1, Key};

    use super::{Step, StepParseError, parse_code};

    #[test]
    fn test_key_steps() {
        assert_eq!("k1".parse(), Ok(Step::Tap(Key::K1)));
        assert_eq!("K2".parse(), Ok(Step::Tap(Key::K2)));
        assert_eq!("k1+".parse(), Ok(Step::Press(Key::K1)));
        assert_eq!(" k2- ".parse(), Ok(Step::Release(Key::K2)));
    }

    #[test]
    fn test_wait_step() {
        assert_eq!(
            "wait:250".parse(),
            Ok(Step::Wait(Duration::from_millis(250)))
        );
    }

    #[test]
    fn test_raw_events() {
        assert_eq!(
            "key:2:1".parse(),
            Ok(Step::Event(InputEvent::key(KEY_1, true)))
        );
        assert_eq!(
            "key:0xFFFF:0".parse(),
            Ok(Step::Event(InputEvent::key(0xFFFF, false)))
        );
        assert_eq!(
            "rel:2:-1".parse(),
            Ok(Step::Event(InputEvent::new(EventKind::Relative, KEY_1, -1)))
        );
        assert_eq!(
            "0x20:2:1".parse(),
            Ok(Step::Event(InputEvent::new(EventKind::Other(0x20), KEY_1, 1)))
        );
    }

    #[test]
    fn test_invalid_steps() {
        assert_eq!(
            "k3".parse::<Step>(),
            Err(StepParseError::Unrecognized("k3".to_owned()))
        );
        assert_eq!(
            "foo:1:1".parse::<Step>(),
            Err(StepParseError::Kind("foo".to_owned()))
        );
        assert_eq!(
            "key:70000:1".parse::<Step>(),
            Err(StepParseError::Number("70000".to_owned()))
        );
        assert_eq!(
            "wait:soon".parse::<Step>(),
            Err(StepParseError::Number("soon".to_owned()))
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(parse_code("11"), Ok(11));
        assert_eq!(parse_code("0X0B"), Ok(11));
        assert!(parse_code("0x10000").is_err());
    }
}
