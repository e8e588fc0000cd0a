use clap::{Parser, ValueEnum};
use ticklet::{OutputLine, Polarities, Polarity};

use crate::script::{Step, parse_code};

/// Drives the RESET/BOOT sequences against simulated lines and LEDs.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Input code table. K1 responds to the code at index 1, K2 to the one at index 2.
    #[arg(long, value_delimiter = ',', value_parser = parse_code, default_values = ["11", "2", "3"])]
    pub codes: Vec<u16>,
    /// Polarity of the RESET line.
    #[arg(long, value_enum, default_value_t = LinePolarity::ActiveLow)]
    pub reset_polarity: LinePolarity,
    /// Polarity of the BOOT line.
    #[arg(long, value_enum, default_value_t = LinePolarity::ActiveLow)]
    pub boot_polarity: LinePolarity,
    /// Make writes to this line fail once it has been configured.
    #[arg(long, value_enum)]
    pub fail_line: Option<Line>,
    /// How long `k1`/`k2` steps keep the key pressed, in milliseconds.
    #[arg(long, default_value_t = 50)]
    pub hold_ms: u64,
    /// Steps to run: `k1`, `k2`, `k1+`, `k1-`, `wait:<ms>` or `<kind>:<code>:<value>`.
    /// Steps are read from stdin, one per line, when none are given.
    pub steps: Vec<Step>,
}

impl Cli {
    #[must_use]
    pub fn polarities(&self) -> Polarities {
        Polarities {
            reset: self.reset_polarity.into(),
            boot: self.boot_polarity.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LinePolarity {
    ActiveHigh,
    ActiveLow,
}

impl From<LinePolarity> for Polarity {
    fn from(value: LinePolarity) -> Self {
        match value {
            LinePolarity::ActiveHigh => Polarity::ActiveHigh,
            LinePolarity::ActiveLow => Polarity::ActiveLow,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Line {
    Reset,
    Boot,
}

impl From<Line> for OutputLine {
    fn from(value: Line) -> Self {
        match value {
            Line::Reset => OutputLine::Reset,
            Line::Boot => OutputLine::Boot,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use ticklet::{DEFAULT_INPUT_CODES, Key, Polarities, Polarity};

    use super::{Cli, Line};
    use crate::script::Step;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ticklet-sim"]).unwrap();

        assert_eq!(cli.codes, DEFAULT_INPUT_CODES);
        assert_eq!(cli.polarities(), Polarities::default());
        assert_eq!(cli.fail_line, None);
        assert_eq!(cli.hold_ms, 50);
        assert!(cli.steps.is_empty());
    }

    #[test]
    fn test_arguments() {
        let cli = Cli::try_parse_from([
            "ticklet-sim",
            "--codes",
            "0x100,0x101,0x102",
            "--boot-polarity",
            "active-high",
            "--fail-line",
            "reset",
            "k1",
            "wait:10",
            "k2+",
        ])
        .unwrap();

        assert_eq!(cli.codes, [0x100, 0x101, 0x102]);
        assert_eq!(cli.polarities().boot, Polarity::ActiveHigh);
        assert_eq!(cli.polarities().reset, Polarity::ActiveLow);
        assert_eq!(cli.fail_line, Some(Line::Reset));
        assert_eq!(cli.steps.len(), 3);
        assert_eq!(cli.steps[0], Step::Tap(Key::K1));
        assert_eq!(cli.steps[2], Step::Press(Key::K2));
    }

    #[test]
    fn test_bad_step_is_rejected() {
        assert!(Cli::try_parse_from(["ticklet-sim", "k9"]).is_err());
    }
}
