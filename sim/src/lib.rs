mod cli;
mod hardware;
mod script;

use std::{
    io::{self, BufRead},
    thread,
    time::Duration,
};

use anyhow::Context;
pub use anyhow::Result as AnyResult;
pub use cli::{Cli, Line, LinePolarity};
pub use hardware::{Change, Entry, InjectedFault, SimLeds, SimPin, StdDelay, Timeline};
pub use script::{Step, StepParseError, parse_code};
use ticklet::{
    Config, Dispatcher, EventKind, Handled, InputEvent, Key, OutputLine, OutputLines,
    SequenceError,
};
use tracing::instrument;

/// The dispatcher wired to simulated hardware.
#[derive(Debug)]
pub struct Simulator<'a> {
    dispatcher: Dispatcher<'a, SimPin, SimLeds, StdDelay>,
    input_codes: &'a [u16],
    timeline: Timeline,
    hold: Duration,
}

impl<'a> Simulator<'a> {
    /// Configures the simulated lines as inactive. Hardware changes are not kept.
    ///
    /// # Errors
    ///
    /// Fails if a line cannot be configured.
    pub fn new(
        config: Config<'a>,
        faulty_line: Option<OutputLine>,
        hold: Duration,
    ) -> AnyResult<Self> {
        Self::with_timeline(config, faulty_line, hold, Timeline::default())
    }

    /// Like [`Simulator::new`], but every hardware change, startup included, is kept in
    /// [`Simulator::timeline`].
    ///
    /// # Errors
    ///
    /// Fails if a line cannot be configured.
    pub fn recording(
        config: Config<'a>,
        faulty_line: Option<OutputLine>,
        hold: Duration,
    ) -> AnyResult<Self> {
        Self::with_timeline(config, faulty_line, hold, Timeline::recording())
    }

    fn with_timeline(
        config: Config<'a>,
        faulty_line: Option<OutputLine>,
        hold: Duration,
        timeline: Timeline,
    ) -> AnyResult<Self> {
        let pin = |line| {
            let pin = SimPin::new(line, &timeline);
            if faulty_line == Some(line) {
                pin.faulty()
            } else {
                pin
            }
        };

        let dispatcher = Dispatcher::new(
            config,
            pin(OutputLine::Reset),
            pin(OutputLine::Boot),
            SimLeds::new(&timeline),
            StdDelay,
        )
        .context("configuring output lines")?;

        Ok(Self {
            dispatcher,
            input_codes: config.input_codes,
            timeline,
            hold,
        })
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn outputs_mut(&mut self) -> &mut OutputLines<SimPin> {
        self.dispatcher.outputs_mut()
    }

    /// Runs a script step.
    ///
    /// # Errors
    ///
    /// Returns the first sequence that had an output write fail.
    #[instrument(skip(self))]
    pub fn step(&mut self, step: Step) -> Result<(), SequenceError> {
        match step {
            Step::Tap(key) => {
                let pressed = self.key_edge(key, true);
                thread::sleep(self.hold);
                let released = self.key_edge(key, false);
                pressed.and(released)
            }
            Step::Press(key) => self.key_edge(key, true),
            Step::Release(key) => self.key_edge(key, false),
            Step::Wait(duration) => {
                thread::sleep(duration);
                Ok(())
            }
            Step::Event(event) => self.dispatch(event).map(|_| ()),
        }
    }

    /// Hands a single event to the dispatcher, logging the outcome.
    ///
    /// # Errors
    ///
    /// Passes on the dispatcher's [`SequenceError`].
    pub fn dispatch(&mut self, event: InputEvent) -> Result<Option<Handled>, SequenceError> {
        if event.kind == EventKind::Key {
            tracing::info!(code = event.code, value = event.value, "key event");
        }

        let res = self.dispatcher.dispatch(event);

        match &res {
            Ok(Some(handled)) => {
                tracing::info!(key = %handled.key(), "{}", handled.message());

                if handled.indicator_faults > 0 {
                    tracing::warn!(
                        faults = handled.indicator_faults,
                        "some indicator writes failed"
                    );
                }
            }
            Ok(None) => tracing::debug!(?event, "event ignored"),
            Err(err) => tracing::error!("{err}"),
        }

        res
    }

    fn key_edge(&mut self, key: Key, pressed: bool) -> Result<(), SequenceError> {
        let Some(&code) = self.input_codes.get(key.input_index()) else {
            tracing::warn!(%key, "no input code bound to key");
            return Ok(());
        };

        self.dispatch(InputEvent::key(code, pressed)).map(|_| ())
    }
}

/// Runs the simulator with the given arguments until the steps run out.
///
/// # Errors
///
/// Fails on startup configuration errors and on unreadable input. Sequence errors are logged and
/// do not stop the simulator.
#[instrument(skip_all, err(Debug))]
pub fn run(cli: &Cli) -> AnyResult<()> {
    tracing::info!("ticklet starting");

    let polarities = cli.polarities();
    tracing::info!(
        codes = ?cli.codes,
        reset = ?polarities.reset,
        boot = ?polarities.boot,
        "line wiring"
    );

    let config = Config {
        input_codes: &cli.codes,
        polarities,
    };

    let mut simulator = Simulator::new(
        config,
        cli.fail_line.map(OutputLine::from),
        Duration::from_millis(cli.hold_ms),
    )?;

    tracing::info!("ticklet started");

    if !cli.steps.is_empty() {
        for step in &cli.steps {
            simulator.step(*step).ok();
        }

        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("reading steps from stdin")?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.parse::<Step>() {
            Ok(step) => {
                simulator.step(step).ok();
            }
            Err(e) => tracing::warn!("skipping step: {e}"),
        }
    }

    Ok(())
}
