/// # scheduler
///
/// one loop, three sources of work, checked in this order every cycle:
///  1. a key waiting in the keyboard queue  -- the quit key ends the run
///  2. the refresh ticker having fired      -- redraw the display
///  3. neither                              -- run exactly one instruction
///
/// nothing in here blocks: keys are polled and the ticker is just a
/// deadline compared against the clock.
use crate::config::Config;
use crate::display::Display;
use crate::error::VmError;
use crate::input::Keyboard;
use crate::interpreter::{Flow, Interpreter};
use log::{info, trace};
use std::time::{Duration, Instant};

/// how a run ended, when it ended well
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// the program ran a HALT
    Halted,
    /// the quit key arrived
    Quit,
}

impl Exit {
    /// process exit status
    pub fn exit_code(&self) -> u8 {
        0
    }
}

/// process exit status for however a run ended: 0 for a halt or the quit
/// key, 1 for anything fatal
pub fn exit_status(outcome: &Result<Exit, VmError>) -> u8 {
    match outcome {
        Ok(exit) => exit.exit_code(),
        Err(e) => e.exit_code(),
    }
}

/// fixed rate deadline; ticks missed while busy are dropped, not queued
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker {
            period,
            next: Instant::now() + period,
        }
    }

    pub fn fired(&mut self) -> bool {
        self.fired_at(Instant::now())
    }

    pub fn fired_at(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }
}

pub struct Scheduler<'a> {
    interpreter: Interpreter,
    keyboard: &'a mut dyn Keyboard,
    display: &'a mut dyn Display,
    ticker: Ticker,
    config: Config,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        interpreter: Interpreter,
        keyboard: &'a mut dyn Keyboard,
        display: &'a mut dyn Display,
        config: Config,
    ) -> Self {
        Scheduler {
            interpreter,
            keyboard,
            display,
            ticker: Ticker::new(config.tick_period),
            config,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// cycle until the program halts, the quit key arrives or something fails
    pub fn run(&mut self) -> Result<Exit, VmError> {
        loop {
            if let Some(exit) = self.cycle()? {
                return Ok(exit);
            }
        }
    }

    /// do one unit of work; `Some` once the run is over
    pub fn cycle(&mut self) -> Result<Option<Exit>, VmError> {
        if let Some(key) = self.keyboard.poll_key() {
            if key == self.config.quit_key {
                info!("Quit key pressed");
                return Ok(Some(Exit::Quit));
            }
            info!("Key: {}", key);
            return Ok(None);
        }

        if self.ticker.fired() {
            trace!("display tick");
            self.display.refresh(self.interpreter.memory())?;
            return Ok(None);
        }

        match self.interpreter.step()? {
            Flow::Halt => Ok(Some(Exit::Halted)),
            Flow::Continue => {
                if !self.config.step_delay.is_zero() {
                    spin_sleep::sleep(self.config.step_delay);
                }
                Ok(None)
            }
        }
    }
}
