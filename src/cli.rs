use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use vaporspec::config::{Config, DEFAULT_STEP_DELAY_US, DEFAULT_TICK_MS, QUIT_KEY};

#[derive(Parser, Debug)]
#[command(
    name = "vaporspec",
    about = "VaporSpec VM - run a VaporSpec word file",
    long_about = "Runs a VaporSpec program: 16-bit words, 16 registers, 64K words of\n\
                  segmented memory with a read-only upper half. Press q to quit.",
    version
)]
pub struct Cli {
    /// Word file holding the program
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Word file holding the ROM
    #[arg(short = 'r', long = "rom")]
    pub rom: Option<PathBuf>,

    /// Display scale (accepted, nothing is drawn yet)
    #[arg(short = 's', long, default_value_t = 1)]
    pub scale: u32,

    /// Pause after every instruction, in microseconds
    #[arg(long, default_value_t = DEFAULT_STEP_DELAY_US)]
    pub step_delay_us: u64,

    /// Display refresh period, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            step_delay: Duration::from_micros(self.step_delay_us),
            tick_period: Duration::from_millis(self.tick_ms),
            quit_key: QUIT_KEY,
        }
    }
}
