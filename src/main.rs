mod cli;

use clap::Parser;
use log::{debug, error, info};
use std::error::Error;
use std::io::Write;
use std::process::ExitCode;

use cli::Cli;
use vaporspec::display::NullDisplay;
use vaporspec::error::FAILURE_STATUS;
use vaporspec::input::{RawTerminal, StdinKeyboard};
use vaporspec::interpreter::Interpreter;
use vaporspec::loader;
use vaporspec::scheduler::{exit_status, Scheduler};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    // everything that needs tidying up (raw terminal, keyboard) is owned by
    // run(), so it is all dropped before we hand back the exit status
    match run(&cli) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(FAILURE_STATUS)
        }
    }
}

fn run(cli: &Cli) -> Result<u8, Box<dyn Error>> {
    let loaded = loader::load_file(&cli.file).and_then(|code| {
        let rom = loader::load_optional(cli.rom.as_deref())?;
        Ok((code, rom))
    });
    let (code, rom) = match loaded {
        Ok(words) => words,
        Err(e) => {
            error!("{}", e);
            return Ok(e.exit_code());
        }
    };
    info!("File: {}, ROM: {}, Scale: {}", code.len(), rom.len(), cli.scale);

    let config = cli.config();
    let _raw = RawTerminal::enable_if_tty()?;
    let mut keyboard = StdinKeyboard::new(config.quit_key)?;
    let mut display = NullDisplay::new();
    let mut scheduler = Scheduler::new(
        Interpreter::new(code, rom),
        &mut keyboard,
        &mut display,
        config,
    );

    let outcome = scheduler.run();
    debug!("stopped at pc 0x{:04x}", scheduler.interpreter().pc());
    if let Err(e) = &outcome {
        error!("{}", e);
    }
    Ok(exit_status(&outcome))
}

// the terminal may be raw, so finish every line with \r as well
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(buf, "[{} {}] {}\r", record.level(), record.target(), record.args())
        })
        .init();
}
