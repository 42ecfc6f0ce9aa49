//!
//! ## Design
//!
//! * fixed 16-bit words everywhere: code, data, registers
//! * 16 registers, 256x256 words of memory; segments 0x80-0xff are ROM
//! * the interpreter is a state-transition machine; it never exits the
//!   process, it reports a `Flow` or a `VmError` upwards
//! * instructions run one per scheduler cycle, followed by a tiny sleep
//! * display refresh happens on a fixed 16ms tick; nothing is drawn yet
//! * keyboard bytes arrive from a reader thread over a bounded channel
//!
//! Model
//!
//! main
//!  |-- cli, config, logging, raw terminal guard
//!  |-- loader(code file, rom file) -> Vec<u16>, Vec<u16>
//!  |-- interpreter(code, rom)
//!  |    |-- registers, memory, pc
//!  |    `-- decode + execute
//!  `-- scheduler(interpreter, keyboard, display, config)
//!       |-- key waiting?   -> 'q' quits, anything else is just logged
//!       |-- tick fired?    -> display.refresh()
//!       `-- otherwise      -> interpreter.step(); sleep(step_delay)

pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod loader;
pub mod memory;
pub mod scheduler;
