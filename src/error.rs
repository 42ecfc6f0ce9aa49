//! Fatal error types. Nothing here is recoverable: a `LoadError` stops us
//! before the VM exists, a `VmError` stops a running VM.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// exit status for every fatal error
pub const FAILURE_STATUS: u8 = 1;

/// failure to turn a word file into a `Vec<u16>`
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{}: cannot open file: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("missing word count header, read {actual} of 2 bytes")]
    MissingHeader { actual: usize },

    #[error("read {actual} bytes, expected {expected}")]
    Truncated { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<LoadError>,
    },
}

impl LoadError {
    /// process exit status for a file that could not be loaded
    pub fn exit_code(&self) -> u8 {
        FAILURE_STATUS
    }
}

/// failure while the VM is running
#[derive(Error, Debug)]
pub enum VmError {
    #[error("attempted illegal write to ROM: segment 0x{segment:04x}, offset 0x{offset:04x}, value 0x{value:04x}")]
    IllegalWrite { segment: u16, offset: u16, value: u16 },

    #[error("program counter 0x{pc:04x} is outside the code ({len} words)")]
    PcOutOfBounds { pc: u16, len: usize },

    #[error("display refresh failed: {0}")]
    Display(#[from] io::Error),
}

impl VmError {
    /// process exit status for a VM that had to stop
    pub fn exit_code(&self) -> u8 {
        FAILURE_STATUS
    }
}
