use crossterm::terminal;
use crossterm::tty::IsTty;
use log::{debug, warn};
use std::io::{self, Read};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

/// how many unread key bytes may queue up before the reader thread waits
const KEY_QUEUE_DEPTH: usize = 16;

/// reads keypresses
pub trait Keyboard {
    /// next key byte, if one has arrived; must never block
    fn poll_key(&mut self) -> Option<u8>;
}

/// Keyboard fed by a background thread doing blocking single-byte reads.
///
/// The reader owns no VM state; all it can do is push bytes into a bounded
/// channel. It stops after forwarding the quit key, at end of input, or as
/// soon as a send fails because this end has been dropped. A reader still
/// parked inside `read` at process exit is simply abandoned.
pub struct StdinKeyboard {
    keys: Receiver<u8>,
    reader: JoinHandle<()>,
}

impl StdinKeyboard {
    /// spawn a reader over the process's stdin
    pub fn new(quit_key: u8) -> Result<Self, io::Error> {
        Self::spawn(io::stdin(), quit_key)
    }

    /// spawn a reader over any byte source
    pub fn spawn<R: Read + Send + 'static>(source: R, quit_key: u8) -> Result<Self, io::Error> {
        let (tx, rx) = sync_channel(KEY_QUEUE_DEPTH);
        let reader = thread::Builder::new()
            .name("keyboard".into())
            .spawn(move || read_keys(source, tx, quit_key))?;
        Ok(StdinKeyboard { keys: rx, reader })
    }

    /// true once the reader thread has returned
    #[cfg(test)]
    pub fn reader_finished(&self) -> bool {
        self.reader.is_finished()
    }
}

impl Keyboard for StdinKeyboard {
    fn poll_key(&mut self) -> Option<u8> {
        self.keys.try_recv().ok()
    }
}

fn read_keys<R: Read>(mut source: R, keys: SyncSender<u8>, quit_key: u8) {
    let mut byte = [0u8; 1];
    loop {
        match source.read(&mut byte) {
            Ok(0) => {
                debug!("keyboard: end of input");
                return;
            }
            Ok(_) => {
                if keys.send(byte[0]).is_err() {
                    debug!("keyboard: scheduler gone, reader stopping");
                    return;
                }
                if byte[0] == quit_key {
                    debug!("keyboard: quit key forwarded, reader stopping");
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("keyboard: read failed: {}", e);
                return;
            }
        }
    }
}

/// dummy Keyboard implementation for testing; hands out a fixed list of keys
pub struct ScriptedKeyboard {
    bytes: Vec<u8>,
}

impl ScriptedKeyboard {
    pub fn new(keys: &[u8]) -> Self {
        let mut bytes = Vec::from(keys);
        bytes.reverse();
        ScriptedKeyboard { bytes }
    }

    /// a keyboard nobody ever touches
    pub fn silent() -> Self {
        Self::new(&[])
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl Default for ScriptedKeyboard {
    fn default() -> Self {
        Self::silent()
    }
}

impl Keyboard for ScriptedKeyboard {
    fn poll_key(&mut self) -> Option<u8> {
        self.bytes.pop()
    }
}

/// puts the terminal in raw mode for as long as it lives, so that single
/// keypresses reach the reader without waiting for enter
pub struct RawTerminal {
    enabled: bool,
}

impl RawTerminal {
    /// raw mode only makes sense when stdin is a real terminal
    pub fn enable_if_tty() -> Result<Self, io::Error> {
        if !io::stdin().is_tty() {
            debug!("stdin is not a terminal, leaving it cooked");
            return Ok(RawTerminal { enabled: false });
        }
        terminal::enable_raw_mode()?;
        Ok(RawTerminal { enabled: true })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if self.enabled {
            if let Err(e) = terminal::disable_raw_mode() {
                warn!("could not restore terminal: {}", e);
            }
        }
    }
}
