use crate::memory::SegmentedMemory;
use std::io;

/// Display is poked by the scheduler on every refresh tick. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work; it gets a read-only view of memory to draw from.
pub trait Display {
    /// redraw from the current contents of memory
    fn refresh(&mut self, memory: &SegmentedMemory) -> Result<(), io::Error>;
}

/// draws nothing; VaporSpec has no video format yet
pub struct NullDisplay;

impl NullDisplay {
    pub fn new() -> Self {
        NullDisplay
    }
}

impl Default for NullDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NullDisplay {
    #[allow(unused)]
    fn refresh(&mut self, memory: &SegmentedMemory) -> Result<(), io::Error> {
        Ok(())
    }
}

/// useful for testing the scheduler; remembers how often it was refreshed
#[derive(Default)]
pub struct CountingDisplay {
    pub refreshes: usize,
}

impl Display for CountingDisplay {
    #[allow(unused)]
    fn refresh(&mut self, memory: &SegmentedMemory) -> Result<(), io::Error> {
        self.refreshes += 1;
        Ok(())
    }
}
