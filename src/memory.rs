use crate::error::VmError;

// NB. registers are 16 bits but segments and offsets are 8 bits; every index
//     taken from a register is truncated to its low byte before use

/// number of segments, and of words per segment
pub const SEGMENT_COUNT: usize = 256;
pub const SEGMENT_SIZE: usize = 256;

/// first segment of the read-only half
pub const ROM_SEGMENT_START: u16 = 0x80;

/// squash a register value into the 0-255 index space
pub fn index_of(value: u16) -> usize {
    (value & 0x00ff) as usize
}

/// Represents a (segment, offset) addressed word memory
pub trait MemoryMap {
    /// read a word; never fails, every index is in range once truncated
    fn read(&self, segment: u16, offset: u16) -> u16 {
        self.get_segment(index_of(segment))[index_of(offset)]
    }

    /// write a word, refusing anything aimed at the read-only half
    fn write(&mut self, segment: u16, offset: u16, value: u16) -> Result<(), VmError> {
        if is_read_only(segment) {
            return Err(VmError::IllegalWrite {
                segment,
                offset,
                value,
            });
        }
        self.get_segment_mut(index_of(segment))[index_of(offset)] = value;
        Ok(())
    }

    /// get a r/o view of one segment
    fn get_segment(&self, segment: usize) -> &[u16; SEGMENT_SIZE];

    /// get a r/w view of one segment
    fn get_segment_mut(&mut self, segment: usize) -> &mut [u16; SEGMENT_SIZE];
}

/// true for any register value that may not be used as a store segment.
/// checked on the full 16-bit value, so 0x0100 and up are refused too
pub fn is_read_only(segment: u16) -> bool {
    segment >= ROM_SEGMENT_START
}

/// The VaporSpec memory map
///   0x00-0x7f  segments of RAM
///   0x80-0xff  segments of ROM
pub struct SegmentedMemory {
    cells: Box<[[u16; SEGMENT_SIZE]]>,
}

impl MemoryMap for SegmentedMemory {
    fn get_segment(&self, segment: usize) -> &[u16; SEGMENT_SIZE] {
        &self.cells[segment]
    }

    fn get_segment_mut(&mut self, segment: usize) -> &mut [u16; SEGMENT_SIZE] {
        &mut self.cells[segment]
    }
}

impl SegmentedMemory {
    /// all 64K words zeroed
    pub fn new() -> Self {
        SegmentedMemory {
            cells: vec![[0u16; SEGMENT_SIZE]; SEGMENT_COUNT].into_boxed_slice(),
        }
    }
}

impl Default for SegmentedMemory {
    fn default() -> Self {
        Self::new()
    }
}
