/// # interpreter
///
/// VaporSpec machine state is small:
///  r0-rF  16 general purpose 16bit registers; whichever one a CMP writes
///         to doubles as the flag register for the following JLT/JGT/JEQ
///  pc     index into the code words (not into memory; code is separate)
///  memory 256 segments of 256 words, see `memory`
///
/// the pc is bumped after *every* instruction, jumps included, so a jump
/// parks the pc one word short of its target.
use crate::error::VmError;
use crate::instruction::{self, Instruction};
use crate::memory::{MemoryMap, SegmentedMemory};
use log::{info, trace};

pub const REGISTER_COUNT: usize = 16;

/// words per jump segment
const JUMP_SEGMENT_SIZE: u16 = 256;

/// what the scheduler should do after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

pub struct Interpreter {
    code: Vec<u16>,
    rom: Vec<u16>,
    memory: SegmentedMemory,
    registers: [u16; REGISTER_COUNT],
    program_counter: u16,
}

impl Interpreter {
    pub fn new(code: Vec<u16>, rom: Vec<u16>) -> Self {
        Interpreter {
            code,
            rom,
            memory: SegmentedMemory::new(),
            registers: [0; REGISTER_COUNT],
            program_counter: 0,
        }
    }

    #[cfg(test)]
    pub fn code(&self) -> &[u16] {
        &self.code
    }

    /// the rom words handed in at construction; not mapped into memory
    pub fn rom(&self) -> &[u16] {
        &self.rom
    }

    pub fn registers(&self) -> &[u16; REGISTER_COUNT] {
        &self.registers
    }

    pub fn memory(&self) -> &SegmentedMemory {
        &self.memory
    }

    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    /// fetch, decode, execute, bump the pc
    pub fn step(&mut self) -> Result<Flow, VmError> {
        let pc = self.program_counter;
        let word = *self
            .code
            .get(pc as usize)
            .ok_or(VmError::PcOutOfBounds {
                pc,
                len: self.code.len(),
            })?;
        let instr = instruction::decode(word);
        trace!("{:04x}: {:04x}  {}", pc, word, instr);
        let flow = self.execute(instr)?;
        self.program_counter = self.program_counter.wrapping_add(1);
        Ok(flow)
    }

    /// apply one instruction to registers, memory and pc
    pub fn execute(&mut self, instr: Instruction) -> Result<Flow, VmError> {
        let a0 = instr.arg0 as usize;
        let a1 = instr.arg1 as usize;
        let a2 = instr.arg2 as usize;
        let r = &mut self.registers;

        match instr.opcode {
            instruction::EXT => match instr.arg0 {
                instruction::EXT_HALT => {
                    info!("Exiting at halt instruction");
                    return Ok(Flow::Halt);
                }
                instruction::EXT_CPY => r[a1] = r[a2],
                instruction::EXT_NOT => r[a1] = !r[a2],
                instruction::EXT_LSL => r[a0] = shift_left(r[a0], r[a1]),
                instruction::EXT_LSR => r[a0] = shift_right(r[a0], r[a1]),
                instruction::EXT_JMP => self.jump(a1, a2),
                instruction::EXT_NOP => (),
                _ => (),
            },
            instruction::ADD => r[a0] = r[a1].wrapping_add(r[a2]),
            instruction::SUB => r[a0] = r[a1].wrapping_sub(r[a2]),
            instruction::ADDC => r[a0] = r[a0].wrapping_add(instr.imm8()),
            instruction::SUBC => r[a0] = r[a0].wrapping_sub(instr.imm8()),
            instruction::CMP => {
                r[a0] = if r[a1] < r[a2] {
                    instruction::FLAG_LESS
                } else if r[a1] > r[a2] {
                    instruction::FLAG_GREATER
                } else {
                    instruction::FLAG_EQUAL
                }
            }
            instruction::JLT => self.jump_if(a0, instruction::FLAG_LESS, a1, a2),
            instruction::JGT => self.jump_if(a0, instruction::FLAG_GREATER, a1, a2),
            instruction::JEQ => self.jump_if(a0, instruction::FLAG_EQUAL, a1, a2),
            instruction::LDR => r[a0] = self.memory.read(r[a1], r[a2]),
            instruction::STR => self.memory.write(r[a1], r[a2], r[a0])?,
            instruction::LRC => r[a0] = instr.imm8(),
            instruction::AND => r[a0] = r[a1] & r[a2],
            instruction::OR => r[a0] = r[a1] | r[a2],
            instruction::XOR => r[a0] = r[a1] ^ r[a2],
            _ => (),
        }
        Ok(Flow::Continue)
    }

    /// point the pc one short of `seg * 256 + off`; `step` does the rest
    fn jump(&mut self, seg: usize, off: usize) {
        self.program_counter = self.registers[seg]
            .wrapping_mul(JUMP_SEGMENT_SIZE)
            .wrapping_add(self.registers[off])
            .wrapping_sub(1);
    }

    fn jump_if(&mut self, flag: usize, wanted: u16, seg: usize, off: usize) {
        if self.registers[flag] == wanted {
            self.jump(seg, off);
        }
    }
}

// shifting by the word width or more empties the register
fn shift_left(value: u16, by: u16) -> u16 {
    value.checked_shl(by as u32).unwrap_or(0)
}

fn shift_right(value: u16, by: u16) -> u16 {
    value.checked_shr(by as u32).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::*;

    fn vm_with(regs: &[(usize, u16)]) -> Interpreter {
        let mut vm = Interpreter::new(vec![0x0600], vec![]);
        for (reg, value) in regs {
            vm.registers[*reg] = *value;
        }
        vm
    }

    fn exec(vm: &mut Interpreter, op: u8, a0: u8, a1: u8, a2: u8) -> Result<Flow, VmError> {
        vm.execute(Instruction::new(op, a0, a1, a2))
    }

    #[test]
    fn test_new_is_zeroed() {
        let vm = Interpreter::new(vec![0x0000], vec![1, 2, 3]);
        assert_eq!(vm.registers(), &[0; REGISTER_COUNT]);
        assert_eq!(vm.pc(), 0);
        assert_eq!(vm.rom(), &[1, 2, 3]);
        assert_eq!(vm.code(), &[0x0000]);
    }

    #[test]
    fn test_halt() -> Result<(), VmError> {
        let mut vm = vm_with(&[(1, 0xffff), (15, 7)]);
        assert_eq!(exec(&mut vm, EXT, EXT_HALT, 0, 0)?, Flow::Halt);
        Ok(())
    }

    #[test]
    fn test_cpy_and_not() -> Result<(), VmError> {
        let mut vm = vm_with(&[(2, 0x00f0)]);
        exec(&mut vm, EXT, EXT_CPY, 1, 2)?;
        assert_eq!(vm.registers[1], 0x00f0);
        exec(&mut vm, EXT, EXT_NOT, 3, 2)?;
        assert_eq!(vm.registers[3], 0xff0f);
        Ok(())
    }

    #[test]
    fn test_shifts_use_arg0_register() -> Result<(), VmError> {
        // NB. arg0 is also the sub-op selector, so LSL always shifts r3 and
        //     LSR always shifts r4
        let mut vm = vm_with(&[(3, 0x0001), (4, 0x8000), (5, 4)]);
        exec(&mut vm, EXT, EXT_LSL, 5, 0)?;
        assert_eq!(vm.registers[3], 0x0010);
        exec(&mut vm, EXT, EXT_LSR, 5, 0)?;
        assert_eq!(vm.registers[4], 0x0800);
        Ok(())
    }

    #[test]
    fn test_wide_shifts_clear() -> Result<(), VmError> {
        let mut vm = vm_with(&[(3, 0xffff), (4, 0xffff), (5, 16), (6, 0xffff)]);
        exec(&mut vm, EXT, EXT_LSL, 5, 0)?;
        exec(&mut vm, EXT, EXT_LSR, 6, 0)?;
        assert_eq!(vm.registers[3], 0);
        assert_eq!(vm.registers[4], 0);
        Ok(())
    }

    #[test]
    fn test_add_sub_wrap() -> Result<(), VmError> {
        let mut vm = vm_with(&[(1, 0xffff), (2, 0x0002)]);
        exec(&mut vm, ADD, 0, 1, 2)?;
        assert_eq!(vm.registers[0], 0x0001);
        exec(&mut vm, SUB, 3, 2, 1)?;
        assert_eq!(vm.registers[3], 0x0003);
        Ok(())
    }

    #[test]
    fn test_immediates() -> Result<(), VmError> {
        let mut vm = vm_with(&[(1, 0xfff0)]);
        exec(&mut vm, ADDC, 1, 0x1, 0x2)?;
        assert_eq!(vm.registers[1], 0x0002);
        exec(&mut vm, SUBC, 1, 0x0, 0x3)?;
        assert_eq!(vm.registers[1], 0xffff);
        exec(&mut vm, LRC, 2, 0xa, 0x5)?;
        assert_eq!(vm.registers[2], 0x00a5);
        Ok(())
    }

    #[test]
    fn test_cmp() -> Result<(), VmError> {
        let cases = [
            (0u16, 0u16, FLAG_EQUAL),
            (0xffff, 0xffff, FLAG_EQUAL),
            (0, 0xffff, FLAG_LESS),
            (0xffff, 0, FLAG_GREATER),
            (5, 6, FLAG_LESS),
            (7, 6, FLAG_GREATER),
        ];
        for (x, y, flag) in cases {
            let mut vm = vm_with(&[(1, x), (2, y), (0, 0xaaaa)]);
            exec(&mut vm, CMP, 0, 1, 2)?;
            assert_eq!(vm.registers[0], flag, "cmp {} {}", x, y);
        }
        Ok(())
    }

    #[test]
    fn test_bitwise() -> Result<(), VmError> {
        let mut vm = vm_with(&[(1, 0b1100), (2, 0b1010)]);
        exec(&mut vm, AND, 3, 1, 2)?;
        exec(&mut vm, OR, 4, 1, 2)?;
        exec(&mut vm, XOR, 5, 1, 2)?;
        assert_eq!(vm.registers[3..6], [0b1000, 0b1110, 0b0110]);
        Ok(())
    }

    #[test]
    fn test_jmp_parks_one_short() -> Result<(), VmError> {
        let mut vm = vm_with(&[(1, 0x02), (2, 0x10)]);
        exec(&mut vm, EXT, EXT_JMP, 1, 2)?;
        assert_eq!(vm.pc(), 0x020f);
        Ok(())
    }

    #[test]
    fn test_next_fetch_is_jump_target() -> Result<(), VmError> {
        // r1:r2 = 0:3 -> skip over the two LRCs straight to the halt
        let code = vec![0x0512, 0xb3ff, 0xb4ff, 0x0000];
        let mut vm = Interpreter::new(code, vec![]);
        vm.registers[2] = 3;
        assert_eq!(vm.step()?, Flow::Continue);
        assert_eq!(vm.pc(), 3);
        assert_eq!(vm.step()?, Flow::Halt);
        assert_eq!(vm.registers[3], 0);
        assert_eq!(vm.registers[4], 0);
        Ok(())
    }

    #[test]
    fn test_jump_to_zero_wraps_back() -> Result<(), VmError> {
        let mut vm = Interpreter::new(vec![0x0500], vec![]);
        vm.step()?;
        assert_eq!(vm.pc(), 0);
        Ok(())
    }

    #[test]
    fn test_conditional_jumps() -> Result<(), VmError> {
        for (op, taken_on) in [(JLT, FLAG_LESS), (JGT, FLAG_GREATER), (JEQ, FLAG_EQUAL)] {
            for flag in [FLAG_LESS, FLAG_EQUAL, FLAG_GREATER] {
                let mut vm = vm_with(&[(0, flag), (1, 1), (2, 5)]);
                vm.program_counter = 0x40;
                exec(&mut vm, op, 0, 1, 2)?;
                let expected = if flag == taken_on { 0x0104 } else { 0x40 };
                assert_eq!(vm.pc(), expected, "op {:x} flag {}", op, flag);
            }
        }
        Ok(())
    }

    #[test]
    fn test_str_ldr_round_trip() -> Result<(), VmError> {
        let mut vm = vm_with(&[(1, 0xbeef), (2, 0x7f), (3, 0xff)]);
        exec(&mut vm, STR, 1, 2, 3)?;
        exec(&mut vm, LDR, 4, 2, 3)?;
        assert_eq!(vm.registers[4], 0xbeef);
        assert_eq!(vm.memory().read(0x7f, 0xff), 0xbeef);
        Ok(())
    }

    #[test]
    fn test_str_to_rom_fails_untouched() {
        for seg in [0x80u16, 0xff, 0x100] {
            let mut vm = vm_with(&[(1, 0xbeef), (2, seg), (3, 0x01)]);
            let res = exec(&mut vm, STR, 1, 2, 3);
            assert!(matches!(res, Err(VmError::IllegalWrite { .. })));
            assert_eq!(vm.memory().read(seg, 0x01), 0);
            assert_eq!(vm.memory().read(seg & 0xff, 0x01), 0);
        }
    }

    #[test]
    fn test_ldr_truncates_indices() -> Result<(), VmError> {
        let mut vm = vm_with(&[(1, 0x4321), (2, 0x01), (3, 0x02), (5, 0x0101), (6, 0xff02)]);
        exec(&mut vm, STR, 1, 2, 3)?;
        exec(&mut vm, LDR, 4, 5, 6)?;
        assert_eq!(vm.registers[4], 0x4321);
        Ok(())
    }

    #[test]
    fn test_unmapped_opcodes_are_nops() -> Result<(), VmError> {
        let mut vm = vm_with(&[(1, 1), (2, 2)]);
        assert_eq!(exec(&mut vm, 0xf, 1, 1, 2)?, Flow::Continue);
        assert_eq!(exec(&mut vm, EXT, 0x9, 1, 2)?, Flow::Continue);
        assert_eq!(exec(&mut vm, EXT, EXT_NOP, 1, 2)?, Flow::Continue);
        assert_eq!(vm.registers[..3], [0, 1, 2]);
        assert_eq!(vm.pc(), 0);
        Ok(())
    }

    #[test]
    fn test_pc_out_of_bounds() {
        let mut vm = Interpreter::new(vec![], vec![]);
        assert!(matches!(
            vm.step(),
            Err(VmError::PcOutOfBounds { pc: 0, len: 0 })
        ));
    }

    #[test]
    fn test_cpy_add_halt_program() -> Result<(), VmError> {
        // lrc r2, 5; cpy r1, r2; add r3, r1, r2; halt
        let code = vec![0xb205, 0x0112, 0x1312, 0x0000];
        let mut vm = Interpreter::new(code, vec![]);
        let mut flow = Flow::Continue;
        while flow == Flow::Continue {
            flow = vm.step()?;
        }
        assert_eq!(vm.registers[1], 5);
        assert_eq!(vm.registers[2], 5);
        assert_eq!(vm.registers[3], 10);
        Ok(())
    }
}
