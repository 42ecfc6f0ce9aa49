/// # instruction
///
/// Every word is an instruction; it splits into four nibbles:
///
///  15..12  opcode
///  11..8   arg0  -- destination register, or the sub-op for the extended group
///   7..4   arg1
///   3..0   arg2
///
/// Immediates are 8 bits wide and spread across arg1 (high nibble) and arg2
/// (low nibble). Jumps take a segment register and an offset register and go
/// to `seg * 256 + off`.
use std::fmt;

/// opcode 0x0 is a group; arg0 picks the operation
pub const EXT: u8 = 0x0;
pub const EXT_HALT: u8 = 0x0;
pub const EXT_CPY: u8 = 0x1;
pub const EXT_NOT: u8 = 0x2;
pub const EXT_LSL: u8 = 0x3;
pub const EXT_LSR: u8 = 0x4;
pub const EXT_JMP: u8 = 0x5;
pub const EXT_NOP: u8 = 0x6;

pub const ADD: u8 = 0x1;
pub const SUB: u8 = 0x2;
pub const ADDC: u8 = 0x3;
pub const SUBC: u8 = 0x4;
pub const CMP: u8 = 0x5;
pub const JLT: u8 = 0x6;
pub const JGT: u8 = 0x7;
pub const JEQ: u8 = 0x8;
pub const LDR: u8 = 0x9;
pub const STR: u8 = 0xa;
pub const LRC: u8 = 0xb;
pub const AND: u8 = 0xc;
pub const OR: u8 = 0xd;
pub const XOR: u8 = 0xe;

/// values CMP leaves in its destination register
pub const FLAG_LESS: u16 = 0;
pub const FLAG_EQUAL: u16 = 1;
pub const FLAG_GREATER: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub arg0: u8,
    pub arg1: u8,
    pub arg2: u8,
}

/// split a word into its four fields; every word decodes to something
pub fn decode(word: u16) -> Instruction {
    Instruction {
        opcode: (word >> 12 & 0xf) as u8,
        arg0: (word >> 8 & 0xf) as u8,
        arg1: (word >> 4 & 0xf) as u8,
        arg2: (word & 0xf) as u8,
    }
}

impl Instruction {
    pub fn new(opcode: u8, arg0: u8, arg1: u8, arg2: u8) -> Self {
        Instruction {
            opcode: opcode & 0xf,
            arg0: arg0 & 0xf,
            arg1: arg1 & 0xf,
            arg2: arg2 & 0xf,
        }
    }

    /// pack the fields back into a word
    pub fn encode(&self) -> u16 {
        (self.opcode as u16 & 0xf) << 12
            | (self.arg0 as u16 & 0xf) << 8
            | (self.arg1 as u16 & 0xf) << 4
            | (self.arg2 as u16 & 0xf)
    }

    /// the 8-bit immediate carried by ADDC, SUBC and LRC
    pub fn imm8(&self) -> u16 {
        ((self.arg1 as u16) << 4 & 0x00f0) + self.arg2 as u16
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (a0, a1, a2) = (self.arg0, self.arg1, self.arg2);
        match self.opcode {
            EXT => match a0 {
                EXT_HALT => write!(f, "halt"),
                EXT_CPY => write!(f, "cpy r{}, r{}", a1, a2),
                EXT_NOT => write!(f, "not r{}, r{}", a1, a2),
                EXT_LSL => write!(f, "lsl r{}, r{}", a0, a1),
                EXT_LSR => write!(f, "lsr r{}, r{}", a0, a1),
                EXT_JMP => write!(f, "jmp r{}:r{}", a1, a2),
                EXT_NOP => write!(f, "nop"),
                _ => write!(f, ".word 0x{:04x}", self.encode()),
            },
            ADD => write!(f, "add r{}, r{}, r{}", a0, a1, a2),
            SUB => write!(f, "sub r{}, r{}, r{}", a0, a1, a2),
            ADDC => write!(f, "addc r{}, 0x{:02x}", a0, self.imm8()),
            SUBC => write!(f, "subc r{}, 0x{:02x}", a0, self.imm8()),
            CMP => write!(f, "cmp r{}, r{}, r{}", a0, a1, a2),
            JLT => write!(f, "jlt r{}, r{}:r{}", a0, a1, a2),
            JGT => write!(f, "jgt r{}, r{}:r{}", a0, a1, a2),
            JEQ => write!(f, "jeq r{}, r{}:r{}", a0, a1, a2),
            LDR => write!(f, "ldr r{}, [r{}:r{}]", a0, a1, a2),
            STR => write!(f, "str r{}, [r{}:r{}]", a0, a1, a2),
            LRC => write!(f, "lrc r{}, 0x{:02x}", a0, self.imm8()),
            AND => write!(f, "and r{}, r{}, r{}", a0, a1, a2),
            OR => write!(f, "or r{}, r{}, r{}", a0, a1, a2),
            XOR => write!(f, "xor r{}, r{}, r{}", a0, a1, a2),
            _ => write!(f, ".word 0x{:04x}", self.encode()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        let i = decode(0xa123);
        assert_eq!(i.opcode, 0xa);
        assert_eq!(i.arg0, 0x1);
        assert_eq!(i.arg1, 0x2);
        assert_eq!(i.arg2, 0x3);
    }

    #[test]
    fn test_decode_reassembles_every_word() {
        for w in 0..=u16::MAX {
            let i = decode(w);
            let joined = (i.opcode as u16) << 12
                | (i.arg0 as u16) << 8
                | (i.arg1 as u16) << 4
                | i.arg2 as u16;
            assert_eq!(joined, w);
            assert_eq!(i.encode(), w);
        }
    }

    #[test]
    fn test_new_masks_to_nibbles() {
        let i = Instruction::new(0x1f, 0x12, 0xff, 0x10);
        assert_eq!(i, Instruction::new(0xf, 0x2, 0xf, 0x0));
    }

    #[test]
    fn test_imm8() {
        assert_eq!(decode(0xb0ab).imm8(), 0xab);
        assert_eq!(decode(0x3fff).imm8(), 0xff);
        assert_eq!(decode(0x3000).imm8(), 0x00);
    }

    #[test]
    fn test_disassembly() {
        assert_eq!(decode(0x0000).to_string(), "halt");
        assert_eq!(decode(0x0112).to_string(), "cpy r1, r2");
        assert_eq!(decode(0x0534).to_string(), "jmp r3:r4");
        assert_eq!(decode(0x1123).to_string(), "add r1, r2, r3");
        assert_eq!(decode(0xb2ff).to_string(), "lrc r2, 0xff");
        assert_eq!(decode(0xa123).to_string(), "str r1, [r2:r3]");
        assert_eq!(decode(0xf123).to_string(), ".word 0xf123");
        assert_eq!(decode(0x0900).to_string(), ".word 0x0900");
    }
}
