//! Script opcodes, reduced to what output-script classification needs.
//! See https://en.bitcoin.it/wiki/Script for the full table.

use std::fmt;

/// A script opcode identified by its wire byte
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct All(u8);

impl All {
    pub const OP_0: All = All(0x00);
    pub const OP_PUSHDATA1: All = All(0x4c);
    pub const OP_PUSHDATA2: All = All(0x4d);
    pub const OP_PUSHDATA4: All = All(0x4e);
    pub const OP_RETURN: All = All(0x6a);
    pub const OP_DUP: All = All(0x76);
    pub const OP_EQUAL: All = All(0x87);
    pub const OP_EQUALVERIFY: All = All(0x88);
    pub const OP_HASH160: All = All(0xa9);
    pub const OP_CHECKSIG: All = All(0xac);
    pub const OP_CHECKMULTISIG: All = All(0xae);

    #[inline]
    pub fn code(self) -> u8 {
        self.0
    }

    /// Broad category used by the script evaluator
    pub fn classify(self) -> Class {
        match self.0 {
            0x00 => Class::PushBytes(0),
            0x01..=0x4b => Class::PushBytes(u32::from(self.0)),
            0x4f => Class::PushNum(-1),
            0x51..=0x60 => Class::PushNum(i64::from(self.0) - 0x50),
            0x61 | 0xb0..=0xb9 => Class::NoOp,
            0x6a => Class::ReturnOp,
            _ => Class::Ordinary,
        }
    }
}

impl From<u8> for All {
    #[inline]
    fn from(b: u8) -> All {
        All(b)
    }
}

impl fmt::Debug for All {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            0x00 => write!(f, "OP_0"),
            0x4c => write!(f, "OP_PUSHDATA1"),
            0x4d => write!(f, "OP_PUSHDATA2"),
            0x4e => write!(f, "OP_PUSHDATA4"),
            0x4f => write!(f, "OP_PUSHNUM_NEG1"),
            0x51..=0x60 => write!(f, "OP_PUSHNUM_{}", self.0 - 0x50),
            0x61 => write!(f, "OP_NOP"),
            0x6a => write!(f, "OP_RETURN"),
            0x76 => write!(f, "OP_DUP"),
            0x87 => write!(f, "OP_EQUAL"),
            0x88 => write!(f, "OP_EQUALVERIFY"),
            0xa9 => write!(f, "OP_HASH160"),
            0xac => write!(f, "OP_CHECKSIG"),
            0xae => write!(f, "OP_CHECKMULTISIG"),
            n @ 0x01..=0x4b => write!(f, "OP_PUSHBYTES_{}", n),
            n => write!(f, "OP_UNKNOWN_0x{:02x}", n),
        }
    }
}

/// Classification of opcodes by their effect on the stack
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Class {
    /// Pushes the given number of bytes onto the stack
    PushBytes(u32),
    /// Pushes a small number onto the stack
    PushNum(i64),
    /// Marks the output as unspendable data carrier
    ReturnOp,
    /// Does nothing
    NoOp,
    /// Any other operation
    Ordinary,
}
