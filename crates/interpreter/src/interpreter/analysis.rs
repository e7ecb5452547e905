use crate::{opcode, primitives::Bytes};
use bitvec::prelude::{bitvec, BitVec, Lsb0};
use std::{sync::Arc, vec::Vec};

/// A map of valid `JUMPDEST` positions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct JumpTable(pub Arc<BitVec<u8>>);

impl JumpTable {
    /// Check if `pc` is a valid jump destination.
    #[inline]
    pub fn is_valid(&self, pc: usize) -> bool {
        pc < self.0.len() && self.0[pc]
    }
}

/// Legacy bytecode padded with zeros so that a trailing `PUSH` reads zeros and execution ends on
/// an implicit `STOP`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnalyzedBytecode {
    bytecode: Bytes,
    original_len: usize,
    jump_table: JumpTable,
}

impl AnalyzedBytecode {
    /// Pads and analyzes raw bytecode.
    pub fn new(code: &[u8]) -> Self {
        let len = code.len();
        let mut padded = Vec::with_capacity(len + 33);
        padded.extend_from_slice(code);
        padded.resize(len + 33, 0);
        let jump_table = analyze(&padded);
        Self {
            bytecode: Bytes::from(padded),
            original_len: len,
            jump_table,
        }
    }

    /// Padded bytecode.
    #[inline]
    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    /// Bytecode as it was deployed, without padding.
    #[inline]
    pub fn original_bytes(&self) -> Bytes {
        self.bytecode.slice(..self.original_len)
    }

    /// Length of the bytecode without padding.
    #[inline]
    pub fn len(&self) -> usize {
        self.original_len
    }

    /// Returns `true` if there is no code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.original_len == 0
    }

    /// Valid jump destinations.
    #[inline]
    pub fn jump_table(&self) -> &JumpTable {
        &self.jump_table
    }
}

/// Analyze bytecode to build a jump map.
fn analyze(code: &[u8]) -> JumpTable {
    let mut jumps: BitVec<u8> = bitvec![u8, Lsb0; 0; code.len()];

    let mut i = 0;
    while i < code.len() {
        let opcode = code[i];
        if opcode == opcode::JUMPDEST {
            jumps.set(i, true);
            i += 1;
        } else {
            let push_offset = opcode.wrapping_sub(opcode::PUSH1);
            if push_offset < 32 {
                i += push_offset as usize + 2;
            } else {
                i += 1;
            }
        }
    }

    JumpTable(Arc::new(jumps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jumpdest_in_push_data_is_invalid() {
        // PUSH2 0x5b5b JUMPDEST PUSH1 0x00
        let code = AnalyzedBytecode::new(&[0x61, 0x5b, 0x5b, 0x5b, 0x60, 0x00]);
        let jumps = code.jump_table();
        assert!(!jumps.is_valid(1));
        assert!(!jumps.is_valid(2));
        assert!(jumps.is_valid(3));
        assert!(!jumps.is_valid(4));
        assert!(!jumps.is_valid(1000));
    }

    #[test]
    fn padding() {
        // PUSH32 with missing data
        let code = AnalyzedBytecode::new(&[0x7f, 0x01]);
        assert_eq!(code.len(), 2);
        assert_eq!(code.bytecode().len(), 35);
        assert_eq!(code.original_bytes().as_ref(), &[0x7f, 0x01]);
    }
}
