/// Jump destination analysis.
pub mod analysis;
mod contract;
mod memory;
mod stack;

pub use analysis::{AnalyzedBytecode, JumpTable};
pub use contract::Contract;
pub use memory::Memory;
pub use stack::Stack;

use crate::{
    opcode::{self, make_instruction_table, InstructionTable, OPCODE_INFO_JUMPTABLE},
    primitives::{Bytes, RuleSet, U256},
    CallOutcome, CreateOutcome, Gas, Host, InstructionResult,
};
use core::ops::Range;

/// A single execution frame: code, machine state and the gas meter that pays for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interpreter {
    /// Contract information and invoking data
    pub contract: Contract,
    /// Index of the next byte to execute in the bytecode.
    pub program_counter: usize,
    /// The execution control flag. If this is not set to `Continue`, the interpreter will stop
    /// execution.
    pub instruction_result: InstructionResult,
    /// The gas state.
    pub gas: Gas,
    /// Memory.
    pub memory: Memory,
    /// Stack.
    pub stack: Stack,
    /// The return data buffer for internal calls.
    pub return_data_buffer: Bytes,
    /// Memory range holding the output of `RETURN` or `REVERT`.
    pub return_range: Range<usize>,
    /// Whether the interpreter is in "staticcall" mode, meaning no state changes can happen.
    pub is_static: bool,
    /// Fork rules of this execution.
    pub rules: RuleSet,
}

impl Interpreter {
    /// Create new interpreter
    pub fn new(contract: Contract, gas_limit: u64, is_static: bool, rules: RuleSet) -> Self {
        Self {
            contract,
            program_counter: 0,
            instruction_result: InstructionResult::Continue,
            gas: Gas::new(gas_limit),
            memory: Memory::new(),
            stack: Stack::new(),
            return_data_buffer: Bytes::new(),
            return_range: 0..0,
            is_static,
            rules,
        }
    }

    /// Returns the opcode at the current program counter.
    #[inline]
    pub fn current_opcode(&self) -> u8 {
        self.contract
            .bytecode
            .bytecode()
            .get(self.program_counter)
            .copied()
            .unwrap_or(opcode::STOP)
    }

    /// Executes the instruction at the current program counter.
    ///
    /// The static part of the opcode's cost is charged here, before its handler runs.
    #[inline]
    pub fn step<H: Host + ?Sized>(&mut self, instruction_table: &InstructionTable<H>, host: &mut H) {
        let opcode = self.current_opcode();
        // Bytecode is padded, so the counter can move past the last instruction and land on STOP.
        self.program_counter += 1;

        if let Some(info) = OPCODE_INFO_JUMPTABLE[opcode as usize] {
            if !self.gas.record_cost(info.static_gas()) {
                self.instruction_result = InstructionResult::OutOfGas;
                return;
            }
        }

        instruction_table[opcode as usize](self, host)
    }

    /// Executes the interpreter until it returns or stops.
    ///
    /// An exceptional halt consumes all gas given to the frame.
    pub fn run<H: Host + ?Sized>(&mut self, host: &mut H) -> InstructionResult {
        let instruction_table = make_instruction_table::<H>();
        self.run_with_table(&instruction_table, host)
    }

    /// Same as [`run`](Self::run) but with a prebuilt instruction table.
    pub fn run_with_table<H: Host + ?Sized>(
        &mut self,
        instruction_table: &InstructionTable<H>,
        host: &mut H,
    ) -> InstructionResult {
        while self.instruction_result == InstructionResult::Continue {
            self.step(instruction_table, host);
        }
        if self.instruction_result.is_error() {
            self.gas.spend_all();
        }
        self.instruction_result
    }

    /// Returns a copy of the interpreter's return value, if any.
    #[inline]
    pub fn return_value(&self) -> Bytes {
        Bytes::copy_from_slice(self.return_value_slice())
    }

    /// Returns a reference to the interpreter's return value, if any.
    #[inline]
    pub fn return_value_slice(&self) -> &[u8] {
        if self.return_range.is_empty() {
            &[]
        } else {
            self.memory
                .slice(self.return_range.start, self.return_range.len())
        }
    }

    /// Charges memory expansion so that `offset..offset + len` is addressable and grows memory.
    #[inline]
    pub fn resize_memory(&mut self, offset: usize, len: usize) -> Result<(), InstructionResult> {
        resize_memory(&mut self.gas, &mut self.memory, offset, len)
    }

    /// Applies the result of a finished call frame.
    ///
    /// The output is copied into `return_range`, truncated to the shorter of the two. Unspent gas
    /// of the child comes back on success and on revert.
    pub fn insert_call_outcome(&mut self, outcome: CallOutcome, return_range: Range<usize>) {
        let CallOutcome {
            result,
            gas,
            output,
        } = outcome;
        self.return_data_buffer = output;

        match result {
            crate::return_ok!() | crate::return_revert!() => {
                self.gas.erase_cost(gas.remaining());
                let target_len = return_range.len().min(self.return_data_buffer.len());
                if target_len != 0 {
                    self.memory.set(
                        return_range.start,
                        &self.return_data_buffer[..target_len],
                    );
                }
                let success = if result.is_ok() { U256::from(1) } else { U256::ZERO };
                push!(self, success);
            }
            InstructionResult::FatalExternalError => {
                self.instruction_result = InstructionResult::FatalExternalError;
            }
            _ => {
                push!(self, U256::ZERO);
            }
        }
    }

    /// Applies the result of a finished create frame, pushing the new address or zero.
    pub fn insert_create_outcome(&mut self, outcome: CreateOutcome) {
        let CreateOutcome {
            result,
            address,
            gas,
            output,
        } = outcome;
        self.return_data_buffer = if result == InstructionResult::Revert {
            output
        } else {
            Bytes::new()
        };

        match result {
            crate::return_ok!() => {
                self.gas.erase_cost(gas.remaining());
                match address {
                    Some(address) => {
                        push_b256!(self, address.into_word());
                    }
                    None => {
                        push!(self, U256::ZERO);
                    }
                }
            }
            crate::return_revert!() => {
                self.gas.erase_cost(gas.remaining());
                push!(self, U256::ZERO);
            }
            InstructionResult::FatalExternalError => {
                self.instruction_result = InstructionResult::FatalExternalError;
            }
            _ => {
                push!(self, U256::ZERO);
            }
        }
    }
}

/// Charges memory expansion and grows `memory` to cover `offset..offset + len`.
///
/// Works on the fields directly so that instructions can keep other parts of the interpreter
/// borrowed.
#[inline]
pub(crate) fn resize_memory(
    gas: &mut Gas,
    memory: &mut Memory,
    offset: usize,
    len: usize,
) -> Result<(), InstructionResult> {
    if let Some(new_len) = gas.record_memory_expansion(offset as u64, len as u64)? {
        memory.resize(new_len);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        opcode::*,
        primitives::{address, Address, SpecId},
        DummyHost,
    };

    fn interpreter(code: &[u8], gas_limit: u64) -> Interpreter {
        let contract = Contract::new(
            Bytes::new(),
            code,
            Address::ZERO,
            Address::ZERO,
            U256::ZERO,
        );
        Interpreter::new(contract, gas_limit, false, RuleSet::new(SpecId::LATEST))
    }

    #[test]
    fn empty_code_stops() {
        let mut interp = interpreter(&[], 100);
        assert_eq!(interp.run(&mut DummyHost::default()), InstructionResult::Stop);
        assert_eq!(interp.gas.spent(), 0);
    }

    #[test]
    fn static_gas_is_charged_before_dispatch() {
        let mut interp = interpreter(&[PUSH1, 1, PUSH1, 2, ADD], 100);
        interp.run(&mut DummyHost::default());
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.gas.spent(), 9);
        assert_eq!(interp.stack.data(), &vec![U256::from(3)]);
    }

    #[test]
    fn halt_consumes_all_gas() {
        let mut interp = interpreter(&[PUSH1, 1, INVALID], 1000);
        assert_eq!(
            interp.run(&mut DummyHost::default()),
            InstructionResult::InvalidFEOpcode
        );
        assert_eq!(interp.gas.remaining(), 0);

        let mut interp = interpreter(&[PUSH1, 1], 2);
        assert_eq!(
            interp.run(&mut DummyHost::default()),
            InstructionResult::OutOfGas
        );
        assert_eq!(interp.gas.remaining(), 0);
    }

    #[test]
    fn revert_keeps_unspent_gas() {
        // MSTORE8(0, 0xff), REVERT(0, 1)
        let code = [PUSH1, 0xff, PUSH1, 0, MSTORE8, PUSH1, 1, PUSH1, 0, REVERT];
        let mut interp = interpreter(&code, 1000);
        assert_eq!(interp.run(&mut DummyHost::default()), InstructionResult::Revert);
        assert_eq!(interp.return_value().as_ref(), &[0xff]);
        assert_eq!(interp.gas.spent(), 3 + 3 + 3 + 3 + 3 + 3);
    }

    #[test]
    fn call_outcome_copies_truncated_output() {
        let mut interp = interpreter(&[], 1000);
        interp.resize_memory(0, 32).unwrap();
        assert!(interp.gas.record_cost(500));
        let outcome = CallOutcome::new(
            InstructionResult::Return,
            Gas::new(200),
            Bytes::from_static(&[1, 2, 3, 4]),
        );
        interp.insert_call_outcome(outcome, 4..6);
        assert_eq!(interp.stack.data(), &vec![U256::from(1)]);
        assert_eq!(&interp.memory.data()[4..7], &[1, 2, 0]);
        assert_eq!(interp.return_data_buffer.len(), 4);
        assert_eq!(interp.gas.remaining(), 1000 - 3 - 500 + 200);
    }

    #[test]
    fn failed_call_pushes_zero_and_keeps_gas_spent() {
        let mut interp = interpreter(&[], 1000);
        assert!(interp.gas.record_cost(500));
        let outcome = CallOutcome::new(InstructionResult::OutOfGas, Gas::new(200), Bytes::new());
        interp.insert_call_outcome(outcome, 0..0);
        assert_eq!(interp.stack.data(), &vec![U256::ZERO]);
        assert_eq!(interp.gas.remaining(), 500);

        let outcome = CallOutcome::new(InstructionResult::Revert, Gas::new(200), Bytes::new());
        interp.insert_call_outcome(outcome, 0..0);
        assert_eq!(interp.gas.remaining(), 700);
    }

    #[test]
    fn create_outcome_pushes_address() {
        let created = address!("00000000000000000000000000000000000000aa");
        let mut interp = interpreter(&[], 1000);
        let outcome = CreateOutcome::new(
            InstructionResult::Return,
            Some(created),
            Gas::new(0),
            Bytes::new(),
        );
        interp.insert_create_outcome(outcome);
        assert_eq!(
            interp.stack.data(),
            &vec![U256::from_be_bytes(created.into_word().0)]
        );

        let outcome = CreateOutcome::new(
            InstructionResult::Revert,
            None,
            Gas::new(0),
            Bytes::from_static(&[9]),
        );
        interp.insert_create_outcome(outcome);
        assert_eq!(interp.stack.data()[1], U256::ZERO);
        assert_eq!(interp.return_data_buffer.as_ref(), &[9]);
    }

    #[test]
    fn fatal_external_error_halts_frame() {
        let mut interp = interpreter(&[], 1000);
        let outcome = CallOutcome::new(
            InstructionResult::FatalExternalError,
            Gas::new(0),
            Bytes::new(),
        );
        interp.insert_call_outcome(outcome, 0..0);
        assert_eq!(
            interp.instruction_result,
            InstructionResult::FatalExternalError
        );
        assert!(interp.stack.is_empty());
    }
}
