//! EVM opcode definitions and utilities.

use crate::{instructions::*, Host, Interpreter};
use core::fmt;

/// EVM opcode function signature.
pub type Instruction<H> = fn(&mut Interpreter, &mut H);

/// Instruction table is list of instruction function pointers mapped to
/// 256 EVM opcodes.
pub type InstructionTable<H> = [Instruction<H>; 256];

/// Make instruction table.
///
/// Fork differences are resolved inside the handlers from the interpreter's rule set, so one
/// table serves every fork.
#[inline]
pub const fn make_instruction_table<H: Host + ?Sized>() -> InstructionTable<H> {
    // Force const-eval of the table creation, making this function trivial.
    struct ConstTable<H: Host + ?Sized> {
        _host: core::marker::PhantomData<H>,
    }
    impl<H: Host + ?Sized> ConstTable<H> {
        const NEW: InstructionTable<H> = {
            let mut tables: InstructionTable<H> = [control::unknown; 256];
            let mut i = 0;
            while i < 256 {
                tables[i] = instruction::<H>(i as u8);
                i += 1;
            }
            tables
        };
    }
    ConstTable::<H>::NEW
}

/// An error indicating that an opcode name is invalid.
#[derive(Debug, PartialEq, Eq)]
#[cfg(feature = "parse")]
pub struct OpCodeError(());

#[cfg(feature = "parse")]
impl fmt::Display for OpCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid opcode")
    }
}

#[cfg(all(feature = "std", feature = "parse"))]
impl std::error::Error for OpCodeError {}

/// An EVM opcode.
///
/// This is always a valid opcode, as declared in the [`opcode`][self] module or the
/// [`OPCODE_INFO_JUMPTABLE`] constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OpCode(u8);

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "parse")]
impl core::str::FromStr for OpCode {
    type Err = OpCodeError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(OpCodeError(()))
    }
}

impl OpCode {
    /// Instantiate a new opcode from a u8.
    #[inline]
    pub const fn new(opcode: u8) -> Option<Self> {
        match OPCODE_INFO_JUMPTABLE[opcode as usize] {
            Some(_) => Some(Self(opcode)),
            None => None,
        }
    }

    /// Parses an opcode from a string. This is the inverse of [`as_str`](Self::as_str).
    #[inline]
    #[cfg(feature = "parse")]
    pub fn parse(s: &str) -> Option<Self> {
        NAME_TO_OPCODE.get(s).copied()
    }

    /// Returns true if the opcode is a `PUSH` instruction.
    #[inline]
    pub const fn is_push(self) -> bool {
        self.0 >= PUSH1 && self.0 <= PUSH32
    }

    /// Returns the opcode as a string. This is the inverse of [`parse`](Self::parse).
    #[doc(alias = "name")]
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.info().name()
    }

    /// Returns the opcode name, `"UNKNOWN"` for undefined bytes.
    #[inline]
    pub const fn name_by_op(opcode: u8) -> &'static str {
        match Self::new(opcode) {
            Some(opcode) => opcode.as_str(),
            None => "UNKNOWN",
        }
    }

    /// Returns the opcode information.
    #[inline]
    pub const fn info(&self) -> OpCodeInfo {
        match OPCODE_INFO_JUMPTABLE[self.0 as usize] {
            Some(info) => info,
            // `OpCode` is only constructed for defined opcodes.
            None => OpCodeInfo::new("UNKNOWN"),
        }
    }

    /// Returns the opcode as a u8.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Information about opcode, such as name, stack inputs and outputs and the gas charged before
/// its handler runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OpCodeInfo {
    name: &'static str,
    /// Stack inputs.
    inputs: u8,
    /// Stack outputs.
    outputs: u8,
    /// Gas charged by the interpreter loop before dispatch.
    static_gas: u16,
    /// Number of immediate bytes following the opcode.
    immediate_size: u8,
    /// If the opcode stops execution. aka STOP, RETURN, ..
    terminating: bool,
}

impl OpCodeInfo {
    /// Creates a new opcode info with the given name and default values.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            inputs: 0,
            outputs: 0,
            static_gas: 0,
            immediate_size: 0,
            terminating: false,
        }
    }

    /// Returns the opcode name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Calculates the difference between the number of input and output stack elements.
    #[inline]
    pub const fn io_diff(&self) -> i16 {
        self.outputs as i16 - self.inputs as i16
    }

    /// Returns the number of input stack elements.
    #[inline]
    pub const fn inputs(&self) -> u8 {
        self.inputs
    }

    /// Returns the number of output stack elements.
    #[inline]
    pub const fn outputs(&self) -> u8 {
        self.outputs
    }

    /// Gas charged before the handler runs.
    #[inline]
    pub const fn static_gas(&self) -> u64 {
        self.static_gas as u64
    }

    /// Returns whether this opcode terminates execution, e.g. `STOP`, `RETURN`, etc.
    #[inline]
    pub const fn is_terminating(&self) -> bool {
        self.terminating
    }

    /// Returns the size of the immediate value in bytes.
    #[inline]
    pub const fn immediate_size(&self) -> u8 {
        self.immediate_size
    }
}

/// Sets the immediate bytes number.
#[inline]
pub const fn immediate_size(mut op: OpCodeInfo, n: u8) -> OpCodeInfo {
    op.immediate_size = n;
    op
}

/// Sets the terminating flag to true.
#[inline]
pub const fn terminating(mut op: OpCodeInfo) -> OpCodeInfo {
    op.terminating = true;
    op
}

/// Sets the number of stack inputs and outputs.
#[inline]
pub const fn stack_io(mut op: OpCodeInfo, inputs: u8, outputs: u8) -> OpCodeInfo {
    op.inputs = inputs;
    op.outputs = outputs;
    op
}

/// Sets the gas charged before dispatch.
#[inline]
pub const fn static_gas(mut op: OpCodeInfo, gas: u16) -> OpCodeInfo {
    op.static_gas = gas;
    op
}

/// Returns the gas charged before dispatch of `opcode`, zero for undefined opcodes.
#[inline]
pub const fn static_gas_by_op(opcode: u8) -> u64 {
    match OPCODE_INFO_JUMPTABLE[opcode as usize] {
        Some(info) => info.static_gas(),
        None => 0,
    }
}

/// Callback for creating a [`phf`] map with `stringify_with_cb`.
#[cfg(feature = "parse")]
macro_rules! phf_map_cb {
    ($(#[doc = $s:literal] $id:ident)*) => {
        phf::phf_map! {
            $($s => OpCode::$id),*
        }
    };
}

/// Stringifies identifiers with `paste` so that they are available as literals.
/// This doesn't work with `stringify!` because it cannot be expanded inside of another macro.
#[cfg(feature = "parse")]
macro_rules! stringify_with_cb {
    ($callback:ident; $($id:ident)*) => { paste::paste! {
        $callback! { $(#[doc = "" $id ""] $id)* }
    }};
}

macro_rules! opcodes {
    ($($val:literal => $name:ident => $f:expr => $($modifier:ident $(( $($modifier_arg:expr),* ))?),*);* $(;)?) => {
        // Constants for each opcode. This also takes care of duplicate names.
        $(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name),"\") opcode.")]
            pub const $name: u8 = $val;
        )*
        impl OpCode {$(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name),"\") opcode.")]
            pub const $name: Self = Self($val);
        )*}

        /// Maps each opcode to its info.
        pub const OPCODE_INFO_JUMPTABLE: [Option<OpCodeInfo>; 256] = {
            let mut map = [None; 256];
            let mut prev: u8 = 0;
            $(
                let val: u8 = $val;
                assert!(val == 0 || val > prev, "opcodes must be sorted in ascending order");
                prev = val;
                let info = OpCodeInfo::new(stringify!($name));
                $(
                let info = $modifier(info, $($($modifier_arg),*)?);
                )*
                map[$val] = Some(info);
            )*
            let _ = prev;
            map
        };

        /// Maps each name to its opcode.
        #[cfg(feature = "parse")]
        static NAME_TO_OPCODE: phf::Map<&'static str, OpCode> = stringify_with_cb! { phf_map_cb; $($name)* };

        /// Returns the instruction function for the given opcode.
        pub const fn instruction<H: Host + ?Sized>(opcode: u8) -> Instruction<H> {
            match opcode {
                $($name => $f,)*
                _ => control::unknown,
            }
        }
    };
}

// When adding new opcodes:
// 1. add the opcode to the list below; make sure it's sorted by opcode value
// 2. implement the opcode in the corresponding module;
//    the function signature must be the exact same as the others
// 3. give it the part of its cost that does not depend on machine state as `static_gas`
opcodes! {
    0x00 => STOP       => control::stop          => stack_io(0, 0), terminating;
    0x01 => ADD        => arithmetic::add        => stack_io(2, 1), static_gas(3);
    0x02 => MUL        => arithmetic::mul        => stack_io(2, 1), static_gas(5);
    0x03 => SUB        => arithmetic::sub        => stack_io(2, 1), static_gas(3);
    0x04 => DIV        => arithmetic::div        => stack_io(2, 1), static_gas(5);
    0x05 => SDIV       => arithmetic::sdiv       => stack_io(2, 1), static_gas(5);
    0x06 => MOD        => arithmetic::rem        => stack_io(2, 1), static_gas(5);
    0x07 => SMOD       => arithmetic::smod       => stack_io(2, 1), static_gas(5);
    0x08 => ADDMOD     => arithmetic::addmod     => stack_io(3, 1), static_gas(8);
    0x09 => MULMOD     => arithmetic::mulmod     => stack_io(3, 1), static_gas(8);
    0x0A => EXP        => arithmetic::exp        => stack_io(2, 1);
    0x0B => SIGNEXTEND => arithmetic::signextend => stack_io(2, 1), static_gas(5);

    0x10 => LT     => bitwise::lt     => stack_io(2, 1), static_gas(3);
    0x11 => GT     => bitwise::gt     => stack_io(2, 1), static_gas(3);
    0x12 => SLT    => bitwise::slt    => stack_io(2, 1), static_gas(3);
    0x13 => SGT    => bitwise::sgt    => stack_io(2, 1), static_gas(3);
    0x14 => EQ     => bitwise::eq     => stack_io(2, 1), static_gas(3);
    0x15 => ISZERO => bitwise::iszero => stack_io(1, 1), static_gas(3);
    0x16 => AND    => bitwise::bitand => stack_io(2, 1), static_gas(3);
    0x17 => OR     => bitwise::bitor  => stack_io(2, 1), static_gas(3);
    0x18 => XOR    => bitwise::bitxor => stack_io(2, 1), static_gas(3);
    0x19 => NOT    => bitwise::not    => stack_io(1, 1), static_gas(3);
    0x1A => BYTE   => bitwise::byte   => stack_io(2, 1), static_gas(3);
    0x1B => SHL    => bitwise::shl    => stack_io(2, 1), static_gas(3);
    0x1C => SHR    => bitwise::shr    => stack_io(2, 1), static_gas(3);
    0x1D => SAR    => bitwise::sar    => stack_io(2, 1), static_gas(3);

    0x20 => KECCAK256 => system::keccak256 => stack_io(2, 1);

    0x30 => ADDRESS      => system::address      => stack_io(0, 1), static_gas(2);
    0x31 => BALANCE      => host::balance        => stack_io(1, 1);
    0x32 => ORIGIN       => host_env::origin     => stack_io(0, 1), static_gas(2);
    0x33 => CALLER       => system::caller       => stack_io(0, 1), static_gas(2);
    0x34 => CALLVALUE    => system::callvalue    => stack_io(0, 1), static_gas(2);
    0x35 => CALLDATALOAD => system::calldataload => stack_io(1, 1), static_gas(3);
    0x36 => CALLDATASIZE => system::calldatasize => stack_io(0, 1), static_gas(2);
    0x37 => CALLDATACOPY => system::calldatacopy => stack_io(3, 0);
    0x38 => CODESIZE     => system::codesize     => stack_io(0, 1), static_gas(2);
    0x39 => CODECOPY     => system::codecopy     => stack_io(3, 0);

    0x3A => GASPRICE       => host_env::gasprice     => stack_io(0, 1), static_gas(2);
    0x3B => EXTCODESIZE    => host::extcodesize      => stack_io(1, 1);
    0x3C => EXTCODECOPY    => host::extcodecopy      => stack_io(4, 0);
    0x3D => RETURNDATASIZE => system::returndatasize => stack_io(0, 1), static_gas(2);
    0x3E => RETURNDATACOPY => system::returndatacopy => stack_io(3, 0);
    0x3F => EXTCODEHASH    => host::extcodehash      => stack_io(1, 1);
    0x40 => BLOCKHASH      => host::blockhash        => stack_io(1, 1), static_gas(20);
    0x41 => COINBASE       => host_env::coinbase     => stack_io(0, 1), static_gas(2);
    0x42 => TIMESTAMP      => host_env::timestamp    => stack_io(0, 1), static_gas(2);
    0x43 => NUMBER         => host_env::number       => stack_io(0, 1), static_gas(2);
    0x44 => DIFFICULTY     => host_env::difficulty   => stack_io(0, 1), static_gas(2);
    0x45 => GASLIMIT       => host_env::gaslimit     => stack_io(0, 1), static_gas(2);
    0x46 => CHAINID        => host_env::chainid      => stack_io(0, 1), static_gas(2);
    0x47 => SELFBALANCE    => host::selfbalance      => stack_io(0, 1), static_gas(5);
    0x48 => BASEFEE        => host_env::basefee      => stack_io(0, 1), static_gas(2);

    0x50 => POP      => stack::pop        => stack_io(1, 0), static_gas(2);
    0x51 => MLOAD    => memory::mload     => stack_io(1, 1), static_gas(3);
    0x52 => MSTORE   => memory::mstore    => stack_io(2, 0), static_gas(3);
    0x53 => MSTORE8  => memory::mstore8   => stack_io(2, 0), static_gas(3);
    0x54 => SLOAD    => host::sload       => stack_io(1, 1);
    0x55 => SSTORE   => host::sstore      => stack_io(2, 0);
    0x56 => JUMP     => control::jump     => stack_io(1, 0), static_gas(8);
    0x57 => JUMPI    => control::jumpi    => stack_io(2, 0), static_gas(10);
    0x58 => PC       => control::pc       => stack_io(0, 1), static_gas(2);
    0x59 => MSIZE    => memory::msize     => stack_io(0, 1), static_gas(2);
    0x5A => GAS      => system::gas       => stack_io(0, 1), static_gas(2);
    0x5B => JUMPDEST => control::jumpdest => stack_io(0, 0), static_gas(1);

    0x5F => PUSH0  => stack::push0         => stack_io(0, 1), static_gas(2);
    0x60 => PUSH1  => stack::push::<1, H>  => stack_io(0, 1), static_gas(3), immediate_size(1);
    0x61 => PUSH2  => stack::push::<2, H>  => stack_io(0, 1), static_gas(3), immediate_size(2);
    0x62 => PUSH3  => stack::push::<3, H>  => stack_io(0, 1), static_gas(3), immediate_size(3);
    0x63 => PUSH4  => stack::push::<4, H>  => stack_io(0, 1), static_gas(3), immediate_size(4);
    0x64 => PUSH5  => stack::push::<5, H>  => stack_io(0, 1), static_gas(3), immediate_size(5);
    0x65 => PUSH6  => stack::push::<6, H>  => stack_io(0, 1), static_gas(3), immediate_size(6);
    0x66 => PUSH7  => stack::push::<7, H>  => stack_io(0, 1), static_gas(3), immediate_size(7);
    0x67 => PUSH8  => stack::push::<8, H>  => stack_io(0, 1), static_gas(3), immediate_size(8);
    0x68 => PUSH9  => stack::push::<9, H>  => stack_io(0, 1), static_gas(3), immediate_size(9);
    0x69 => PUSH10 => stack::push::<10, H> => stack_io(0, 1), static_gas(3), immediate_size(10);
    0x6A => PUSH11 => stack::push::<11, H> => stack_io(0, 1), static_gas(3), immediate_size(11);
    0x6B => PUSH12 => stack::push::<12, H> => stack_io(0, 1), static_gas(3), immediate_size(12);
    0x6C => PUSH13 => stack::push::<13, H> => stack_io(0, 1), static_gas(3), immediate_size(13);
    0x6D => PUSH14 => stack::push::<14, H> => stack_io(0, 1), static_gas(3), immediate_size(14);
    0x6E => PUSH15 => stack::push::<15, H> => stack_io(0, 1), static_gas(3), immediate_size(15);
    0x6F => PUSH16 => stack::push::<16, H> => stack_io(0, 1), static_gas(3), immediate_size(16);
    0x70 => PUSH17 => stack::push::<17, H> => stack_io(0, 1), static_gas(3), immediate_size(17);
    0x71 => PUSH18 => stack::push::<18, H> => stack_io(0, 1), static_gas(3), immediate_size(18);
    0x72 => PUSH19 => stack::push::<19, H> => stack_io(0, 1), static_gas(3), immediate_size(19);
    0x73 => PUSH20 => stack::push::<20, H> => stack_io(0, 1), static_gas(3), immediate_size(20);
    0x74 => PUSH21 => stack::push::<21, H> => stack_io(0, 1), static_gas(3), immediate_size(21);
    0x75 => PUSH22 => stack::push::<22, H> => stack_io(0, 1), static_gas(3), immediate_size(22);
    0x76 => PUSH23 => stack::push::<23, H> => stack_io(0, 1), static_gas(3), immediate_size(23);
    0x77 => PUSH24 => stack::push::<24, H> => stack_io(0, 1), static_gas(3), immediate_size(24);
    0x78 => PUSH25 => stack::push::<25, H> => stack_io(0, 1), static_gas(3), immediate_size(25);
    0x79 => PUSH26 => stack::push::<26, H> => stack_io(0, 1), static_gas(3), immediate_size(26);
    0x7A => PUSH27 => stack::push::<27, H> => stack_io(0, 1), static_gas(3), immediate_size(27);
    0x7B => PUSH28 => stack::push::<28, H> => stack_io(0, 1), static_gas(3), immediate_size(28);
    0x7C => PUSH29 => stack::push::<29, H> => stack_io(0, 1), static_gas(3), immediate_size(29);
    0x7D => PUSH30 => stack::push::<30, H> => stack_io(0, 1), static_gas(3), immediate_size(30);
    0x7E => PUSH31 => stack::push::<31, H> => stack_io(0, 1), static_gas(3), immediate_size(31);
    0x7F => PUSH32 => stack::push::<32, H> => stack_io(0, 1), static_gas(3), immediate_size(32);

    0x80 => DUP1  => stack::dup::<1, H>  => stack_io(1, 2), static_gas(3);
    0x81 => DUP2  => stack::dup::<2, H>  => stack_io(2, 3), static_gas(3);
    0x82 => DUP3  => stack::dup::<3, H>  => stack_io(3, 4), static_gas(3);
    0x83 => DUP4  => stack::dup::<4, H>  => stack_io(4, 5), static_gas(3);
    0x84 => DUP5  => stack::dup::<5, H>  => stack_io(5, 6), static_gas(3);
    0x85 => DUP6  => stack::dup::<6, H>  => stack_io(6, 7), static_gas(3);
    0x86 => DUP7  => stack::dup::<7, H>  => stack_io(7, 8), static_gas(3);
    0x87 => DUP8  => stack::dup::<8, H>  => stack_io(8, 9), static_gas(3);
    0x88 => DUP9  => stack::dup::<9, H>  => stack_io(9, 10), static_gas(3);
    0x89 => DUP10 => stack::dup::<10, H> => stack_io(10, 11), static_gas(3);
    0x8A => DUP11 => stack::dup::<11, H> => stack_io(11, 12), static_gas(3);
    0x8B => DUP12 => stack::dup::<12, H> => stack_io(12, 13), static_gas(3);
    0x8C => DUP13 => stack::dup::<13, H> => stack_io(13, 14), static_gas(3);
    0x8D => DUP14 => stack::dup::<14, H> => stack_io(14, 15), static_gas(3);
    0x8E => DUP15 => stack::dup::<15, H> => stack_io(15, 16), static_gas(3);
    0x8F => DUP16 => stack::dup::<16, H> => stack_io(16, 17), static_gas(3);

    0x90 => SWAP1  => stack::swap::<1, H>  => stack_io(2, 2), static_gas(3);
    0x91 => SWAP2  => stack::swap::<2, H>  => stack_io(3, 3), static_gas(3);
    0x92 => SWAP3  => stack::swap::<3, H>  => stack_io(4, 4), static_gas(3);
    0x93 => SWAP4  => stack::swap::<4, H>  => stack_io(5, 5), static_gas(3);
    0x94 => SWAP5  => stack::swap::<5, H>  => stack_io(6, 6), static_gas(3);
    0x95 => SWAP6  => stack::swap::<6, H>  => stack_io(7, 7), static_gas(3);
    0x96 => SWAP7  => stack::swap::<7, H>  => stack_io(8, 8), static_gas(3);
    0x97 => SWAP8  => stack::swap::<8, H>  => stack_io(9, 9), static_gas(3);
    0x98 => SWAP9  => stack::swap::<9, H>  => stack_io(10, 10), static_gas(3);
    0x99 => SWAP10 => stack::swap::<10, H> => stack_io(11, 11), static_gas(3);
    0x9A => SWAP11 => stack::swap::<11, H> => stack_io(12, 12), static_gas(3);
    0x9B => SWAP12 => stack::swap::<12, H> => stack_io(13, 13), static_gas(3);
    0x9C => SWAP13 => stack::swap::<13, H> => stack_io(14, 14), static_gas(3);
    0x9D => SWAP14 => stack::swap::<14, H> => stack_io(15, 15), static_gas(3);
    0x9E => SWAP15 => stack::swap::<15, H> => stack_io(16, 16), static_gas(3);
    0x9F => SWAP16 => stack::swap::<16, H> => stack_io(17, 17), static_gas(3);

    0xA0 => LOG0 => host::log::<0, H> => stack_io(2, 0);
    0xA1 => LOG1 => host::log::<1, H> => stack_io(3, 0);
    0xA2 => LOG2 => host::log::<2, H> => stack_io(4, 0);
    0xA3 => LOG3 => host::log::<3, H> => stack_io(5, 0);
    0xA4 => LOG4 => host::log::<4, H> => stack_io(6, 0);

    0xF0 => CREATE       => contract::create::<false, H> => stack_io(3, 1);
    0xF1 => CALL         => contract::call               => stack_io(7, 1);
    0xF2 => CALLCODE     => contract::call_code          => stack_io(7, 1);
    0xF3 => RETURN       => control::ret                 => stack_io(2, 0), terminating;
    0xF4 => DELEGATECALL => contract::delegate_call      => stack_io(6, 1);
    0xF5 => CREATE2      => contract::create::<true, H>  => stack_io(4, 1);

    0xFA => STATICCALL   => contract::static_call => stack_io(6, 1);
    0xFD => REVERT       => control::revert       => stack_io(2, 0), terminating;
    0xFE => INVALID      => control::invalid      => stack_io(0, 0), terminating;
    0xFF => SELFDESTRUCT => host::selfdestruct    => stack_io(1, 0), terminating;
}
