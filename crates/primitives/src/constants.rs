//! Protocol limits and well known hashes.
use crate::{b256, B256};

/// Interpreter stack limit.
pub const STACK_LIMIT: usize = 1024;

/// Maximum nesting of message calls and contract creations.
pub const CALL_STACK_LIMIT: u64 = 1024;

/// EIP-170: Contract code size limit
///
/// By default this limit is 0x6000 (~25kb)
pub const MAX_CODE_SIZE: usize = 0x6000;

/// EIP-3860: Limit and meter initcode
pub const MAX_INITCODE_SIZE: usize = 2 * MAX_CODE_SIZE;

/// Number of block hashes that the `BLOCKHASH` opcode can look back.
pub const BLOCK_HASH_HISTORY: u64 = 256;

/// Largest memory size, in bytes, whose expansion cost fits in a `u64`.
///
/// The quadratic term of a larger request would overflow, so it is rejected up front.
pub const MAX_MEMORY_SIZE: u64 = 0x1F_FFFF_FFE0;

/// Keccak256 of the empty byte string.
pub const KECCAK_EMPTY: B256 =
    b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");
