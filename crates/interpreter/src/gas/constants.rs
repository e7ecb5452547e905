/// Gas of operations that cost nothing.
pub const ZERO: u64 = 0;
/// Gas of the cheapest tier (`ADDRESS`, `POP`, `PC`, ...).
pub const BASE: u64 = 2;

/// Gas of simple stack and memory operations.
pub const VERYLOW: u64 = 3;
/// Gas of multiplication and division.
pub const LOW: u64 = 5;
/// Gas of `ADDMOD`, `MULMOD` and `JUMP`.
pub const MID: u64 = 8;
/// Gas of `JUMPI`.
pub const HIGH: u64 = 10;
/// Gas of `JUMPDEST`.
pub const JUMPDEST: u64 = 1;
/// Refund for destroying a contract, removed by EIP-3529.
pub const SELFDESTRUCT: i64 = 24000;
/// Gas of `CREATE` and `CREATE2`.
pub const CREATE: u64 = 32000;
/// Surcharge of a call that transfers value.
pub const CALLVALUE: u64 = 9000;
/// Surcharge of a call or selfdestruct that brings a new account into existence.
pub const NEWACCOUNT: u64 = 25000;
/// Base gas of `EXP`.
pub const EXP: u64 = 10;
/// Linear gas per word of memory.
pub const MEMORY: u64 = 3;
/// Divisor of the quadratic term of the memory expansion cost.
pub const MEMORY_QUADRATIC_DIVISOR: u64 = 512;
/// Base gas of `LOG0`..`LOG4`.
pub const LOG: u64 = 375;
/// Gas per byte of log data.
pub const LOGDATA: u64 = 8;
/// Gas per log topic.
pub const LOGTOPIC: u64 = 375;
/// Base gas of `KECCAK256`.
pub const KECCAK256: u64 = 30;
/// Gas per word hashed by `KECCAK256`.
pub const KECCAK256WORD: u64 = 6;
/// Gas per word copied by the `*COPY` opcodes.
pub const COPY: u64 = 3;
/// Gas of `BLOCKHASH`.
pub const BLOCKHASH: u64 = 20;
/// Gas per byte of deployed contract code.
pub const CODEDEPOSIT: u64 = 200;

/// EIP-1283: cost of a no-op or dirty SSTORE.
pub const CONSTANTINOPLE_SLOAD_GAS: u64 = 200;
/// EIP-1884: Repricing for trie-size-dependent opcodes
pub const ISTANBUL_SLOAD_GAS: u64 = 800;
/// Gas of writing a non-zero value into a zero slot.
pub const SSTORE_SET: u64 = 20000;
/// Gas of any other write to a clean slot.
pub const SSTORE_RESET: u64 = 5000;
/// Refund for clearing a slot before EIP-3529.
pub const REFUND_SSTORE_CLEARS: i64 = 15000;
/// EIP-2200: SSTORE fails if no more than this is left.
pub const SSTORE_SENTRY: u64 = 2300;

// berlin eip2929 constants
/// Gas per address of an access list.
pub const ACCESS_LIST_ADDRESS: u64 = 2400;
/// Gas per storage key of an access list.
pub const ACCESS_LIST_STORAGE_KEY: u64 = 1900;
/// Gas of the first read of a slot in a transaction.
pub const COLD_SLOAD_COST: u64 = 2100;
/// Gas of the first touch of an account in a transaction.
pub const COLD_ACCOUNT_ACCESS_COST: u64 = 2600;
/// Gas of reading a warm slot or touching a warm account.
pub const WARM_STORAGE_READ_COST: u64 = 100;
/// Reset tier of a write to a warm slot.
pub const WARM_SSTORE_RESET: u64 = SSTORE_RESET - COLD_SLOAD_COST;

/// EIP-3529: Reduction in refunds
pub const LONDON_REFUND_SSTORE_CLEARS: i64 =
    (SSTORE_RESET - COLD_SLOAD_COST + ACCESS_LIST_STORAGE_KEY) as i64;

/// EIP-3860 : Limit and meter initcode
pub const INITCODE_WORD_COST: u64 = 2;

/// Gas handed to the callee of a value transferring call on top of the forwarded gas.
pub const CALL_STIPEND: u64 = 2300;
