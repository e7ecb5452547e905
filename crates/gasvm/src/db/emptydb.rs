use super::Database;
use crate::primitives::{keccak256, AccountInfo, Address, Bytes, B256, U256};
use core::convert::Infallible;

/// An empty database that always returns default values when queried.
///
/// Block hashes are the keccak of the block number, so `BLOCKHASH` reads stay distinguishable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyDB;

impl Database for EmptyDB {
    type Error = Infallible;

    #[inline]
    fn basic(&mut self, _address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        Ok(None)
    }

    #[inline]
    fn code_by_hash(&mut self, _code_hash: B256) -> Result<Bytes, Self::Error> {
        Ok(Bytes::new())
    }

    #[inline]
    fn storage(&mut self, _address: Address, _index: U256) -> Result<U256, Self::Error> {
        Ok(U256::ZERO)
    }

    #[inline]
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        Ok(keccak256(U256::from(number).to_be_bytes::<32>()))
    }
}
