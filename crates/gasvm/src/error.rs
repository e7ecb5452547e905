use std::string::String;

/// Failure that aborts execution as a whole.
///
/// Frame level errors such as out of gas are not errors here, they end up in
/// [`ExecutionOutcome`](crate::primitives::ExecutionOutcome).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EVMError<DBError> {
    /// Database lookup failed.
    #[error("database error: {0}")]
    Database(DBError),
    /// Custom error raised outside of execution.
    #[error("{0}")]
    Custom(String),
}

impl<DBError> EVMError<DBError> {
    /// Maps the database error.
    pub fn map_db_err<F, E>(self, op: F) -> EVMError<E>
    where
        F: FnOnce(DBError) -> E,
    {
        match self {
            Self::Database(e) => EVMError::Database(op(e)),
            Self::Custom(e) => EVMError::Custom(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn display() {
        let err: EVMError<&str> = EVMError::Database("missing trie node");
        assert_eq!(err.to_string(), "database error: missing trie node");
        assert_eq!(err.map_db_err(str::len), EVMError::Database(17));
    }
}
