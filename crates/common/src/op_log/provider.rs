use std::fmt::{Debug, Display};

use async_trait::async_trait;

use super::{AppendOutcome, Cursor, NewOperation, Operation};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OpLogError<T> {
    #[error("unhandled op log provider error: {0}")]
    Provider(#[from] T),
}

#[async_trait]
pub trait OpLogProvider: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug;

    /// Append an operation unless its client id is already present
    ///
    /// The existence check and the insert must be a single atomic step;
    /// two concurrent appends of the same client id yield exactly one
    /// `Appended`.
    async fn append(&self, op: NewOperation) -> Result<AppendOutcome, OpLogError<Self::Error>>;

    /// Operations with `seq > cursor`, ascending, at most `limit` of them
    async fn since(
        &self,
        cursor: Cursor,
        limit: u32,
    ) -> Result<Vec<Operation>, OpLogError<Self::Error>>;

    /// Highest seq assigned so far, or zero for an empty log
    async fn head(&self) -> Result<Cursor, OpLogError<Self::Error>>;
}
