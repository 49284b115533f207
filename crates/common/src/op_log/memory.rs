use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::provider::{OpLogError, OpLogProvider};
use super::{AppendOutcome, Cursor, NewOperation, Operation};

/// In-memory operation log
///
/// Seqs start at 1 and are dense, which the SQLite log does not promise.
#[derive(Debug, Clone)]
pub struct MemoryOpLog {
    inner: Arc<RwLock<MemoryOpLogInner>>,
}

#[derive(Debug, Default)]
struct MemoryOpLogInner {
    entries: Vec<Operation>,
    client_ids: HashSet<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryOpLogError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

fn poisoned(e: impl std::fmt::Display) -> OpLogError<MemoryOpLogError> {
    OpLogError::Provider(MemoryOpLogError::Internal(format!(
        "failed to acquire lock: {}",
        e
    )))
}

impl MemoryOpLog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryOpLogInner::default())),
        }
    }
}

impl Default for MemoryOpLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OpLogProvider for MemoryOpLog {
    type Error = MemoryOpLogError;

    async fn append(&self, op: NewOperation) -> Result<AppendOutcome, OpLogError<Self::Error>> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        if !inner.client_ids.insert(op.client_op_id.clone()) {
            return Ok(AppendOutcome::Duplicate);
        }

        let seq = inner.entries.len() as i64 + 1;
        inner.entries.push(op.into_operation(seq));
        Ok(AppendOutcome::Appended(seq))
    }

    async fn since(
        &self,
        cursor: Cursor,
        limit: u32,
    ) -> Result<Vec<Operation>, OpLogError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;
        let start = inner.entries.partition_point(|op| op.seq <= cursor);
        Ok(inner.entries[start..]
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn head(&self) -> Result<Cursor, OpLogError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.entries.last().map(|op| op.seq).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op(id: &str) -> NewOperation {
        NewOperation {
            client_op_id: id.to_string(),
            submitted_at: "2024-03-01T08:30:00Z".to_string(),
            kind: "log.add".to_string(),
            payload: json!({"n": id}),
            device_id: "d1".to_string(),
            submitted_by: 1,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_seq() {
        let log = MemoryOpLog::new();
        assert_eq!(log.append(op("a")).await.unwrap(), AppendOutcome::Appended(1));
        assert_eq!(log.append(op("b")).await.unwrap(), AppendOutcome::Appended(2));
        assert_eq!(log.head().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_is_not_stored() {
        let log = MemoryOpLog::new();
        log.append(op("a")).await.unwrap();
        assert_eq!(log.append(op("a")).await.unwrap(), AppendOutcome::Duplicate);
        assert_eq!(log.since(0, 100).await.unwrap().len(), 1);
        assert_eq!(log.head().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_since_pages() {
        let log = MemoryOpLog::new();
        for i in 0..5 {
            log.append(op(&format!("op-{i}"))).await.unwrap();
        }

        let first = log.since(0, 2).await.unwrap();
        assert_eq!(first.iter().map(|o| o.seq).collect::<Vec<_>>(), vec![1, 2]);

        let rest = log.since(2, 10).await.unwrap();
        assert_eq!(rest.iter().map(|o| o.seq).collect::<Vec<_>>(), vec![3, 4, 5]);

        assert!(log.since(5, 10).await.unwrap().is_empty());
        assert!(log.since(99, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_head_is_zero() {
        assert_eq!(MemoryOpLog::new().head().await.unwrap(), 0);
    }
}
