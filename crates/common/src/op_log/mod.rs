//! The append-only operation log
//!
//! Every accepted operation gets a server-assigned sequence number. Devices
//! replay the log in sequence order starting after the highest number they
//! have already seen.

mod memory;
mod provider;

use serde::{Deserialize, Serialize};

use crate::identity::IdentityId;

pub use memory::{MemoryOpLog, MemoryOpLogError};
pub use provider::{OpLogError, OpLogProvider};

/// Server-assigned position in the log
pub type Seq = i64;

/// The highest seq a device has seen. Zero means nothing yet.
pub type Cursor = Seq;

/// An operation as stored in, and replayed from, the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub seq: Seq,
    /// Idempotency key chosen by the submitting device
    #[serde(rename = "id")]
    pub client_op_id: String,
    /// Client-reported time, advisory only
    #[serde(rename = "at")]
    pub submitted_at: String,
    pub kind: String,
    pub payload: serde_json::Value,
    pub device_id: String,
    #[serde(rename = "identityId")]
    pub submitted_by: IdentityId,
}

/// An operation that has passed validation and authorization
#[derive(Debug, Clone, PartialEq)]
pub struct NewOperation {
    pub client_op_id: String,
    pub submitted_at: String,
    pub kind: String,
    pub payload: serde_json::Value,
    pub device_id: String,
    pub submitted_by: IdentityId,
}

impl NewOperation {
    pub(crate) fn into_operation(self, seq: Seq) -> Operation {
        Operation {
            seq,
            client_op_id: self.client_op_id,
            submitted_at: self.submitted_at,
            kind: self.kind,
            payload: self.payload,
            device_id: self.device_id,
            submitted_by: self.submitted_by,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Newly written at this seq
    Appended(Seq),
    /// An operation with the same client id is already in the log
    Duplicate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_wire_shape() {
        let op = Operation {
            seq: 3,
            client_op_id: "op-1".to_string(),
            submitted_at: "2024-03-01T08:30:00Z".to_string(),
            kind: "log.add".to_string(),
            payload: json!({"studentId": "s1"}),
            device_id: "tablet-2".to_string(),
            submitted_by: 5,
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({
                "seq": 3,
                "id": "op-1",
                "at": "2024-03-01T08:30:00Z",
                "kind": "log.add",
                "payload": {"studentId": "s1"},
                "deviceId": "tablet-2",
                "identityId": 5
            })
        );
    }
}
