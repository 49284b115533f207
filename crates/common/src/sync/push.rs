use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::{SyncError, SyncService};
use crate::identity::{Identity, IdentityProvider};
use crate::op_log::{AppendOutcome, NewOperation, OpLogProvider};
use crate::policy::is_allowed;

/// Result of a push. Duplicates count towards neither field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSummary {
    pub accepted: u64,
    pub rejected: u64,
}

fn non_blank_str<'a>(op: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    op.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Turn one submitted op into something appendable, or `None` if it is
/// structurally invalid
fn parse_op(raw: &Value, identity: &Identity, now: &str) -> Option<NewOperation> {
    let op = raw.as_object()?;
    let client_op_id = non_blank_str(op, "id")?;
    let kind = non_blank_str(op, "kind")?;

    Some(NewOperation {
        client_op_id: client_op_id.to_string(),
        submitted_at: op
            .get("at")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(now)
            .to_string(),
        kind: kind.to_string(),
        payload: op.get("payload").cloned().unwrap_or(Value::Null),
        device_id: op
            .get("deviceId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        submitted_by: identity.id,
    })
}

impl<I, L> SyncService<I, L>
where
    I: IdentityProvider,
    L: OpLogProvider,
{
    /// Validate, authorize and append a batch of ops in order
    ///
    /// Each op is judged on its own. A storage failure stops the batch, but
    /// whatever was appended before it stays in the log.
    pub async fn push(
        &self,
        identity: &Identity,
        ops: Vec<Value>,
    ) -> Result<PushSummary, SyncError> {
        let mut summary = PushSummary::default();
        if ops.is_empty() {
            return Ok(summary);
        }
        if ops.len() > self.config.max_push_batch {
            return Err(SyncError::InvalidRequest(format!(
                "batch of {} ops exceeds the limit of {}",
                ops.len(),
                self.config.max_push_batch
            )));
        }

        let now = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| SyncError::Storage(format!("failed to format timestamp: {}", e)))?;
        let mut duplicates = 0u64;

        for raw in &ops {
            let Some(op) = parse_op(raw, identity, &now) else {
                summary.rejected += 1;
                continue;
            };
            if !is_allowed(identity.role, &op.kind) {
                tracing::debug!(
                    identity_id = identity.id,
                    kind = %op.kind,
                    "op kind not permitted for role"
                );
                summary.rejected += 1;
                continue;
            }

            match self.log.append(op).await? {
                AppendOutcome::Appended(_) => summary.accepted += 1,
                AppendOutcome::Duplicate => duplicates += 1,
            }
        }

        tracing::info!(
            identity_id = identity.id,
            submitted = ops.len(),
            accepted = summary.accepted,
            rejected = summary.rejected,
            duplicates,
            "push applied"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;
    use serde_json::json;

    fn identity(role: Role) -> Identity {
        Identity {
            id: 4,
            name: "t".to_string(),
            role,
            active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_parse_op_defaults() {
        let op = parse_op(
            &json!({"id": "a", "kind": "log.add"}),
            &identity(Role::Staff),
            "2024-01-01T00:00:00Z",
        )
        .unwrap();
        assert_eq!(op.submitted_at, "2024-01-01T00:00:00Z");
        assert_eq!(op.device_id, "");
        assert_eq!(op.payload, Value::Null);
        assert_eq!(op.submitted_by, 4);
    }

    #[test]
    fn test_parse_op_keeps_client_fields() {
        let op = parse_op(
            &json!({
                "id": "a",
                "kind": "student.upsert",
                "at": "2023-09-01T10:00:00Z",
                "deviceId": "tab-1",
                "payload": {"name": "Sam"}
            }),
            &identity(Role::Staff),
            "now",
        )
        .unwrap();
        assert_eq!(op.submitted_at, "2023-09-01T10:00:00Z");
        assert_eq!(op.device_id, "tab-1");
        assert_eq!(op.payload, json!({"name": "Sam"}));
    }

    #[test]
    fn test_parse_op_rejects_malformed() {
        let who = identity(Role::Admin);
        for raw in [
            json!(null),
            json!("op"),
            json!([1, 2]),
            json!({"kind": "log.add"}),
            json!({"id": 12, "kind": "log.add"}),
            json!({"id": "", "kind": "log.add"}),
            json!({"id": "a"}),
            json!({"id": "a", "kind": "  "}),
            json!({"id": "a", "kind": 3}),
        ] {
            assert!(parse_op(&raw, &who, "now").is_none(), "{raw}");
        }
    }
}
