use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use common::op_log::{AppendOutcome, Cursor, NewOperation, OpLogError, OpLogProvider, Operation};

use super::{decode_error, Database};

fn operation_from_row(row: &SqliteRow) -> Result<Operation, sqlx::Error> {
    let payload: String = row.try_get("payload")?;

    Ok(Operation {
        seq: row.try_get("seq")?,
        client_op_id: row.try_get("client_op_id")?,
        submitted_at: row.try_get("at")?,
        kind: row.try_get("kind")?,
        payload: serde_json::from_str(&payload).map_err(decode_error)?,
        device_id: row.try_get("device_id")?,
        submitted_by: row.try_get("identity_id")?,
    })
}

#[async_trait]
impl OpLogProvider for Database {
    type Error = sqlx::Error;

    async fn append(&self, op: NewOperation) -> Result<AppendOutcome, OpLogError<Self::Error>> {
        let payload = serde_json::to_string(&op.payload).map_err(decode_error)?;

        // a row back means we inserted it; nothing back means the id was taken
        let row = sqlx::query(
            r#"
            INSERT INTO ops (client_op_id, at, kind, payload, device_id, identity_id)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(client_op_id) DO NOTHING
            RETURNING seq
            "#,
        )
        .bind(&op.client_op_id)
        .bind(&op.submitted_at)
        .bind(&op.kind)
        .bind(&payload)
        .bind(&op.device_id)
        .bind(op.submitted_by)
        .fetch_optional(&**self)
        .await?;

        match row {
            Some(row) => Ok(AppendOutcome::Appended(row.try_get("seq")?)),
            None => Ok(AppendOutcome::Duplicate),
        }
    }

    async fn since(
        &self,
        cursor: Cursor,
        limit: u32,
    ) -> Result<Vec<Operation>, OpLogError<Self::Error>> {
        let rows = sqlx::query(
            r#"
            SELECT seq, client_op_id, at, kind, payload, device_id, identity_id
            FROM ops
            WHERE seq > ?
            ORDER BY seq ASC
            LIMIT ?
            "#,
        )
        .bind(cursor)
        .bind(limit as i64)
        .fetch_all(&**self)
        .await?;

        Ok(rows
            .iter()
            .map(operation_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn head(&self) -> Result<Cursor, OpLogError<Self::Error>> {
        let row = sqlx::query("SELECT COALESCE(MAX(seq), 0) AS head FROM ops")
            .fetch_one(&**self)
            .await?;
        Ok(row.try_get("head")?)
    }
}
