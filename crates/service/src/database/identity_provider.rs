use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use common::crypto::CredentialDigest;
use common::identity::{Identity, IdentityError, IdentityId, IdentityProvider, NewIdentity, Role};

use super::{decode_error, Database};

const IDENTITY_COLUMNS: &str = "id, name, role, active, created_at";

fn identity_from_row(row: &SqliteRow) -> Result<Identity, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Identity {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        role: role.parse::<Role>().map_err(decode_error)?,
        active: row.try_get::<i64, _>("active")? != 0,
        created_at: OffsetDateTime::parse(&created_at, &Rfc3339).map_err(decode_error)?,
    })
}

#[async_trait]
impl IdentityProvider for Database {
    type Error = sqlx::Error;

    async fn insert(&self, new: NewIdentity) -> Result<Identity, IdentityError<Self::Error>> {
        let created_at = OffsetDateTime::now_utc();
        let created_at_text = created_at.format(&Rfc3339).map_err(decode_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO identities (name, role, credential_hash, active, created_at)
            VALUES (?, ?, ?, 1, ?)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(new.role.as_str())
        .bind(new.digest.as_str())
        .bind(&created_at_text)
        .fetch_one(&**self)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(IdentityError::Conflict)
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Identity {
            id: row.try_get("id")?,
            name: new.name,
            role: new.role,
            active: true,
            // re-read precision matches what was stored
            created_at: OffsetDateTime::parse(&created_at_text, &Rfc3339).map_err(decode_error)?,
        })
    }

    async fn find_by_digest(
        &self,
        digest: &CredentialDigest,
    ) -> Result<Option<Identity>, IdentityError<Self::Error>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM identities WHERE credential_hash = ? LIMIT 1",
            IDENTITY_COLUMNS
        ))
        .bind(digest.as_str())
        .fetch_optional(&**self)
        .await?;

        Ok(row.as_ref().map(identity_from_row).transpose()?)
    }

    async fn get(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError<Self::Error>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM identities WHERE id = ?",
            IDENTITY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&**self)
        .await?;

        Ok(row.as_ref().map(identity_from_row).transpose()?)
    }

    async fn list(&self) -> Result<Vec<Identity>, IdentityError<Self::Error>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM identities ORDER BY id DESC",
            IDENTITY_COLUMNS
        ))
        .fetch_all(&**self)
        .await?;

        Ok(rows
            .iter()
            .map(identity_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn deactivate(&self, id: IdentityId) -> Result<bool, IdentityError<Self::Error>> {
        let result = sqlx::query("UPDATE identities SET active = 0 WHERE id = ?")
            .bind(id)
            .execute(&**self)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
