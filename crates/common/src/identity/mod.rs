//! Identities and the credential store they live in
//!
//! An identity is a named principal with a role. Devices present a bearer
//! credential; the store resolves its digest back to the identity.

mod memory;
mod provider;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::crypto::CredentialDigest;

pub use memory::{MemoryIdentityProvider, MemoryIdentityProviderError};
pub use provider::{IdentityError, IdentityProvider};

/// Server-assigned identity key
pub type IdentityId = i64;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// A principal allowed to talk to the sync server
///
/// Never carries the credential digest, so it is always safe to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub role: Role,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Everything needed to register an identity
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: String,
    pub role: Role,
    pub digest: CredentialDigest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert!("Admin".parse::<Role>().is_err());
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Staff);
    }

    #[test]
    fn test_identity_wire_shape() {
        let identity = Identity {
            id: 7,
            name: "Front desk".to_string(),
            role: Role::Staff,
            active: true,
            created_at: time::macros::datetime!(2024-03-01 08:30:00 UTC),
        };
        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["role"], "staff");
        assert_eq!(value["createdAt"], "2024-03-01T08:30:00Z");
        assert!(value.get("digest").is_none());
    }
}
