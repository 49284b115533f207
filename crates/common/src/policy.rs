//! Role to permission mapping for operation kinds
//!
//! Staff may write individual records. Anything else (settings, bulk
//! imports, kinds this build does not know about) needs an admin.

use crate::identity::Role;

/// Kinds that touch a single record and are open to staff
pub const RECORD_KINDS: &[&str] = &["log.add", "student.upsert", "student.delete"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    RecordWrite,
    Privileged,
}

impl Permission {
    /// The permission an operation of `kind` requires
    pub fn required_for(kind: &str) -> Self {
        if RECORD_KINDS.contains(&kind) {
            Permission::RecordWrite
        } else {
            Permission::Privileged
        }
    }
}

impl Role {
    pub fn grants(&self, permission: Permission) -> bool {
        match (self, permission) {
            (Role::Admin, _) => true,
            (Role::Staff, Permission::RecordWrite) => true,
            (Role::Staff, Permission::Privileged) => false,
        }
    }
}

/// Whether `role` may submit an operation of `kind`
pub fn is_allowed(role: Role, kind: &str) -> bool {
    role.grants(Permission::required_for(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_record_kinds() {
        for kind in RECORD_KINDS {
            assert!(is_allowed(Role::Staff, kind), "{kind}");
        }
    }

    #[test]
    fn test_staff_denied_everything_else() {
        for kind in ["settings.update", "student.import", "", "log.add ", "LOG.ADD"] {
            assert!(!is_allowed(Role::Staff, kind), "{kind}");
        }
    }

    #[test]
    fn test_admin_allowed_everything() {
        for kind in ["log.add", "settings.update", "anything.at.all"] {
            assert!(is_allowed(Role::Admin, kind));
        }
    }
}
