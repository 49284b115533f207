//! Shared fixtures for sync scenario tests
#![allow(dead_code)]

use common::prelude::*;

pub type MemoryService = SyncService<MemoryIdentityProvider, MemoryOpLog>;

pub fn service() -> MemoryService {
    service_with(SyncConfig::default())
}

pub fn service_with(config: SyncConfig) -> MemoryService {
    SyncService::new(MemoryIdentityProvider::new(), MemoryOpLog::new(), config)
}

/// Enroll an identity and return it with its plaintext credential
pub async fn enroll(service: &MemoryService, name: &str, role: Role) -> (Identity, String) {
    let created = service.enroll(name, Some(role.as_str())).await.unwrap();
    (created.identity, created.credential.into_inner())
}

pub fn op(id: &str, kind: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "at": "2024-05-01T09:00:00Z",
        "kind": kind,
        "payload": {"ref": id},
        "deviceId": "tablet-1"
    })
}
