use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PUSH_BATCH: usize = 500;
pub const DEFAULT_PULL_LIMIT: u32 = 400;
pub const DEFAULT_MAX_PULL_LIMIT: u32 = 800;

/// Limits applied by the push and pull handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Batches with more ops than this are refused outright
    #[serde(default = "default_max_push_batch")]
    pub max_push_batch: usize,
    /// Page size when the device does not ask for one
    #[serde(default = "default_pull_limit")]
    pub default_pull_limit: u32,
    #[serde(default = "default_max_pull_limit")]
    pub max_pull_limit: u32,
}

fn default_max_push_batch() -> usize {
    DEFAULT_MAX_PUSH_BATCH
}

fn default_pull_limit() -> u32 {
    DEFAULT_PULL_LIMIT
}

fn default_max_pull_limit() -> u32 {
    DEFAULT_MAX_PULL_LIMIT
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_push_batch: DEFAULT_MAX_PUSH_BATCH,
            default_pull_limit: DEFAULT_PULL_LIMIT,
            max_pull_limit: DEFAULT_MAX_PULL_LIMIT,
        }
    }
}
