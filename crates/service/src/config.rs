use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use common::sync::SyncConfig;

use crate::http;

pub const DEFAULT_LISTEN_PORT: u16 = 8787;

#[derive(Debug, Clone)]
pub struct Config {
    /// address for the API server to listen on
    pub listen_addr: SocketAddr,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // misc
    pub log_level: tracing::Level,
    /// directory for a daily rolling log file, stdout only if unset
    pub log_dir: Option<PathBuf>,

    /// origins allowed to call the API from a browser,
    ///  empty or containing "*" echoes any origin
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,

    pub sync: SyncConfig,
}

impl Config {
    pub fn http_config(&self) -> http::Config {
        http::Config {
            listen_addr: self.listen_addr,
            log_level: self.log_level,
            allowed_origins: self.allowed_origins.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), DEFAULT_LISTEN_PORT),
            sqlite_path: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
            allowed_origins: Vec::new(),
            max_body_bytes: http::DEFAULT_MAX_BODY_BYTES,
            sync: SyncConfig::default(),
        }
    }
}
