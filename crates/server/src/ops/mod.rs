pub mod admin;
pub mod health;
pub mod identity;
pub mod init;
pub mod pull;
pub mod serve;
pub mod version;
pub mod whoami;

pub use admin::Admin;
pub use health::Health;
pub use identity::Identity;
pub use init::Init;
pub use pull::Pull;
pub use serve::Serve;
pub use version::Version;
pub use whoami::Whoami;
