/**
 * Bearer credentials and the digests
 *  the server stores in their place.
 */
pub mod crypto;
/**
 * Identities, roles and the credential
 *  store trait with an in-memory backend.
 */
pub mod identity;
/**
 * The append-only operation log: types,
 *  provider trait and an in-memory backend.
 */
pub mod op_log;
/**
 * Which roles may submit which kinds of operation.
 */
pub mod policy;
/**
 * Push, pull, credential resolution and
 *  identity management over any pair of
 *  providers.
 */
pub mod sync;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::crypto::{Credential, CredentialDigest};
    pub use crate::identity::{
        Identity, IdentityError, IdentityId, IdentityProvider, MemoryIdentityProvider,
        NewIdentity, Role,
    };
    pub use crate::op_log::{
        AppendOutcome, Cursor, MemoryOpLog, NewOperation, OpLogError, OpLogProvider, Operation,
    };
    pub use crate::policy::{is_allowed, Permission};
    pub use crate::sync::{
        CreatedIdentity, PullPage, PushSummary, SyncConfig, SyncError, SyncService,
    };
    pub use crate::version::build_info;
}
