use axum::routing::{get, post};
use axum::Router;

pub mod create;
pub mod list;
pub mod revoke;

pub use create::CreateIdentityRequest;
pub use list::ListIdentitiesRequest;
pub use revoke::RevokeIdentityRequest;

use crate::ServiceState;

/// Identity management, admin role only
pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/identities/create", post(create::handler))
        .route("/identities/list", get(list::handler))
        .route("/identities/revoke", post(revoke::handler))
        .with_state(state)
}
