use axum::routing::{get, post};
use axum::Router;

pub mod pull;
pub mod push;

pub use pull::PullRequest;
pub use push::PushRequest;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/push", post(push::handler))
        .route("/pull", get(pull::handler))
        .with_state(state)
}
