use axum::routing::get;
use axum::Router;

pub mod whoami;

pub use whoami::WhoamiRequest;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/whoami", get(whoami::handler))
        .with_state(state)
}
