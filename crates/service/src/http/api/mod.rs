use axum::routing::get;
use axum::Router;

pub mod admin;
pub mod auth;
pub mod client;
pub mod service_health;
pub mod sync;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/health", get(service_health::handler))
        .nest("/auth", auth::router(state.clone()))
        .nest("/sync", sync::router(state.clone()))
        .nest("/admin", admin::router(state.clone()))
        .with_state(state)
}
