//! Web server module for the contact form API.
//!
//! Layers, outermost first:
//! - request tracing
//! - origin guard (403 for origins off the allow-list)
//! - CORS headers; every `OPTIONS` request is answered here
//! - request body cap (413)

pub mod cors;
pub mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use cors::{cors_layer, origin_guard};
pub use handlers::{contact, health, AppState, ContactResponse, HealthResponse};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/", get(health))
        .route("/contact", post(contact))
        .layer(DefaultBodyLimit::max(state.config.body_limit))
        .layer(cors)
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
