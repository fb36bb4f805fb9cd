//! Cross-origin policy.
//!
//! Browsers get CORS headers from [`cors_layer`], which also answers every
//! `OPTIONS` request without reaching a handler. Headers alone only hide
//! responses from disallowed pages, so [`origin_guard`] refuses such
//! requests outright and no route logic runs for them.

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use super::handlers::{AppState, ContactResponse};

/// Build the CORS header layer for the configured allow-list.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "cors_origin_not_a_header_value");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(AllowOrigin::list(parsed))
}

/// Reject requests whose `Origin` is not on the allow-list.
///
/// Requests without an `Origin` header (curl, health checkers) pass.
pub async fn origin_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(origin) = req.headers().get(ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| state.config.is_origin_allowed(o))
            .unwrap_or(false);

        if !allowed {
            warn!(
                origin = ?origin,
                method = %req.method(),
                path = %req.uri().path(),
                "cors_origin_rejected"
            );
            return (
                StatusCode::FORBIDDEN,
                Json(ContactResponse::failure("Not allowed by CORS")),
            )
                .into_response();
        }
    }

    next.run(req).await
}
