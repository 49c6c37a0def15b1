//! Router construction for the SWIFT code server.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use swift_core::SwiftCodeService;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;

pub const API_PREFIX: &str = "/v1/swift-codes";

/// Build the full axum router with all routes and middleware.
pub fn build_router(service: Arc<dyn SwiftCodeService>) -> Router {
    let api = Router::new()
        .route("/", post(handlers::swift_codes::add_swift_code))
        .route(
            "/:swift_code",
            get(handlers::swift_codes::get_swift_code)
                .delete(handlers::swift_codes::delete_swift_code),
        )
        .route(
            "/country/:country_iso2",
            get(handlers::swift_codes::get_country),
        );

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest(API_PREFIX, api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .layer(Extension(service))
}
