use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        // Trigger endpoints, called by an external scheduler
        .route("/send-question", get(handlers::mail::send_question))
        .route("/send-hint", get(handlers::mail::send_hint))
        .route("/send-solution", get(handlers::mail::send_solution))
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
