use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::{handlers, middleware::metrics_middleware, workflows};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config().server.max_upload_bytes;

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Workflow sessions
        .route("/workflows", post(workflows::create_workflow))
        .route("/workflows/{id}", get(workflows::get_workflow))
        .route("/workflows/{id}", delete(workflows::delete_workflow))
        // Tasks
        .route("/workflows/{id}/tasks/{task}/mode", post(workflows::choose_mode))
        .route("/workflows/{id}/tasks/{task}/input", post(workflows::set_text_input))
        .route(
            "/workflows/{id}/tasks/{task}/image",
            post(workflows::set_image_input).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/workflows/{id}/tasks/{task}/submit", post(workflows::submit_task))
        .route("/workflows/{id}/tasks/{task}/reset", post(workflows::reset_task))
        // Video
        .route("/workflows/{id}/video", post(workflows::start_video));

    // CORS: any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
