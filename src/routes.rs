use crate::handlers::{self, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Request size limit: 1MB covers any realistic upload batch.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Routes driven by the presentation views.
///
/// Rate limiting is layered on by the server binary, since it needs the peer
/// address from the connection.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/sync", post(handlers::sync))
        .route("/api/v1/view", get(handlers::get_view).put(handlers::set_view))
        .route("/api/v1/dashboard", get(handlers::dashboard))
        .route("/api/v1/leads", get(handlers::list_leads))
        .route("/api/v1/leads/filter", put(handlers::set_filter))
        .route("/api/v1/leads/close", post(handlers::close_lead))
        .route("/api/v1/leads/:id", get(handlers::get_lead))
        .route("/api/v1/leads/:id/open", post(handlers::open_lead))
        .route(
            "/api/v1/leads/:id/call-outcome",
            post(handlers::record_call_outcome),
        )
        .route("/api/v1/upload", get(handlers::get_upload))
        .route("/api/v1/upload/form", put(handlers::update_form))
        .route("/api/v1/upload/queue", post(handlers::enqueue_lead))
        .route("/api/v1/upload/queue/:index", delete(handlers::dequeue_lead))
        .route("/api/v1/upload/submit", post(handlers::submit_upload))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)))
}

/// Full application router without rate limiting.
pub fn build_router(api: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
