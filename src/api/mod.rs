use axum::{
    Router,
    http::{HeaderValue, header},
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::orchestrator::SearchOrchestrator;

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SearchOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: SearchOrchestrator) -> AppState {
        AppState {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let enable_cors = state.orchestrator.config().enable_cors;

    let router = Router::new()
        // one endpoint, dispatched on method, on every path
        .fallback(handlers::dispatch_handler)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http());

    if !enable_cors {
        return router;
    }

    // added last so that panic and error responses carry them too
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
}
