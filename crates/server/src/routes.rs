use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::bootstrap::Application;
use crate::health::{self, HealthState};
use crate::query::{handle_query, QueryState};

pub fn router(app: &Application) -> Router {
    build(
        QueryState { runtime: Arc::new(app.agent_runtime.clone()) },
        HealthState::from_config(&app.config),
    )
}

fn build(query_state: QueryState, health_state: HealthState) -> Router {
    Router::new()
        .route("/query", post(handle_query))
        .with_state(query_state)
        .merge(health::router(health_state))
        .layer(TraceLayer::new_for_http())
}
