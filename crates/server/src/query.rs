use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use siteline_agent::AgentRuntime;
use siteline_core::{Query, ResponseEnvelope};

#[derive(Clone)]
pub struct QueryState {
    pub runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default, rename = "propertyId", alias = "property_id")]
    pub property_id: Option<String>,
}

/// Every outcome, failures included, is a 200 with an envelope.
pub async fn handle_query(
    State(state): State<QueryState>,
    Json(request): Json<QueryRequest>,
) -> Json<ResponseEnvelope> {
    let query = Query::new(request.query, request.property_id);
    Json(state.runtime.handle(&query).await)
}
