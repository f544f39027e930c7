//! API route definitions

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::details::{project_details, IssueDetails};
use crate::graph::{build_graph, Graph};
use crate::model::credentials::{Credentials, IssueDetailsRequest};
use crate::tracker::jira::JiraClient;
use crate::tracker::{FetchError, IssueSource};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    defaults: Arc<Credentials>,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(defaults: Credentials, http: reqwest::Client) -> Self {
        Self {
            defaults: Arc::new(defaults),
            http,
        }
    }

    fn tracker(&self, credentials: &Credentials) -> JiraClient {
        JiraClient::new(credentials, self.http.clone())
    }
}

/// Failure of an API call, rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Fetch(FetchError),
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        ApiError::Fetch(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(e) => match e {
                FetchError::InvalidKey => StatusCode::BAD_REQUEST,
                FetchError::Authentication => StatusCode::UNAUTHORIZED,
                FetchError::NotFound(_) => StatusCode::NOT_FOUND,
                FetchError::Upstream { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                FetchError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
                FetchError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Fetch(e) => e.to_string(),
        };
        (self.status(), Json(json!({ "detail": detail }))).into_response()
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/jira/default-credentials", get(default_credentials))
        .route("/jira/test-connection", post(test_connection))
        .route("/jira/visualize", post(visualize))
        .route("/jira/issue-details", post(issue_details))
}

async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Issue graph API is running" }))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "issue-graph",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Credentials pre-filled from configuration. The start issue is always left empty.
async fn default_credentials(State(state): State<AppState>) -> Json<Credentials> {
    Json(state.defaults.as_ref().clone())
}

#[derive(Debug, Serialize)]
struct ConnectionStatus {
    success: bool,
    message: String,
    user: Value,
}

async fn test_connection(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<ConnectionStatus>, ApiError> {
    let user = state.tracker(&credentials).myself().await.map_err(|e| {
        error!("Connection test failed for {}: {e}", credentials.base_url);
        e
    })?;
    let name = user
        .get("displayName")
        .and_then(Value::as_str)
        .unwrap_or("user")
        .to_string();

    Ok(Json(ConnectionStatus {
        success: true,
        message: format!("Successfully connected to JIRA as {name}"),
        user,
    }))
}

/// Build the relationship graph around the requested start issue
async fn visualize(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Graph>, ApiError> {
    let start_key = credentials.start_issue_key.trim();
    if start_key.is_empty() {
        return Err(ApiError::BadRequest(
            "Missing JIRA credentials or central issue ID".into(),
        ));
    }
    info!(start = %start_key, project = %credentials.project_id, "building issue graph");

    let tracker = state.tracker(&credentials);
    let graph = build_graph(&tracker, start_key).await.map_err(|e| {
        error!("Failed to build graph for {start_key}: {e}");
        e
    })?;
    Ok(Json(graph))
}

async fn issue_details(
    State(state): State<AppState>,
    Json(request): Json<IssueDetailsRequest>,
) -> Result<Json<IssueDetails>, ApiError> {
    let key = request.issue_key.trim();
    if key.is_empty() {
        return Err(ApiError::BadRequest("Missing JIRA issue key".into()));
    }

    let issue = state
        .tracker(&request.credentials())
        .fetch_issue(key)
        .await
        .map_err(|e| {
            error!("Failed to fetch details for {key}: {e}");
            e
        })?;
    Ok(Json(project_details(&issue)))
}
