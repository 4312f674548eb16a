//! Small axum application whose handlers fail through the problem converter

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, Uri};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use triage_core::{Classify, Opaque, RequestContext, ServiceError};
use triage_http::{Problem, ProblemConverter};

#[derive(Clone)]
struct AppState {
    problems: Arc<ProblemConverter>,
}

impl AppState {
    fn problem(&self, uri: &Uri, headers: &HeaderMap, err: &dyn Classify) -> Problem {
        self.problems.convert(&RequestContext::from_request(uri, headers), err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
}

/// Build the application around a converter
pub fn router(problems: ProblemConverter) -> Router {
    let state = AppState {
        problems: Arc::new(problems),
    };

    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/name", post(rename_user))
        .route("/reports", get(reports))
        .with_state(state)
}

async fn get_user(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<User>, Problem> {
    if id == 1 {
        return Ok(Json(User {
            id,
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
        }));
    }

    Err(state.problem(&uri, &headers, &ServiceError::not_found(format!("user {id} not found"))))
}

async fn create_user(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Json(user): Json<User>,
) -> Result<Json<User>, Problem> {
    let mut err = ServiceError::validation("invalid user");

    if user.name.is_empty() {
        err = err.with_violation("name", "is required");
    }
    if user.name.len() > 32 {
        err = err.with_violation("name", "must be at most 32 characters");
    }
    if !user.email.contains('@') {
        err = err.with_violation("email", "must be an address");
    }

    if triage_core::has_violations(&err) {
        return Err(state.problem(&uri, &headers, &err));
    }

    Ok(Json(user))
}

async fn rename_user(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<(), Problem> {
    let cause = ServiceError::conflict(format!("user {id} was modified concurrently"));
    let err = ServiceError::new("rename failed").with_source(cause);

    Err(state.problem(&uri, &headers, &err))
}

async fn reports(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Result<(), Problem> {
    let err = Opaque(std::io::Error::other("connection to reports-db:5432 refused"));

    Err(state.problem(&uri, &headers, &err))
}

/// Send one request through the router
pub async fn send(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.unwrap()
}

/// Read a response body as a problem document
pub async fn problem(response: Response) -> Problem {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
