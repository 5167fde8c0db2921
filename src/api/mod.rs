//! HTTP transport for the service operations.
//!
//! A thin JSON layer: each handler decodes a payload, calls exactly one
//! service operation, and encodes the domain object or maps the error kind
//! to an HTTP status. No business rules live here.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{PullRequest, PullRequestSummary, Team, User};
use crate::services::pull_requests::{self, CreatePullRequestInput, ReassignReviewerInput};
use crate::services::roster;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error body returned for every failed request.
#[derive(Serialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Wrapper to make AppError usable as an axum error response.
struct ApiErr(AppError);

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::Precondition { .. } => (StatusCode::BAD_REQUEST, "PRECONDITION_FAILED"),
            AppError::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self.0);
        }
        (
            status,
            Json(ApiError {
                code: code.to_string(),
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

// ── Payload types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SetUserActiveInput {
    user_id: String,
    is_active: bool,
}

#[derive(Deserialize)]
struct MergePullRequestInput {
    pull_request_id: String,
}

#[derive(Deserialize)]
struct UserReviewsQuery {
    user_id: String,
}

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the application router over a database pool.
pub fn router(pool: DbPool) -> Router {
    Router::new()
        .route("/team/add", post(add_team))
        .route("/team/get/{team_name}", get(get_team))
        .route("/users/setIsActive", post(set_user_active))
        .route("/users/getReview", get(get_users_reviews))
        .route("/pullRequest/create", post(create_pull_request))
        .route("/pullRequest/merge", post(merge_pull_request))
        .route("/pullRequest/reassign", post(reassign_reviewer))
        .with_state(pool)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /team/add — upsert a team and its members.
async fn add_team(
    State(pool): State<DbPool>,
    Json(team): Json<Team>,
) -> Result<Json<Team>, ApiErr> {
    roster::add_or_update_team(&pool, &team).await?;
    Ok(Json(team))
}

/// GET /team/get/{team_name} — team with its current members.
async fn get_team(
    State(pool): State<DbPool>,
    Path(team_name): Path<String>,
) -> Result<Json<Team>, ApiErr> {
    let team = roster::get_team(&pool, &team_name).await?;
    Ok(Json(team))
}

/// POST /users/setIsActive — toggle review eligibility.
async fn set_user_active(
    State(pool): State<DbPool>,
    Json(input): Json<SetUserActiveInput>,
) -> Result<Json<User>, ApiErr> {
    let user = roster::set_user_active(&pool, &input.user_id, input.is_active).await?;
    Ok(Json(user))
}

/// GET /users/getReview?user_id=X — pull requests the user reviews.
async fn get_users_reviews(
    State(pool): State<DbPool>,
    Query(params): Query<UserReviewsQuery>,
) -> Result<Json<Vec<PullRequestSummary>>, ApiErr> {
    let reviews = roster::get_users_reviews(&pool, &params.user_id).await?;
    Ok(Json(reviews))
}

/// POST /pullRequest/create — create with auto-assigned reviewers.
async fn create_pull_request(
    State(pool): State<DbPool>,
    Json(input): Json<CreatePullRequestInput>,
) -> Result<Json<PullRequest>, ApiErr> {
    let mut rng = StdRng::from_entropy();
    let pr = pull_requests::create_pull_request(&pool, &mut rng, input).await?;
    Ok(Json(pr))
}

/// POST /pullRequest/merge — idempotent merge.
async fn merge_pull_request(
    State(pool): State<DbPool>,
    Json(input): Json<MergePullRequestInput>,
) -> Result<Json<PullRequest>, ApiErr> {
    let pr = pull_requests::merge_pull_request(&pool, &input.pull_request_id).await?;
    Ok(Json(pr))
}

/// POST /pullRequest/reassign — swap one assigned reviewer.
async fn reassign_reviewer(
    State(pool): State<DbPool>,
    Json(input): Json<ReassignReviewerInput>,
) -> Result<Json<PullRequest>, ApiErr> {
    let mut rng = StdRng::from_entropy();
    let pr = pull_requests::reassign_reviewer(&pool, &mut rng, input).await?;
    Ok(Json(pr))
}
