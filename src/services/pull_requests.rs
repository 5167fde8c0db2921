//! Pull request lifecycle: creation, merge, reviewer reassignment.
//!
//! Every mutation runs inside a single `BEGIN IMMEDIATE` transaction. SQLite
//! has no row-level locking, so the database write lock is the unit of
//! exclusion: taking it up front makes each operation's check-then-act
//! sequence atomic against concurrent mutations. The transaction guard rolls
//! back on every exit path that does not reach `commit`, including
//! cancellation of the calling future.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::pull_request::{PullRequest, PullRequestStatus};
use crate::services::selection;
use rand::Rng;
use serde::Deserialize;
use sqlx::SqliteConnection;

/// Reviewers assigned at creation, pool permitting.
const REVIEWERS_PER_PULL_REQUEST: usize = 2;

/// Input for creating a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePullRequestInput {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

/// Input for swapping out an assigned reviewer.
#[derive(Debug, Clone, Deserialize)]
pub struct ReassignReviewerInput {
    pub pull_request_id: String,
    pub old_reviewer_id: String,
}

/// Current Unix timestamp in seconds.
fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Create a pull request and auto-assign up to two reviewers from the
/// author's team.
///
/// Reviewers are drawn uniformly at random from the active members of the
/// author's team, excluding the author. A pool of 0 or 1 candidates yields
/// fewer than two reviewers; that is not an error.
///
/// # Errors
/// * `NotFound` - `author_id` does not resolve to a known user
/// * `Conflict` - the pull request id already exists
pub async fn create_pull_request<R: Rng + Send>(
    pool: &DbPool,
    rng: &mut R,
    input: CreatePullRequestInput,
) -> Result<PullRequest, AppError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let exists: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM pull_requests WHERE pull_request_id = ?")
            .bind(&input.pull_request_id)
            .fetch_optional(&mut *tx)
            .await?;
    if exists.is_some() {
        return Err(AppError::conflict(format!(
            "pull request {} already exists",
            input.pull_request_id
        )));
    }

    let author_row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT team_name FROM users WHERE user_id = ?")
            .bind(&input.author_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((author_team,)) = author_row else {
        return Err(AppError::not_found_with_id("User", input.author_id.as_str()));
    };

    sqlx::query(
        r#"
        INSERT INTO pull_requests (pull_request_id, pull_request_name, author_id, status, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.pull_request_id)
    .bind(&input.pull_request_name)
    .bind(&input.author_id)
    .bind(PullRequestStatus::Open.to_string())
    .bind(now())
    .execute(&mut *tx)
    .await?;

    // A team-less author has no teammates, hence no reviewers.
    let candidates: Vec<String> = match &author_team {
        Some(team) => {
            let rows: Vec<(String,)> = sqlx::query_as(
                "SELECT user_id FROM users WHERE team_name = ? AND is_active = 1 AND user_id != ?",
            )
            .bind(team)
            .bind(&input.author_id)
            .fetch_all(&mut *tx)
            .await?;
            rows.into_iter().map(|(id,)| id).collect()
        }
        None => Vec::new(),
    };

    let reviewers = selection::pick_reviewers(rng, &candidates, REVIEWERS_PER_PULL_REQUEST);
    for reviewer_id in &reviewers {
        sqlx::query("INSERT INTO pr_reviewers (pull_request_id, reviewer_id) VALUES (?, ?)")
            .bind(&input.pull_request_id)
            .bind(reviewer_id)
            .execute(&mut *tx)
            .await?;
    }

    let pr = load_pull_request(&mut tx, &input.pull_request_id)
        .await?
        .ok_or_else(|| {
            AppError::database_with_op("inserted row not readable", "create_pull_request")
        })?;
    tx.commit().await?;

    log::info!(
        "Created pull request {} by {} with {} reviewer(s)",
        pr.pull_request_id,
        pr.author_id,
        pr.assigned_reviewers.len()
    );
    Ok(pr)
}

/// Merge a pull request.
///
/// Merging is idempotent: an already-merged pull request is returned
/// unchanged, with its original merge timestamp and no write.
///
/// # Errors
/// * `NotFound` - the pull request id is unknown
pub async fn merge_pull_request(pool: &DbPool, pr_id: &str) -> Result<PullRequest, AppError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let status: Option<(String,)> =
        sqlx::query_as("SELECT status FROM pull_requests WHERE pull_request_id = ?")
            .bind(pr_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((status,)) = status else {
        return Err(AppError::not_found_with_id("PullRequest", pr_id));
    };

    if PullRequestStatus::from(status.as_str()) == PullRequestStatus::Merged {
        let pr = load_pull_request(&mut tx, pr_id).await?.ok_or_else(|| {
            AppError::database_with_op("row vanished mid-transaction", "merge_pull_request")
        })?;
        tx.commit().await?;
        return Ok(pr);
    }

    sqlx::query("UPDATE pull_requests SET status = ?, merged_at = ? WHERE pull_request_id = ?")
        .bind(PullRequestStatus::Merged.to_string())
        .bind(now())
        .bind(pr_id)
        .execute(&mut *tx)
        .await?;

    let pr = load_pull_request(&mut tx, pr_id).await?.ok_or_else(|| {
        AppError::database_with_op("row vanished mid-transaction", "merge_pull_request")
    })?;
    tx.commit().await?;

    log::info!("Merged pull request {}", pr_id);
    Ok(pr)
}

/// Replace one assigned reviewer with a random eligible teammate.
///
/// The eligible pool is the old reviewer's team, restricted to active users
/// and excluding the author, the already-assigned reviewers, and the old
/// reviewer itself. The swap removes exactly one assignment and adds exactly
/// one, so the reviewer count never changes.
///
/// # Errors
/// * `NotFound` - the pull request or the old reviewer's user row is unknown
/// * `Precondition` - the pull request is already merged
/// * `InvalidInput` - `old_reviewer_id` is not currently assigned
/// * `Conflict` - no eligible replacement exists
pub async fn reassign_reviewer<R: Rng + Send>(
    pool: &DbPool,
    rng: &mut R,
    input: ReassignReviewerInput,
) -> Result<PullRequest, AppError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let header: Option<(String, String)> =
        sqlx::query_as("SELECT status, author_id FROM pull_requests WHERE pull_request_id = ?")
            .bind(&input.pull_request_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((status, author_id)) = header else {
        return Err(AppError::not_found_with_id(
            "PullRequest",
            input.pull_request_id.as_str(),
        ));
    };
    if PullRequestStatus::from(status.as_str()) == PullRequestStatus::Merged {
        return Err(AppError::precondition(format!(
            "pull request {} is merged; its reviewer set is frozen",
            input.pull_request_id
        )));
    }

    let assigned: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM pr_reviewers WHERE pull_request_id = ? AND reviewer_id = ?")
            .bind(&input.pull_request_id)
            .bind(&input.old_reviewer_id)
            .fetch_optional(&mut *tx)
            .await?;
    if assigned.is_none() {
        return Err(AppError::invalid_input_field(
            format!(
                "user {} is not an assigned reviewer of {}",
                input.old_reviewer_id, input.pull_request_id
            ),
            "old_reviewer_id",
        ));
    }

    let old_row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT team_name FROM users WHERE user_id = ?")
            .bind(&input.old_reviewer_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((old_team,)) = old_row else {
        return Err(AppError::not_found_with_id(
            "User",
            input.old_reviewer_id.as_str(),
        ));
    };

    let candidates: Vec<String> = match &old_team {
        Some(team) => {
            let rows: Vec<(String,)> = sqlx::query_as(
                r#"
                SELECT user_id FROM users
                WHERE team_name = ? AND is_active = 1
                  AND user_id != ? AND user_id != ?
                  AND user_id NOT IN (SELECT reviewer_id FROM pr_reviewers WHERE pull_request_id = ?)
                "#,
            )
            .bind(team)
            .bind(&author_id)
            .bind(&input.old_reviewer_id)
            .bind(&input.pull_request_id)
            .fetch_all(&mut *tx)
            .await?;
            rows.into_iter().map(|(id,)| id).collect()
        }
        None => Vec::new(),
    };
    if candidates.is_empty() {
        return Err(AppError::conflict(format!(
            "no eligible replacement reviewer for {} on {}",
            input.old_reviewer_id, input.pull_request_id
        )));
    }

    let new_reviewer = selection::pick_reviewers(rng, &candidates, 1)
        .pop()
        .ok_or_else(|| AppError::database_with_op("empty pick", "reassign_reviewer"))?;

    sqlx::query("DELETE FROM pr_reviewers WHERE pull_request_id = ? AND reviewer_id = ?")
        .bind(&input.pull_request_id)
        .bind(&input.old_reviewer_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT INTO pr_reviewers (pull_request_id, reviewer_id) VALUES (?, ?)")
        .bind(&input.pull_request_id)
        .bind(&new_reviewer)
        .execute(&mut *tx)
        .await?;

    let pr = load_pull_request(&mut tx, &input.pull_request_id)
        .await?
        .ok_or_else(|| {
            AppError::database_with_op("row vanished mid-transaction", "reassign_reviewer")
        })?;
    tx.commit().await?;

    log::info!(
        "Reassigned reviewer {} -> {} on pull request {}",
        input.old_reviewer_id,
        new_reviewer,
        input.pull_request_id
    );
    Ok(pr)
}

/// Load a pull request and its reviewer set on the given connection.
///
/// Runs on the transaction connection during mutations so the returned
/// snapshot includes the transaction's own writes.
async fn load_pull_request(
    conn: &mut SqliteConnection,
    pr_id: &str,
) -> Result<Option<PullRequest>, AppError> {
    let pr: Option<PullRequest> = sqlx::query_as(
        r#"
        SELECT pull_request_id, pull_request_name, author_id, status, created_at, merged_at
        FROM pull_requests
        WHERE pull_request_id = ?
        "#,
    )
    .bind(pr_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(mut pr) = pr else {
        return Ok(None);
    };

    let reviewers: Vec<(String,)> = sqlx::query_as(
        "SELECT reviewer_id FROM pr_reviewers WHERE pull_request_id = ? ORDER BY reviewer_id",
    )
    .bind(pr_id)
    .fetch_all(&mut *conn)
    .await?;
    pr.assigned_reviewers = reviewers.into_iter().map(|(id,)| id).collect();

    Ok(Some(pr))
}
