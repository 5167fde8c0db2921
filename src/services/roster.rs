//! Roster operations: team upsert, team reads, activation toggling, and
//! reviewer workload listings.
//!
//! A team "exists" exactly when at least one user references its name; the
//! `teams` table only anchors the foreign key and the cascade delete.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::pull_request::PullRequestSummary;
use crate::models::team::{Team, TeamMember};
use crate::models::user::User;

/// Upsert a team and all of its members in one transaction.
///
/// Members are inserted, or updated in place (username, team affiliation,
/// active flag) when the user id already exists; this is how users move
/// between teams. A failure on any member rolls back the whole update.
pub async fn add_or_update_team(pool: &DbPool, team: &Team) -> Result<(), AppError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    sqlx::query("INSERT INTO teams (team_name) VALUES (?) ON CONFLICT (team_name) DO NOTHING")
        .bind(&team.team_name)
        .execute(&mut *tx)
        .await?;

    for member in &team.members {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, team_name, is_active)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                username = excluded.username,
                team_name = excluded.team_name,
                is_active = excluded.is_active
            "#,
        )
        .bind(&member.user_id)
        .bind(&member.username)
        .bind(&team.team_name)
        .bind(member.is_active)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    log::info!(
        "Upserted team {} with {} member(s)",
        team.team_name,
        team.members.len()
    );
    Ok(())
}

/// Get a team and its current member list.
///
/// # Errors
/// * `NotFound` - no user currently references the team name
pub async fn get_team(pool: &DbPool, team_name: &str) -> Result<Team, AppError> {
    let members: Vec<TeamMember> = sqlx::query_as(
        "SELECT user_id, username, is_active FROM users WHERE team_name = ? ORDER BY user_id",
    )
    .bind(team_name)
    .fetch_all(pool)
    .await?;

    if members.is_empty() {
        return Err(AppError::not_found_with_id("Team", team_name));
    }

    Ok(Team {
        team_name: team_name.to_string(),
        members,
    })
}

/// Set a user's active flag and return the refreshed record.
///
/// # Errors
/// * `NotFound` - no row was affected by the update
pub async fn set_user_active(
    pool: &DbPool,
    user_id: &str,
    is_active: bool,
) -> Result<User, AppError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let result = sqlx::query("UPDATE users SET is_active = ? WHERE user_id = ?")
        .bind(is_active)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found_with_id("User", user_id));
    }

    let user: User =
        sqlx::query_as("SELECT user_id, username, team_name, is_active FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    log::info!("Set user {} active = {}", user_id, is_active);
    Ok(user)
}

/// List every pull request where the user is currently an assigned reviewer.
///
/// Returns an empty vector when there are none.
pub async fn get_users_reviews(
    pool: &DbPool,
    user_id: &str,
) -> Result<Vec<PullRequestSummary>, AppError> {
    let reviews: Vec<PullRequestSummary> = sqlx::query_as(
        r#"
        SELECT pr.pull_request_id, pr.pull_request_name, pr.author_id, pr.status
        FROM pull_requests pr
        JOIN pr_reviewers prr ON pr.pull_request_id = prr.pull_request_id
        WHERE prr.reviewer_id = ?
        ORDER BY pr.pull_request_id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}
