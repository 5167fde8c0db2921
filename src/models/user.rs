//! User model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A roster user.
///
/// `team_name` is nullable: a user can be orphaned transiently while team
/// upserts race. Only active users are eligible to review.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub team_name: Option<String>,
    pub is_active: bool,
}
