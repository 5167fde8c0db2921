//! Team model.
//!
//! A team has no standalone payload beyond its name; its membership is
//! derived from the users that currently reference it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A member as carried in team upserts and reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// A named team with its current members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}
