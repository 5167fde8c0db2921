//! Data models for the service.
//!
//! These models represent the entities stored in the relational store and
//! returned by the service operations.
//!
//! All models derive Serialize for the transport layer and FromRow for
//! SQLx queries where they map to a table row.

pub mod pull_request;
pub mod team;
pub mod user;

// Re-exports for convenient access
pub use pull_request::{PullRequest, PullRequestStatus, PullRequestSummary};
pub use team::{Team, TeamMember};
pub use user::User;
