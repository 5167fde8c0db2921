//! review-roster - Team-scoped reviewer assignment for pull requests.
//!
//! Creating a pull request auto-assigns up to two random reviewers from the
//! author's team, reviewers can be swapped one at a time, and merging is an
//! idempotent one-way transition. All rules are enforced transactionally
//! against a SQLite store; see [`services`] for the operations and [`api`]
//! for the HTTP surface.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::AppError;
