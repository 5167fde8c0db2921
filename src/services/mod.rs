//! Business logic services.
//!
//! The transactional core of the system: pull request lifecycle, roster
//! management, and the reviewer selection algorithm. Services are plain
//! async functions over a [`crate::db::pool::DbPool`] and are independent of
//! the transport layer.

pub mod pull_requests;
pub mod roster;
pub mod selection;
