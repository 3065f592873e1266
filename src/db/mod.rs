//! Database module.
//!
//! This module provides:
//! - The pooled gateway to MySQL (production) or SQLite (tests, local dev)
//! - Row and parameter conversion to and from JSON
//! - Repository layer for the ccs tables

pub mod gateway;
pub mod repo;
pub mod row;

pub use gateway::Gateway;
pub use repo::Repository;
pub use row::{JsonRow, SqlParam};
