//! Persistent measurement store (SQLite via sqlx).
//!
//! One append-only table, `route_info`. Rows are written once per successful
//! fetch and never updated or deleted here.

pub mod db;
mod measurements;
pub mod types;

pub use db::*;
pub use types::*;
