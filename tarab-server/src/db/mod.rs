//! Database access for tarab-server
//!
//! One module per table, free async functions over a shared `SqlitePool`.

pub mod generated;
pub mod songs;
pub mod training;

use chrono::Utc;

/// RFC 3339 UTC timestamp used for all created_at/completed_at columns
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
