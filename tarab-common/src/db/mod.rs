//! Database initialization and schema for the tarab catalog

mod init;

pub use init::{create_tables, init_database};
