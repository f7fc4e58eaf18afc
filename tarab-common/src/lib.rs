//! Shared library for the tarab music backend
//!
//! Holds the pieces both the server binary and its tests need: the common
//! error taxonomy, root folder / configuration resolution, and database
//! initialization with the catalog schema.

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
