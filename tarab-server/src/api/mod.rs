//! HTTP API handlers for tarab-server

pub mod dashboard;
pub mod generation;
pub mod health;
pub mod songs;
pub mod training;

pub use dashboard::dashboard_routes;
pub use generation::generation_routes;
pub use health::health_routes;
pub use songs::song_routes;
pub use training::training_routes;
