pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod models;
pub mod resource;
pub mod startup;
pub mod utils;

// Re-export commonly used types for easier access
pub use backend::SqliteBackend;
pub use config::AppConfig;
pub use startup::{build_app, build_router, AppState};
