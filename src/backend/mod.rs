use crate::error::AppResult;
use async_trait::async_trait;

pub mod database;

pub use database::SqliteBackend;

/// Lifecycle of a storage backend
///
/// Entity operations live on the per-entity stores the backend exposes;
/// this trait only covers connecting, probing and schema setup.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect and initialize the storage backend
    async fn connect(config: &database::DatabaseBackendConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Check if the storage backend is healthy and accessible
    async fn health_check(&self) -> AppResult<()>;

    /// Create tables and indexes if needed
    async fn init_schema(&self) -> AppResult<()>;

    /// Clean up resources when storage is no longer needed
    async fn cleanup(&self) -> AppResult<()> {
        Ok(())
    }
}
