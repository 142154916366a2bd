//! Database layer for the sales tracker
//!
//! Dialect-neutral pieces live here; everything that talks to the driver
//! lives under `sqlite/`.
//!
//! # Architecture
//!
//! ```text
//! filter.rs / pagination.rs   (predicates, page math)
//!     ↓
//! sqlite/store.rs             (generic EntityStore<T>)
//!     ↓
//! sqlite/{board,director,...}.rs  (per-entity joins, search paths, scopes)
//! ```

pub mod config;
pub mod filter;
pub mod pagination;
pub mod sqlite;

pub use config::DatabaseBackendConfig;
pub use filter::{BindValue, Predicate, SearchColumn, SearchFilter};
pub use pagination::{Page, Pagination, DEFAULT_PAGE_SIZE};
pub use sqlite::SqliteBackend;
