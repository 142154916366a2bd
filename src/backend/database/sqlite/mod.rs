//! SQLite storage: schema bootstrap, row mapping and one store per entity.

pub mod backend_impl;
pub mod board;
pub mod director;
pub mod manager;
pub mod rows;
pub mod sale;
pub mod schema;
pub mod seller;
pub mod store;
pub mod unity;

pub use backend_impl::SqliteBackend;
pub use board::BoardTable;
pub use director::DirectorTable;
pub use manager::ManagerTable;
pub use sale::{SaleScope, SaleTable};
pub use seller::{SellerScope, SellerTable};
pub use store::{EntityStore, EntityTable, FieldValue};
pub use unity::{UnityScope, UnityTable};
