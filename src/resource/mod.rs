//! HTTP surface: one generic set of handlers instantiated per entity.

use axum::{routing::get, Router};

use crate::backend::database::sqlite::{EntityStore, EntityTable};
use crate::backend::SqliteBackend;
use crate::error::{ApiError, AppError};
use crate::startup::AppState;

pub mod entities;
pub mod handlers;
pub mod service;

pub use entities::{Boards, Directors, Managers, Sales, Sellers, Units};

/// Names an entity is known by in routes, logs and error envelopes.
#[derive(Debug, Clone, Copy)]
pub struct ResourceLabels {
    /// Lower-case singular, e.g. `board`.
    pub singular: &'static str,
    /// Route segment and lower-case plural, e.g. `boards`.
    pub plural: &'static str,
    /// Capitalised singular used in messages, e.g. `Board`.
    pub title: &'static str,
    /// Error envelope area, e.g. `BOARDS`.
    pub area: &'static str,
    /// Key of the count aggregate, e.g. `countBoards`.
    pub count_key: &'static str,
}

/// An entity exposed over HTTP.
pub trait Resource: Send + Sync + 'static {
    type Table: EntityTable;

    const LABELS: ResourceLabels;

    /// Whether creation is open to unauthenticated callers.
    const PUBLIC_CREATE: bool;

    fn store(backend: &SqliteBackend) -> &EntityStore<Self::Table>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Search,
    FindById,
    Update,
    Delete,
    DeleteAll,
    Count,
}

impl Operation {
    pub fn label(self, labels: &ResourceLabels) -> String {
        let singular = labels.singular.to_uppercase();
        let plural = labels.plural.to_uppercase();
        match self {
            Operation::Create => format!("CREATE {}", singular),
            Operation::Search => format!("SEARCH {}", plural),
            Operation::FindById => format!("FIND {} BY ID", singular),
            Operation::Update => format!("UPDATE {}", singular),
            Operation::Delete => format!("DELETE {}", singular),
            Operation::DeleteAll => format!("DELETE ALL {}", plural),
            Operation::Count => format!("COUNT {}", plural),
        }
    }

    fn failure_message(self, labels: &ResourceLabels) -> String {
        match self {
            Operation::Create => format!("Failed to create {}", labels.singular),
            Operation::Search => format!("Failed to search {}", labels.plural),
            Operation::FindById => format!("Failed to find {}", labels.singular),
            Operation::Update => format!("Failed to update {}", labels.singular),
            Operation::Delete => format!("Failed to delete {}", labels.singular),
            Operation::DeleteAll => format!("Failed to delete all {}", labels.plural),
            Operation::Count => format!("Failed to count {}", labels.plural),
        }
    }

    /// 404 warning for a record that does not exist.
    pub fn not_found<R: Resource>(self) -> ApiError {
        ApiError::not_found(format!("{} not found", R::LABELS.title))
            .with_area(R::LABELS.area)
            .with_operation(self.label(&R::LABELS))
    }

    /// Maps a storage error to its response: 400 for rejected input,
    /// otherwise a generic 500 with the detail logged.
    pub fn failed<R: Resource>(self, err: AppError) -> ApiError {
        let api = match &err {
            AppError::BadRequest(message) => ApiError::bad_request(message.clone()),
            _ => ApiError::fault(&err, self.failure_message(&R::LABELS)),
        };
        api.with_area(R::LABELS.area)
            .with_operation(self.label(&R::LABELS))
    }
}

/// Routes of one resource:
///
/// - `/{plural}` and `/{plural}/`: search, create, delete all
/// - `/{plural}/{id}`: find, update, delete
/// - `/{plural}/tasks/count`: count
pub fn resource_routes<R: Resource>() -> Router<AppState> {
    let base = format!("/{}", R::LABELS.plural);

    let collection = get(handlers::search::<R>)
        .post(handlers::create::<R>)
        .delete(handlers::delete_all::<R>);

    Router::new()
        .route(&base, collection.clone())
        .route(&format!("{}/", base), collection)
        .route(&format!("{}/tasks/count", base), get(handlers::count::<R>))
        .route(
            &format!("{}/{{id}}", base),
            get(handlers::find_by_id::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
}
