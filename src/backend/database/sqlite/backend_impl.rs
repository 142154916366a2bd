use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;

use super::board::BoardTable;
use super::director::DirectorTable;
use super::manager::ManagerTable;
use super::sale::SaleTable;
use super::schema;
use super::seller::SellerTable;
use super::store::EntityStore;
use super::unity::UnityTable;
use crate::backend::database::DatabaseBackendConfig;
use crate::backend::Backend;
use crate::error::{AppError, AppResult};

/// SQLite backend: the connection pool plus one store per entity.
///
/// Stores hold only prebuilt SQL, so a single instance serves every request.
pub struct SqliteBackend {
    pool: SqlitePool,
    pub directors: EntityStore<DirectorTable>,
    pub boards: EntityStore<BoardTable>,
    pub managers: EntityStore<ManagerTable>,
    pub units: EntityStore<UnityTable>,
    pub sellers: EntityStore<SellerTable>,
    pub sales: EntityStore<SaleTable>,
}

impl SqliteBackend {
    /// Wrap an existing pool. Fails if any store's search paths do not resolve.
    pub fn with_pool(pool: SqlitePool) -> AppResult<Self> {
        Ok(Self {
            pool,
            directors: EntityStore::new()?,
            boards: EntityStore::new()?,
            managers: EntityStore::new()?,
            units: EntityStore::new()?,
            sellers: EntityStore::new()?,
            sales: EntityStore::new()?,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open a write transaction. Dropping it without `commit` rolls back.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {}", e)))
    }

    /// Check out a plain connection for reads.
    pub async fn acquire(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::Database(format!("Failed to acquire connection: {}", e)))
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::Configuration)?;

        let options = SqliteConnectOptions::from_str(&config.sqlx_url())
            .map_err(|e| AppError::Configuration(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout));

        // An in-memory database lives only as long as one of its connections.
        if config.is_memory_database() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        tracing::debug!(url = %config.connection_url, "connected to SQLite");

        Self::with_pool(pool)
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn init_schema(&self) -> AppResult<()> {
        schema::init_schema(&self.pool).await
    }

    async fn cleanup(&self) -> AppResult<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::database::pagination::Pagination;
    use crate::backend::database::sqlite::store::FieldValue;
    use crate::models::{BoardPayload, DirectorPayload, SalePayload};
    use crate::utils::current_database_datetime;

    async fn memory_backend() -> SqliteBackend {
        let config = DatabaseBackendConfig::memory_sqlite().with_max_connections(1);
        let backend = SqliteBackend::connect(&config).await.unwrap();
        backend.init_schema().await.unwrap();
        backend
    }

    async fn seed_user(backend: &SqliteBackend, name: &str) -> i64 {
        sqlx::query("INSERT INTO users (name, mail, status) VALUES (?, ?, 'active')")
            .bind(name)
            .bind(format!("{}@example.com", name.to_lowercase()))
            .execute(backend.pool())
            .await
            .unwrap()
            .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_health_check() {
        let backend = memory_backend().await;
        assert!(backend.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_board_round_trip_with_director_join() {
        let backend = memory_backend().await;
        let user_id = seed_user(&backend, "Alice").await;
        let stamp = current_database_datetime();

        let mut tx = backend.begin().await.unwrap();
        let director = backend
            .directors
            .create(
                &mut tx,
                &DirectorPayload {
                    user_id: Some(user_id),
                    general_manager: Some("Y".to_string()),
                },
                &stamp,
            )
            .await
            .unwrap();
        let board = backend
            .boards
            .create(
                &mut tx,
                &BoardPayload {
                    director_id: Some(director.director_id),
                    name: Some("North".to_string()),
                },
                &stamp,
            )
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(board.board_id, 1);
        assert_eq!(board.created_at.as_deref(), Some(stamp.as_str()));

        let mut conn = backend.acquire().await.unwrap();
        let view = backend
            .boards
            .find_by_id(&mut conn, board.board_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.board, board);
        let director_view = view.director_board.unwrap();
        assert_eq!(director_view.director, director);
        assert_eq!(
            director_view.user_director.unwrap().name.as_deref(),
            Some("Alice")
        );
    }

    #[tokio::test]
    async fn test_search_matches_joined_name() {
        let backend = memory_backend().await;
        let user_id = seed_user(&backend, "Zelda").await;
        let stamp = current_database_datetime();

        let mut conn = backend.acquire().await.unwrap();
        let director = backend
            .directors
            .create(
                &mut conn,
                &DirectorPayload {
                    user_id: Some(user_id),
                    general_manager: None,
                },
                &stamp,
            )
            .await
            .unwrap();
        for name in ["North", "South"] {
            backend
                .boards
                .create(
                    &mut conn,
                    &BoardPayload {
                        director_id: Some(director.director_id),
                        name: Some(name.to_string()),
                    },
                    &stamp,
                )
                .await
                .unwrap();
        }
        backend
            .boards
            .create(
                &mut conn,
                &BoardPayload {
                    director_id: Some(999),
                    name: Some("Orphan".to_string()),
                },
                &stamp,
            )
            .await
            .unwrap();

        let page = backend
            .boards
            .search(&mut conn, &(), Some("zeld"), &Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 2);

        let page = backend
            .boards
            .search(&mut conn, &(), Some("orph"), &Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
        assert!(page.items[0].director_board.is_none());

        let page = backend
            .boards
            .search(&mut conn, &(), Some("nothing-like-this"), &Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_update_is_partial_and_missing_id_is_none() {
        let backend = memory_backend().await;
        let mut conn = backend.acquire().await.unwrap();

        let sale = backend
            .sales
            .create(
                &mut conn,
                &SalePayload {
                    seller_id: Some(1),
                    manager_id: Some(2),
                    amount: Some(99.5),
                    date: Some("2023-01-10".to_string()),
                    status: Some("open".to_string()),
                    ..Default::default()
                },
                "2023-01-10 08:00:00",
            )
            .await
            .unwrap();
        assert_eq!(sale.manager_id, Some(2));

        let updated = backend
            .sales
            .update(
                &mut conn,
                sale.sale_id,
                &SalePayload {
                    status: Some("closed".to_string()),
                    ..Default::default()
                },
                "2023-01-11 09:00:00",
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.sale.status.as_deref(), Some("closed"));
        assert_eq!(updated.sale.amount, Some(99.5));
        assert_eq!(updated.sale.created_at.as_deref(), Some("2023-01-10 08:00:00"));
        assert_eq!(updated.sale.updated_at.as_deref(), Some("2023-01-11 09:00:00"));

        let missing = backend
            .sales
            .update(&mut conn, 99, &SalePayload::default(), "2023-01-11 09:00:00")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_by_parameters() {
        let backend = memory_backend().await;
        let mut conn = backend.acquire().await.unwrap();
        let stamp = current_database_datetime();

        for (director_id, name) in [(1, "North"), (2, "North"), (2, "East")] {
            backend
                .boards
                .create(
                    &mut conn,
                    &BoardPayload {
                        director_id: Some(director_id),
                        name: Some(name.to_string()),
                    },
                    &stamp,
                )
                .await
                .unwrap();
        }

        let found = backend
            .boards
            .find_by_parameters(
                &mut conn,
                &[FieldValue::new("name", "North"), FieldValue::new("directorId", 2)],
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.board.board_id, 2);

        let first = backend
            .boards
            .find_by_parameters(&mut conn, &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.board.board_id, 1);

        let none = backend
            .boards
            .find_by_parameters(&mut conn, &[FieldValue::new("name", "West")])
            .await
            .unwrap();
        assert!(none.is_none());

        let unknown = backend
            .boards
            .find_by_parameters(&mut conn, &[FieldValue::new("color", "red")])
            .await;
        assert!(matches!(unknown, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_and_delete_all() {
        let backend = memory_backend().await;
        let mut conn = backend.acquire().await.unwrap();
        let stamp = current_database_datetime();

        for name in ["A", "B", "C"] {
            backend
                .boards
                .create(
                    &mut conn,
                    &BoardPayload {
                        director_id: None,
                        name: Some(name.to_string()),
                    },
                    &stamp,
                )
                .await
                .unwrap();
        }

        let removed = backend.boards.delete(&mut conn, 2).await.unwrap().unwrap();
        assert_eq!(removed.name.as_deref(), Some("B"));
        assert!(backend.boards.delete(&mut conn, 2).await.unwrap().is_none());
        assert_eq!(backend.boards.count(&mut conn).await.unwrap(), 2);

        assert_eq!(backend.boards.delete_all(&mut conn).await.unwrap(), 2);
        assert_eq!(backend.boards.count(&mut conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rolled_back_transaction_leaves_no_rows() {
        let backend = memory_backend().await;
        let stamp = current_database_datetime();

        {
            let mut tx = backend.begin().await.unwrap();
            backend
                .boards
                .create(&mut tx, &BoardPayload::default(), &stamp)
                .await
                .unwrap();
            // dropped without commit
        }

        let mut conn = backend.acquire().await.unwrap();
        assert_eq!(backend.boards.count(&mut conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_paths_resolve_through_join_aliases() {
        let backend = memory_backend().await;

        let columns = backend.sales.search_filter().columns();
        let expr = |path: &str| {
            columns
                .iter()
                .find(|c| c.path == path)
                .map(|c| c.expr.as_str())
        };
        assert_eq!(expr("saleId"), Some("sa.sale_id"));
        assert_eq!(expr("sellerSale.userSeller.name"), Some("seller_sale_user.name"));
        assert_eq!(expr("unitySale.name"), Some("unity_sale.name"));
        assert_eq!(expr("managerSale.userManager.name"), None);

        backend.cleanup().await.unwrap();
        assert!(backend.pool().is_closed());
    }
}
