use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Table definitions, created in order.
///
/// References between tables are plain integer columns; nothing enforces
/// that the referenced row exists. Timestamps are stored as formatted text.
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            mail TEXT,
            status TEXT,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    ),
    (
        "directors",
        r#"
        CREATE TABLE IF NOT EXISTS directors (
            director_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            general_manager TEXT,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    ),
    (
        "boards",
        r#"
        CREATE TABLE IF NOT EXISTS boards (
            board_id INTEGER PRIMARY KEY AUTOINCREMENT,
            director_id INTEGER,
            name TEXT,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    ),
    (
        "managers",
        r#"
        CREATE TABLE IF NOT EXISTS managers (
            manager_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    ),
    (
        "units",
        r#"
        CREATE TABLE IF NOT EXISTS units (
            unity_id INTEGER PRIMARY KEY AUTOINCREMENT,
            manager_id INTEGER,
            board_id INTEGER,
            name TEXT,
            lat_lon TEXT,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    ),
    (
        "sellers",
        r#"
        CREATE TABLE IF NOT EXISTS sellers (
            seller_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            unity_id INTEGER,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    ),
    (
        "sales",
        r#"
        CREATE TABLE IF NOT EXISTS sales (
            sale_id INTEGER PRIMARY KEY AUTOINCREMENT,
            seller_id INTEGER,
            board_id INTEGER,
            unity_id INTEGER,
            manager_id INTEGER,
            amount REAL,
            location TEXT,
            date TEXT,
            status TEXT,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_boards_director_id ON boards (director_id)",
    "CREATE INDEX IF NOT EXISTS idx_units_board_id ON units (board_id)",
    "CREATE INDEX IF NOT EXISTS idx_sellers_unity_id ON sellers (unity_id)",
    "CREATE INDEX IF NOT EXISTS idx_sales_seller_id ON sales (seller_id)",
    "CREATE INDEX IF NOT EXISTS idx_sales_date ON sales (date)",
];

/// Create every table and index if missing.
pub async fn init_schema(pool: &SqlitePool) -> AppResult<()> {
    for (name, sql) in TABLES {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create {} table: {}", name, e)))?;
    }

    for sql in INDEXES {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create index: {}", e)))?;
    }

    Ok(())
}

/// Drop every table (for cleanup/testing)
pub async fn drop_schema(pool: &SqlitePool) -> AppResult<()> {
    for (name, _) in TABLES.iter().rev() {
        let sql = format!("DROP TABLE IF EXISTS {}", name);
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to drop table {}: {}", name, e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_schema_creation() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        init_schema(&pool).await.unwrap();
        // Idempotent
        init_schema(&pool).await.unwrap();

        for (name, _) in TABLES {
            let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", name))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count.0, 0);
        }

        drop_schema(&pool).await.unwrap();

        let missing = sqlx::query("SELECT COUNT(*) FROM sales").fetch_one(&pool).await;
        assert!(missing.is_err());
    }
}
