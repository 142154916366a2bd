//! Row mapping for every stored record.
//!
//! Base columns are selected under their own names, joined columns under
//! `{alias}__{column}`. A record read through a LEFT JOIN that found nothing
//! has a NULL id and maps to `None`.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::{AppError, AppResult};
use crate::models::{Board, Director, Manager, Sale, Seller, Unity, UserSummary};

/// A table whose rows map onto a record type.
pub trait TableRecord: Sized {
    const TABLE: &'static str;

    /// `(json field, column)` pairs in SELECT order. The id comes first.
    const FIELDS: &'static [(&'static str, &'static str)];

    fn id_column() -> &'static str {
        Self::FIELDS[0].1
    }

    /// Column name for a JSON field name, if the record has one.
    fn column_for(field: &str) -> Option<&'static str> {
        Self::FIELDS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    fn from_prefixed_row(row: &SqliteRow, prefix: &str) -> AppResult<Option<Self>>;
}

/// Label a column is selected under for the given join alias.
pub fn prefixed(prefix: &str, column: &str) -> String {
    if prefix.is_empty() {
        column.to_string()
    } else {
        format!("{}__{}", prefix, column)
    }
}

/// Reads the base record of a row, which an inner SELECT always has.
pub fn required<R: TableRecord>(row: &SqliteRow) -> AppResult<R> {
    R::from_prefixed_row(row, "")?
        .ok_or_else(|| AppError::Internal(format!("Row from {} without id", R::TABLE)))
}

fn get<'r, T>(row: &'r SqliteRow, prefix: &str, column: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    Ok(row.try_get::<T, _>(prefixed(prefix, column).as_str())?)
}

impl TableRecord for Director {
    const TABLE: &'static str = "directors";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("directorId", "director_id"),
        ("userId", "user_id"),
        ("generalManager", "general_manager"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];

    fn from_prefixed_row(row: &SqliteRow, prefix: &str) -> AppResult<Option<Self>> {
        let Some(director_id) = get::<Option<i64>>(row, prefix, "director_id")? else {
            return Ok(None);
        };
        Ok(Some(Director {
            director_id,
            user_id: get(row, prefix, "user_id")?,
            general_manager: get(row, prefix, "general_manager")?,
            created_at: get(row, prefix, "created_at")?,
            updated_at: get(row, prefix, "updated_at")?,
        }))
    }
}

impl TableRecord for Board {
    const TABLE: &'static str = "boards";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("boardId", "board_id"),
        ("directorId", "director_id"),
        ("name", "name"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];

    fn from_prefixed_row(row: &SqliteRow, prefix: &str) -> AppResult<Option<Self>> {
        let Some(board_id) = get::<Option<i64>>(row, prefix, "board_id")? else {
            return Ok(None);
        };
        Ok(Some(Board {
            board_id,
            director_id: get(row, prefix, "director_id")?,
            name: get(row, prefix, "name")?,
            created_at: get(row, prefix, "created_at")?,
            updated_at: get(row, prefix, "updated_at")?,
        }))
    }
}

impl TableRecord for Manager {
    const TABLE: &'static str = "managers";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("managerId", "manager_id"),
        ("userId", "user_id"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];

    fn from_prefixed_row(row: &SqliteRow, prefix: &str) -> AppResult<Option<Self>> {
        let Some(manager_id) = get::<Option<i64>>(row, prefix, "manager_id")? else {
            return Ok(None);
        };
        Ok(Some(Manager {
            manager_id,
            user_id: get(row, prefix, "user_id")?,
            created_at: get(row, prefix, "created_at")?,
            updated_at: get(row, prefix, "updated_at")?,
        }))
    }
}

impl TableRecord for Unity {
    const TABLE: &'static str = "units";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("unityId", "unity_id"),
        ("managerId", "manager_id"),
        ("boardId", "board_id"),
        ("name", "name"),
        ("latLon", "lat_lon"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];

    fn from_prefixed_row(row: &SqliteRow, prefix: &str) -> AppResult<Option<Self>> {
        let Some(unity_id) = get::<Option<i64>>(row, prefix, "unity_id")? else {
            return Ok(None);
        };
        Ok(Some(Unity {
            unity_id,
            manager_id: get(row, prefix, "manager_id")?,
            board_id: get(row, prefix, "board_id")?,
            name: get(row, prefix, "name")?,
            lat_lon: get(row, prefix, "lat_lon")?,
            created_at: get(row, prefix, "created_at")?,
            updated_at: get(row, prefix, "updated_at")?,
        }))
    }
}

impl TableRecord for Seller {
    const TABLE: &'static str = "sellers";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("sellerId", "seller_id"),
        ("userId", "user_id"),
        ("unityId", "unity_id"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];

    fn from_prefixed_row(row: &SqliteRow, prefix: &str) -> AppResult<Option<Self>> {
        let Some(seller_id) = get::<Option<i64>>(row, prefix, "seller_id")? else {
            return Ok(None);
        };
        Ok(Some(Seller {
            seller_id,
            user_id: get(row, prefix, "user_id")?,
            unity_id: get(row, prefix, "unity_id")?,
            created_at: get(row, prefix, "created_at")?,
            updated_at: get(row, prefix, "updated_at")?,
        }))
    }
}

impl TableRecord for Sale {
    const TABLE: &'static str = "sales";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("saleId", "sale_id"),
        ("sellerId", "seller_id"),
        ("boardId", "board_id"),
        ("unityId", "unity_id"),
        ("managerId", "manager_id"),
        ("amount", "amount"),
        ("location", "location"),
        ("date", "date"),
        ("status", "status"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];

    fn from_prefixed_row(row: &SqliteRow, prefix: &str) -> AppResult<Option<Self>> {
        let Some(sale_id) = get::<Option<i64>>(row, prefix, "sale_id")? else {
            return Ok(None);
        };
        Ok(Some(Sale {
            sale_id,
            seller_id: get(row, prefix, "seller_id")?,
            board_id: get(row, prefix, "board_id")?,
            unity_id: get(row, prefix, "unity_id")?,
            manager_id: get(row, prefix, "manager_id")?,
            amount: get(row, prefix, "amount")?,
            location: get(row, prefix, "location")?,
            date: get(row, prefix, "date")?,
            status: get(row, prefix, "status")?,
            created_at: get(row, prefix, "created_at")?,
            updated_at: get(row, prefix, "updated_at")?,
        }))
    }
}

impl TableRecord for UserSummary {
    const TABLE: &'static str = "users";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("userId", "user_id"),
        ("name", "name"),
        ("mail", "mail"),
        ("status", "status"),
    ];

    fn from_prefixed_row(row: &SqliteRow, prefix: &str) -> AppResult<Option<Self>> {
        let Some(user_id) = get::<Option<i64>>(row, prefix, "user_id")? else {
            return Ok(None);
        };
        Ok(Some(UserSummary {
            user_id,
            name: get(row, prefix, "name")?,
            mail: get(row, prefix, "mail")?,
            status: get(row, prefix, "status")?,
        }))
    }
}
