//! Generic persistence for one entity table and its eager joins.
//!
//! Every statement runs on a caller-supplied connection, so the same store
//! serves plain pooled reads and writes inside a transaction.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqliteConnection};
use std::collections::HashMap;
use std::marker::PhantomData;

use super::rows::TableRecord;
use crate::backend::database::filter::{BindValue, Predicate, SearchColumn, SearchFilter};
use crate::backend::database::pagination::{Page, Pagination};
use crate::error::{AppError, AppResult};

/// A belongs-to association included in every read of an entity.
#[derive(Debug, Clone)]
pub struct Join {
    /// Association chain from the base entity, e.g. `directorBoard.userDirector`.
    pub path: &'static str,
    /// SQL alias of the joined table, also the prefix of its selected columns.
    pub alias: &'static str,
    pub table: &'static str,
    pub on: String,
    pub fields: &'static [(&'static str, &'static str)],
}

impl Join {
    /// `LEFT JOIN R AS alias ON alias.<id> = parent.foreign_key`
    pub fn belongs_to<R: TableRecord>(
        path: &'static str,
        alias: &'static str,
        parent: &str,
        foreign_key: &str,
    ) -> Self {
        Self {
            path,
            alias,
            table: R::TABLE,
            on: format!("{}.{} = {}.{}", alias, R::id_column(), parent, foreign_key),
            fields: R::FIELDS,
        }
    }
}

/// Writable columns of a request body.
pub trait WritePayload {
    /// Every writable column, paired with the body value or `None` when the
    /// body left the field out.
    fn columns(&self) -> Vec<(&'static str, Option<BindValue>)>;
}

/// Describes how one entity is stored, joined, scoped and ordered.
pub trait EntityTable: Send + Sync + 'static {
    type Record: TableRecord + Serialize + Send;
    type View: Serialize + Send;
    type Payload: WritePayload + DeserializeOwned + Send + Sync;
    type Scope: Default + Send + Sync;

    const ALIAS: &'static str;
    const ORDER_BY: &'static str;

    fn joins() -> Vec<Join>;

    /// Dotted paths matched by the free-text filter, in order.
    fn search_paths() -> &'static [&'static str];

    fn view_from_row(row: &SqliteRow) -> AppResult<Self::View>;

    /// Reads owning-entity filters from the query string. Values that do not
    /// parse are ignored.
    fn scope_from_params(_params: &HashMap<String, String>) -> Self::Scope {
        Self::Scope::default()
    }

    fn scope_predicates(_scope: &Self::Scope) -> Vec<Predicate> {
        Vec::new()
    }
}

/// One `field = value` condition of a lookup by parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub field: String,
    pub value: Value,
}

impl FieldValue {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

pub struct EntityStore<T: EntityTable> {
    from_clause: String,
    select_sql: String,
    record_sql: String,
    filter: SearchFilter,
    _table: PhantomData<fn() -> T>,
}

impl<T: EntityTable> EntityStore<T> {
    /// Prebuilds the statements and resolves every searchable path.
    ///
    /// Fails when a path names an association or field that does not exist.
    pub fn new() -> AppResult<Self> {
        let record = T::Record::FIELDS;
        let joins = T::joins();

        let mut select_columns: Vec<String> = record
            .iter()
            .map(|(_, column)| format!("{}.{} AS {}", T::ALIAS, column, column))
            .collect();
        let mut from_clause = format!("FROM {} AS {}", T::Record::TABLE, T::ALIAS);
        for join in &joins {
            select_columns.extend(
                join.fields
                    .iter()
                    .map(|(_, column)| format!("{a}.{c} AS {a}__{c}", a = join.alias, c = column)),
            );
            from_clause.push_str(&format!(
                " LEFT JOIN {} AS {} ON {}",
                join.table, join.alias, join.on
            ));
        }

        let columns = T::search_paths()
            .iter()
            .map(|path| resolve_path::<T>(path, &joins))
            .collect::<AppResult<Vec<_>>>()?;

        let record_columns: Vec<&str> = record.iter().map(|(_, column)| *column).collect();

        Ok(Self {
            select_sql: format!("SELECT {} {}", select_columns.join(", "), from_clause),
            record_sql: format!(
                "SELECT {} FROM {} WHERE {} = ?",
                record_columns.join(", "),
                T::Record::TABLE,
                T::Record::id_column()
            ),
            from_clause,
            filter: SearchFilter::new(columns),
            _table: PhantomData,
        })
    }

    pub fn search_filter(&self) -> &SearchFilter {
        &self.filter
    }

    /// Inserts a record stamped with `stamp` and returns it as stored.
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        payload: &T::Payload,
        stamp: &str,
    ) -> AppResult<T::Record> {
        let mut names = Vec::new();
        let mut binds = Vec::new();
        for (column, value) in payload.columns() {
            names.push(column);
            binds.push(value.unwrap_or(BindValue::Null));
        }
        names.extend(["created_at", "updated_at"]);
        binds.extend([BindValue::from(stamp), BindValue::from(stamp)]);

        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::Record::TABLE,
            names.join(", "),
            placeholders
        );

        let result = bind_values(sqlx::query(&sql), &binds)
            .execute(&mut *conn)
            .await?;

        self.find_record(conn, result.last_insert_rowid())
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Inserted row missing from {}", T::Record::TABLE))
            })
    }

    /// Counts and fetches one page of joined views.
    ///
    /// Scope predicates and the free-text predicate are ANDed together.
    pub async fn search(
        &self,
        conn: &mut SqliteConnection,
        scope: &T::Scope,
        parameter: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<Page<T::View>> {
        let mut predicates = T::scope_predicates(scope);
        if let Some(text) = self.filter.predicate(parameter) {
            predicates.push(text);
        }
        let (where_sql, binds) = where_clause(Predicate::all(predicates));

        let count_sql = format!("SELECT COUNT(*) AS total {}{}", self.from_clause, where_sql);
        let total: i64 = bind_values(sqlx::query(&count_sql), &binds)
            .fetch_one(&mut *conn)
            .await?
            .try_get("total")?;

        let rows_sql = format!(
            "{}{} ORDER BY {} LIMIT ? OFFSET ?",
            self.select_sql,
            where_sql,
            T::ORDER_BY
        );
        let rows = bind_values(sqlx::query(&rows_sql), &binds)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *conn)
            .await?;

        let items = rows
            .iter()
            .map(T::view_from_row)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(total, items, pagination))
    }

    pub async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> AppResult<Option<T::View>> {
        let sql = format!(
            "{} WHERE {}.{} = ?",
            self.select_sql,
            T::ALIAS,
            T::Record::id_column()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.as_ref().map(T::view_from_row).transpose()
    }

    /// First view (lowest id) whose fields equal all the given values.
    pub async fn find_by_parameters(
        &self,
        conn: &mut SqliteConnection,
        parameters: &[FieldValue],
    ) -> AppResult<Option<T::View>> {
        let predicates = parameters
            .iter()
            .map(|p| {
                let column = T::Record::column_for(&p.field).ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown field '{}'", p.field))
                })?;
                Ok(Predicate::eq(
                    &format!("{}.{}", T::ALIAS, column),
                    json_to_bind(&p.field, &p.value)?,
                ))
            })
            .collect::<AppResult<Vec<_>>>()?;
        let (where_sql, binds) = where_clause(Predicate::all(predicates));

        let sql = format!(
            "{}{} ORDER BY {}.{} ASC LIMIT 1",
            self.select_sql,
            where_sql,
            T::ALIAS,
            T::Record::id_column()
        );
        let row = bind_values(sqlx::query(&sql), &binds)
            .fetch_optional(&mut *conn)
            .await?;

        row.as_ref().map(T::view_from_row).transpose()
    }

    /// Assigns the fields present in `payload` and refreshes `updated_at`.
    ///
    /// Returns the joined view re-read on the same connection, or `None`
    /// when no row has that id.
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        payload: &T::Payload,
        stamp: &str,
    ) -> AppResult<Option<T::View>> {
        let mut assignments = Vec::new();
        let mut binds = Vec::new();
        for (column, value) in payload.columns() {
            if let Some(value) = value {
                assignments.push(format!("{} = ?", column));
                binds.push(value);
            }
        }
        assignments.push("updated_at = ?".to_string());
        binds.push(BindValue::from(stamp));
        binds.push(BindValue::Int(id));

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            T::Record::TABLE,
            assignments.join(", "),
            T::Record::id_column()
        );
        let result = bind_values(sqlx::query(&sql), &binds)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(conn, id).await
    }

    /// Removes a row and returns its values from before the delete.
    pub async fn delete(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> AppResult<Option<T::Record>> {
        let Some(record) = self.find_record(conn, id).await? else {
            return Ok(None);
        };

        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            T::Record::TABLE,
            T::Record::id_column()
        );
        sqlx::query(&sql).bind(id).execute(&mut *conn).await?;

        Ok(Some(record))
    }

    pub async fn delete_all(&self, conn: &mut SqliteConnection) -> AppResult<u64> {
        let sql = format!("DELETE FROM {}", T::Record::TABLE);
        let result = sqlx::query(&sql).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self, conn: &mut SqliteConnection) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) AS total FROM {}", T::Record::TABLE);
        let total: i64 = sqlx::query(&sql).fetch_one(&mut *conn).await?.try_get("total")?;
        Ok(total)
    }

    async fn find_record(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> AppResult<Option<T::Record>> {
        let row = sqlx::query(&self.record_sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => T::Record::from_prefixed_row(&row, ""),
            None => Ok(None),
        }
    }
}

/// Resolves a searchable path to its SQL expression.
///
/// A plain name is a column of the base table. A dotted path names a field
/// of the join whose association chain is everything before the last dot.
fn resolve_path<T: EntityTable>(path: &str, joins: &[Join]) -> AppResult<SearchColumn> {
    let unknown = || AppError::Configuration(format!("Unknown search path '{}'", path));

    let expr = match path.rsplit_once('.') {
        None => {
            let column = T::Record::column_for(path).ok_or_else(unknown)?;
            format!("{}.{}", T::ALIAS, column)
        }
        Some((association, field)) => {
            let join = joins
                .iter()
                .find(|j| j.path == association)
                .ok_or_else(unknown)?;
            let column = join
                .fields
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, column)| *column)
                .ok_or_else(unknown)?;
            format!("{}.{}", join.alias, column)
        }
    };

    Ok(SearchColumn {
        path: path.to_string(),
        expr,
    })
}

/// A positive integer query parameter. Anything else is treated as absent.
pub fn id_param(params: &HashMap<String, String>, name: &str) -> Option<i64> {
    params
        .get(name)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}

fn where_clause(predicate: Option<Predicate>) -> (String, Vec<BindValue>) {
    match predicate {
        Some(p) => (format!(" WHERE {}", p.sql), p.binds),
        None => (String::new(), Vec::new()),
    }
}

fn json_to_bind(field: &str, value: &Value) -> AppResult<BindValue> {
    match value {
        Value::Null => Ok(BindValue::Null),
        Value::Bool(b) => Ok(BindValue::Int(i64::from(*b))),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(BindValue::Int(i)),
            None => n.as_f64().map(BindValue::Real).ok_or_else(|| {
                AppError::BadRequest(format!("Unsupported number for field '{}'", field))
            }),
        },
        Value::String(s) => Ok(BindValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(AppError::BadRequest(format!(
            "Field '{}' must be compared with a scalar value",
            field
        ))),
    }
}

/// Binds values to `?` placeholders in order.
pub fn bind_values<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    binds: &[BindValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in binds {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Real(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.clone()),
            BindValue::Null => query.bind(Option::<String>::None),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_bind() {
        assert_eq!(json_to_bind("a", &json!(null)).unwrap(), BindValue::Null);
        assert_eq!(json_to_bind("a", &json!(3)).unwrap(), BindValue::Int(3));
        assert_eq!(json_to_bind("a", &json!(2.5)).unwrap(), BindValue::Real(2.5));
        assert_eq!(json_to_bind("a", &json!(true)).unwrap(), BindValue::Int(1));
        assert_eq!(
            json_to_bind("a", &json!("x")).unwrap(),
            BindValue::Text("x".to_string())
        );
        assert!(json_to_bind("a", &json!([1])).is_err());
    }

    #[test]
    fn test_where_clause() {
        assert_eq!(where_clause(None), (String::new(), Vec::new()));

        let (sql, binds) = where_clause(Some(Predicate::eq("b.board_id", BindValue::Int(1))));
        assert_eq!(sql, " WHERE b.board_id = ?");
        assert_eq!(binds, vec![BindValue::Int(1)]);
    }
}
