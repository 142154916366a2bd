use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use sqlx::{Sqlite, Transaction};
use std::collections::HashMap;

use super::{Operation, Resource};
use crate::backend::database::pagination::Pagination;
use crate::backend::database::sqlite::EntityTable;
use crate::error::{ApiError, AppResult};
use crate::extractors::ApiJson;
use crate::startup::AppState;
use crate::utils::{current_database_datetime, parse_record_id};

type Payload<R> = <<R as Resource>::Table as EntityTable>::Payload;

/// Commit on success, roll back explicitly on failure.
async fn finish<T>(tx: Transaction<'static, Sqlite>, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Payload<R>>,
) -> Result<Response, ApiError> {
    let op = Operation::Create;
    let stamp = current_database_datetime();

    let mut tx = state.backend.begin().await.map_err(|e| op.failed::<R>(e))?;
    let result = R::store(&state.backend)
        .create(&mut tx, &payload, &stamp)
        .await;
    let record = finish(tx, result).await.map_err(|e| op.failed::<R>(e))?;

    tracing::info!(resource = R::LABELS.plural, "created record");
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// Query parameters: `parameter` (free text), `page`, `size`, plus the
/// entity's own scoping ids.
pub async fn search<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let op = Operation::Search;
    let pagination = Pagination::from_params(
        params.get("page").map(String::as_str),
        params.get("size").map(String::as_str),
        state.config.pagination.default_size,
    );
    let scope = <R::Table as EntityTable>::scope_from_params(&params);
    let parameter = params.get("parameter").map(String::as_str);

    let mut conn = state.backend.acquire().await.map_err(|e| op.failed::<R>(e))?;
    let page = R::store(&state.backend)
        .search(&mut conn, &scope, parameter, &pagination)
        .await
        .map_err(|e| op.failed::<R>(e))?;

    Ok(Json(page).into_response())
}

pub async fn find_by_id<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let op = Operation::FindById;
    let id = parse_record_id(&id).ok_or_else(|| op.not_found::<R>())?;

    let mut conn = state.backend.acquire().await.map_err(|e| op.failed::<R>(e))?;
    match R::store(&state.backend).find_by_id(&mut conn, id).await {
        Ok(Some(view)) => Ok(Json(view).into_response()),
        Ok(None) => Err(op.not_found::<R>()),
        Err(e) => Err(op.failed::<R>(e)),
    }
}

/// Assigns the fields present in the body. A missing id still commits the
/// (empty) transaction before answering 404.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<Payload<R>>,
) -> Result<Response, ApiError> {
    let op = Operation::Update;
    let id = parse_record_id(&id).ok_or_else(|| op.not_found::<R>())?;
    let stamp = current_database_datetime();

    let mut tx = state.backend.begin().await.map_err(|e| op.failed::<R>(e))?;
    let result = R::store(&state.backend)
        .update(&mut tx, id, &payload, &stamp)
        .await;

    match finish(tx, result).await {
        Ok(Some(view)) => {
            tracing::info!(resource = R::LABELS.plural, id, "updated record");
            Ok(Json(view).into_response())
        }
        Ok(None) => Err(op.not_found::<R>()),
        Err(e) => Err(op.failed::<R>(e)),
    }
}

/// Responds with the values the record had before removal.
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let op = Operation::Delete;
    let id = parse_record_id(&id).ok_or_else(|| op.not_found::<R>())?;

    let mut tx = state.backend.begin().await.map_err(|e| op.failed::<R>(e))?;
    let result = R::store(&state.backend).delete(&mut tx, id).await;

    match finish(tx, result).await {
        Ok(Some(record)) => {
            tracing::info!(resource = R::LABELS.plural, id, "deleted record");
            Ok(Json(record).into_response())
        }
        Ok(None) => Err(op.not_found::<R>()),
        Err(e) => Err(op.failed::<R>(e)),
    }
}

pub async fn delete_all<R: Resource>(State(state): State<AppState>) -> Result<Response, ApiError> {
    let op = Operation::DeleteAll;

    let mut tx = state.backend.begin().await.map_err(|e| op.failed::<R>(e))?;
    let result = R::store(&state.backend).delete_all(&mut tx).await;
    let removed = finish(tx, result).await.map_err(|e| op.failed::<R>(e))?;

    tracing::info!(resource = R::LABELS.plural, removed, "deleted all records");
    Ok(Json(format!("All {} were deleted", R::LABELS.plural)).into_response())
}

/// Raw aggregate, e.g. `[{"countBoards": 3}]`.
pub async fn count<R: Resource>(State(state): State<AppState>) -> Result<Response, ApiError> {
    let op = Operation::Count;

    let mut conn = state.backend.acquire().await.map_err(|e| op.failed::<R>(e))?;
    let total = R::store(&state.backend)
        .count(&mut conn)
        .await
        .map_err(|e| op.failed::<R>(e))?;

    let mut row = Map::new();
    row.insert(R::LABELS.count_key.to_string(), json!(total));
    Ok(Json(Value::Array(vec![Value::Object(row)])).into_response())
}
