use axum::{http::Method, middleware, routing::get, Router};
use std::sync::Arc;

use crate::auth::{auth_middleware, AuthGuard};
use crate::backend::{Backend, SqliteBackend};
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::logging::logging_middleware;
use crate::resource::{
    resource_routes, service, Boards, Directors, Managers, Resource, Sales, Sellers, Units,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<SqliteBackend>,
    pub config: Arc<AppConfig>,
}

/// Connect to the configured database and create the schema.
pub async fn build_backend(config: &AppConfig) -> AppResult<Arc<SqliteBackend>> {
    let backend = SqliteBackend::connect(&config.database.to_backend_config()).await?;
    backend.init_schema().await?;
    tracing::info!(url = %config.database.url, "database ready");
    Ok(Arc::new(backend))
}

fn allow_public_create<R: Resource>(guard: AuthGuard) -> AuthGuard {
    if R::PUBLIC_CREATE {
        guard.allow(Method::POST, format!("/{}", R::LABELS.plural))
    } else {
        guard
    }
}

/// Build the full router: resource routes behind the auth guard, a public
/// health probe, the catch-all 404 and access logging around everything.
pub fn build_router(backend: Arc<SqliteBackend>, config: AppConfig) -> Router {
    let mut guard = AuthGuard::new(config.auth.clone());
    guard = allow_public_create::<Directors>(guard);
    guard = allow_public_create::<Boards>(guard);
    guard = allow_public_create::<Managers>(guard);
    guard = allow_public_create::<Units>(guard);
    guard = allow_public_create::<Sellers>(guard);
    guard = allow_public_create::<Sales>(guard);

    let state = AppState {
        backend,
        config: Arc::new(config),
    };

    Router::new()
        .route("/health", get(service::health))
        .merge(resource_routes::<Directors>())
        .merge(resource_routes::<Boards>())
        .merge(resource_routes::<Managers>())
        .merge(resource_routes::<Units>())
        .merge(resource_routes::<Sellers>())
        .merge(resource_routes::<Sales>())
        // Only matched routes are guarded; unknown paths fall through to 404.
        .route_layer(middleware::from_fn_with_state(
            Arc::new(guard),
            auth_middleware,
        ))
        .method_not_allowed_fallback(service::method_not_allowed)
        .fallback(service::route_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// `build_backend` followed by `build_router`.
pub async fn build_app(config: AppConfig) -> AppResult<(Router, Arc<SqliteBackend>)> {
    let backend = build_backend(&config).await?;
    let router = build_router(backend.clone(), config);
    Ok((router, backend))
}
