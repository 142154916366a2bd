use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::ApiError;

/// Credentials check applied to every matched route.
///
/// Public routes (the health probe and the creation routes opened to
/// self-registration) pass through untouched.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    config: AuthConfig,
    public_routes: Vec<(Method, String)>,
}

impl AuthGuard {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            public_routes: vec![(Method::GET, "/health".to_string())],
        }
    }

    /// Let anyone call `method` on `path`.
    pub fn allow(mut self, method: Method, path: impl Into<String>) -> Self {
        self.public_routes.push((method, path.into()));
        self
    }

    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        let path = normalize_path(path);
        self.public_routes
            .iter()
            .any(|(m, p)| m == method && normalize_path(p) == path)
    }

    /// Validate the Authorization header against the configured scheme
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());

        match self.config.auth_type.as_str() {
            "unauthenticated" => Ok(()),
            "bearer" => {
                let provided = auth_header
                    .and_then(|h| h.strip_prefix("Bearer "))
                    .ok_or_else(ApiError::unauthorized)?;

                match &self.config.token {
                    Some(expected) if provided == expected => Ok(()),
                    _ => Err(ApiError::unauthorized()),
                }
            }
            "basic" => {
                let encoded = auth_header
                    .and_then(|h| h.strip_prefix("Basic "))
                    .ok_or_else(ApiError::unauthorized)?;

                let decoded = general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|_| ApiError::unauthorized())?;
                let credentials = String::from_utf8(decoded).map_err(|_| ApiError::unauthorized())?;
                let (username, password) = credentials
                    .split_once(':')
                    .ok_or_else(ApiError::unauthorized)?;

                match &self.config.basic {
                    Some(basic) if basic.username == username && basic.password == password => {
                        Ok(())
                    }
                    _ => Err(ApiError::unauthorized()),
                }
            }
            other => {
                tracing::error!(auth_type = other, "unknown authentication type");
                Err(ApiError::unauthorized())
            }
        }
    }
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Authentication middleware for the resource routes
pub async fn auth_middleware(
    State(guard): State<Arc<AuthGuard>>,
    request: Request,
    next: Next,
) -> Response {
    if guard.is_public(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    match guard.authenticate(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(rejection) => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                "rejected unauthenticated request"
            );
            rejection.into_response()
        }
    }
}
