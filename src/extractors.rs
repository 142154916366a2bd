use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body extractor whose rejections use the API error envelope.
///
/// A request without a Content-Type header is still parsed as JSON.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiJsonRejection;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match req.headers().get(header::CONTENT_TYPE) {
            Some(content_type) => {
                let media_type = content_type
                    .to_str()
                    .map_err(|_| ApiJsonRejection::InvalidContentType)?
                    .split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_lowercase();

                if media_type != "application/json" {
                    return Err(ApiJsonRejection::InvalidContentType);
                }
            }
            None => {
                req.headers_mut().insert(
                    header::CONTENT_TYPE,
                    header::HeaderValue::from_static("application/json"),
                );
            }
        }

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiJsonRejection::JsonRejection(rejection)),
        }
    }
}

pub enum ApiJsonRejection {
    InvalidContentType,
    JsonRejection(JsonRejection),
}

impl IntoResponse for ApiJsonRejection {
    fn into_response(self) -> Response {
        let message = match self {
            ApiJsonRejection::InvalidContentType => {
                "Content-Type must be application/json".to_string()
            }
            ApiJsonRejection::JsonRejection(rejection) => format!("Invalid JSON: {}", rejection.body_text()),
        };

        ApiError::bad_request(message)
            .with_area("REQUEST")
            .with_operation("READ BODY")
            .into_response()
    }
}
