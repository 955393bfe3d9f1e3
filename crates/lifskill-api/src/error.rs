//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use lifskill_core::{Classify, ErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The `x-user-id` header was absent or not a positive integer.
  #[error("missing or invalid caller identity")]
  Unauthenticated,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("{source}")]
  Store {
    kind:   ErrorKind,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap a store error, keeping its classification.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    Self::Store { kind: e.kind(), source: Box::new(e) }
  }

  pub fn kind(&self) -> Option<ErrorKind> {
    match self {
      Self::Unauthenticated => None,
      Self::NotFound(_) => Some(ErrorKind::NotFound),
      Self::Forbidden(_) => Some(ErrorKind::Forbidden),
      Self::Store { kind, .. } => Some(*kind),
    }
  }
}

fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::Forbidden => StatusCode::FORBIDDEN,
    ErrorKind::Conflict => StatusCode::CONFLICT,
    ErrorKind::InvalidReference | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
    ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    let Some(kind) = self.kind() else {
      return (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message, "kind": "unauthenticated" })),
      )
        .into_response();
    };

    let status = status_for(kind);
    if status.is_server_error() {
      tracing::error!(error = %message, "store failure");
    }
    (status, Json(json!({ "error": message, "kind": kind }))).into_response()
  }
}
