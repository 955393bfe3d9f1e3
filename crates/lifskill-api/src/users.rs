//! Handlers for user identities and self-service expertise.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: `{"username":"..."}`; 409 if taken |
//! | `GET`  | `/users/{id}` | 404 if not found |
//! | `GET`  | `/me/expertise` | Categories the caller is an expert in |
//! | `PUT`  | `/me/expertise` | Body: `{"categories":[1,2]}`; replaces the caller's roster entries |

use std::{collections::BTreeSet, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lifskill_core::{CategoryId, UserId, store::ModerationStore, user::User};
use serde::Deserialize;

use crate::{caller::Caller, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub username: String,
}

/// `POST /users`
pub async fn create<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let user = store.add_user(body.username).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
  let user = store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id}")))?;
  Ok(Json(user))
}

// ─── Expertise ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExpertiseBody {
  pub categories: BTreeSet<CategoryId>,
}

/// `GET /me/expertise`
pub async fn my_expertise<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(user): Caller,
) -> Result<Json<Vec<CategoryId>>, ApiError> {
  let categories = store
    .expert_categories(user)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(categories))
}

/// `PUT /me/expertise`
pub async fn replace_my_expertise<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(user): Caller,
  Json(body): Json<ExpertiseBody>,
) -> Result<StatusCode, ApiError> {
  store
    .replace_expertise(user, body.categories)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
