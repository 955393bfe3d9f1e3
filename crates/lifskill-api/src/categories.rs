//! Handlers for `/categories` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/categories` | All categories, oldest first |
//! | `POST`   | `/categories` | Caller required; body: `{"name":"..."}` |
//! | `GET`    | `/categories/{id}` | 404 if not found |
//! | `GET`    | `/categories/{id}/experts` | User ids on the roster |
//! | `PUT`    | `/categories/{id}/experts/{user_id}` | Admin only; `{"assigned":bool}` |
//! | `DELETE` | `/categories/{id}/experts/{user_id}` | Admin only; `{"revoked":bool}` |
//!
//! Users manage their own expertise through `/me/expertise`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lifskill_core::{CategoryId, UserId, category::Category, store::ModerationStore};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  caller::{Admins, Caller},
  error::ApiError,
};

/// `GET /categories`
pub async fn list<S: ModerationStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Category>>, ApiError> {
  let categories = store.list_categories().await.map_err(ApiError::store)?;
  Ok(Json(categories))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /categories`
pub async fn create<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(_): Caller,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let category = store.add_category(body.name).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /categories/{id}`
pub async fn get_one<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<CategoryId>,
) -> Result<Json<Category>, ApiError> {
  let category = store
    .get_category(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("category {id}")))?;
  Ok(Json(category))
}

// ─── Roster ───────────────────────────────────────────────────────────────────

/// `GET /categories/{id}/experts`
pub async fn experts<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<CategoryId>,
) -> Result<Json<Vec<UserId>>, ApiError> {
  let experts = store.experts(id).await.map_err(ApiError::store)?;
  Ok(Json(experts))
}

/// `PUT /categories/{id}/experts/{user_id}`
pub async fn assign<S: ModerationStore>(
  State(store): State<Arc<S>>,
  State(admins): State<Admins>,
  caller: Caller,
  Path((category, user)): Path<(CategoryId, UserId)>,
) -> Result<Json<Value>, ApiError> {
  admins.require(&caller)?;
  let assigned = store
    .assign_expert(user, category)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "assigned": assigned })))
}

/// `DELETE /categories/{id}/experts/{user_id}`
pub async fn revoke<S: ModerationStore>(
  State(store): State<Arc<S>>,
  State(admins): State<Admins>,
  caller: Caller,
  Path((category, user)): Path<(CategoryId, UserId)>,
) -> Result<Json<Value>, ApiError> {
  admins.require(&caller)?;
  let revoked = store
    .revoke_expert(user, category)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "revoked": revoked })))
}
