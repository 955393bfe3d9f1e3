//! Handlers for `/items` endpoints: the item registry and the approval ledger.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/items` | Optional `?status=pending\|approved&kind=post\|request` |
//! | `POST` | `/items` | Caller-owned; body: [`NewItem`]; returns 201 |
//! | `GET`  | `/items/{id}` | 404 if not found |
//! | `GET`  | `/items/{id}/approvals` | Count and votes, oldest first |
//! | `POST` | `/items/{id}/approve` | Caller votes; 403 non-expert, 409 repeat |
//! | `GET`  | `/me/items` | Caller's own items; same filters as `/items` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lifskill_core::{
  ItemId,
  approval::{ApprovalOutcome, ApprovalVote},
  item::{ContentItem, ItemFilter, NewItem},
  store::ModerationStore,
};
use serde::Serialize;

use crate::{caller::Caller, error::ApiError};

/// `GET /items[?status=...][&kind=...]`
pub async fn list<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<ItemFilter>,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
  let items = store.list_items(filter).await.map_err(ApiError::store)?;
  Ok(Json(items))
}

/// `GET /me/items[?status=...][&kind=...]`
pub async fn mine<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(owner): Caller,
  Query(filter): Query<ItemFilter>,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
  let filter = ItemFilter { owner: Some(owner), ..filter };
  let items = store.list_items(filter).await.map_err(ApiError::store)?;
  Ok(Json(items))
}

/// `POST /items`
pub async fn create<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(owner): Caller,
  Json(body): Json<NewItem>,
) -> Result<impl IntoResponse, ApiError> {
  let item = store.create_item(owner, body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /items/{id}`
pub async fn get_one<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ItemId>,
) -> Result<Json<ContentItem>, ApiError> {
  let item = store
    .get_item(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("item {id}")))?;
  Ok(Json(item))
}

#[derive(Debug, Serialize)]
pub struct ApprovalsView {
  pub approval_count: usize,
  pub approvals:      Vec<ApprovalVote>,
}

/// `GET /items/{id}/approvals`
pub async fn approvals<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ItemId>,
) -> Result<Json<ApprovalsView>, ApiError> {
  let approvals = store.approvals(id).await.map_err(ApiError::store)?;
  Ok(Json(ApprovalsView { approval_count: approvals.len(), approvals }))
}

/// `POST /items/{id}/approve`
pub async fn approve<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(voter): Caller,
  Path(id): Path<ItemId>,
) -> Result<Json<ApprovalOutcome>, ApiError> {
  let outcome = store.cast_approval(voter, id).await.map_err(ApiError::store)?;
  Ok(Json(outcome))
}
