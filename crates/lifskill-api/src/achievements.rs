//! Achievement ledger endpoints and the caller's own views.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/items/{id}/achieve` | +1 in every category of the item |
//! | `POST` | `/items/{id}/bookmark` | Toggle; returns [`BookmarkToggle`] |
//! | `GET`  | `/me/achievements` | Caller's scores with category names |
//! | `GET`  | `/me/bookmarks` | Caller's bookmarked item ids |
//! | `GET`  | `/me/achieved` | Items in categories the caller has scored in |
//! | `GET`  | `/me/pending` | Pending items the caller may vote on |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use lifskill_core::{
  ItemId,
  achievement::{AchievementEntry, BookmarkToggle, CategoryScore},
  item::ContentItem,
  store::ModerationStore,
};

use crate::{caller::Caller, error::ApiError};

/// `POST /items/{id}/achieve`
pub async fn claim<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(user): Caller,
  Path(id): Path<ItemId>,
) -> Result<Json<Vec<AchievementEntry>>, ApiError> {
  let entries = store
    .claim_achievement(user, id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}

/// `POST /items/{id}/bookmark`
pub async fn toggle_bookmark<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(user): Caller,
  Path(id): Path<ItemId>,
) -> Result<Json<BookmarkToggle>, ApiError> {
  let toggle = store
    .toggle_bookmark(user, id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(toggle))
}

/// `GET /me/achievements`
pub async fn mine<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(user): Caller,
) -> Result<Json<Vec<CategoryScore>>, ApiError> {
  Ok(Json(store.achievements(user).await.map_err(ApiError::store)?))
}

/// `GET /me/bookmarks`
pub async fn my_bookmarks<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(user): Caller,
) -> Result<Json<Vec<ItemId>>, ApiError> {
  Ok(Json(store.bookmarks(user).await.map_err(ApiError::store)?))
}

/// `GET /me/achieved`
pub async fn my_achieved_items<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(user): Caller,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
  Ok(Json(store.achieved_items(user).await.map_err(ApiError::store)?))
}

/// `GET /me/pending`
pub async fn my_pending<S: ModerationStore>(
  State(store): State<Arc<S>>,
  Caller(user): Caller,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
  Ok(Json(store.pending_for_expert(user).await.map_err(ApiError::store)?))
}
