//! JSON REST API for the lifskill moderation service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`lifskill_core::store::ModerationStore`]. Authentication happens upstream;
//! handlers that act on behalf of a user read the resolved id from the
//! [`caller::CALLER_HEADER`] header.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lifskill_api::api_router(store.clone(), admin_ids))
//! ```

pub mod achievements;
pub mod caller;
pub mod categories;
pub mod error;
pub mod items;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  extract::FromRef,
  routing::{get, post, put},
};
use lifskill_core::{UserId, store::ModerationStore};

pub use caller::{Admins, Caller};
pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Router state; handlers extract the part they need via [`FromRef`].
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub admins: Admins,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), admins: self.admins.clone() }
  }
}

impl<S> FromRef<ApiState<S>> for Arc<S> {
  fn from_ref(state: &ApiState<S>) -> Self { Arc::clone(&state.store) }
}

impl<S> FromRef<ApiState<S>> for Admins {
  fn from_ref(state: &ApiState<S>) -> Self { state.admins.clone() }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// `admins` may assign and revoke other users' expertise. The returned
/// `Router<()>` can be nested into any parent router regardless of its own
/// state type.
pub fn api_router<S>(
  store: Arc<S>,
  admins: impl IntoIterator<Item = UserId>,
) -> Router<()>
where
  S: ModerationStore + 'static,
{
  let state = ApiState { store, admins: Admins::new(admins) };

  Router::new()
    // Users
    .route("/users", post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    // Categories and the expert roster
    .route(
      "/categories",
      get(categories::list::<S>).post(categories::create::<S>),
    )
    .route("/categories/{id}", get(categories::get_one::<S>))
    .route("/categories/{id}/experts", get(categories::experts::<S>))
    .route(
      "/categories/{id}/experts/{user_id}",
      put(categories::assign::<S>).delete(categories::revoke::<S>),
    )
    // Items and approvals
    .route("/items", get(items::list::<S>).post(items::create::<S>))
    .route("/items/{id}", get(items::get_one::<S>))
    .route("/items/{id}/approvals", get(items::approvals::<S>))
    .route("/items/{id}/approve", post(items::approve::<S>))
    // Achievements
    .route("/items/{id}/achieve", post(achievements::claim::<S>))
    .route("/items/{id}/bookmark", post(achievements::toggle_bookmark::<S>))
    // The caller's own views
    .route(
      "/me/expertise",
      get(users::my_expertise::<S>).put(users::replace_my_expertise::<S>),
    )
    .route("/me/items", get(items::mine::<S>))
    .route("/me/achievements", get(achievements::mine::<S>))
    .route("/me/bookmarks", get(achievements::my_bookmarks::<S>))
    .route("/me/achieved", get(achievements::my_achieved_items::<S>))
    .route("/me/pending", get(achievements::my_pending::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
