//! [`Caller`]: the already-authenticated user making the request.
//!
//! Token validation happens upstream; the gateway forwards the resolved user
//! id in the `x-user-id` header and this extractor trusts it. Roster changes
//! made on behalf of someone else are further limited to [`Admins`].

use std::{collections::BTreeSet, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};
use lifskill_core::UserId;

use crate::error::ApiError;

pub const CALLER_HEADER: &str = "x-user-id";

pub struct Caller(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let id = parts
      .headers
      .get(CALLER_HEADER)
      .and_then(|v| v.to_str().ok())
      .and_then(|s| s.trim().parse::<i64>().ok())
      .filter(|&id| id > 0)
      .ok_or(ApiError::Unauthenticated)?;
    Ok(Caller(UserId(id)))
  }
}

/// User ids allowed to manage other users' expertise.
#[derive(Debug, Clone, Default)]
pub struct Admins(Arc<BTreeSet<UserId>>);

impl Admins {
  pub fn new(ids: impl IntoIterator<Item = UserId>) -> Self {
    Self(Arc::new(ids.into_iter().collect()))
  }

  pub fn contains(&self, user: UserId) -> bool { self.0.contains(&user) }

  pub fn require(&self, Caller(user): &Caller) -> Result<(), ApiError> {
    if self.contains(*user) {
      Ok(())
    } else {
      Err(ApiError::Forbidden(format!("user {user} is not an administrator")))
    }
  }
}
