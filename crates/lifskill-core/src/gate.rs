//! The expertise gate: who may approve which item.
//!
//! [`CategoryDirectory`] is the read side of the expert roster.
//! [`ExpertiseGate`] is the approval policy evaluated against it. Store
//! backends hand the gate a directory bound to the same transaction that
//! records the vote, so the decision always reflects the current roster.

use std::collections::BTreeSet;

use crate::{CategoryId, UserId};

/// Lookup against the expert roster. Unknown users or categories are simply
/// not experts; only the backing store itself may fail.
pub trait CategoryDirectory {
  type Error;

  fn is_expert(
    &self,
    user: UserId,
    category: CategoryId,
  ) -> Result<bool, Self::Error>;
}

/// A policy deciding whether `user` may cast an approval vote on an item
/// filed under `categories`.
pub trait ExpertiseGate: Send + Sync {
  fn can_approve<D: CategoryDirectory>(
    &self,
    directory: &D,
    user: UserId,
    categories: &BTreeSet<CategoryId>,
  ) -> Result<bool, D::Error>;
}

/// The default policy: the user must be an expert in at least one of the
/// item's categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpertRoster;

impl ExpertiseGate for ExpertRoster {
  fn can_approve<D: CategoryDirectory>(
    &self,
    directory: &D,
    user: UserId,
    categories: &BTreeSet<CategoryId>,
  ) -> Result<bool, D::Error> {
    for &category in categories {
      if directory.is_expert(user, category)? {
        return Ok(true);
      }
    }
    Ok(false)
  }
}

/// Lets a fixed set of administrators approve anything; everyone else is
/// judged by the wrapped policy.
#[derive(Debug, Clone, Default)]
pub struct AdminOverride<G> {
  admins: BTreeSet<UserId>,
  inner:  G,
}

impl<G> AdminOverride<G> {
  pub fn new(admins: impl IntoIterator<Item = UserId>, inner: G) -> Self {
    Self { admins: admins.into_iter().collect(), inner }
  }

  pub fn is_admin(&self, user: UserId) -> bool { self.admins.contains(&user) }
}

impl<G: ExpertiseGate> ExpertiseGate for AdminOverride<G> {
  fn can_approve<D: CategoryDirectory>(
    &self,
    directory: &D,
    user: UserId,
    categories: &BTreeSet<CategoryId>,
  ) -> Result<bool, D::Error> {
    if self.is_admin(user) {
      return Ok(true);
    }
    self.inner.can_approve(directory, user, categories)
  }
}
