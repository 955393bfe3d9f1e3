//! Opaque identifiers.
//!
//! All three are positive integers assigned by the store. The boundary layer
//! resolves them from request paths; the core never invents them.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
    }

    impl From<i64> for $name {
      fn from(v: i64) -> Self { Self(v) }
    }
  };
}

id_type!(
  /// Identity of a registered user.
  UserId
);
id_type!(
  /// Identity of a category.
  CategoryId
);
id_type!(
  /// Identity of a content item (post or request).
  ItemId
);
