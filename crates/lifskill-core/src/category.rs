//! Categories and their expert rosters.
//!
//! Expertise is a many-to-many relation between users and categories. A
//! category may have no experts at all, in which case no item filed only
//! under it can ever reach quorum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CategoryId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub category_id: CategoryId,
  pub name:        String,
  pub created_at:  DateTime<Utc>,
}
