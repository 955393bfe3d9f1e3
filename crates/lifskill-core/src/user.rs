//! User identity only. Credentials and sessions live outside the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    UserId,
  pub username:   String,
  pub created_at: DateTime<Utc>,
}
