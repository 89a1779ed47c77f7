use serde::{Deserialize, Serialize};

use crate::domain::ids::UserId;

/// A user as reported by the identity service. Only the id is used, as an
/// ownership filter on every read and write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: UserId, email: Option<String>) -> Self {
        Self { id, email }
    }
}
