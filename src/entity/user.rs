use serde::{Deserialize, Serialize};

use super::{generate_id, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: generate_id(EntityKind::User),
            name,
            email,
        }
    }

    /// Build a user from a login email; the display name is the part before `@`.
    pub fn from_email(email: String) -> Self {
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self::new(name, email)
    }
}
