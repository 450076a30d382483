// src/entity/idea.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, EntityKind};

/// A free-floating note that belongs to no project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Idea {
    pub fn new(title: String, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(EntityKind::Idea),
            title,
            description,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdeaUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl IdeaUpdate {
    pub fn apply(self, idea: &mut Idea) {
        if let Some(title) = self.title {
            idea.title = title;
        }
        if let Some(description) = self.description {
            idea.description = description;
        }
    }
}
