// src/entity/research.rs
use serde::{Deserialize, Serialize};

use super::{generate_id, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchItem {
    pub id: String,
    pub project_id: String,
    pub title: String,
    /// Notes, quotes, links; free text
    pub content: String,
    pub tags: Vec<String>,
}

impl ResearchItem {
    pub fn new(fields: NewResearchItem) -> Self {
        Self {
            id: generate_id(EntityKind::ResearchItem),
            project_id: fields.project_id,
            title: fields.title,
            content: fields.content,
            tags: fields.tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResearchItem {
    pub project_id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResearchItemUpdate {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl ResearchItemUpdate {
    pub fn apply(self, item: &mut ResearchItem) {
        if let Some(project_id) = self.project_id {
            item.project_id = project_id;
        }
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(content) = self.content {
            item.content = content;
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
    }
}
