use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, EntityKind};

/// Cover used when a project is created without one.
pub const DEFAULT_COVER_IMAGE: &str = "/placeholder.svg?height=300&width=200";

/// A writing work: the owner of characters, relationships, plot points and
/// research items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub cover_image: String,
    pub chapters: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        title: String,
        summary: String,
        cover_image: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id(EntityKind::Project),
            title,
            summary,
            cover_image: cover_image.unwrap_or_else(|| DEFAULT_COVER_IMAGE.to_string()),
            chapters: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a project. `updated_at` is stamped by the store.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub chapters: Option<u32>,
}

impl ProjectUpdate {
    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(summary) = self.summary {
            project.summary = summary;
        }
        if let Some(cover_image) = self.cover_image {
            project.cover_image = cover_image;
        }
        if let Some(chapters) = self.chapters {
            project.chapters = chapters;
        }
    }
}

/// Per-project counts shown on a project dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub characters: usize,
    pub relationships: usize,
    pub plot_points: usize,
    pub research_items: usize,
}
