use serde::{Deserialize, Serialize};

use super::{generate_id, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotPoint {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub chapter: u32,
    /// Position within the chapter
    pub order: u32,
}

impl PlotPoint {
    pub fn new(fields: NewPlotPoint) -> Self {
        Self {
            id: generate_id(EntityKind::PlotPoint),
            project_id: fields.project_id,
            title: fields.title,
            description: fields.description,
            chapter: fields.chapter,
            order: fields.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlotPoint {
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub chapter: u32,
    pub order: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PlotPointUpdate {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub chapter: Option<u32>,
    pub order: Option<u32>,
}

impl PlotPointUpdate {
    pub fn apply(self, plot_point: &mut PlotPoint) {
        if let Some(project_id) = self.project_id {
            plot_point.project_id = project_id;
        }
        if let Some(title) = self.title {
            plot_point.title = title;
        }
        if let Some(description) = self.description {
            plot_point.description = description;
        }
        if let Some(chapter) = self.chapter {
            plot_point.chapter = chapter;
        }
        if let Some(order) = self.order {
            plot_point.order = order;
        }
    }
}
