use std::sync::Arc;

use serde::Deserialize;

use super::{Clock, SubscriptionId, Subscribers, SystemClock};
use crate::entity::{
    Character, CharacterUpdate, Entity, Idea, IdeaUpdate, NewCharacter, NewPlotPoint,
    NewRelationship, NewResearchItem, PlotPoint, PlotPointUpdate, Project, ProjectSummary,
    ProjectUpdate, Relationship, RelationshipUpdate, ResearchItem, ResearchItemUpdate,
};
use crate::storage::{keys, Persistence};

/// Which piece of domain state a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainChange {
    Projects,
    Characters,
    Relationships,
    PlotPoints,
    ResearchItems,
    Ideas,
    CurrentProject,
}

impl DomainChange {
    fn key(&self) -> &'static str {
        match self {
            DomainChange::Projects => keys::PROJECTS,
            DomainChange::Characters => keys::CHARACTERS,
            DomainChange::Relationships => keys::RELATIONSHIPS,
            DomainChange::PlotPoints => keys::PLOT_POINTS,
            DomainChange::ResearchItems => keys::RESEARCH_ITEMS,
            DomainChange::Ideas => keys::IDEAS,
            DomainChange::CurrentProject => keys::CURRENT_PROJECT,
        }
    }
}

/// The persisted current-project selection. Older data stored the whole
/// project; only its id is used either way.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSelection {
    Id(String),
    Snapshot { id: String },
}

impl StoredSelection {
    fn into_id(self) -> String {
        match self {
            StoredSelection::Id(id) => id,
            StoredSelection::Snapshot { id } => id,
        }
    }
}

fn find_mut<'a, T: Entity>(items: &'a mut [T], id: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Owner of every writing entity and of the current-project selection.
///
/// Collections keep insertion order. Every mutation writes the whole
/// affected collection back through [`Persistence`] and then notifies
/// subscribers. Updates and deletes on unknown ids do nothing.
pub struct DomainStore {
    projects: Vec<Project>,
    characters: Vec<Character>,
    relationships: Vec<Relationship>,
    plot_points: Vec<PlotPoint>,
    research_items: Vec<ResearchItem>,
    ideas: Vec<Idea>,
    current_project_id: Option<String>,
    persistence: Persistence,
    clock: Arc<dyn Clock>,
    subscribers: Subscribers<DomainChange>,
}

impl DomainStore {
    pub fn new(persistence: Persistence) -> Self {
        Self::with_clock(persistence, Arc::new(SystemClock))
    }

    /// Load all collections from `persistence`; missing or corrupt entries
    /// start empty.
    pub fn with_clock(persistence: Persistence, clock: Arc<dyn Clock>) -> Self {
        let projects: Vec<Project> = persistence.load(keys::PROJECTS).unwrap_or_default();
        let current_project_id = persistence
            .load::<StoredSelection>(keys::CURRENT_PROJECT)
            .map(StoredSelection::into_id)
            .filter(|id| projects.iter().any(|p| &p.id == id));

        let store = Self {
            characters: persistence.load(keys::CHARACTERS).unwrap_or_default(),
            relationships: persistence.load(keys::RELATIONSHIPS).unwrap_or_default(),
            plot_points: persistence.load(keys::PLOT_POINTS).unwrap_or_default(),
            research_items: persistence.load(keys::RESEARCH_ITEMS).unwrap_or_default(),
            ideas: persistence.load(keys::IDEAS).unwrap_or_default(),
            projects,
            current_project_id,
            persistence,
            clock,
            subscribers: Subscribers::new(),
        };

        tracing::debug!(
            projects = store.projects.len(),
            characters = store.characters.len(),
            relationships = store.relationships.len(),
            plot_points = store.plot_points.len(),
            research_items = store.research_items.len(),
            ideas = store.ideas.len(),
            "loaded domain store"
        );
        store
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&DomainChange) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Persist the touched collection and tell subscribers about it.
    fn commit(&mut self, change: DomainChange) {
        let key = change.key();
        match change {
            DomainChange::Projects => self.persistence.save(key, &self.projects),
            DomainChange::Characters => self.persistence.save(key, &self.characters),
            DomainChange::Relationships => self.persistence.save(key, &self.relationships),
            DomainChange::PlotPoints => self.persistence.save(key, &self.plot_points),
            DomainChange::ResearchItems => self.persistence.save(key, &self.research_items),
            DomainChange::Ideas => self.persistence.save(key, &self.ideas),
            DomainChange::CurrentProject => match &self.current_project_id {
                Some(id) => self.persistence.save(key, id),
                None => self.persistence.clear(key),
            },
        }
        self.subscribers.notify(&change);
    }

    fn missing<T: Entity>(id: &str) {
        let kind = T::KIND;
        tracing::debug!(%kind, id, "no such entity, ignoring");
    }

    // ---- collections ----

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn plot_points(&self) -> &[PlotPoint] {
        &self.plot_points
    }

    pub fn research_items(&self) -> &[ResearchItem] {
        &self.research_items
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    // ---- lookups ----

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    pub fn plot_point(&self, id: &str) -> Option<&PlotPoint> {
        self.plot_points.iter().find(|p| p.id == id)
    }

    pub fn research_item(&self, id: &str) -> Option<&ResearchItem> {
        self.research_items.iter().find(|r| r.id == id)
    }

    pub fn idea(&self, id: &str) -> Option<&Idea> {
        self.ideas.iter().find(|i| i.id == id)
    }

    pub fn characters_for(&self, project_id: &str) -> Vec<&Character> {
        self.characters
            .iter()
            .filter(|c| c.project_id == project_id)
            .collect()
    }

    pub fn relationships_for(&self, project_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.project_id == project_id)
            .collect()
    }

    /// Plot points of a project in story order: by chapter, then order.
    pub fn plot_points_for(&self, project_id: &str) -> Vec<&PlotPoint> {
        let mut points: Vec<&PlotPoint> = self
            .plot_points
            .iter()
            .filter(|p| p.project_id == project_id)
            .collect();
        points.sort_by_key(|p| (p.chapter, p.order));
        points
    }

    pub fn research_items_for(&self, project_id: &str) -> Vec<&ResearchItem> {
        self.research_items
            .iter()
            .filter(|r| r.project_id == project_id)
            .collect()
    }

    pub fn project_summary(&self, project_id: &str) -> ProjectSummary {
        ProjectSummary {
            characters: self.characters_for(project_id).len(),
            relationships: self.relationships_for(project_id).len(),
            plot_points: self.plot_points_for(project_id).len(),
            research_items: self.research_items_for(project_id).len(),
        }
    }

    // ---- current project ----

    /// The selected project, resolved against the live collection.
    pub fn current_project(&self) -> Option<&Project> {
        self.current_project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }

    pub fn current_project_id(&self) -> Option<&str> {
        self.current_project().map(|p| p.id.as_str())
    }

    /// Select a project. `None` or an unknown id clears the selection.
    pub fn set_current_project(&mut self, id: Option<&str>) {
        let resolved = id.and_then(|id| self.project(id)).map(|p| p.id.clone());
        if resolved.is_none() {
            if let Some(id) = id {
                Self::missing::<Project>(id);
            }
        }
        self.current_project_id = resolved;
        self.commit(DomainChange::CurrentProject);
    }

    // ---- projects ----

    pub fn create_project(
        &mut self,
        title: impl Into<String>,
        summary: impl Into<String>,
        cover_image: Option<String>,
    ) -> Project {
        let project = Project::new(title.into(), summary.into(), cover_image, self.clock.now());
        self.projects.push(project.clone());
        self.commit(DomainChange::Projects);
        tracing::debug!(id = %project.id, "created project");
        project
    }

    /// Merge `update` into the project and refresh `updated_at`.
    pub fn update_project(&mut self, id: &str, update: ProjectUpdate) {
        let now = self.clock.now();
        let Some(project) = find_mut(&mut self.projects, id) else {
            return Self::missing::<Project>(id);
        };
        update.apply(project);
        project.updated_at = now;
        self.commit(DomainChange::Projects);
    }

    /// Delete a project with its characters, relationships, plot points and
    /// research items. Ideas are not project-scoped and stay.
    pub fn delete_project(&mut self, id: &str) {
        if !remove_by_id(&mut self.projects, id) {
            return Self::missing::<Project>(id);
        }
        self.commit(DomainChange::Projects);

        if self.current_project_id.as_deref() == Some(id) {
            self.current_project_id = None;
            self.commit(DomainChange::CurrentProject);
        }

        self.characters.retain(|c| c.project_id != id);
        self.commit(DomainChange::Characters);
        self.relationships.retain(|r| r.project_id != id);
        self.commit(DomainChange::Relationships);
        self.plot_points.retain(|p| p.project_id != id);
        self.commit(DomainChange::PlotPoints);
        self.research_items.retain(|r| r.project_id != id);
        self.commit(DomainChange::ResearchItems);

        tracing::debug!(id, "deleted project");
    }

    // ---- characters ----

    pub fn add_character(&mut self, fields: NewCharacter) -> Character {
        let character = Character::new(fields);
        self.characters.push(character.clone());
        self.commit(DomainChange::Characters);
        character
    }

    pub fn update_character(&mut self, id: &str, update: CharacterUpdate) {
        let Some(character) = find_mut(&mut self.characters, id) else {
            return Self::missing::<Character>(id);
        };
        update.apply(character);
        self.commit(DomainChange::Characters);
    }

    /// Delete a character and every relationship it takes part in.
    pub fn delete_character(&mut self, id: &str) {
        if !remove_by_id(&mut self.characters, id) {
            return Self::missing::<Character>(id);
        }
        self.commit(DomainChange::Characters);

        self.relationships.retain(|r| !r.involves(id));
        self.commit(DomainChange::Relationships);
    }

    // ---- relationships ----

    pub fn add_relationship(&mut self, fields: NewRelationship) -> Relationship {
        let relationship = Relationship::new(fields);
        self.relationships.push(relationship.clone());
        self.commit(DomainChange::Relationships);
        relationship
    }

    pub fn update_relationship(&mut self, id: &str, update: RelationshipUpdate) {
        let Some(relationship) = find_mut(&mut self.relationships, id) else {
            return Self::missing::<Relationship>(id);
        };
        update.apply(relationship);
        self.commit(DomainChange::Relationships);
    }

    pub fn delete_relationship(&mut self, id: &str) {
        if !remove_by_id(&mut self.relationships, id) {
            return Self::missing::<Relationship>(id);
        }
        self.commit(DomainChange::Relationships);
    }

    // ---- plot points ----

    pub fn add_plot_point(&mut self, fields: NewPlotPoint) -> PlotPoint {
        let plot_point = PlotPoint::new(fields);
        self.plot_points.push(plot_point.clone());
        self.commit(DomainChange::PlotPoints);
        plot_point
    }

    pub fn update_plot_point(&mut self, id: &str, update: PlotPointUpdate) {
        let Some(plot_point) = find_mut(&mut self.plot_points, id) else {
            return Self::missing::<PlotPoint>(id);
        };
        update.apply(plot_point);
        self.commit(DomainChange::PlotPoints);
    }

    pub fn delete_plot_point(&mut self, id: &str) {
        if !remove_by_id(&mut self.plot_points, id) {
            return Self::missing::<PlotPoint>(id);
        }
        self.commit(DomainChange::PlotPoints);
    }

    // ---- research ----

    pub fn add_research_item(&mut self, fields: NewResearchItem) -> ResearchItem {
        let item = ResearchItem::new(fields);
        self.research_items.push(item.clone());
        self.commit(DomainChange::ResearchItems);
        item
    }

    pub fn update_research_item(&mut self, id: &str, update: ResearchItemUpdate) {
        let Some(item) = find_mut(&mut self.research_items, id) else {
            return Self::missing::<ResearchItem>(id);
        };
        update.apply(item);
        self.commit(DomainChange::ResearchItems);
    }

    pub fn delete_research_item(&mut self, id: &str) {
        if !remove_by_id(&mut self.research_items, id) {
            return Self::missing::<ResearchItem>(id);
        }
        self.commit(DomainChange::ResearchItems);
    }

    // ---- ideas ----

    pub fn add_idea(&mut self, title: impl Into<String>, description: impl Into<String>) -> Idea {
        let idea = Idea::new(title.into(), description.into(), self.clock.now());
        self.ideas.push(idea.clone());
        self.commit(DomainChange::Ideas);
        idea
    }

    pub fn update_idea(&mut self, id: &str, update: IdeaUpdate) {
        let Some(idea) = find_mut(&mut self.ideas, id) else {
            return Self::missing::<Idea>(id);
        };
        update.apply(idea);
        self.commit(DomainChange::Ideas);
    }

    pub fn delete_idea(&mut self, id: &str) {
        if !remove_by_id(&mut self.ideas, id) {
            return Self::missing::<Idea>(id);
        }
        self.commit(DomainChange::Ideas);
    }
}
