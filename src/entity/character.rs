use serde::{Deserialize, Serialize};

use super::{generate_id, EntityKind};

/// Portrait used when a character is created without one.
pub const DEFAULT_CHARACTER_IMAGE: &str = "/placeholder.svg?height=200&width=200";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: String,
    /// Ordered as entered.
    pub traits: Vec<String>,
    pub image_url: String,
}

/// Fields for a new character; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCharacter {
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub image_url: String,
}

impl NewCharacter {
    pub fn new(project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            name: name.into(),
            description: String::new(),
            traits: Vec::new(),
            image_url: DEFAULT_CHARACTER_IMAGE.to_string(),
        }
    }
}

impl Character {
    pub fn new(fields: NewCharacter) -> Self {
        Self {
            id: generate_id(EntityKind::Character),
            project_id: fields.project_id,
            name: fields.name,
            description: fields.description,
            traits: fields.traits,
            image_url: fields.image_url,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CharacterUpdate {
    pub project_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub traits: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl CharacterUpdate {
    pub fn apply(self, character: &mut Character) {
        if let Some(project_id) = self.project_id {
            character.project_id = project_id;
        }
        if let Some(name) = self.name {
            character.name = name;
        }
        if let Some(description) = self.description {
            character.description = description;
        }
        if let Some(traits) = self.traits {
            character.traits = traits;
        }
        if let Some(image_url) = self.image_url {
            character.image_url = image_url;
        }
    }
}
