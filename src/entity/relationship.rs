use serde::{Deserialize, Serialize};

use super::{generate_id, EntityKind};

/// A typed link between two characters of the same project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub project_id: String,
    #[serde(rename = "character1Id")]
    pub character1_id: String,
    #[serde(rename = "character2Id")]
    pub character2_id: String,
    /// Free text ("rival", "mentor", "sibling", ...)
    pub relationship_type: String,
    pub description: String,
}

impl Relationship {
    pub fn new(fields: NewRelationship) -> Self {
        Self {
            id: generate_id(EntityKind::Relationship),
            project_id: fields.project_id,
            character1_id: fields.character1_id,
            character2_id: fields.character2_id,
            relationship_type: fields.relationship_type,
            description: fields.description,
        }
    }

    /// Whether the character is either endpoint of this relationship.
    pub fn involves(&self, character_id: &str) -> bool {
        self.character1_id == character_id || self.character2_id == character_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelationship {
    pub project_id: String,
    pub character1_id: String,
    pub character2_id: String,
    pub relationship_type: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipUpdate {
    pub project_id: Option<String>,
    pub character1_id: Option<String>,
    pub character2_id: Option<String>,
    pub relationship_type: Option<String>,
    pub description: Option<String>,
}

impl RelationshipUpdate {
    pub fn apply(self, relationship: &mut Relationship) {
        if let Some(project_id) = self.project_id {
            relationship.project_id = project_id;
        }
        if let Some(character1_id) = self.character1_id {
            relationship.character1_id = character1_id;
        }
        if let Some(character2_id) = self.character2_id {
            relationship.character2_id = character2_id;
        }
        if let Some(relationship_type) = self.relationship_type {
            relationship.relationship_type = relationship_type;
        }
        if let Some(description) = self.description {
            relationship.description = description;
        }
    }
}
