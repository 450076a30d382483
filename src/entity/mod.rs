mod character;
mod idea;
mod plot_point;
mod project;
mod relationship;
mod research;
mod user;

pub use character::{Character, CharacterUpdate, NewCharacter, DEFAULT_CHARACTER_IMAGE};
pub use idea::{Idea, IdeaUpdate};
pub use plot_point::{NewPlotPoint, PlotPoint, PlotPointUpdate};
pub use project::{Project, ProjectSummary, ProjectUpdate, DEFAULT_COVER_IMAGE};
pub use relationship::{NewRelationship, Relationship, RelationshipUpdate};
pub use research::{NewResearchItem, ResearchItem, ResearchItemUpdate};
pub use user::User;

use uuid::Uuid;

/// Length of the random part of a generated id.
pub const ID_SUFFIX_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Kinds of records the stores hand out ids for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Project,
    Character,
    Relationship,
    PlotPoint,
    ResearchItem,
    Idea,
}

impl EntityKind {
    /// Id prefix, e.g. `char_` for characters.
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::User => "user_",
            EntityKind::Project => "project_",
            EntityKind::Character => "char_",
            EntityKind::Relationship => "rel_",
            EntityKind::PlotPoint => "plot_",
            EntityKind::ResearchItem => "research_",
            EntityKind::Idea => "idea_",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::User => write!(f, "user"),
            EntityKind::Project => write!(f, "project"),
            EntityKind::Character => write!(f, "character"),
            EntityKind::Relationship => write!(f, "relationship"),
            EntityKind::PlotPoint => write!(f, "plot point"),
            EntityKind::ResearchItem => write!(f, "research item"),
            EntityKind::Idea => write!(f, "idea"),
        }
    }
}

/// A record the domain store keeps in an id-addressed collection.
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

impl_entity!(User, EntityKind::User);
impl_entity!(Project, EntityKind::Project);
impl_entity!(Character, EntityKind::Character);
impl_entity!(Relationship, EntityKind::Relationship);
impl_entity!(PlotPoint, EntityKind::PlotPoint);
impl_entity!(ResearchItem, EntityKind::ResearchItem);
impl_entity!(Idea, EntityKind::Idea);

/// Generate an id of the form `<prefix><9 base-36 chars>`.
///
/// Uniqueness is best effort: the suffix comes from a v4 UUID and nothing
/// checks the result against existing ids.
pub fn generate_id(kind: EntityKind) -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(kind.prefix().len() + ID_SUFFIX_LEN);
    id.push_str(kind.prefix());
    for _ in 0..ID_SUFFIX_LEN {
        id.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    id
}

/// Parse a comma separated list ("brave, stubborn,") into trimmed,
/// non-empty entries, preserving order.
pub fn parse_traits(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
