use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "plotline")]
#[command(version, about = "Organize novels: projects, characters, plot points, research and ideas")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in (any non-empty email and password is accepted)
    Login {
        email: String,

        password: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account and sign in
    Signup {
        name: String,

        email: String,

        password: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage projects
    Project(ProjectCommand),

    /// Manage a project's characters
    Character(CharacterCommand),

    /// Manage relationships between characters
    Relationship(RelationshipCommand),

    /// Manage a project's plot points
    Plot(PlotCommand),

    /// Manage a project's research notes
    Research(ResearchCommand),

    /// Manage free-floating ideas
    Idea(IdeaCommand),
}

#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand, Debug)]
pub enum ProjectAction {
    /// Create a project and make it the current one
    Add {
        title: String,

        #[arg(long, short = 's', default_value = "")]
        summary: String,

        /// Cover image URL
        #[arg(long)]
        cover: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List projects
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a project (defaults to the current one)
    Show {
        id: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a project
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short = 's')]
        summary: Option<String>,

        #[arg(long)]
        cover: Option<String>,

        #[arg(long)]
        chapters: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a project and everything in it (ideas are kept)
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Select the current project
    Use {
        #[arg(required_unless_present = "clear")]
        id: Option<String>,

        /// Clear the selection instead
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },
}

#[derive(Args, Debug)]
pub struct CharacterCommand {
    #[command(subcommand)]
    pub action: CharacterAction,
}

#[derive(Subcommand, Debug)]
pub enum CharacterAction {
    /// Add a character
    Add {
        name: String,

        /// Project ID (defaults to the current project)
        #[arg(long, short = 'p')]
        project: Option<String>,

        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Comma separated traits, e.g. "brave, stubborn"
        #[arg(long, short = 't')]
        traits: Option<String>,

        /// Portrait URL
        #[arg(long)]
        image: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List characters of a project
    List {
        /// Project ID (defaults to the current project)
        #[arg(long, short = 'p')]
        project: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a character
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Comma separated traits; replaces the existing list
        #[arg(long, short = 't')]
        traits: Option<String>,

        #[arg(long)]
        image: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a character and its relationships
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct RelationshipCommand {
    #[command(subcommand)]
    pub action: RelationshipAction,
}

#[derive(Subcommand, Debug)]
pub enum RelationshipAction {
    /// Relate two characters of the same project
    Add {
        character1: String,

        character2: String,

        /// Kind of relationship (rival, mentor, sibling, ...)
        #[arg(long = "type", short = 'k')]
        relationship_type: String,

        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List relationships of a project
    List {
        /// Project ID (defaults to the current project)
        #[arg(long, short = 'p')]
        project: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a relationship
    Update {
        id: String,

        #[arg(long = "type", short = 'k')]
        relationship_type: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a relationship
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct PlotCommand {
    #[command(subcommand)]
    pub action: PlotAction,
}

#[derive(Subcommand, Debug)]
pub enum PlotAction {
    /// Add a plot point
    Add {
        title: String,

        /// Project ID (defaults to the current project)
        #[arg(long, short = 'p')]
        project: Option<String>,

        #[arg(long, short = 'c', default_value_t = 1)]
        chapter: u32,

        /// Position within the chapter (defaults to after the last one)
        #[arg(long, short = 'o')]
        order: Option<u32>,

        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List plot points in story order
    List {
        /// Project ID (defaults to the current project)
        #[arg(long, short = 'p')]
        project: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a plot point
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        #[arg(long, short = 'c')]
        chapter: Option<u32>,

        #[arg(long, short = 'o')]
        order: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a plot point
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct ResearchCommand {
    #[command(subcommand)]
    pub action: ResearchAction,
}

#[derive(Subcommand, Debug)]
pub enum ResearchAction {
    /// Add a research note
    Add {
        title: String,

        /// Project ID (defaults to the current project)
        #[arg(long, short = 'p')]
        project: Option<String>,

        #[arg(long, default_value = "")]
        content: String,

        /// Comma separated tags
        #[arg(long, short = 't')]
        tags: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List research notes of a project
    List {
        /// Project ID (defaults to the current project)
        #[arg(long, short = 'p')]
        project: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a research note
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        /// Comma separated tags; replaces the existing list
        #[arg(long, short = 't')]
        tags: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a research note
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct IdeaCommand {
    #[command(subcommand)]
    pub action: IdeaAction,
}

#[derive(Subcommand, Debug)]
pub enum IdeaAction {
    /// Capture an idea
    Add {
        title: String,

        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List ideas
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update an idea
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an idea
    Delete { id: String },
}
