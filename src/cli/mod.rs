mod commands;
mod handlers;

pub use commands::{
    CharacterAction, CharacterCommand, Cli, Commands, IdeaAction, IdeaCommand, PlotAction,
    PlotCommand, ProjectAction, ProjectCommand, RelationshipAction, RelationshipCommand,
    ResearchAction, ResearchCommand,
};
pub use handlers::{
    handle_character_add, handle_character_delete, handle_character_list, handle_character_update,
    handle_idea_add, handle_idea_delete, handle_idea_list, handle_idea_update, handle_login,
    handle_logout, handle_plot_add, handle_plot_delete, handle_plot_list, handle_plot_update,
    handle_project_add, handle_project_delete, handle_project_list, handle_project_show,
    handle_project_update, handle_project_use, handle_relationship_add, handle_relationship_delete,
    handle_relationship_list, handle_relationship_update, handle_research_add,
    handle_research_delete, handle_research_list, handle_research_update, handle_signup,
    handle_whoami,
};
