use clap::Parser;
use plotline::cli::{
    handle_character_add, handle_character_delete, handle_character_list, handle_character_update,
    handle_idea_add, handle_idea_delete, handle_idea_list, handle_idea_update, handle_login,
    handle_logout, handle_plot_add, handle_plot_delete, handle_plot_list, handle_plot_update,
    handle_project_add, handle_project_delete, handle_project_list, handle_project_show,
    handle_project_update, handle_project_use, handle_relationship_add, handle_relationship_delete,
    handle_relationship_list, handle_relationship_update, handle_research_add,
    handle_research_delete, handle_research_list, handle_research_update, handle_signup,
    handle_whoami, CharacterAction, Cli, Commands, IdeaAction, PlotAction, ProjectAction,
    RelationshipAction, ResearchAction,
};
use plotline::Config;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let result = match cli.command {
        Commands::Login {
            email,
            password,
            json,
        } => handle_login(&config, email, password, json).await,
        Commands::Signup {
            name,
            email,
            password,
            json,
        } => handle_signup(&config, name, email, password, json).await,
        Commands::Logout => handle_logout(&config),
        Commands::Whoami { json } => handle_whoami(&config, json),
        Commands::Project(cmd) => match cmd.action {
            ProjectAction::Add {
                title,
                summary,
                cover,
                json,
            } => handle_project_add(&config, title, summary, cover, json),
            ProjectAction::List { json } => handle_project_list(&config, json),
            ProjectAction::Show { id, json } => handle_project_show(&config, id, json),
            ProjectAction::Update {
                id,
                title,
                summary,
                cover,
                chapters,
                json,
            } => handle_project_update(&config, id, title, summary, cover, chapters, json),
            ProjectAction::Delete { id, force } => handle_project_delete(&config, id, force),
            ProjectAction::Use { id, clear } => handle_project_use(&config, id, clear),
        },
        Commands::Character(cmd) => match cmd.action {
            CharacterAction::Add {
                name,
                project,
                description,
                traits,
                image,
                json,
            } => handle_character_add(&config, name, project, description, traits, image, json),
            CharacterAction::List { project, json } => {
                handle_character_list(&config, project, json)
            }
            CharacterAction::Update {
                id,
                name,
                description,
                traits,
                image,
                json,
            } => handle_character_update(&config, id, name, description, traits, image, json),
            CharacterAction::Delete { id } => handle_character_delete(&config, id),
        },
        Commands::Relationship(cmd) => match cmd.action {
            RelationshipAction::Add {
                character1,
                character2,
                relationship_type,
                description,
                json,
            } => handle_relationship_add(
                &config,
                character1,
                character2,
                relationship_type,
                description,
                json,
            ),
            RelationshipAction::List { project, json } => {
                handle_relationship_list(&config, project, json)
            }
            RelationshipAction::Update {
                id,
                relationship_type,
                description,
                json,
            } => handle_relationship_update(&config, id, relationship_type, description, json),
            RelationshipAction::Delete { id } => handle_relationship_delete(&config, id),
        },
        Commands::Plot(cmd) => match cmd.action {
            PlotAction::Add {
                title,
                project,
                chapter,
                order,
                description,
                json,
            } => handle_plot_add(&config, title, project, chapter, order, description, json),
            PlotAction::List { project, json } => handle_plot_list(&config, project, json),
            PlotAction::Update {
                id,
                title,
                description,
                chapter,
                order,
                json,
            } => handle_plot_update(&config, id, title, description, chapter, order, json),
            PlotAction::Delete { id } => handle_plot_delete(&config, id),
        },
        Commands::Research(cmd) => match cmd.action {
            ResearchAction::Add {
                title,
                project,
                content,
                tags,
                json,
            } => handle_research_add(&config, title, project, content, tags, json),
            ResearchAction::List { project, json } => handle_research_list(&config, project, json),
            ResearchAction::Update {
                id,
                title,
                content,
                tags,
                json,
            } => handle_research_update(&config, id, title, content, tags, json),
            ResearchAction::Delete { id } => handle_research_delete(&config, id),
        },
        Commands::Idea(cmd) => match cmd.action {
            IdeaAction::Add {
                title,
                description,
                json,
            } => handle_idea_add(&config, title, description, json),
            IdeaAction::List { json } => handle_idea_list(&config, json),
            IdeaAction::Update {
                id,
                title,
                description,
                json,
            } => handle_idea_update(&config, id, title, description, json),
            IdeaAction::Delete { id } => handle_idea_delete(&config, id),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
