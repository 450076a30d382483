use std::io;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::entity::{
    parse_traits, CharacterUpdate, IdeaUpdate, NewCharacter, NewPlotPoint, NewRelationship,
    NewResearchItem, PlotPointUpdate, ProjectUpdate, RelationshipUpdate, ResearchItemUpdate, User,
};
use crate::error::{PlotlineError, Result};
use crate::storage::Persistence;
use crate::store::{validate_credentials, validate_signup, DomainStore, SessionStore};

fn open_session(config: &Config) -> Result<SessionStore> {
    let persistence = Persistence::new(config.open_backend()?);
    Ok(SessionStore::with_delay(persistence, config.login_delay()))
}

/// Open the domain store for a signed-in user.
fn open_domain(config: &Config) -> Result<DomainStore> {
    let persistence = Persistence::new(config.open_backend()?);
    let session = SessionStore::with_delay(persistence.clone(), config.login_delay());
    if session.current_user().is_none() {
        return Err(PlotlineError::NotLoggedIn);
    }
    Ok(DomainStore::new(persistence))
}

/// Use the given project id, or the current project when none is given.
fn resolve_project(domain: &DomainStore, project: Option<String>) -> Result<String> {
    match project {
        Some(id) => domain
            .project(&id)
            .map(|p| p.id.clone())
            .ok_or(PlotlineError::EntityNotFound(id)),
        None => domain
            .current_project_id()
            .map(String::from)
            .ok_or(PlotlineError::NoProjectSelected),
    }
}

/// A token that fires when the user presses Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_user(verb: &str, user: &User, json: bool) -> Result<()> {
    if json {
        print_json(user)
    } else {
        println!("{} {} <{}>", verb, user.name, user.email);
        Ok(())
    }
}

// ---- session ----

pub async fn handle_login(config: &Config, email: String, password: String, json: bool) -> Result<()> {
    validate_credentials(&email, &password)?;
    let mut session = open_session(config)?;

    eprintln!("Signing in...");
    let user = session
        .login_with_cancel(&email, &password, &cancel_on_ctrl_c())
        .await?;

    print_user("Signed in as", &user, json)
}

pub async fn handle_signup(
    config: &Config,
    name: String,
    email: String,
    password: String,
    json: bool,
) -> Result<()> {
    validate_signup(&name, &email, &password)?;
    let mut session = open_session(config)?;

    eprintln!("Creating account...");
    let user = session
        .signup_with_cancel(&name, &email, &password, &cancel_on_ctrl_c())
        .await?;

    print_user("Signed up as", &user, json)
}

pub fn handle_logout(config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    session.logout();
    println!("Signed out.");
    Ok(())
}

pub fn handle_whoami(config: &Config, json: bool) -> Result<()> {
    let session = open_session(config)?;
    let user = session.current_user().ok_or(PlotlineError::NotLoggedIn)?;
    print_user("Signed in as", user, json)
}

// ---- projects ----

pub fn handle_project_add(
    config: &Config,
    title: String,
    summary: String,
    cover: Option<String>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;

    let project = domain.create_project(title, summary, cover);
    domain.set_current_project(Some(&project.id));

    if json {
        print_json(&project)
    } else {
        println!("Created project {} - {}", project.id, project.title);
        Ok(())
    }
}

pub fn handle_project_list(config: &Config, json: bool) -> Result<()> {
    let domain = open_domain(config)?;

    if json {
        return print_json(domain.projects());
    }

    if domain.projects().is_empty() {
        println!("No projects yet. Create one with 'plotline project add <title>'.");
        return Ok(());
    }

    let current = domain.current_project_id();
    for project in domain.projects() {
        let marker = if Some(project.id.as_str()) == current { "*" } else { " " };
        println!(
            "{} {}  {} ({} chapters)",
            marker, project.id, project.title, project.chapters
        );
    }
    Ok(())
}

pub fn handle_project_show(config: &Config, id: Option<String>, json: bool) -> Result<()> {
    let domain = open_domain(config)?;
    let id = resolve_project(&domain, id)?;
    let project = domain
        .project(&id)
        .ok_or_else(|| PlotlineError::EntityNotFound(id.clone()))?;
    let summary = domain.project_summary(&id);

    if json {
        #[derive(Serialize)]
        struct ProjectJson<'a> {
            #[serde(flatten)]
            project: &'a crate::entity::Project,
            summary: crate::entity::ProjectSummary,
        }
        return print_json(&ProjectJson { project, summary });
    }

    println!("{} ({})", project.title, project.id);
    if !project.summary.is_empty() {
        println!("  {}", project.summary);
    }
    println!("  Chapters:       {}", project.chapters);
    println!("  Characters:     {}", summary.characters);
    println!("  Relationships:  {}", summary.relationships);
    println!("  Plot points:    {}", summary.plot_points);
    println!("  Research items: {}", summary.research_items);
    println!("  Created:        {}", project.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Updated:        {}", project.updated_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}

pub fn handle_project_update(
    config: &Config,
    id: String,
    title: Option<String>,
    summary: Option<String>,
    cover: Option<String>,
    chapters: Option<u32>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.project(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }

    domain.update_project(
        &id,
        ProjectUpdate {
            title,
            summary,
            cover_image: cover,
            chapters,
        },
    );

    let updated = domain
        .project(&id)
        .ok_or_else(|| PlotlineError::EntityNotFound(id.clone()))?;
    if json {
        print_json(updated)
    } else {
        println!("Updated project {} - {}", updated.id, updated.title);
        Ok(())
    }
}

pub fn handle_project_delete(config: &Config, id: String, force: bool) -> Result<()> {
    let mut domain = open_domain(config)?;
    let project = match domain.project(&id) {
        Some(p) => p.clone(),
        None => return Err(PlotlineError::EntityNotFound(id)),
    };

    // Confirm deletion unless --force is used
    if !force {
        let summary = domain.project_summary(&id);
        eprintln!(
            "Delete project {} - {} with {} characters, {} relationships, {} plot points and {} research items? [y/N] ",
            project.id,
            project.title,
            summary.characters,
            summary.relationships,
            summary.plot_points,
            summary.research_items
        );

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(PlotlineError::ForceRequired);
        }
    }

    domain.delete_project(&project.id);
    println!("Deleted project {} - {}", project.id, project.title);
    Ok(())
}

pub fn handle_project_use(config: &Config, id: Option<String>, clear: bool) -> Result<()> {
    let mut domain = open_domain(config)?;

    if clear {
        domain.set_current_project(None);
        println!("Cleared current project.");
        return Ok(());
    }

    let id = id.unwrap_or_default();
    if domain.project(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }
    domain.set_current_project(Some(&id));

    if let Some(project) = domain.current_project() {
        println!("Now working on {} - {}", project.id, project.title);
    }
    Ok(())
}

// ---- characters ----

pub fn handle_character_add(
    config: &Config,
    name: String,
    project: Option<String>,
    description: String,
    traits: Option<String>,
    image: Option<String>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    let project_id = resolve_project(&domain, project)?;

    let mut fields = NewCharacter::new(project_id, name);
    fields.description = description;
    fields.traits = traits.as_deref().map(parse_traits).unwrap_or_default();
    if let Some(image) = image {
        fields.image_url = image;
    }

    let character = domain.add_character(fields);

    if json {
        print_json(&character)
    } else {
        println!("Created character {} - {}", character.id, character.name);
        Ok(())
    }
}

pub fn handle_character_list(config: &Config, project: Option<String>, json: bool) -> Result<()> {
    let domain = open_domain(config)?;
    let project_id = resolve_project(&domain, project)?;
    let characters = domain.characters_for(&project_id);

    if json {
        return print_json(&characters);
    }

    if characters.is_empty() {
        println!("No characters yet.");
        return Ok(());
    }

    for character in characters {
        if character.traits.is_empty() {
            println!("  {}  {}", character.id, character.name);
        } else {
            println!(
                "  {}  {} - {}",
                character.id,
                character.name,
                character.traits.join(", ")
            );
        }
        if !character.description.is_empty() {
            println!("      {}", character.description);
        }
    }
    Ok(())
}

pub fn handle_character_update(
    config: &Config,
    id: String,
    name: Option<String>,
    description: Option<String>,
    traits: Option<String>,
    image: Option<String>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.character(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }

    domain.update_character(
        &id,
        CharacterUpdate {
            name,
            description,
            traits: traits.as_deref().map(parse_traits),
            image_url: image,
            ..Default::default()
        },
    );

    let updated = domain
        .character(&id)
        .ok_or_else(|| PlotlineError::EntityNotFound(id.clone()))?;
    if json {
        print_json(updated)
    } else {
        println!("Updated character {} - {}", updated.id, updated.name);
        Ok(())
    }
}

pub fn handle_character_delete(config: &Config, id: String) -> Result<()> {
    let mut domain = open_domain(config)?;
    let character = match domain.character(&id) {
        Some(c) => c.clone(),
        None => return Err(PlotlineError::EntityNotFound(id)),
    };

    let related = domain
        .relationships()
        .iter()
        .filter(|r| r.involves(&character.id))
        .count();
    domain.delete_character(&character.id);

    println!(
        "Deleted character {} - {} ({} relationships removed)",
        character.id, character.name, related
    );
    Ok(())
}

// ---- relationships ----

pub fn handle_relationship_add(
    config: &Config,
    character1: String,
    character2: String,
    relationship_type: String,
    description: String,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;

    let first = domain
        .character(&character1)
        .ok_or_else(|| PlotlineError::EntityNotFound(character1.clone()))?;
    if domain.character(&character2).is_none() {
        return Err(PlotlineError::EntityNotFound(character2));
    }
    let project_id = first.project_id.clone();

    let relationship = domain.add_relationship(NewRelationship {
        project_id,
        character1_id: character1,
        character2_id: character2,
        relationship_type,
        description,
    });

    if json {
        print_json(&relationship)
    } else {
        println!(
            "Created relationship {} - {}",
            relationship.id,
            describe_relationship(&domain, &relationship)
        );
        Ok(())
    }
}

fn describe_relationship(domain: &DomainStore, relationship: &crate::entity::Relationship) -> String {
    let name = |id: &str| {
        domain
            .character(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    format!(
        "{} --{}--> {}",
        name(&relationship.character1_id),
        relationship.relationship_type,
        name(&relationship.character2_id)
    )
}

pub fn handle_relationship_list(config: &Config, project: Option<String>, json: bool) -> Result<()> {
    let domain = open_domain(config)?;
    let project_id = resolve_project(&domain, project)?;
    let relationships = domain.relationships_for(&project_id);

    if json {
        return print_json(&relationships);
    }

    if relationships.is_empty() {
        println!("No relationships yet.");
        return Ok(());
    }

    for relationship in relationships {
        println!(
            "  {}  {}",
            relationship.id,
            describe_relationship(&domain, relationship)
        );
        if !relationship.description.is_empty() {
            println!("      {}", relationship.description);
        }
    }
    Ok(())
}

pub fn handle_relationship_update(
    config: &Config,
    id: String,
    relationship_type: Option<String>,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.relationship(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }

    domain.update_relationship(
        &id,
        RelationshipUpdate {
            relationship_type,
            description,
            ..Default::default()
        },
    );

    let updated = domain
        .relationship(&id)
        .ok_or_else(|| PlotlineError::EntityNotFound(id.clone()))?;
    if json {
        print_json(updated)
    } else {
        println!(
            "Updated relationship {} - {}",
            updated.id,
            describe_relationship(&domain, updated)
        );
        Ok(())
    }
}

pub fn handle_relationship_delete(config: &Config, id: String) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.relationship(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }
    domain.delete_relationship(&id);
    println!("Deleted relationship {}", id);
    Ok(())
}

// ---- plot points ----

pub fn handle_plot_add(
    config: &Config,
    title: String,
    project: Option<String>,
    chapter: u32,
    order: Option<u32>,
    description: String,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    let project_id = resolve_project(&domain, project)?;

    // Append to the end of the chapter unless told otherwise
    let order = order.unwrap_or_else(|| {
        domain
            .plot_points_for(&project_id)
            .iter()
            .filter(|p| p.chapter == chapter)
            .map(|p| p.order)
            .max()
            .map_or(1, |last| last + 1)
    });

    let plot_point = domain.add_plot_point(NewPlotPoint {
        project_id,
        title,
        description,
        chapter,
        order,
    });

    if json {
        print_json(&plot_point)
    } else {
        println!(
            "Created plot point {} - {}.{} {}",
            plot_point.id, plot_point.chapter, plot_point.order, plot_point.title
        );
        Ok(())
    }
}

pub fn handle_plot_list(config: &Config, project: Option<String>, json: bool) -> Result<()> {
    let domain = open_domain(config)?;
    let project_id = resolve_project(&domain, project)?;
    let plot_points = domain.plot_points_for(&project_id);

    if json {
        return print_json(&plot_points);
    }

    if plot_points.is_empty() {
        println!("No plot points yet.");
        return Ok(());
    }

    for point in plot_points {
        println!(
            "  {:>3}.{:<3} {}  {}",
            point.chapter, point.order, point.id, point.title
        );
        if !point.description.is_empty() {
            println!("          {}", point.description);
        }
    }
    Ok(())
}

pub fn handle_plot_update(
    config: &Config,
    id: String,
    title: Option<String>,
    description: Option<String>,
    chapter: Option<u32>,
    order: Option<u32>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.plot_point(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }

    domain.update_plot_point(
        &id,
        PlotPointUpdate {
            title,
            description,
            chapter,
            order,
            ..Default::default()
        },
    );

    let updated = domain
        .plot_point(&id)
        .ok_or_else(|| PlotlineError::EntityNotFound(id.clone()))?;
    if json {
        print_json(updated)
    } else {
        println!(
            "Updated plot point {} - {}.{} {}",
            updated.id, updated.chapter, updated.order, updated.title
        );
        Ok(())
    }
}

pub fn handle_plot_delete(config: &Config, id: String) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.plot_point(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }
    domain.delete_plot_point(&id);
    println!("Deleted plot point {}", id);
    Ok(())
}

// ---- research ----

pub fn handle_research_add(
    config: &Config,
    title: String,
    project: Option<String>,
    content: String,
    tags: Option<String>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    let project_id = resolve_project(&domain, project)?;

    let item = domain.add_research_item(NewResearchItem {
        project_id,
        title,
        content,
        tags: tags.as_deref().map(parse_traits).unwrap_or_default(),
    });

    if json {
        print_json(&item)
    } else {
        println!("Created research item {} - {}", item.id, item.title);
        Ok(())
    }
}

pub fn handle_research_list(config: &Config, project: Option<String>, json: bool) -> Result<()> {
    let domain = open_domain(config)?;
    let project_id = resolve_project(&domain, project)?;
    let items = domain.research_items_for(&project_id);

    if json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("No research yet.");
        return Ok(());
    }

    for item in items {
        if item.tags.is_empty() {
            println!("  {}  {}", item.id, item.title);
        } else {
            println!("  {}  {} [{}]", item.id, item.title, item.tags.join(", "));
        }
    }
    Ok(())
}

pub fn handle_research_update(
    config: &Config,
    id: String,
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.research_item(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }

    domain.update_research_item(
        &id,
        ResearchItemUpdate {
            title,
            content,
            tags: tags.as_deref().map(parse_traits),
            ..Default::default()
        },
    );

    let updated = domain
        .research_item(&id)
        .ok_or_else(|| PlotlineError::EntityNotFound(id.clone()))?;
    if json {
        print_json(updated)
    } else {
        println!("Updated research item {} - {}", updated.id, updated.title);
        Ok(())
    }
}

pub fn handle_research_delete(config: &Config, id: String) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.research_item(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }
    domain.delete_research_item(&id);
    println!("Deleted research item {}", id);
    Ok(())
}

// ---- ideas ----

pub fn handle_idea_add(config: &Config, title: String, description: String, json: bool) -> Result<()> {
    let mut domain = open_domain(config)?;
    let idea = domain.add_idea(title, description);

    if json {
        print_json(&idea)
    } else {
        println!("Created idea {} - {}", idea.id, idea.title);
        Ok(())
    }
}

pub fn handle_idea_list(config: &Config, json: bool) -> Result<()> {
    let domain = open_domain(config)?;

    if json {
        return print_json(domain.ideas());
    }

    if domain.ideas().is_empty() {
        println!("No ideas yet.");
        return Ok(());
    }

    for idea in domain.ideas() {
        println!(
            "  {}  {} ({})",
            idea.id,
            idea.title,
            idea.created_at.format("%Y-%m-%d")
        );
        if !idea.description.is_empty() {
            println!("      {}", idea.description);
        }
    }
    Ok(())
}

pub fn handle_idea_update(
    config: &Config,
    id: String,
    title: Option<String>,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.idea(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }

    domain.update_idea(&id, IdeaUpdate { title, description });

    let updated = domain
        .idea(&id)
        .ok_or_else(|| PlotlineError::EntityNotFound(id.clone()))?;
    if json {
        print_json(updated)
    } else {
        println!("Updated idea {} - {}", updated.id, updated.title);
        Ok(())
    }
}

pub fn handle_idea_delete(config: &Config, id: String) -> Result<()> {
    let mut domain = open_domain(config)?;
    if domain.idea(&id).is_none() {
        return Err(PlotlineError::EntityNotFound(id));
    }
    domain.delete_idea(&id);
    println!("Deleted idea {}", id);
    Ok(())
}
