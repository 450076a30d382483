use std::process::{Command, Output};
use tempfile::TempDir;

fn plotline_cmd(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_plotline"));
    cmd.current_dir(tmp.path())
        .env("PLOTLINE_DIR", tmp.path().join(".plotline"))
        .env("PLOTLINE_LOGIN_DELAY_MS", "0")
        .env_remove("PLOTLINE_BACKEND")
        .env_remove("RUST_LOG");
    cmd
}

fn run(tmp: &TempDir, args: &[&str]) -> Output {
    plotline_cmd(tmp).args(args).output().unwrap()
}

fn run_ok(tmp: &TempDir, args: &[&str]) -> String {
    let output = run(tmp, args);
    assert!(
        output.status.success(),
        "plotline {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn run_json(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let mut args = args.to_vec();
    args.push("--json");
    serde_json::from_str(&run_ok(tmp, &args)).unwrap()
}

fn login(tmp: &TempDir) {
    run_ok(tmp, &["login", "paul@arrakis.org", "secret"]);
}

#[test]
fn test_domain_commands_require_login() {
    let tmp = TempDir::new().unwrap();

    let output = run(&tmp, &["project", "list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not logged in"));

    let output = run(&tmp, &["idea", "add", "Sandworm ballet"]);
    assert!(!output.status.success());
}

#[test]
fn test_login_rejects_empty_fields() {
    let tmp = TempDir::new().unwrap();

    let output = run(&tmp, &["login", "", "secret"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please fill in all fields"));
}

#[test]
fn test_login_whoami_logout() {
    let tmp = TempDir::new().unwrap();

    let stdout = run_ok(&tmp, &["login", "paul@arrakis.org", "anything"]);
    assert!(stdout.contains("Signed in as paul <paul@arrakis.org>"));

    let user = run_json(&tmp, &["whoami"]);
    assert_eq!(user["email"], "paul@arrakis.org");
    assert!(user["id"].as_str().unwrap().starts_with("user_"));

    run_ok(&tmp, &["logout"]);
    let output = run(&tmp, &["whoami"]);
    assert!(!output.status.success());
}

#[test]
fn test_signup_uses_given_name() {
    let tmp = TempDir::new().unwrap();

    let user = run_json(&tmp, &["signup", "Paul Atreides", "paul@arrakis.org", "secret"]);
    assert_eq!(user["name"], "Paul Atreides");

    let stdout = run_ok(&tmp, &["whoami"]);
    assert!(stdout.contains("Paul Atreides"));
}

#[test]
fn test_full_project_workflow() {
    let tmp = TempDir::new().unwrap();
    login(&tmp);

    // Creating a project selects it
    let project = run_json(&tmp, &["project", "add", "Dune II", "--summary", "A sequel"]);
    let project_id = project["id"].as_str().unwrap().to_string();
    assert_eq!(project["chapters"], 0);
    assert_eq!(project["createdAt"], project["updatedAt"]);

    let list = run_ok(&tmp, &["project", "list"]);
    assert!(list.contains(&format!("* {}", project_id)));

    let paul = run_json(
        &tmp,
        &["character", "add", "Paul", "--traits", "brave, stubborn"],
    );
    assert_eq!(paul["projectId"], project_id.as_str());
    assert_eq!(paul["traits"], serde_json::json!(["brave", "stubborn"]));
    let paul_id = paul["id"].as_str().unwrap().to_string();

    let chani = run_json(&tmp, &["character", "add", "Chani"]);
    let chani_id = chani["id"].as_str().unwrap().to_string();

    let rel = run_json(
        &tmp,
        &["relationship", "add", paul_id.as_str(), chani_id.as_str(), "--type", "beloved"],
    );
    assert_eq!(rel["relationshipType"], "beloved");
    assert_eq!(rel["projectId"], project_id.as_str());

    let listed = run_ok(&tmp, &["relationship", "list"]);
    assert!(listed.contains("Paul --beloved--> Chani"));

    run_ok(&tmp, &["plot", "add", "Duel", "--chapter", "2"]);
    run_ok(&tmp, &["plot", "add", "Arrival", "--chapter", "1"]);
    let second = run_json(&tmp, &["plot", "add", "Council", "--chapter", "2"]);
    assert_eq!(second["order"], 2);

    let plot = run_json(&tmp, &["plot", "list"]);
    let titles: Vec<&str> = plot
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Arrival", "Duel", "Council"]);

    run_ok(
        &tmp,
        &["research", "add", "Fremen customs", "--tags", "culture, desert"],
    );
    run_ok(&tmp, &["idea", "add", "A prequel about Leto"]);

    let shown = run_json(&tmp, &["project", "show"]);
    assert_eq!(shown["title"], "Dune II");
    assert_eq!(shown["summary"]["characters"], 2);
    assert_eq!(shown["summary"]["relationships"], 1);
    assert_eq!(shown["summary"]["plot_points"], 3);
    assert_eq!(shown["summary"]["research_items"], 1);

    // Deleting the project takes its entities with it but leaves ideas alone
    run_ok(&tmp, &["project", "delete", project_id.as_str(), "--force"]);

    let projects = run_json(&tmp, &["project", "list"]);
    assert_eq!(projects, serde_json::json!([]));

    let output = run(&tmp, &["character", "list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No project selected"));

    let ideas = run_json(&tmp, &["idea", "list"]);
    assert_eq!(ideas.as_array().unwrap().len(), 1);
}

#[test]
fn test_delete_character_removes_relationships() {
    let tmp = TempDir::new().unwrap();
    login(&tmp);
    run_ok(&tmp, &["project", "add", "Dune"]);

    let a = run_json(&tmp, &["character", "add", "Leto"]);
    let b = run_json(&tmp, &["character", "add", "Jessica"]);
    let a_id = a["id"].as_str().unwrap();
    let b_id = b["id"].as_str().unwrap();
    run_ok(&tmp, &["relationship", "add", a_id, b_id, "--type", "partner"]);

    let stdout = run_ok(&tmp, &["character", "delete", a_id]);
    assert!(stdout.contains("1 relationships removed"));

    let rels = run_json(&tmp, &["relationship", "list"]);
    assert_eq!(rels, serde_json::json!([]));
}

#[test]
fn test_update_commands() {
    let tmp = TempDir::new().unwrap();
    login(&tmp);
    let project = run_json(&tmp, &["project", "add", "Draft"]);
    let project_id = project["id"].as_str().unwrap();

    let updated = run_json(
        &tmp,
        &["project", "update", project_id, "--title", "Final", "--chapters", "22"],
    );
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["chapters"], 22);

    let idea = run_json(&tmp, &["idea", "add", "Rough"]);
    let idea_id = idea["id"].as_str().unwrap();
    let idea = run_json(&tmp, &["idea", "update", idea_id, "--description", "Polished"]);
    assert_eq!(idea["title"], "Rough");
    assert_eq!(idea["description"], "Polished");

    let output = run(&tmp, &["idea", "update", "idea_missing", "--title", "x"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Entity not found"));
}

#[test]
fn test_project_use() {
    let tmp = TempDir::new().unwrap();
    login(&tmp);
    let first = run_json(&tmp, &["project", "add", "First"]);
    run_ok(&tmp, &["project", "add", "Second"]);
    let first_id = first["id"].as_str().unwrap();

    let stdout = run_ok(&tmp, &["project", "use", first_id]);
    assert!(stdout.contains("First"));
    let shown = run_json(&tmp, &["project", "show"]);
    assert_eq!(shown["id"], first_id);

    let output = run(&tmp, &["project", "use", "project_nope"]);
    assert!(!output.status.success());

    run_ok(&tmp, &["project", "use", "--clear"]);
    let output = run(&tmp, &["project", "show"]);
    assert!(!output.status.success());
}

#[test]
fn test_delete_without_force_non_interactive_fails() {
    let tmp = TempDir::new().unwrap();
    login(&tmp);
    let project = run_json(&tmp, &["project", "add", "Keep me"]);
    let project_id = project["id"].as_str().unwrap();

    let output = run(&tmp, &["project", "delete", project_id]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Use --force to delete in non-interactive mode"));
    assert!(!stderr.contains("Storage error"));

    let projects = run_json(&tmp, &["project", "list"]);
    assert_eq!(projects.as_array().unwrap().len(), 1);
}

fn run_sqlite(tmp: &TempDir, args: &[&str]) -> String {
    let output = plotline_cmd(tmp)
        .env("PLOTLINE_BACKEND", "sqlite")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_sqlite_backend_persists_across_runs() {
    let tmp = TempDir::new().unwrap();

    run_sqlite(&tmp, &["login", "paul@arrakis.org", "secret"]);
    run_sqlite(&tmp, &["idea", "add", "Stored in SQLite"]);

    assert!(tmp.path().join(".plotline/plotline.db").exists());
    let listed = run_sqlite(&tmp, &["idea", "list"]);
    assert!(listed.contains("Stored in SQLite"));
}

#[test]
fn test_memory_backend_is_rejected() {
    let tmp = TempDir::new().unwrap();

    let output = plotline_cmd(&tmp)
        .env("PLOTLINE_BACKEND", "memory")
        .args(["login", "paul@arrakis.org", "secret"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PLOTLINE_BACKEND"));
    assert!(stderr.contains("memory"));
}

#[test]
fn test_corrupt_loro_snapshot_is_recoverable() {
    let tmp = TempDir::new().unwrap();
    let data_dir = tmp.path().join(".plotline");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("loro.db"), "garbage\n").unwrap();

    // Reads as signed out rather than failing to open
    let output = run(&tmp, &["whoami"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not logged in"));

    login(&tmp);
    let user = run_json(&tmp, &["whoami"]);
    assert_eq!(user["email"], "paul@arrakis.org");
}

#[test]
fn test_invalid_backend_is_reported() {
    let tmp = TempDir::new().unwrap();

    let output = plotline_cmd(&tmp)
        .env("PLOTLINE_BACKEND", "postgres")
        .args(["whoami"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("PLOTLINE_BACKEND"));
}
