use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("voicetodo-{nanos}-{name}"))
}

fn run(store_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_voicetodo"))
        .args(args)
        .env("VOICETODO_STORE_DIR", store_dir)
        .env("VOICETODO_CONFIG_PATH", store_dir.join("missing-config.json"))
        .output()
        .expect("failed to run voicetodo")
}

fn stored_tasks(store_dir: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(store_dir.join("voice_tasks.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn say_adds_a_task_and_confirms() {
    let store_dir = temp_path("say-add");

    let output = run(
        &store_dir,
        &["say", "remind me to call mom tomorrow, high priority"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "Added task: Call mom due tomorrow with high priority"
    );

    let stored = stored_tasks(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert_eq!(stored["schema_version"], 1);
    let task = &stored["tasks"][0];
    assert_eq!(task["task"], "Call mom");
    assert_eq!(task["dueDate"], "tomorrow");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["status"], "pending");
    assert!(task["id"].as_str().unwrap().starts_with("task-"));
}

#[test]
fn say_list_reports_tasks_as_json() {
    let store_dir = temp_path("say-list");
    assert!(run(&store_dir, &["say", "buy groceries on friday"]).status.success());

    let output = run(&store_dir, &["say", "--json", "show me my tasks"]);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    let reply: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["command"]["commandType"], "list");
    assert_eq!(reply["confirmation"], "Here are your tasks");
    assert_eq!(reply["matched"], true);
    assert_eq!(reply["tasks"][0]["task"], "Buy groceries");
    assert_eq!(reply["tasks"][0]["dueDate"], "Friday");
}

#[test]
fn say_delete_removes_the_matching_task() {
    let store_dir = temp_path("say-delete");
    assert!(run(&store_dir, &["say", "buy groceries"]).status.success());
    assert!(run(&store_dir, &["say", "finish the report"]).status.success());

    let output = run(&store_dir, &["say", "delete the groceries task"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Deleted task \"The groceries task\"");

    let stored = stored_tasks(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    let tasks = stored["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["task"], "Finish the report");
}

#[test]
fn say_complete_without_match_leaves_tasks_alone() {
    let store_dir = temp_path("say-nomatch");
    assert!(run(&store_dir, &["say", "buy groceries"]).status.success());

    let output = run(&store_dir, &["say", "mark done the dentist"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "No task matching \"The dentist\"");

    let stored = stored_tasks(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert_eq!(stored["tasks"][0]["status"], "pending");
}

#[test]
fn say_complete_marks_the_task_done() {
    let store_dir = temp_path("say-complete");
    assert!(run(&store_dir, &["say", "buy groceries"]).status.success());

    let output = run(&store_dir, &["say", "mark done buy groceries"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Marked task \"Buy groceries\" as complete");

    let stored = stored_tasks(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert_eq!(stored["tasks"][0]["status"], "completed");
    assert!(stored["tasks"][0]["completedAt"].is_string());
}
