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

fn queue(store_dir: &Path) -> serde_json::Value {
    let output = run(store_dir, &["queue", "--json"]);
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn offline_mutations_stay_queued_in_order() {
    let store_dir = temp_path("offline-queue");

    let added = run(&store_dir, &["--offline", "add", "Water plants", "--json"]);
    let task: serde_json::Value = serde_json::from_slice(&added.stdout).unwrap();
    let id = task["id"].as_str().unwrap().to_string();
    assert!(run(&store_dir, &["--offline", "done", &id]).status.success());
    assert!(run(&store_dir, &["--offline", "delete", &id]).status.success());

    let entries = queue(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    let kinds: Vec<_> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, ["ADD_TASK", "UPDATE_TASK", "DELETE_TASK"]);
    assert_eq!(entries[1]["data"]["status"], "completed");
    assert!(entries[0]["queuedAt"].is_string());
}

#[test]
fn sync_is_postponed_while_offline() {
    let store_dir = temp_path("offline-sync");
    assert!(run(&store_dir, &["--offline", "say", "buy milk"]).status.success());

    let output = run(&store_dir, &["--offline", "sync"]);
    let entries = queue(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Sync postponed (1 operations queued)");
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn sync_drains_the_queue_once_online() {
    let store_dir = temp_path("online-sync");
    assert!(run(&store_dir, &["--offline", "say", "buy milk"]).status.success());
    assert!(run(&store_dir, &["--offline", "say", "walk the dog"]).status.success());

    let output = run(&store_dir, &["sync", "--json"]);
    let entries = queue(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["synced"], true);
    assert_eq!(result["pending"], 0);
    assert_eq!(entries, serde_json::json!([]));
}

#[test]
fn offline_override_matches_the_flag() {
    let store_dir = temp_path("offline-override");

    let output = run(
        &store_dir,
        &["--config-override", "offline=true", "say", "buy milk"],
    );
    let entries = queue(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn empty_queue_renders_a_message() {
    let store_dir = temp_path("empty-queue");

    let output = run(&store_dir, &["queue"]);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Sync queue is empty"));
}

#[test]
fn online_mutation_is_flushed_before_exit() {
    let store_dir = temp_path("online-drain");

    let output = run(&store_dir, &["say", "buy milk"]);
    let entries = queue(&store_dir);
    std::fs::remove_dir_all(&store_dir).ok();

    assert!(output.status.success());
    assert_eq!(entries, serde_json::json!([]));
}
