use std::process::Command;

#[test]
fn help_lists_subcommands() {
    let exe = env!("CARGO_BIN_EXE_voicetodo");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run voicetodo");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["say", "parse", "add", "list", "done", "delete", "sync", "queue"] {
        assert!(stdout.contains(name), "missing {name} in help output");
    }
}

#[test]
fn unknown_subcommand_reports_invalid_input() {
    let exe = env!("CARGO_BIN_EXE_voicetodo");
    let output = Command::new(exe)
        .arg("frobnicate")
        .output()
        .expect("failed to run voicetodo");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("ERROR: invalid_input"), "{stderr}");
}

#[test]
fn parse_prints_the_interpreted_command() {
    let exe = env!("CARGO_BIN_EXE_voicetodo");
    let output = Command::new(exe)
        .args(["parse", "--json", "remind me to call mom tomorrow, high priority"])
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["commandType"], "add");
    assert_eq!(parsed["task"], "Call mom");
    assert_eq!(parsed["dueDate"], "tomorrow");
    assert_eq!(parsed["priority"], "high");
    assert!(parsed["timestamp"].is_string());
}

#[test]
fn parse_plain_output_shows_fields() {
    let exe = env!("CARGO_BIN_EXE_voicetodo");
    let output = Command::new(exe)
        .args(["parse", "delete", "the", "groceries", "task"])
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("type: delete"));
    assert!(stdout.contains("task: The groceries task"));
    assert!(stdout.contains("due: -"));
    assert!(stdout.contains("priority: medium"));
}
