use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::warn;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use voicetodo_cli::cli::{Cli, Command, collect_overrides, parse_due_date};
use voicetodo_cli::render::{queue_table, task_table};
use voicetodo_core::command_parser::{describe_command, parse_command};
use voicetodo_core::config::{Config, ConfigOverrides, load_config_with_fallback, merge_overrides};
use voicetodo_core::connectivity::{NetworkMonitor, spawn_reconnect_flush};
use voicetodo_core::error::AppError;
use voicetodo_core::model::{NewTask, Priority, Task};
use voicetodo_core::open_store;
use voicetodo_core::task_store::TaskStore;
use voicetodo_core::voice::{CommandOutcome, VoiceReply, handle_transcript};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn resolve_config(overrides: &ConfigOverrides) -> Config {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        warn!("using default configuration: {err}");
    }
    merge_overrides(&loaded.config, overrides)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))
}

fn print_task(task: &Task, json: bool, verb: &str) -> Result<(), AppError> {
    if json {
        println!("{}", to_json(task)?);
    } else {
        println!("{verb} task: {} ({})", task.task, task.id);
    }
    Ok(())
}

fn print_reply(reply: &VoiceReply, json: bool) -> Result<(), AppError> {
    if json {
        let tasks = match &reply.outcome {
            CommandOutcome::Added(task)
            | CommandOutcome::Completed(task)
            | CommandOutcome::Deleted(task) => vec![task.clone()],
            CommandOutcome::Listed(tasks) => tasks.clone(),
            CommandOutcome::NoMatch => Vec::new(),
        };
        let payload = serde_json::json!({
            "command": reply.command,
            "confirmation": reply.confirmation,
            "matched": !matches!(reply.outcome, CommandOutcome::NoMatch),
            "tasks": tasks,
        });
        println!("{payload}");
        return Ok(());
    }

    println!("{}", reply.confirmation);
    if let CommandOutcome::Listed(tasks) = &reply.outcome {
        println!("{}", task_table(tasks));
    }
    Ok(())
}

async fn run_transcript(store: &TaskStore, transcript: &str, json: bool) -> Result<(), AppError> {
    match handle_transcript(store, transcript).await? {
        Some(reply) => print_reply(&reply, json),
        None => {
            if json {
                println!("null");
            } else {
                println!("{}", describe_command(None));
            }
            Ok(())
        }
    }
}

async fn run_command(cli: Cli, store: &TaskStore) -> Result<(), AppError> {
    match cli.command {
        Command::Say { transcript } => {
            run_transcript(store, &transcript.join(" "), cli.json).await?;
        }
        Command::Parse { transcript } => {
            let command = parse_command(&transcript.join(" "));
            if cli.json {
                println!("{}", to_json(&command)?);
            } else {
                match command.as_ref() {
                    Some(parsed) => {
                        println!("type: {}", parsed.command_type);
                        println!("task: {}", parsed.task);
                        let due = parsed
                            .due_date
                            .as_ref()
                            .map_or_else(|| "-".to_string(), ToString::to_string);
                        println!("due: {due}");
                        println!("priority: {}", parsed.priority);
                    }
                    None => println!("{}", describe_command(None)),
                }
            }
        }
        Command::Add {
            text,
            due,
            priority,
        } => {
            let text = match text {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("task text is required")),
            };

            let mut new_task = NewTask::new(text);
            if let Some(raw) = due.as_deref() {
                new_task = new_task.with_due_date(parse_due_date(raw)?);
            }
            if let Some(raw) = priority.as_deref() {
                new_task = new_task.with_priority(Priority::parse(raw)?);
            }

            let task = store.add(new_task).await?;
            print_task(&task, cli.json, "Added")?;
        }
        Command::List => {
            let tasks = store.list().await?;
            if cli.json {
                println!("{}", to_json(&tasks)?);
            } else {
                println!("{}", task_table(&tasks));
            }
        }
        Command::Done { id } => {
            let task = store
                .complete(&id)
                .await?
                .ok_or_else(|| AppError::invalid_input("task not found"))?;
            print_task(&task, cli.json, "Completed")?;
        }
        Command::Delete { id } => {
            let existed = store.get(&id).await?.is_some();
            store.delete(&id).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "id": id.trim(), "removed": existed }));
            } else if existed {
                println!("Deleted task: {}", id.trim());
            } else {
                println!("No task with id {}", id.trim());
            }
        }
        Command::Sync => {
            let flushed = store.attempt_flush().await;
            let pending = store.pending_sync().await?.len();
            if cli.json {
                println!("{}", serde_json::json!({ "synced": flushed, "pending": pending }));
            } else if flushed {
                println!("Sync complete");
            } else {
                println!("Sync postponed ({pending} operations queued)");
            }
        }
        Command::Queue => {
            let entries = store.pending_sync().await?;
            if cli.json {
                println!("{}", to_json(&entries)?);
            } else {
                println!("{}", queue_table(&entries));
            }
        }
    }

    Ok(())
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
    println!("Interactive mode: type what you would say, or :online / :offline / exit.");
}

/// Read transcripts from stdin, one per line.
async fn run_interactive(store: Arc<TaskStore>, monitor: Arc<NetworkMonitor>) -> Result<(), AppError> {
    let reconnect = spawn_reconnect_flush(store.clone(), monitor.subscribe());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(input) = lines
        .next_line()
        .await
        .map_err(|err| AppError::io(err.to_string()))?
    {
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        match line {
            ":online" => {
                monitor.set_connected(true);
                println!("Online");
                continue;
            }
            ":offline" => {
                monitor.set_connected(false);
                println!("Offline");
                continue;
            }
            _ => {}
        }

        if let Err(err) = run_transcript(&store, line, false).await {
            eprintln!("ERROR: {}", err);
        }
    }

    reconnect.abort();
    store.attempt_flush().await;
    Ok(())
}

async fn run() -> Result<(), AppError> {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        let config = resolve_config(&ConfigOverrides::default());
        let (store, monitor) = open_store(&config)?;
        return run_interactive(store, monitor).await;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return Err(normalize_parse_error(err)),
    };

    let mut overrides = collect_overrides(&cli.config_override)?;
    if cli.offline {
        overrides.offline = Some(true);
    }
    let config = resolve_config(&overrides);
    let (store, _monitor) = open_store(&config)?;

    let mutates = cli.command.mutates();
    run_command(cli, &store).await?;
    if mutates {
        // Mutations flush in the background; finish that before exiting.
        store.attempt_flush().await;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(err) = run().await {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
