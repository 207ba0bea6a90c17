use clap::{Parser, Subcommand};
use voicetodo_core::config::ConfigOverrides;
use voicetodo_core::error::AppError;
use voicetodo_core::model::DueDate;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Treat the device as offline; mutations stay queued
    #[arg(long, global = true)]
    pub offline: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interpret a spoken command and apply it
    ///
    /// Example: voicetodo say "remind me to call mom tomorrow, high priority"
    Say {
        #[arg(required = true, num_args = 1..)]
        transcript: Vec<String>,
    },
    /// Show how a transcript would be interpreted, without applying it
    ///
    /// Example: voicetodo parse "delete the groceries task"
    Parse {
        #[arg(required = true, num_args = 1..)]
        transcript: Vec<String>,
    },
    /// Add a task directly
    ///
    /// Example: voicetodo add "Buy milk" --due tomorrow --priority high
    Add {
        text: Option<String>,
        #[arg(long, value_name = "DUE")]
        due: Option<String>,
        #[arg(long, value_name = "LEVEL")]
        priority: Option<String>,
    },
    /// List all tasks
    ///
    /// Example: voicetodo list
    List,
    /// Mark a task as completed
    ///
    /// Example: voicetodo done task-1734652800000000000
    Done { id: String },
    /// Delete a task
    ///
    /// Example: voicetodo delete task-1734652800000000000
    Delete { id: String },
    /// Push queued changes to the remote backend
    ///
    /// Example: voicetodo sync
    Sync,
    /// Show changes waiting to be synced
    ///
    /// Example: voicetodo queue
    Queue,
}

impl Command {
    /// Whether the command can change stored tasks and queue a sync entry.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Say { .. } | Command::Add { .. } | Command::Done { .. } | Command::Delete { .. }
        )
    }
}

/// Spoken or typed due date: `today`, `tomorrow`, `next week`, a weekday or a
/// month-day phrase.
pub fn parse_due_date(raw: &str) -> Result<DueDate, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("due date cannot be empty"));
    }

    let collapsed: String = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match collapsed.to_ascii_lowercase().as_str() {
        "today" | "tonight" => Ok(DueDate::Today),
        "tomorrow" => Ok(DueDate::Tomorrow),
        "next week" | "nextweek" => Ok(DueDate::NextWeek),
        _ => Ok(DueDate::from(collapsed)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    StoreDir,
    RemoteUrl,
    FlushTimeoutSecs,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field = canonicalize_flag_name(key_raw)
        .ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "store_dir" => ConfigOverrideTarget::StoreDir,
        "remote_url" | "remote" => ConfigOverrideTarget::RemoteUrl,
        "flush_timeout_secs" | "flush_timeout" => ConfigOverrideTarget::FlushTimeoutSecs,
        "offline" => ConfigOverrideTarget::Offline,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Fold every `--config-override` argument into one set of overrides; later
/// arguments win.
pub fn collect_overrides(raw_overrides: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for raw in raw_overrides {
        let parsed = parse_config_override(raw).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::StoreDir => {
                overrides.store_dir = Some(parsed.value.into());
            }
            ConfigOverrideTarget::RemoteUrl => {
                overrides.remote_url = Some(parsed.value);
            }
            ConfigOverrideTarget::FlushTimeoutSecs => {
                let secs = parsed.value.parse::<u64>().map_err(|_| {
                    AppError::invalid_input("flush_timeout_secs must be a whole number")
                })?;
                overrides.flush_timeout_secs = Some(secs);
            }
            ConfigOverrideTarget::Offline => {
                let offline = match parsed.value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "1" => true,
                    "false" | "no" | "0" => false,
                    _ => return Err(AppError::invalid_input("offline must be true or false")),
                };
                overrides.offline = Some(offline);
            }
        }
    }

    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
