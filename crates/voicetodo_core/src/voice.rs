use crate::command_parser::{describe_command, parse_command};
use crate::error::AppError;
use crate::model::{Command, CommandType, NewTask, Task};
use crate::task_store::TaskStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Added(Task),
    Completed(Task),
    Deleted(Task),
    Listed(Vec<Task>),
    /// Complete/delete phrase did not name any stored task.
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceReply {
    pub command: Command,
    pub outcome: CommandOutcome,
    pub confirmation: String,
}

/// Carry out a parsed command against the store.
pub async fn apply_command(store: &TaskStore, command: &Command) -> Result<VoiceReply, AppError> {
    let outcome = match command.command_type {
        CommandType::Add => CommandOutcome::Added(store.add(NewTask::from(command)).await?),
        CommandType::List => CommandOutcome::Listed(store.list().await?),
        CommandType::Complete => match store.find_by_phrase(&command.task).await? {
            Some(target) => match store.complete(&target.id).await? {
                Some(task) => CommandOutcome::Completed(task),
                None => CommandOutcome::NoMatch,
            },
            None => CommandOutcome::NoMatch,
        },
        CommandType::Delete => match store.find_by_phrase(&command.task).await? {
            Some(target) => {
                store.delete(&target.id).await?;
                CommandOutcome::Deleted(target)
            }
            None => CommandOutcome::NoMatch,
        },
    };

    let confirmation = match &outcome {
        CommandOutcome::NoMatch => format!("No task matching \"{}\"", command.task),
        _ => describe_command(Some(command)),
    };

    Ok(VoiceReply {
        command: command.clone(),
        outcome,
        confirmation,
    })
}

/// Parse a transcript and apply it. `Ok(None)` means nothing actionable was
/// heard.
pub async fn handle_transcript(
    store: &TaskStore,
    transcript: &str,
) -> Result<Option<VoiceReply>, AppError> {
    match parse_command(transcript) {
        Some(command) => apply_command(store, &command).await.map(Some),
        None => Ok(None),
    }
}
