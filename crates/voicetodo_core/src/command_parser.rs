//! Turns a free-form speech transcript into a structured [`Command`].
//!
//! Every classification step walks an ordered table of `(pattern, result)`
//! pairs and stops at the first hit, so table order is the precedence rule.

use crate::model::{Command, CommandType, DueDate, Priority, weekday_from_name};
use regex::Regex;
use std::sync::LazyLock;

const FALLBACK_CONFIRMATION: &str = "Sorry, I couldn't understand that command.";

struct Pattern<T> {
    regex: Regex,
    value: T,
}

fn table<T: Copy>(entries: &[(&str, T)]) -> Vec<Pattern<T>> {
    entries
        .iter()
        .map(|(source, value)| Pattern {
            regex: Regex::new(source).expect("static pattern must compile"),
            value: *value,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateKey {
    Today,
    Tomorrow,
    NextWeek,
    SpecificDay,
    SpecificDate,
}

static INTENT_PATTERNS: LazyLock<Vec<Pattern<CommandType>>> = LazyLock::new(|| {
    table(&[
        (
            r"\b(show|list|display|what)\b.*?\b(tasks|to[- ]?dos?|to do|do i need to do)\b",
            CommandType::List,
        ),
        (
            r"\b(completed|complete|mark as done|mark done|mark complete|finished|done with)\b",
            CommandType::Complete,
        ),
        (r"\b(delete|remove|cancel)\b", CommandType::Delete),
    ])
});

static DATE_PATTERNS: LazyLock<Vec<Pattern<DateKey>>> = LazyLock::new(|| {
    table(&[
        (r"\b(today|tonight)\b", DateKey::Today),
        (r"\btomorrow\b", DateKey::Tomorrow),
        (r"\bnext week\b", DateKey::NextWeek),
        (
            r"\bon (monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
            DateKey::SpecificDay,
        ),
        (
            r"\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(st|nd|rd|th)?\b",
            DateKey::SpecificDate,
        ),
    ])
});

static PRIORITY_PATTERNS: LazyLock<Vec<Pattern<Priority>>> = LazyLock::new(|| {
    table(&[
        (
            r"\b(urgent|important|high priority|critical|asap|has to be done)\b",
            Priority::High,
        ),
        (
            r"\b(medium priority|normal priority|soon|this week)\b",
            Priority::Medium,
        ),
        (
            r"\b(low priority|not important|can wait|this month|at some point)\b",
            Priority::Low,
        ),
    ])
});

static FILLER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(remind me to|add task|create task|create a reminder(?: to)?|add to-do|create to-do|make sure to|don't forget to|remember to|reminder to)\b",
    )
    .expect("static pattern must compile")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern must compile"));

/// Parse a transcript. Returns `None` only for empty or whitespace-only input;
/// anything else yields a command, defaulting to `add`.
pub fn parse_command(transcript: &str) -> Option<Command> {
    if transcript.trim().is_empty() {
        return None;
    }

    let lower = transcript.to_lowercase().replace('\u{2019}', "'");

    let intent = INTENT_PATTERNS
        .iter()
        .find(|pattern| pattern.regex.is_match(&lower));
    let command_type = intent.map_or(CommandType::Add, |pattern| pattern.value);

    let date = DATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.regex.captures(&lower).map(|caps| (pattern, caps)));
    let due_date = date.as_ref().and_then(|(pattern, caps)| match pattern.value {
        DateKey::Today => Some(DueDate::Today),
        DateKey::Tomorrow => Some(DueDate::Tomorrow),
        DateKey::NextWeek => Some(DueDate::NextWeek),
        DateKey::SpecificDay => caps
            .get(1)
            .and_then(|day| weekday_from_name(day.as_str()))
            .map(DueDate::Day),
        DateKey::SpecificDate => caps.get(0).map(|whole| {
            let phrase = WHITESPACE.replace_all(whole.as_str(), " ");
            DueDate::Date(capitalize_first(&phrase))
        }),
    });

    let priority = PRIORITY_PATTERNS
        .iter()
        .find(|pattern| pattern.regex.is_match(&lower))
        .map_or(Priority::Medium, |pattern| pattern.value);

    let mut text = FILLER_PATTERN.replace_all(&lower, " ").into_owned();
    if let Some(pattern) = intent {
        text = pattern.regex.replace(&text, " ").into_owned();
    }
    if let Some((pattern, _)) = date.as_ref() {
        text = pattern.regex.replace(&text, " ").into_owned();
    }
    for pattern in PRIORITY_PATTERNS.iter() {
        text = pattern.regex.replace_all(&text, " ").into_owned();
    }

    Some(Command {
        command_type,
        task: normalize_phrase(&text),
        due_date,
        priority,
        timestamp: crate::clock::now_rfc3339().unwrap_or_default(),
    })
}

/// Optional-input variant: absent transcripts parse to `None`.
pub fn parse_transcript(transcript: Option<&str>) -> Option<Command> {
    transcript.and_then(parse_command)
}

/// One-line confirmation suitable for reading back to the user.
pub fn describe_command(command: Option<&Command>) -> String {
    let Some(command) = command else {
        return FALLBACK_CONFIRMATION.to_string();
    };

    match command.command_type {
        CommandType::Add => {
            let mut message = format!("Added task: {}", command.task);
            if let Some(due_date) = command.due_date.as_ref() {
                message.push_str(&format!(" due {due_date}"));
            }
            if command.priority != Priority::Medium {
                message.push_str(&format!(" with {} priority", command.priority));
            }
            message
        }
        CommandType::Complete => format!("Marked task \"{}\" as complete", command.task),
        CommandType::Delete => format!("Deleted task \"{}\"", command.task),
        CommandType::List => "Here are your tasks".to_string(),
    }
}

fn normalize_phrase(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw, " ");
    let trimmed = collapsed
        .trim()
        .trim_end_matches(|ch: char| ch.is_whitespace() || ",.:;!?".contains(ch))
        .trim_start_matches(|ch: char| ch.is_whitespace() || ",.:;".contains(ch));
    capitalize_first(trimmed)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
