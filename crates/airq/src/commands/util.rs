//! Shared helpers for command handlers.

use std::io::BufRead;

use chrono::{DateTime, Utc};
use serde_json::Value;

use airq_api::UserProfile;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt(e.to_string())
}

pub fn prompt_text(label: &str) -> Result<String, CliError> {
    dialoguer::Input::<String>::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)
}

pub fn prompt_password(label: &str) -> Result<String, CliError> {
    rpassword::prompt_password(format!("{label}: ")).map_err(prompt_err)
}

/// First line of stdin, without the trailing newline.
pub fn read_stdin_line() -> Result<String, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// `KEY=VALUE` into a JSON field. Values that parse as JSON keep their
/// type (`--set age=3` is a number); anything else is a string.
pub fn parse_field(raw: &str) -> Result<(String, Value), CliError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: format!("expected KEY=VALUE, got '{raw}'"),
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: format!("empty key in '{raw}'"),
        });
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

pub fn display_name(user: &UserProfile) -> &str {
    user.name.as_deref().unwrap_or(&user.email)
}

pub fn fmt_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn fmt_coords(lat: f64, lon: f64) -> String {
    format!("{lat:.4}, {lon:.4}")
}

/// Cut `s` to at most `max` characters, marking the cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
