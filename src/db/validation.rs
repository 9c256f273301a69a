//! Field validation for todo payloads.
//!
//! Checks run in a fixed order (title, description, priority) and every
//! field is checked even when an earlier one failed, so callers get the
//! complete list of violations in one pass. Each field reports at most one
//! violation: the first rule it breaks.

use serde::Serialize;
use utoipa::ToSchema;

use super::models::{Priority, Todo};

pub const TITLE_MIN_LEN: usize = 1;
pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// Name of the offending field
    #[schema(example = "title")]
    pub field: String,
    /// Human-readable description of the failure
    #[schema(example = "title is required")]
    pub message: String,
}

impl Violation {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Raw field values to validate, before any of them are trusted.
///
/// `None` means the field was not provided. Priority stays a string here so
/// that unknown values are reported as violations instead of failing earlier
/// during deserialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoCandidate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub priority: Option<&'a str>,
}

impl<'a> From<&'a Todo> for TodoCandidate<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            title: Some(&todo.title),
            description: todo.description.as_deref(),
            priority: Some(todo.priority.as_str()),
        }
    }
}

/// Fields that passed validation, converted to their typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    pub title: String,
    pub description: Option<String>,
    /// `None` when no priority was provided.
    pub priority: Option<Priority>,
}

/// Validate a candidate, returning typed fields or every violation found.
pub fn validate(candidate: &TodoCandidate<'_>) -> Result<ValidFields, Vec<Violation>> {
    let mut violations = Vec::new();

    let title = match check_title(candidate.title) {
        Ok(title) => Some(title),
        Err(v) => {
            violations.push(v);
            None
        }
    };

    if let Err(v) = check_description(candidate.description) {
        violations.push(v);
    }

    let priority = match check_priority(candidate.priority) {
        Ok(priority) => priority,
        Err(v) => {
            violations.push(v);
            None
        }
    };

    match title {
        Some(title) if violations.is_empty() => Ok(ValidFields {
            title: title.to_string(),
            description: candidate.description.map(str::to_string),
            priority,
        }),
        _ => Err(violations),
    }
}

fn check_title(title: Option<&str>) -> Result<&str, Violation> {
    let title = match title {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(Violation::new("title", "title is required")),
    };

    let len = title.chars().count();
    if len < TITLE_MIN_LEN {
        return Err(Violation::new(
            "title",
            format!("title must be at least {} characters", TITLE_MIN_LEN),
        ));
    }
    if len > TITLE_MAX_LEN {
        return Err(Violation::new(
            "title",
            format!("title must be at most {} characters", TITLE_MAX_LEN),
        ));
    }

    Ok(title)
}

fn check_description(description: Option<&str>) -> Result<(), Violation> {
    match description {
        Some(d) if d.chars().count() > DESCRIPTION_MAX_LEN => Err(Violation::new(
            "description",
            format!(
                "description must be at most {} characters",
                DESCRIPTION_MAX_LEN
            ),
        )),
        _ => Ok(()),
    }
}

fn check_priority(priority: Option<&str>) -> Result<Option<Priority>, Violation> {
    let Some(raw) = priority else {
        return Ok(None);
    };

    raw.parse::<Priority>().map(Some).map_err(|_| {
        let allowed: Vec<&str> = Priority::ALL.iter().map(Priority::as_str).collect();
        Violation::new(
            "priority",
            format!("priority must be one of: {}", allowed.join(" ")),
        )
    })
}
