//! Tests for todo field validation.

use crate::db::validation::{DESCRIPTION_MAX_LEN, TITLE_MAX_LEN, TodoCandidate, validate};
use crate::db::{Priority, Todo};

fn candidate<'a>(
    title: Option<&'a str>,
    description: Option<&'a str>,
    priority: Option<&'a str>,
) -> TodoCandidate<'a> {
    TodoCandidate {
        title,
        description,
        priority,
    }
}

fn fields_of(violations: &[crate::db::validation::Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.field.as_str()).collect()
}

#[test]
fn valid_candidate_yields_typed_fields() {
    let fields = validate(&candidate(Some("Buy milk"), Some("2 litres"), Some("HIGH")))
        .expect("Candidate should be valid");

    assert_eq!(fields.title, "Buy milk");
    assert_eq!(fields.description.as_deref(), Some("2 litres"));
    assert_eq!(fields.priority, Some(Priority::High));
}

#[test]
fn omitted_priority_is_not_a_violation() {
    let fields = validate(&candidate(Some("Buy milk"), None, None)).unwrap();
    assert_eq!(fields.priority, None);
    assert_eq!(fields.description, None);
}

#[test]
fn missing_title_is_required() {
    let violations = validate(&candidate(None, None, None)).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "title");
    assert_eq!(violations[0].message, "title is required");
}

#[test]
fn empty_and_blank_titles_are_required_violations() {
    for title in ["", "   ", "\t\n"] {
        let violations = validate(&candidate(Some(title), None, None)).unwrap_err();
        assert_eq!(violations.len(), 1, "title {:?}", title);
        assert_eq!(violations[0].message, "title is required");
    }
}

#[test]
fn title_length_bounds_are_inclusive() {
    let max = "a".repeat(TITLE_MAX_LEN);
    assert!(validate(&candidate(Some("a"), None, None)).is_ok());
    assert!(validate(&candidate(Some(&max), None, None)).is_ok());

    let too_long = "a".repeat(TITLE_MAX_LEN + 1);
    let violations = validate(&candidate(Some(&too_long), None, None)).unwrap_err();
    assert_eq!(
        violations[0].message,
        "title must be at most 100 characters"
    );
}

#[test]
fn lengths_count_characters_not_bytes() {
    // 100 multi-byte characters is still within bounds
    let title = "é".repeat(TITLE_MAX_LEN);
    assert!(title.len() > TITLE_MAX_LEN);
    assert!(validate(&candidate(Some(&title), None, None)).is_ok());
}

#[test]
fn description_over_limit_is_rejected() {
    let at_limit = "d".repeat(DESCRIPTION_MAX_LEN);
    assert!(validate(&candidate(Some("t"), Some(&at_limit), None)).is_ok());

    let over = "d".repeat(DESCRIPTION_MAX_LEN + 1);
    let violations = validate(&candidate(Some("t"), Some(&over), None)).unwrap_err();
    assert_eq!(fields_of(&violations), vec!["description"]);
    assert_eq!(
        violations[0].message,
        "description must be at most 500 characters"
    );
}

#[test]
fn empty_description_is_allowed() {
    let fields = validate(&candidate(Some("t"), Some(""), None)).unwrap();
    assert_eq!(fields.description.as_deref(), Some(""));
}

#[test]
fn unknown_priority_is_rejected() {
    let violations = validate(&candidate(Some("t"), None, Some("URGENT"))).unwrap_err();
    assert_eq!(fields_of(&violations), vec!["priority"]);
    assert_eq!(
        violations[0].message,
        "priority must be one of: LOW MEDIUM HIGH"
    );
}

#[test]
fn priority_is_case_sensitive() {
    assert!(validate(&candidate(Some("t"), None, Some("high"))).is_err());
}

#[test]
fn all_violations_are_collected_in_field_order() {
    let long_description = "d".repeat(DESCRIPTION_MAX_LEN + 1);
    let violations =
        validate(&candidate(Some(""), Some(&long_description), Some("URGENT"))).unwrap_err();

    assert_eq!(
        fields_of(&violations),
        vec!["title", "description", "priority"]
    );
}

#[test]
fn persisted_todo_converts_to_a_valid_candidate() {
    let todo = Todo {
        id: 1,
        title: "Walk the dog".to_string(),
        description: None,
        completed: true,
        priority: Priority::Low,
        created_at: "2025-01-01T00:00:00.000000Z".to_string(),
        updated_at: "2025-01-01T00:00:00.000000Z".to_string(),
    };

    let fields = validate(&TodoCandidate::from(&todo)).unwrap();
    assert_eq!(fields.title, "Walk the dog");
    assert_eq!(fields.priority, Some(Priority::Low));
}
