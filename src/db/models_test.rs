//! Tests for domain models.

use crate::db::models::*;

#[test]
fn priority_deserializes_from_wire_format() {
    // Wire and database both use upper-case strings
    let high: Priority = serde_json::from_str("\"HIGH\"").unwrap();
    assert_eq!(high, Priority::High);

    let low: Priority = serde_json::from_str("\"LOW\"").unwrap();
    assert_eq!(low, Priority::Low);
}

#[test]
fn priority_rejects_values_outside_the_enumeration() {
    assert!(serde_json::from_str::<Priority>("\"URGENT\"").is_err());
    assert!(serde_json::from_str::<Priority>("\"medium\"").is_err());
    assert!("URGENT".parse::<Priority>().is_err());
}

#[test]
fn priority_display_matches_from_str() {
    for priority in Priority::ALL {
        let parsed: Priority = priority.to_string().parse().unwrap();
        assert_eq!(parsed, priority);
    }
}

#[test]
fn priority_defaults_to_medium() {
    assert_eq!(Priority::default(), Priority::Medium);
}

#[test]
fn new_todo_applies_creation_defaults() {
    let todo = NewTodo::new("Buy milk");
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.description, None);
    assert!(!todo.completed);
    assert_eq!(todo.priority, Priority::Medium);
}

#[test]
fn new_todo_builders_set_optional_fields() {
    let todo = NewTodo::new("Ship release")
        .with_description("tag and publish")
        .with_priority(Priority::High);
    assert_eq!(todo.description.as_deref(), Some("tag and publish"));
    assert_eq!(todo.priority, Priority::High);
}

#[test]
fn todo_serializes_priority_upper_case() {
    let todo = Todo {
        id: 3,
        title: "Read".to_string(),
        description: None,
        completed: false,
        priority: Priority::Low,
        created_at: "2025-01-01T00:00:00.000000Z".to_string(),
        updated_at: "2025-01-01T00:00:00.000000Z".to_string(),
    };
    let json = serde_json::to_value(&todo).unwrap();
    assert_eq!(json["priority"], "LOW");
    assert_eq!(json["description"], serde_json::Value::Null);
}
