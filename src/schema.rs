use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::model::{Priority, Todo};

// Query parameters accepted by the list route. All filters are optional
// and compose with AND semantics.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct FilterOptions {
    pub category: Option<String>,
    // Kept as a raw string: an unknown priority value matches nothing
    // instead of failing the request.
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

impl FilterOptions {
    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(category) = &self.category {
            if !todo.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if todo.priority.as_str() != priority {
                return false;
            }
        }
        if let Some(completed) = self.completed {
            if todo.completed != completed {
                return false;
            }
        }
        true
    }
}

// Struct representing the request body for creating a new Todo.
// Only the title is required; omitted fields get the documented defaults.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

// A validated creation request with defaults filled in, ready for the
// store to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTodoSchema {
    // Validation happens here so both stores get well-formed input.
    pub fn into_new_todo(self) -> Result<NewTodo, &'static str> {
        let title = self.title.unwrap_or_default().trim().to_string();
        if title.is_empty() {
            return Err("Title is required");
        }

        Ok(NewTodo {
            title,
            description: self.description.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "General".to_string()),
            due_date: self.due_date,
        })
    }
}

// Struct representing the request body for updating a Todo. Every field
// is optional; only fields present in the body are applied. `dueDate`
// distinguishes "absent" (leave alone) from explicit null (clear it).
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

// Wraps a present-but-possibly-null field in Some so it survives the
// Option::None default for absent fields.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateTodoSchema {
    // Apply the patch field by field. Empty title/category values are
    // ignored rather than clearing the field; `updatedAt` is the store's
    // responsibility.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            if !title.trim().is_empty() {
                todo.title = title.clone();
            }
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(category) = &self.category {
            if !category.trim().is_empty() {
                todo.category = category.clone();
            }
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_todo() -> Todo {
        Todo {
            id: 1,
            title: "Prepare shopping list".to_string(),
            description: "Create weekly shopping list".to_string(),
            completed: false,
            priority: Priority::Medium,
            category: "Personal".to_string(),
            due_date: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_without_title_is_rejected() {
        let body: CreateTodoSchema = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_new_todo(), Err("Title is required"));

        let blank: CreateTodoSchema = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(blank.into_new_todo().is_err());
    }

    #[test]
    fn create_applies_defaults_for_omitted_fields() {
        let body: CreateTodoSchema = serde_json::from_str(r#"{"title": "Yoga class"}"#).unwrap();
        let new = body.into_new_todo().unwrap();
        assert_eq!(new.title, "Yoga class");
        assert_eq!(new.description, "");
        assert_eq!(new.priority, Priority::Medium);
        assert_eq!(new.category, "General");
        assert!(new.due_date.is_none());
    }

    #[test]
    fn patch_with_only_completed_leaves_other_fields_unchanged() {
        let mut todo = sample_todo();
        let before = todo.clone();

        let patch: UpdateTodoSchema = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        patch.apply(&mut todo);

        assert!(todo.completed);
        assert_eq!(todo.title, before.title);
        assert_eq!(todo.description, before.description);
        assert_eq!(todo.priority, before.priority);
        assert_eq!(todo.category, before.category);
        assert_eq!(todo.due_date, before.due_date);
    }

    #[test]
    fn patch_ignores_empty_title() {
        let mut todo = sample_todo();
        let patch: UpdateTodoSchema = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        patch.apply(&mut todo);
        assert_eq!(todo.title, "Prepare shopping list");
    }

    #[test]
    fn explicit_null_due_date_clears_it_but_absent_leaves_it() {
        let mut todo = sample_todo();

        let absent: UpdateTodoSchema = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        absent.apply(&mut todo);
        assert!(todo.due_date.is_some());

        let null: UpdateTodoSchema = serde_json::from_str(r#"{"dueDate": null}"#).unwrap();
        null.apply(&mut todo);
        assert!(todo.due_date.is_none());
    }

    #[test]
    fn filters_compose_with_and_semantics() {
        let mut todo = sample_todo();
        todo.priority = Priority::High;
        todo.completed = true;

        let filter = FilterOptions {
            category: Some("personal".to_string()),
            priority: Some("high".to_string()),
            completed: Some(true),
        };
        assert!(filter.matches(&todo));

        let mismatch = FilterOptions {
            priority: Some("low".to_string()),
            ..filter.clone()
        };
        assert!(!mismatch.matches(&todo));
    }

    #[test]
    fn unknown_priority_value_matches_nothing() {
        let todo = sample_todo();
        let filter = FilterOptions {
            priority: Some("urgent".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&todo));
    }
}
