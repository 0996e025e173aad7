use crate::model::{Priority, Todo};

#[derive(Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

// Aggregate counts over the full record set.
#[derive(Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percentage of completed todos, rounded to the nearest integer.
    /// Zero when there are no todos at all.
    pub completion_rate: u32,
    pub by_priority: PriorityBreakdown,
}

// Recomputed from scratch on every call; nothing is cached.
pub fn compute(todos: &[Todo]) -> TodoStats {
    let total = todos.len();
    let completed = todos.iter().filter(|t| t.completed).count();

    let mut by_priority = PriorityBreakdown::default();
    for todo in todos {
        match todo.priority {
            Priority::High => by_priority.high += 1,
            Priority::Medium => by_priority.medium += 1,
            Priority::Low => by_priority.low += 1,
        }
    }

    let completion_rate = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    TodoStats {
        total,
        completed,
        pending: total - completed,
        completion_rate,
        by_priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn todo(completed: bool, priority: Priority) -> Todo {
        Todo {
            id: 0,
            title: "task".to_string(),
            description: String::new(),
            completed,
            priority,
            category: "General".to_string(),
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_set_yields_all_zeroes() {
        assert_eq!(compute(&[]), TodoStats::default());
    }

    #[test]
    fn counts_and_rate() {
        let todos = vec![
            todo(true, Priority::High),
            todo(false, Priority::Medium),
            todo(false, Priority::Low),
        ];
        let stats = compute(&todos);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        // 1/3 rounds to 33
        assert_eq!(stats.completion_rate, 33);
    }

    #[test]
    fn rate_rounds_to_nearest() {
        let todos = vec![
            todo(true, Priority::Medium),
            todo(true, Priority::Medium),
            todo(false, Priority::Medium),
        ];
        // 2/3 rounds to 67
        assert_eq!(compute(&todos).completion_rate, 67);
    }

    #[test]
    fn priority_breakdown_sums_to_total() {
        let todos = vec![
            todo(false, Priority::High),
            todo(false, Priority::High),
            todo(true, Priority::Medium),
            todo(false, Priority::Low),
        ];
        let stats = compute(&todos);
        let sum = stats.by_priority.high + stats.by_priority.medium + stats.by_priority.low;
        assert_eq!(sum, stats.total);
        assert_eq!(stats.by_priority.high, 2);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(compute(&[todo(true, Priority::Low)])).unwrap();
        assert_eq!(value["completionRate"], 100);
        assert_eq!(value["byPriority"]["low"], 1);
    }
}
