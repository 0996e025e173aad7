//! Display ordering for todo lists.
//!
//! The web client shows incomplete work first, most urgent at the top.
//! The comparator lives here so any consumer gets the same order.

use std::cmp::Ordering;

use crate::model::Todo;

/// Sort todos into display order: completed items last, then priority
/// descending, then due date ascending (no due date sorts after any due
/// date), then creation time descending.
pub fn display_order(todos: &mut [Todo]) {
    todos.sort_by(compare_display);
}

pub fn compare_display(a: &Todo, b: &Todo) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}
