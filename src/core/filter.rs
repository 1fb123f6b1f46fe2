use super::task::{PriorityTier, Task, TaskStatus};
use super::ui_state::UiState;

const ALL: &str = "all";

fn matches_status(task: &Task, selector: &str) -> bool {
    match selector.trim().to_ascii_lowercase().as_str() {
        ALL => true,
        "completed" | "done" => task.completed(),
        "pending" => !task.completed(),
        other => TaskStatus::from_name(other).is_some_and(|s| s == task.status),
    }
}

fn matches_category(task: &Task, selector: &str) -> bool {
    let selector = selector.trim();
    if selector == ALL {
        return true;
    }
    task.category.is_some_and(|c| c.to_string() == selector)
}

fn matches_priority(task: &Task, selector: &str) -> bool {
    if selector.trim() == ALL {
        return true;
    }
    PriorityTier::from_name(selector).is_some_and(|p| p == task.priority())
}

fn matches_search(task: &Task, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(&query) || task.description.to_lowercase().contains(&query)
}

/// Whether a task passes the current selectors and search text.
///
/// The status selector `pending` means "not completed", so in-progress tasks
/// are included; unknown selector values match nothing.
pub fn task_matches(task: &Task, ui: &UiState, search: &str) -> bool {
    matches_status(task, &ui.status_filter)
        && matches_category(task, &ui.category_filter)
        && matches_priority(task, &ui.priority_filter)
        && matches_search(task, search)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::TaskPatch;

    fn sample() -> Vec<Task> {
        let mut a = Task::new(1, "Buy groceries");
        a.description = "milk and eggs".to_string();
        a.category = Some(2);
        a.priority_score = 9;
        let a = a.derive();

        let mut b = Task::new(2, "Quarterly report");
        b.category = Some(5);
        b.priority_score = 6;
        b.apply_patch(&TaskPatch::status(TaskStatus::Done));

        let mut c = Task::new(3, "Fix bike");
        c.priority_score = 2;
        c.apply_patch(&TaskPatch::status(TaskStatus::InProgress));

        vec![a, b, c]
    }

    fn ids(ui: &UiState, search: &str) -> Vec<i64> {
        sample()
            .iter()
            .filter(|t| task_matches(t, ui, search))
            .map(|t| t.id)
            .collect()
    }

    #[test]
    fn defaults_show_everything() {
        assert_eq!(ids(&UiState::default(), ""), vec![1, 2, 3]);
    }

    #[test]
    fn status_selectors() {
        let mut ui = UiState::default();
        ui.status_filter = "completed".to_string();
        assert_eq!(ids(&ui, ""), vec![2]);
        ui.status_filter = "pending".to_string();
        assert_eq!(ids(&ui, ""), vec![1, 3]);
        ui.status_filter = "In Progress".to_string();
        assert_eq!(ids(&ui, ""), vec![3]);
        ui.status_filter = "archived".to_string();
        assert!(ids(&ui, "").is_empty());
    }

    #[test]
    fn category_and_priority_selectors() {
        let mut ui = UiState::default();
        ui.category_filter = "5".to_string();
        assert_eq!(ids(&ui, ""), vec![2]);

        let mut ui = UiState::default();
        ui.priority_filter = "high".to_string();
        assert_eq!(ids(&ui, ""), vec![1]);
        ui.priority_filter = "low".to_string();
        assert_eq!(ids(&ui, ""), vec![3]);
    }

    #[test]
    fn search_covers_title_and_description() {
        let ui = UiState::default();
        assert_eq!(ids(&ui, "EGGS"), vec![1]);
        assert_eq!(ids(&ui, "report"), vec![2]);
        assert_eq!(ids(&ui, "  "), vec![1, 2, 3]);
    }
}
