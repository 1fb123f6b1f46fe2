use serde::{Deserialize, Serialize};

use super::task::Task;

/// Dashboard counters, computed from whatever tasks are in memory right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// High priority and not yet completed.
    pub high_priority: usize,
}

impl Stats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed()).count();
        let high_priority = tasks.iter().filter(|t| t.is_urgent()).count();
        Self {
            total,
            completed,
            pending: total - completed,
            high_priority,
        }
    }
}

/// Aggregate counters reported by the server's `/stats/` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStats {
    pub total_tasks: u64,
    pub pending_tasks: u64,
    pub in_progress_tasks: u64,
    pub completed_tasks: u64,
    pub high_priority_tasks: u64,
    pub overdue_tasks: u64,
    pub categories_count: u64,
    pub context_entries_count: u64,
}
