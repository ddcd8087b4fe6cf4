use crate::domain::task::{Task, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardId(Uuid);

impl BoardId {
    /// Creates a fresh random board ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BoardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a column within its board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(Uuid);

impl ColumnId {
    /// Creates a fresh random column ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ColumnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered lane of tasks within a board
///
/// Task order in `tasks` is display order; there is no separate rank field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Returns the position of a task in this column's sequence
    pub fn task_index(&self, task_id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == task_id)
    }

    /// Returns a task by ID
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == task_id)
    }

    /// Returns a mutable task by ID
    pub fn task_mut(&mut self, task_id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| &task.id == task_id)
    }

    /// Merges the provided fields into the column
    pub fn apply_patch(&mut self, patch: ColumnPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
    }
}

/// Partial update for a column; only the fields present are merged
#[derive(Debug, Clone, Default)]
pub struct ColumnPatch {
    pub title: Option<String>,
}

/// Partial update for a board; only the fields present are merged
#[derive(Debug, Clone, Default)]
pub struct BoardPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A kanban board: an ordered set of columns, each holding ordered tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub description: Option<String>,
    pub columns: Vec<Column>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Titles of the columns every new board starts with
    pub const SEED_COLUMN_TITLES: [&'static str; 3] = ["TODO", "DOING", "DONE"];

    /// Creates a board seeded with the three default columns
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BoardId::new(),
            name: name.into(),
            description,
            columns: Self::SEED_COLUMN_TITLES
                .iter()
                .map(|title| Column::new(*title))
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a column by ID
    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == column_id)
    }

    /// Returns a mutable column by ID
    pub fn column_mut(&mut self, column_id: &ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|col| &col.id == column_id)
    }

    /// Total number of tasks across all columns
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|col| col.tasks.len()).sum()
    }

    /// Merges the provided fields into the board
    pub fn apply_patch(&mut self, patch: BoardPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }

    /// Refreshes `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_seeds_default_columns() {
        let board = Board::new("Sprint 1", None);

        assert_eq!(board.columns.len(), 3);
        assert_eq!(board.columns[0].title, "TODO");
        assert_eq!(board.columns[1].title, "DOING");
        assert_eq!(board.columns[2].title, "DONE");
        assert!(board.columns.iter().all(|col| col.tasks.is_empty()));
        assert_eq!(board.created_at, board.updated_at);
    }

    #[test]
    fn test_seed_column_ids_are_unique() {
        let board = Board::new("Sprint 1", None);

        let first = board.columns[0].id;
        assert!(!board.columns[1..].iter().any(|col| col.id == first));
    }

    #[test]
    fn test_column_lookup() {
        let board = Board::new("Sprint 1", None);
        let todo_id = board.columns[0].id;

        assert_eq!(board.column(&todo_id).map(|col| col.title.as_str()), Some("TODO"));
        assert!(board.column(&ColumnId::new()).is_none());
    }

    #[test]
    fn test_task_index() {
        let mut column = Column::new("TODO");
        column.tasks.push(Task::new("A"));
        column.tasks.push(Task::new("B"));
        let b_id = column.tasks[1].id;

        assert_eq!(column.task_index(&b_id), Some(1));
        assert_eq!(column.task_index(&TaskId::new()), None);
    }

    #[test]
    fn test_apply_patch_merges_present_fields_only() {
        let mut board = Board::new("Old name", Some("Original".to_string()));

        board.apply_patch(BoardPatch {
            name: Some("New name".to_string()),
            ..Default::default()
        });

        assert_eq!(board.name, "New name");
        assert_eq!(board.description.as_deref(), Some("Original"));
    }

    #[test]
    fn test_touch_updates_updated_at() {
        let mut board = Board::new("Sprint 1", None);
        let initial_updated_at = board.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        board.touch();

        assert!(board.updated_at > initial_updated_at);
    }

    #[test]
    fn test_board_round_trip() {
        let mut board = Board::new("Sprint 1", Some("Q3 work".to_string()));
        board.columns[0].tasks.push(Task::new("A"));

        let json = serde_json::to_string(&board).unwrap();
        let deserialized: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, board);
    }
}
