//! # Kanso Core
//!
//! Core board model and drag-and-drop coordination for Kanso kanban boards.
//!
//! This crate provides the board/column/task data model with its mutation
//! engine, the spatial registry used for drop hit-testing, and the drag
//! coordinator state machine, without any dependency on specific UI
//! implementations or storage backends.

pub mod domain;
pub mod drag;
pub mod error;
pub mod spatial;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use domain::{
    board::{Board, BoardId, BoardPatch, Column, ColumnId, ColumnPatch},
    task::{Priority, Task, TaskDraft, TaskId, TaskPatch},
};
pub use drag::{DragCoordinator, MoveRequest, Point};
pub use error::{KansoError, Result};
pub use spatial::{ColumnLayout, Rect, SpatialRegistry, TaskSlot};
pub use storage::Storage;
pub use store::{Applied, BoardStore, Command, ErrorFlag};
