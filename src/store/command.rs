use crate::domain::{
    Board, BoardId, BoardPatch, Column, ColumnId, ColumnPatch, Task, TaskId, TaskPatch,
};

/// A mutation of the board collection
///
/// Commands carry everything needed to apply the change; the store's
/// dispatcher is the single place they take effect, refresh the owning
/// board's `updated_at`, and schedule persistence.
#[derive(Debug, Clone)]
pub enum Command {
    CreateBoard {
        board: Board,
    },
    UpdateBoard {
        board_id: BoardId,
        patch: BoardPatch,
    },
    DeleteBoard {
        board_id: BoardId,
    },
    AddColumn {
        board_id: BoardId,
        column: Column,
    },
    UpdateColumn {
        board_id: BoardId,
        column_id: ColumnId,
        patch: ColumnPatch,
    },
    DeleteColumn {
        board_id: BoardId,
        column_id: ColumnId,
    },
    AddTask {
        board_id: BoardId,
        column_id: ColumnId,
        task: Task,
    },
    UpdateTask {
        board_id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
        patch: TaskPatch,
    },
    DeleteTask {
        board_id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
    },
    MoveTask {
        board_id: BoardId,
        source_column_id: ColumnId,
        dest_column_id: ColumnId,
        task_id: TaskId,
        dest_index: usize,
    },
}

impl Command {
    /// The board whose `updated_at` the dispatcher refreshes once the command
    /// applies
    ///
    /// `CreateBoard` stamps its own timestamps and `DeleteBoard` leaves no
    /// board behind, so neither reports one.
    pub(crate) fn touched_board(&self) -> Option<BoardId> {
        match self {
            Self::CreateBoard { .. } | Self::DeleteBoard { .. } => None,
            Self::UpdateBoard { board_id, .. }
            | Self::AddColumn { board_id, .. }
            | Self::UpdateColumn { board_id, .. }
            | Self::DeleteColumn { board_id, .. }
            | Self::AddTask { board_id, .. }
            | Self::UpdateTask { board_id, .. }
            | Self::DeleteTask { board_id, .. }
            | Self::MoveTask { board_id, .. } => Some(*board_id),
        }
    }
}

/// What a dispatched command changed
///
/// `dispatch` returns `None` instead when the command referenced an unknown
/// id and nothing happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    BoardCreated(BoardId),
    BoardUpdated(BoardId),
    BoardDeleted(BoardId),
    ColumnAdded(BoardId, ColumnId),
    ColumnUpdated(BoardId, ColumnId),
    ColumnDeleted(BoardId, ColumnId),
    TaskAdded(ColumnId, TaskId),
    TaskUpdated(ColumnId, TaskId),
    TaskDeleted(ColumnId, TaskId),
    TaskMoved {
        task_id: TaskId,
        from: ColumnId,
        to: ColumnId,
        index: usize,
    },
}
