use crate::{
    domain::{Board, BoardId, BoardPatch, Column, ColumnId, ColumnPatch, Task, TaskDraft, TaskId, TaskPatch},
    storage::Storage,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod command;

pub use command::{Applied, Command};

/// Storage key the full board collection is persisted under
pub const STORAGE_KEY: &str = "boards";

const SAVE_ERROR_MESSAGE: &str = "Failed to save board data";
const LOAD_ERROR_MESSAGE: &str = "Failed to load board data";

/// Process-wide persistence error flag
///
/// Set when a save or load fails, cleared when one succeeds. The in-memory
/// state is never rolled back on failure; it drifts ahead of the persisted
/// copy until the next successful save.
#[derive(Debug, Clone, Default)]
pub struct ErrorFlag(Arc<Mutex<Option<String>>>);

impl ErrorFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user-facing message of the most recent failure, if any
    pub fn message(&self) -> Option<String> {
        self.slot().clone()
    }

    pub fn is_set(&self) -> bool {
        self.slot().is_some()
    }

    fn set(&self, message: impl Into<String>) {
        *self.slot() = Some(message.into());
    }

    fn clear(&self) {
        *self.slot() = None;
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns the board collection and applies all mutations to it
///
/// Mutations are `Command` values; `dispatch` applies them, refreshes the
/// owning board's `updated_at`, and schedules a fire-and-forget save of the
/// whole collection. Unknown ids make a command a silent no-op.
pub struct BoardStore {
    boards: Vec<Board>,
    selected: Option<BoardId>,
    storage: Arc<dyn Storage>,
    errors: ErrorFlag,
}

impl BoardStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            boards: Vec::new(),
            selected: None,
            storage,
            errors: ErrorFlag::new(),
        }
    }

    /// All boards, in creation order
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Returns a board by ID
    pub fn board(&self, board_id: &BoardId) -> Option<&Board> {
        self.boards.iter().find(|board| &board.id == board_id)
    }

    fn board_mut(&mut self, board_id: &BoardId) -> Option<&mut Board> {
        self.boards.iter_mut().find(|board| &board.id == board_id)
    }

    /// The currently selected board, if any
    pub fn selected_board(&self) -> Option<&Board> {
        self.selected.and_then(|id| self.board(&id))
    }

    /// A handle to the persistence error flag
    pub fn errors(&self) -> ErrorFlag {
        self.errors.clone()
    }

    /// Sets the selected board to the one matching `board_id`, or clears the
    /// selection if no board matches
    ///
    /// Selection is session state; it is not persisted.
    pub fn select_board(&mut self, board_id: BoardId) -> Option<&Board> {
        self.selected = self
            .boards
            .iter()
            .find(|board| board.id == board_id)
            .map(|board| board.id);
        self.selected_board()
    }

    /// Applies a command, refreshes the owning board's `updated_at`, and
    /// schedules persistence
    ///
    /// Returns `None` without side effects when the command referenced an
    /// unknown board, column, or task.
    pub fn dispatch(&mut self, command: Command) -> Option<Applied> {
        let touched = command.touched_board();
        let applied = self.apply(command)?;
        if let Some(board_id) = touched {
            if let Some(board) = self.board_mut(&board_id) {
                board.touch();
            }
        }
        self.schedule_save();
        Some(applied)
    }

    fn apply(&mut self, command: Command) -> Option<Applied> {
        match command {
            Command::CreateBoard { board } => {
                let board_id = board.id;
                self.boards.push(board);
                Some(Applied::BoardCreated(board_id))
            }
            Command::UpdateBoard { board_id, patch } => {
                let board = self.board_mut(&board_id)?;
                board.apply_patch(patch);
                Some(Applied::BoardUpdated(board_id))
            }
            Command::DeleteBoard { board_id } => {
                let index = self.boards.iter().position(|board| board.id == board_id)?;
                self.boards.remove(index);
                if self.selected == Some(board_id) {
                    self.selected = None;
                }
                Some(Applied::BoardDeleted(board_id))
            }
            Command::AddColumn { board_id, column } => {
                let board = self.board_mut(&board_id)?;
                let column_id = column.id;
                board.columns.push(column);
                Some(Applied::ColumnAdded(board_id, column_id))
            }
            Command::UpdateColumn {
                board_id,
                column_id,
                patch,
            } => {
                let board = self.board_mut(&board_id)?;
                let column = board.column_mut(&column_id)?;
                column.apply_patch(patch);
                Some(Applied::ColumnUpdated(board_id, column_id))
            }
            Command::DeleteColumn { board_id, column_id } => {
                let board = self.board_mut(&board_id)?;
                let index = board.columns.iter().position(|col| col.id == column_id)?;
                board.columns.remove(index);
                Some(Applied::ColumnDeleted(board_id, column_id))
            }
            Command::AddTask {
                board_id,
                column_id,
                task,
            } => {
                let board = self.board_mut(&board_id)?;
                let column = board.column_mut(&column_id)?;
                let task_id = task.id;
                column.tasks.push(task);
                Some(Applied::TaskAdded(column_id, task_id))
            }
            Command::UpdateTask {
                board_id,
                column_id,
                task_id,
                patch,
            } => {
                let board = self.board_mut(&board_id)?;
                let task = board.column_mut(&column_id)?.task_mut(&task_id)?;
                task.apply_patch(patch);
                Some(Applied::TaskUpdated(column_id, task_id))
            }
            Command::DeleteTask {
                board_id,
                column_id,
                task_id,
            } => {
                let board = self.board_mut(&board_id)?;
                let column = board.column_mut(&column_id)?;
                let index = column.task_index(&task_id)?;
                column.tasks.remove(index);
                Some(Applied::TaskDeleted(column_id, task_id))
            }
            Command::MoveTask {
                board_id,
                source_column_id,
                dest_column_id,
                task_id,
                dest_index,
            } => {
                let board = self.board_mut(&board_id)?;
                let source_pos = board
                    .columns
                    .iter()
                    .position(|col| col.id == source_column_id)?;
                let dest_pos = board
                    .columns
                    .iter()
                    .position(|col| col.id == dest_column_id)?;
                let task_pos = board.columns[source_pos].task_index(&task_id)?;

                // Remove before insert: for same-column moves dest_index is
                // relative to the post-removal sequence.
                let mut task = board.columns[source_pos].tasks.remove(task_pos);
                task.touch();
                let dest = &mut board.columns[dest_pos];
                let index = dest_index.min(dest.tasks.len());
                dest.tasks.insert(index, task);
                Some(Applied::TaskMoved {
                    task_id,
                    from: source_column_id,
                    to: dest_column_id,
                    index,
                })
            }
        }
    }

    /// Creates a board seeded with the default columns and appends it
    pub fn create_board(&mut self, name: impl Into<String>, description: Option<String>) -> Board {
        let board = Board::new(name, description);
        let snapshot = board.clone();
        self.dispatch(Command::CreateBoard { board });
        snapshot
    }

    /// Merges the provided fields into a board
    pub fn update_board(&mut self, board_id: BoardId, patch: BoardPatch) -> bool {
        self.dispatch(Command::UpdateBoard { board_id, patch }).is_some()
    }

    /// Removes a board and everything under it
    pub fn delete_board(&mut self, board_id: BoardId) -> bool {
        self.dispatch(Command::DeleteBoard { board_id }).is_some()
    }

    /// Appends a new empty column to a board
    pub fn add_column(&mut self, board_id: BoardId, title: impl Into<String>) -> Option<Column> {
        let column = Column::new(title);
        let snapshot = column.clone();
        self.dispatch(Command::AddColumn { board_id, column })?;
        Some(snapshot)
    }

    /// Merges the provided fields into a column
    pub fn update_column(
        &mut self,
        board_id: BoardId,
        column_id: ColumnId,
        patch: ColumnPatch,
    ) -> bool {
        self.dispatch(Command::UpdateColumn {
            board_id,
            column_id,
            patch,
        })
        .is_some()
    }

    /// Removes a column and all its tasks
    pub fn delete_column(&mut self, board_id: BoardId, column_id: ColumnId) -> bool {
        self.dispatch(Command::DeleteColumn { board_id, column_id }).is_some()
    }

    /// Appends a new task to a column
    pub fn add_task(
        &mut self,
        board_id: BoardId,
        column_id: ColumnId,
        draft: TaskDraft,
    ) -> Option<Task> {
        let task = Task::from_draft(draft);
        let snapshot = task.clone();
        self.dispatch(Command::AddTask {
            board_id,
            column_id,
            task,
        })?;
        Some(snapshot)
    }

    /// Merges the provided fields into a task and refreshes its `updated_at`
    pub fn update_task(
        &mut self,
        board_id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> bool {
        self.dispatch(Command::UpdateTask {
            board_id,
            column_id,
            task_id,
            patch,
        })
        .is_some()
    }

    /// Removes a task from its column
    pub fn delete_task(&mut self, board_id: BoardId, column_id: ColumnId, task_id: TaskId) -> bool {
        self.dispatch(Command::DeleteTask {
            board_id,
            column_id,
            task_id,
        })
        .is_some()
    }

    /// Atomically transfers a task to `dest_index` in the destination column
    ///
    /// Source and destination may be the same column; `dest_index` is then
    /// relative to the sequence after removal. The index clamps to the
    /// destination's length.
    pub fn move_task(
        &mut self,
        board_id: BoardId,
        source_column_id: ColumnId,
        dest_column_id: ColumnId,
        task_id: TaskId,
        dest_index: usize,
    ) -> bool {
        self.dispatch(Command::MoveTask {
            board_id,
            source_column_id,
            dest_column_id,
            task_id,
            dest_index,
        })
        .is_some()
    }

    /// Replaces the in-memory collection with the persisted snapshot
    ///
    /// A missing snapshot yields an empty collection; a storage or parse
    /// failure also yields an empty collection and sets the error flag.
    pub async fn load(&mut self) {
        match self.storage.get(STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Board>>(&raw) {
                Ok(boards) => {
                    self.boards = boards;
                    self.errors.clear();
                }
                Err(_) => {
                    self.boards = Vec::new();
                    self.errors.set(LOAD_ERROR_MESSAGE);
                }
            },
            Ok(None) => {
                self.boards = Vec::new();
                self.errors.clear();
            }
            Err(_) => {
                self.boards = Vec::new();
                self.errors.set(LOAD_ERROR_MESSAGE);
            }
        }

        if let Some(selected) = self.selected {
            if self.board(&selected).is_none() {
                self.selected = None;
            }
        }
    }

    /// Writes the whole collection as one snapshot
    pub async fn save(&self) {
        let snapshot = match serde_json::to_string(&self.boards) {
            Ok(snapshot) => snapshot,
            Err(_) => {
                self.errors.set(SAVE_ERROR_MESSAGE);
                return;
            }
        };
        match self.storage.set(STORAGE_KEY, &snapshot).await {
            Ok(()) => self.errors.clear(),
            Err(_) => self.errors.set(SAVE_ERROR_MESSAGE),
        }
    }

    /// Serializes the current state and writes it in the background
    ///
    /// Callers never await the write (last-write-wins). Outside a tokio
    /// runtime the write is deferred to the next explicit `save`, which
    /// always covers the full state.
    fn schedule_save(&self) {
        let snapshot = match serde_json::to_string(&self.boards) {
            Ok(snapshot) => snapshot,
            Err(_) => {
                self.errors.set(SAVE_ERROR_MESSAGE);
                return;
            }
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => return,
        };

        let storage = Arc::clone(&self.storage);
        let errors = self.errors.clone();
        handle.spawn(async move {
            match storage.set(STORAGE_KEY, &snapshot).await {
                Ok(()) => errors.clear(),
                Err(_) => errors.set(SAVE_ERROR_MESSAGE),
            }
        });
    }
}
