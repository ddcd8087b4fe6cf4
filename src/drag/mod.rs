use crate::domain::{ColumnId, Task};
use crate::spatial::SpatialRegistry;
use std::time::{Duration, Instant};

/// Minimum pointer travel for a drop to count as intentional
pub const MIN_DRAG_DISTANCE: f64 = 10.0;

/// Minimum drag duration for a drop to count as intentional
pub const MIN_DRAG_DURATION: Duration = Duration::from_millis(100);

/// A pointer position in the shared window coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A committed drop, ready to hand to `BoardStore::move_task`
#[derive(Debug, Clone)]
pub struct MoveRequest {
    pub task: Task,
    pub source_column_id: ColumnId,
    pub target_column_id: ColumnId,
    pub insert_index: usize,
}

/// Everything tracked while a drag is in flight
#[derive(Debug)]
struct ActiveDrag {
    task: Task,
    source_column_id: ColumnId,
    started_at: Instant,
    start: Point,
    current: Point,
    hovered_column: Option<ColumnId>,
}

#[derive(Debug, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// State machine resolving pointer gestures into move decisions
///
/// One logical drag at a time: `start` while Dragging is ignored, and every
/// `end` lands back in Idle whether or not a move was committed. The
/// coordinator only reads the `SpatialRegistry`; the owning context keeps the
/// registry current between pointer events.
#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins tracking a drag of `task` out of `source_column_id`
    ///
    /// Returns false (and changes nothing) if a drag is already active.
    pub fn start(&mut self, task: Task, source_column_id: ColumnId, x: f64, y: f64) -> bool {
        if matches!(self.state, DragState::Dragging(_)) {
            return false;
        }
        let start = Point::new(x, y);
        self.state = DragState::Dragging(ActiveDrag {
            task,
            source_column_id,
            started_at: Instant::now(),
            start,
            current: start,
            hovered_column: None,
        });
        true
    }

    /// Tracks pointer motion and refreshes the hovered column
    ///
    /// Advisory only: feeds visual feedback, never mutates board state.
    /// Ignored while Idle.
    pub fn move_to(&mut self, registry: &SpatialRegistry, x: f64, y: f64) {
        if let DragState::Dragging(drag) = &mut self.state {
            drag.current = Point::new(x, y);
            drag.hovered_column = registry.column_at(x, y);
        }
    }

    /// Finishes the drag, invoking `on_move` iff the drop is valid
    ///
    /// A drop commits when a target column and insertion index resolve, the
    /// gesture clears the motion threshold (distance or duration), and a
    /// same-column drop would actually change the task's position. Landing a
    /// task on its own index, or one past it, reproduces the current order
    /// after remove-then-insert and is discarded.
    ///
    /// Always transitions to Idle; returns whether a move was committed.
    pub fn end(
        &mut self,
        registry: &SpatialRegistry,
        x: f64,
        y: f64,
        on_move: impl FnOnce(MoveRequest),
    ) -> bool {
        let drag = match std::mem::take(&mut self.state) {
            DragState::Dragging(drag) => drag,
            DragState::Idle => return false,
        };

        let duration = drag.started_at.elapsed();
        let distance = drag.start.distance_to(Point::new(x, y));

        let target_column_id = match registry.column_at(x, y) {
            Some(column_id) => column_id,
            None => return false,
        };
        let insert_index = match registry.insertion_index(&target_column_id, x, y) {
            Some(index) => index,
            None => return false,
        };

        if distance < MIN_DRAG_DISTANCE && duration < MIN_DRAG_DURATION {
            return false;
        }

        if target_column_id == drag.source_column_id {
            if let Some(current_index) = registry.task_position(&target_column_id, &drag.task.id) {
                if current_index == insert_index || current_index + 1 == insert_index {
                    return false;
                }
            }
        }

        on_move(MoveRequest {
            task: drag.task,
            source_column_id: drag.source_column_id,
            target_column_id,
            insert_index,
        });
        true
    }

    /// Force-returns to Idle, dropping any tracked drag
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// The task being dragged, if any
    pub fn dragged_task(&self) -> Option<&Task> {
        match &self.state {
            DragState::Dragging(drag) => Some(&drag.task),
            DragState::Idle => None,
        }
    }

    /// The column the drag started from
    pub fn source_column(&self) -> Option<ColumnId> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag.source_column_id),
            DragState::Idle => None,
        }
    }

    /// The last tracked pointer position
    pub fn current_position(&self) -> Option<Point> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag.current),
            DragState::Idle => None,
        }
    }

    /// The column currently under the pointer, as of the last `move_to`
    pub fn hovered_column(&self) -> Option<ColumnId> {
        match &self.state {
            DragState::Dragging(drag) => drag.hovered_column,
            DragState::Idle => None,
        }
    }

    /// True iff a drag is active and hovering over the given column
    pub fn is_drop_target(&self, column_id: &ColumnId) -> bool {
        self.hovered_column() == Some(*column_id)
    }
}
