use crate::domain::{Column, ColumnId, TaskId};

/// Bounding rectangle in the shared window coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True iff the point lies within the rectangle, edges inclusive
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// The vertical midpoint
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Measured placement of one task within its column
///
/// `frame` is `None` until the task has reported a layout measurement;
/// unmeasured slots never affect insertion-index resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSlot {
    pub task_id: TaskId,
    pub frame: Option<Rect>,
}

impl TaskSlot {
    pub fn measured(task_id: TaskId, frame: Rect) -> Self {
        Self {
            task_id,
            frame: Some(frame),
        }
    }

    pub fn unmeasured(task_id: TaskId) -> Self {
        Self {
            task_id,
            frame: None,
        }
    }
}

/// Layout registration for a column: its frame plus ordered task slots
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub frame: Rect,
    pub slots: Vec<TaskSlot>,
}

impl ColumnLayout {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            slots: Vec::new(),
        }
    }

    /// Builds a layout mirroring a column's task sequence, all slots
    /// unmeasured until the tasks report their frames
    pub fn for_column(column: &Column, frame: Rect) -> Self {
        Self {
            frame,
            slots: column
                .tasks
                .iter()
                .map(|task| TaskSlot::unmeasured(task.id))
                .collect(),
        }
    }
}

/// Cache of the most recent layout measurements, keyed by column
///
/// Purely derived state: it owns no tasks and is only as fresh as the last
/// `register_column`/`set_task_frame` call. Columns are arena entries in
/// registration order; point queries scan in that order, so the first
/// registered column containing a point wins.
#[derive(Debug, Default)]
pub struct SpatialRegistry {
    entries: Vec<(ColumnId, ColumnLayout)>,
}

impl SpatialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a column's layout, replacing any previous registration in
    /// place
    pub fn register_column(&mut self, column_id: ColumnId, layout: ColumnLayout) {
        match self.entries.iter_mut().find(|(id, _)| *id == column_id) {
            Some((_, existing)) => *existing = layout,
            None => self.entries.push((column_id, layout)),
        }
    }

    /// Drops a column's registration
    pub fn unregister_column(&mut self, column_id: &ColumnId) {
        self.entries.retain(|(id, _)| id != column_id);
    }

    /// Records a fresh frame for one task slot
    ///
    /// Returns false if the column or task is not registered.
    pub fn set_task_frame(&mut self, column_id: &ColumnId, task_id: &TaskId, frame: Rect) -> bool {
        let Some((_, layout)) = self.entries.iter_mut().find(|(id, _)| id == column_id) else {
            return false;
        };
        match layout.slots.iter_mut().find(|slot| &slot.task_id == task_id) {
            Some(slot) => {
                slot.frame = Some(frame);
                true
            }
            None => false,
        }
    }

    /// True iff the point lies within the column's last-measured frame
    pub fn contains_point(&self, column_id: &ColumnId, x: f64, y: f64) -> bool {
        self.layout(column_id)
            .map(|layout| layout.frame.contains(x, y))
            .unwrap_or(false)
    }

    /// The first registered column containing the point
    pub fn column_at(&self, x: f64, y: f64) -> Option<ColumnId> {
        self.entries
            .iter()
            .find(|(_, layout)| layout.frame.contains(x, y))
            .map(|(id, _)| *id)
    }

    /// Resolves where a drop at the point would land in the column's task
    /// sequence
    ///
    /// `None` when the point is outside the column's frame. Otherwise every
    /// measured slot whose vertical midpoint lies above the point counts one;
    /// unmeasured slots are skipped.
    pub fn insertion_index(&self, column_id: &ColumnId, x: f64, y: f64) -> Option<usize> {
        let layout = self.layout(column_id)?;
        if !layout.frame.contains(x, y) {
            return None;
        }

        let mut index = 0;
        for slot in &layout.slots {
            if let Some(frame) = slot.frame {
                if y > frame.mid_y() {
                    index += 1;
                }
            }
        }
        Some(index)
    }

    /// Ordinal of a task in the column's registered slot sequence
    pub fn task_position(&self, column_id: &ColumnId, task_id: &TaskId) -> Option<usize> {
        self.layout(column_id)?
            .slots
            .iter()
            .position(|slot| &slot.task_id == task_id)
    }

    fn layout(&self, column_id: &ColumnId) -> Option<&ColumnLayout> {
        self.entries
            .iter()
            .find(|(id, _)| id == column_id)
            .map(|(_, layout)| layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_frame() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 400.0)
    }

    /// Three measured slots with midpoints at y = 10, 30, 50
    fn three_slot_layout() -> ColumnLayout {
        ColumnLayout {
            frame: column_frame(),
            slots: vec![
                TaskSlot::measured(TaskId::new(), Rect::new(0.0, 5.0, 200.0, 10.0)),
                TaskSlot::measured(TaskId::new(), Rect::new(0.0, 25.0, 200.0, 10.0)),
                TaskSlot::measured(TaskId::new(), Rect::new(0.0, 45.0, 200.0, 10.0)),
            ],
        }
    }

    #[test]
    fn test_rect_contains_is_edge_inclusive() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(110.0, 70.0));
        assert!(rect.contains(50.0, 40.0));
        assert!(!rect.contains(9.9, 40.0));
        assert!(!rect.contains(50.0, 70.1));
    }

    #[test]
    fn test_contains_point_unknown_column_is_false() {
        let registry = SpatialRegistry::new();
        assert!(!registry.contains_point(&ColumnId::new(), 0.0, 0.0));
    }

    #[test]
    fn test_insertion_index_midpoint_walk() {
        let mut registry = SpatialRegistry::new();
        let column_id = ColumnId::new();
        registry.register_column(column_id, three_slot_layout());

        assert_eq!(registry.insertion_index(&column_id, 100.0, 25.0), Some(1));
        assert_eq!(registry.insertion_index(&column_id, 100.0, 5.0), Some(0));
        assert_eq!(registry.insertion_index(&column_id, 100.0, 100.0), Some(3));
    }

    #[test]
    fn test_insertion_index_outside_column_is_none() {
        let mut registry = SpatialRegistry::new();
        let column_id = ColumnId::new();
        registry.register_column(column_id, three_slot_layout());

        assert_eq!(registry.insertion_index(&column_id, 500.0, 25.0), None);
        assert_eq!(registry.insertion_index(&ColumnId::new(), 100.0, 25.0), None);
    }

    #[test]
    fn test_insertion_index_skips_unmeasured_slots() {
        let mut registry = SpatialRegistry::new();
        let column_id = ColumnId::new();
        registry.register_column(
            column_id,
            ColumnLayout {
                frame: column_frame(),
                slots: vec![
                    TaskSlot::measured(TaskId::new(), Rect::new(0.0, 5.0, 200.0, 10.0)),
                    TaskSlot::unmeasured(TaskId::new()),
                    TaskSlot::measured(TaskId::new(), Rect::new(0.0, 45.0, 200.0, 10.0)),
                ],
            },
        );

        // below both measured midpoints; the unmeasured slot adds nothing
        assert_eq!(registry.insertion_index(&column_id, 100.0, 60.0), Some(2));
    }

    #[test]
    fn test_insertion_index_empty_column_is_zero() {
        let mut registry = SpatialRegistry::new();
        let column_id = ColumnId::new();
        registry.register_column(column_id, ColumnLayout::new(column_frame()));

        assert_eq!(registry.insertion_index(&column_id, 100.0, 200.0), Some(0));
    }

    #[test]
    fn test_column_at_scans_in_registration_order() {
        let mut registry = SpatialRegistry::new();
        let first = ColumnId::new();
        let second = ColumnId::new();
        // overlapping frames
        registry.register_column(first, ColumnLayout::new(Rect::new(0.0, 0.0, 200.0, 400.0)));
        registry.register_column(second, ColumnLayout::new(Rect::new(100.0, 0.0, 200.0, 400.0)));

        assert_eq!(registry.column_at(150.0, 50.0), Some(first));
        assert_eq!(registry.column_at(250.0, 50.0), Some(second));
        assert_eq!(registry.column_at(500.0, 50.0), None);
    }

    #[test]
    fn test_register_column_replaces_in_place() {
        let mut registry = SpatialRegistry::new();
        let first = ColumnId::new();
        let second = ColumnId::new();
        registry.register_column(first, ColumnLayout::new(Rect::new(0.0, 0.0, 200.0, 400.0)));
        registry.register_column(second, ColumnLayout::new(Rect::new(100.0, 0.0, 200.0, 400.0)));

        // re-measure the first column; it must keep winning the overlap scan
        registry.register_column(first, ColumnLayout::new(Rect::new(50.0, 0.0, 200.0, 400.0)));

        assert_eq!(registry.column_at(150.0, 50.0), Some(first));
    }

    #[test]
    fn test_unregister_column() {
        let mut registry = SpatialRegistry::new();
        let column_id = ColumnId::new();
        registry.register_column(column_id, ColumnLayout::new(column_frame()));

        registry.unregister_column(&column_id);

        assert!(!registry.contains_point(&column_id, 100.0, 100.0));
        assert_eq!(registry.column_at(100.0, 100.0), None);
    }

    #[test]
    fn test_set_task_frame() {
        let mut registry = SpatialRegistry::new();
        let column_id = ColumnId::new();
        let task_id = TaskId::new();
        registry.register_column(
            column_id,
            ColumnLayout {
                frame: column_frame(),
                slots: vec![TaskSlot::unmeasured(task_id)],
            },
        );

        // unmeasured: a low drop point still resolves to index 0
        assert_eq!(registry.insertion_index(&column_id, 100.0, 300.0), Some(0));

        assert!(registry.set_task_frame(&column_id, &task_id, Rect::new(0.0, 5.0, 200.0, 10.0)));
        assert_eq!(registry.insertion_index(&column_id, 100.0, 300.0), Some(1));

        assert!(!registry.set_task_frame(&column_id, &TaskId::new(), column_frame()));
        assert!(!registry.set_task_frame(&ColumnId::new(), &task_id, column_frame()));
    }

    #[test]
    fn test_task_position() {
        let mut registry = SpatialRegistry::new();
        let column_id = ColumnId::new();
        let layout = three_slot_layout();
        let second_task = layout.slots[1].task_id;
        registry.register_column(column_id, layout);

        assert_eq!(registry.task_position(&column_id, &second_task), Some(1));
        assert_eq!(registry.task_position(&column_id, &TaskId::new()), None);
    }

    #[test]
    fn test_for_column_mirrors_task_sequence() {
        use crate::domain::Task;

        let mut column = Column::new("TODO");
        column.tasks.push(Task::new("A"));
        column.tasks.push(Task::new("B"));

        let layout = ColumnLayout::for_column(&column, column_frame());

        assert_eq!(layout.slots.len(), 2);
        assert_eq!(layout.slots[0].task_id, column.tasks[0].id);
        assert!(layout.slots.iter().all(|slot| slot.frame.is_none()));
    }
}
