//! Drag-and-drop between board columns.
//!
//! A gesture runs `Idle → Dragging → Dropped | Cancelled → Idle`. The only
//! thing carried across the gesture is the transfer payload: the dragged
//! task's id, written at drag start and read back at drop. A gesture
//! produces at most one move.

use crate::model::store::TaskStore;
use crate::model::task::{TaskId, TaskStatus};
use crate::ops::task_ops;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { task_id: TaskId },
    Dropped { task_id: TaskId, target: TaskStatus },
    Cancelled,
}

impl DragState {
    pub fn is_active(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// Pointer-down-and-move on a card; `payload` is the card's task id
    Start { payload: String },
    /// Pointer entered a column
    Enter(TaskStatus),
    /// Pointer left a column
    Leave(TaskStatus),
    /// Released. `target` is `None` outside every column.
    Drop {
        payload: String,
        target: Option<TaskStatus>,
    },
    /// The gesture is over, whatever happened
    End,
}

/// What the caller must do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    None,
    Move { task_id: TaskId, status: TaskStatus },
}

/// The transition function: `(state, event) -> (state, effect)`.
pub fn transition(state: &DragState, event: &DragEvent) -> (DragState, DragEffect) {
    match (state, event) {
        (_, DragEvent::End) => (DragState::Idle, DragEffect::None),

        (DragState::Idle, DragEvent::Start { payload }) if !payload.is_empty() => (
            DragState::Dragging {
                task_id: TaskId::new(payload.as_str()),
            },
            DragEffect::None,
        ),

        (DragState::Dragging { .. }, DragEvent::Drop { payload, target }) => match target {
            Some(status) if !payload.is_empty() => {
                let task_id = TaskId::new(payload.as_str());
                (
                    DragState::Dropped {
                        task_id: task_id.clone(),
                        target: *status,
                    },
                    DragEffect::Move {
                        task_id,
                        status: *status,
                    },
                )
            }
            _ => (DragState::Cancelled, DragEffect::None),
        },

        // Hover changes, second drops, drops with nothing in flight, and
        // starts during a gesture leave everything as it was.
        (state, _) => (state.clone(), DragEffect::None),
    }
}

/// Per-column "drag is over me" flags. Display state only; the state machine
/// never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropHighlight {
    todo: bool,
    inprogress: bool,
    done: bool,
}

impl DropHighlight {
    fn slot(&mut self, status: TaskStatus) -> &mut bool {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.inprogress,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub fn is_drag_over(&self, status: TaskStatus) -> bool {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.inprogress,
            TaskStatus::Done => self.done,
        }
    }

    pub fn clear(&mut self) {
        *self = DropHighlight::default();
    }

    fn observe(&mut self, event: &DragEvent) {
        match event {
            DragEvent::Enter(status) => *self.slot(*status) = true,
            DragEvent::Leave(status) => *self.slot(*status) = false,
            DragEvent::Drop { .. } | DragEvent::End => self.clear(),
            DragEvent::Start { .. } => {}
        }
    }
}

/// Receiver of the protocol's single side effect
pub trait MoveSink {
    fn move_task(&mut self, task_id: &TaskId, status: TaskStatus);
}

impl MoveSink for TaskStore {
    fn move_task(&mut self, task_id: &TaskId, status: TaskStatus) {
        // Unknown ids were already logged by task_ops; the drop is a no-op.
        let _ = task_ops::move_task(self, task_id, status);
    }
}

/// Drives one board's drag gestures and forwards moves to a sink
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    highlight: DropHighlight,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn highlight(&self) -> &DropHighlight {
        &self.highlight
    }

    /// Feed one event. Returns the effect that was applied to `sink`.
    pub fn handle(&mut self, sink: &mut impl MoveSink, event: DragEvent) -> DragEffect {
        let (next, effect) = transition(&self.state, &event);
        // Hover only highlights while something is being dragged.
        if self.state.is_active() || matches!(event, DragEvent::Drop { .. } | DragEvent::End) {
            self.highlight.observe(&event);
        }
        tracing::trace!(from = ?self.state, to = ?next, "drag transition");
        self.state = next;
        if let DragEffect::Move { task_id, status } = &effect {
            tracing::debug!(id = %task_id, %status, "drop moves task");
            sink.move_task(task_id, *status);
        }
        effect
    }

    /// Convenience for a complete drop: `Drop` followed by `End`.
    pub fn drop_on(&mut self, sink: &mut impl MoveSink, target: Option<TaskStatus>) -> DragEffect {
        let payload = match &self.state {
            DragState::Dragging { task_id } => task_id.to_string(),
            _ => String::new(),
        };
        let effect = self.handle(sink, DragEvent::Drop { payload, target });
        self.handle(sink, DragEvent::End);
        effect
    }
}
