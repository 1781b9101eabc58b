/// Drag-and-drop adapter.
///
/// The drag library reports where a card started and where it was dropped;
/// this turns that report into a `MoveTask` action, or nothing.
use serde::{Deserialize, Serialize};

use crate::reducer::{BoardStateAction, MoveFrom, MoveTo};
use crate::types::{BoardState, Column};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    pub column: Column,
    pub index: usize,
}

/// A completed drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEnd {
    /// Id of the dragged task.
    pub task_id: String,
    pub source: DragLocation,
    /// `None` when the drag was cancelled or dropped outside a column.
    pub destination: Option<DragLocation>,
}

impl DragEnd {
    /// The move to dispatch for this drag, if any. Dropping into another
    /// column that already holds `limit` tasks is refused.
    pub fn to_action(&self, state: &BoardState, limit: usize) -> Option<BoardStateAction> {
        let destination = self.destination?;

        if destination.column != self.source.column && state.is_full(destination.column, limit) {
            log::debug!(
                "[boardsync.drag.drop] Column {} is full, dropping move of {}",
                destination.column,
                self.task_id
            );
            return None;
        }

        Some(BoardStateAction::MoveTask {
            from: MoveFrom {
                column: self.source.column,
                id: self.task_id.clone(),
            },
            to: MoveTo {
                column: destination.column,
                index: destination.index,
            },
        })
    }
}
