/// Pure board transitions.
///
/// `reduce` is the only place a `BoardState` changes shape. Persistence and
/// cross-context sync are layered on top by the manager; nothing here touches
/// a store.
use serde::{Deserialize, Serialize};

use crate::types::{BoardState, Column, IdentifiedTask, Task};

/// Where a dragged task currently lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFrom {
    pub column: Column,
    pub id: String,
}

/// Where a dragged task should land. `index` counts positions in the
/// destination list after the task has been taken out of its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTo {
    pub column: Column,
    pub index: usize,
}

/// The complete mutation surface of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BoardStateAction {
    AddTask { column: Column, task: Task },
    MoveTask { from: MoveFrom, to: MoveTo },
    /// Replace the board with state received from another context. Never persisted.
    Sync(BoardState),
    /// Replace the board with locally chosen state. Persisted.
    Load(BoardState),
}

impl BoardStateAction {
    /// Whether the resulting state must be written back to the store.
    pub fn persists(&self) -> bool {
        !matches!(self, BoardStateAction::Sync(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BoardStateAction::AddTask { .. } => "add_task",
            BoardStateAction::MoveTask { .. } => "move_task",
            BoardStateAction::Sync(_) => "sync",
            BoardStateAction::Load(_) => "load",
        }
    }
}

/// Source of fresh task ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Compute the next board state.
pub fn reduce(
    mut state: BoardState,
    action: BoardStateAction,
    ids: &mut dyn IdGenerator,
) -> BoardState {
    match action {
        BoardStateAction::AddTask { column, task } => {
            let id = fresh_id(&state, ids);
            state
                .column_mut(column)
                .insert(0, IdentifiedTask::new(id, task));
            state
        }
        BoardStateAction::MoveTask { from, to } => move_task(state, &from, &to),
        BoardStateAction::Sync(board) | BoardStateAction::Load(board) => board,
    }
}

/// Draws from `ids` before falling back to a random UUID.
const MAX_ID_ATTEMPTS: usize = 8;

/// Draw ids until one is not already on the board.
fn fresh_id(state: &BoardState, ids: &mut dyn IdGenerator) -> String {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = ids.next_id();
        if !id.is_empty() && !state.contains_id(&id) {
            return id;
        }
        log::warn!("[boardsync.reducer.id] Generated id {:?} collides, drawing again", id);
    }

    log::error!(
        "[boardsync.reducer.id] No fresh id after {} draws, using a random one",
        MAX_ID_ATTEMPTS
    );
    loop {
        let id = UuidGenerator.next_id();
        if !state.contains_id(&id) {
            return id;
        }
    }
}

fn move_task(mut state: BoardState, from: &MoveFrom, to: &MoveTo) -> BoardState {
    let Some(source_index) = state.column(from.column).iter().position(|t| t.id == from.id)
    else {
        log::debug!(
            "[boardsync.reducer.move] Task {} not in {}, ignoring move",
            from.id,
            from.column
        );
        return state;
    };

    let task = state.column_mut(from.column).remove(source_index);
    let destination = state.column_mut(to.column);
    let index = to.index.min(destination.len());
    destination.insert(index, task);
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic ids: "id-1", "id-2", ...
    #[derive(Default)]
    pub struct SeqIds(pub u32);

    impl IdGenerator for SeqIds {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("id-{}", self.0)
        }
    }

    fn task(title: &str) -> Task {
        Task {
            title: title.to_string(),
            email_address: "someone@example.com".to_string(),
            description: format!("About {}", title),
        }
    }

    fn identified(id: &str) -> IdentifiedTask {
        IdentifiedTask::new(id, task(id))
    }

    /// todo = [X, Y, Z], inProgress = [P], done = [D1, D2]
    fn sample_board() -> BoardState {
        BoardState {
            todo: vec![identified("X"), identified("Y"), identified("Z")],
            in_progress: vec![identified("P")],
            done: vec![identified("D1"), identified("D2")],
        }
    }

    fn move_action(from: Column, id: &str, to: Column, index: usize) -> BoardStateAction {
        BoardStateAction::MoveTask {
            from: MoveFrom {
                column: from,
                id: id.to_string(),
            },
            to: MoveTo { column: to, index },
        }
    }

    #[test]
    fn test_add_task_on_empty_board() {
        let mut ids = SeqIds::default();
        let state = reduce(
            BoardState::empty(),
            BoardStateAction::AddTask {
                column: Column::Todo,
                task: Task {
                    title: "T".to_string(),
                    email_address: "e@x.com".to_string(),
                    description: "D".to_string(),
                },
            },
            &mut ids,
        );

        assert_eq!(state.todo.len(), 1);
        assert_eq!(state.todo[0].title, "T");
        assert_eq!(state.todo[0].email_address, "e@x.com");
        assert_eq!(state.todo[0].description, "D");
        assert!(!state.todo[0].id.is_empty());
        assert!(state.in_progress.is_empty());
        assert!(state.done.is_empty());
    }

    #[test]
    fn test_add_task_prepends() {
        let mut ids = SeqIds::default();
        let before = sample_board();
        let state = reduce(
            before.clone(),
            BoardStateAction::AddTask {
                column: Column::InProgress,
                task: task("new"),
            },
            &mut ids,
        );

        assert_eq!(state.in_progress.len(), before.in_progress.len() + 1);
        assert_eq!(state.in_progress[0].title, "new");
        assert_eq!(state.ids(Column::InProgress)[1..], ["P"]);
        assert_eq!(state.todo, before.todo);
        assert_eq!(state.done, before.done);
    }

    #[test]
    fn test_add_task_with_uuid_ids() {
        let mut ids = UuidGenerator;
        let mut state = BoardState::empty();
        for i in 0..20 {
            state = reduce(
                state,
                BoardStateAction::AddTask {
                    column: Column::ALL[i % 3],
                    task: task(&format!("t{}", i)),
                },
                &mut ids,
            );
        }

        let mut all: Vec<_> = Column::ALL
            .iter()
            .flat_map(|c| state.ids(*c))
            .collect();
        assert_eq!(all.len(), 20);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn test_add_task_skips_colliding_id() {
        struct Repeating(Vec<&'static str>);
        impl IdGenerator for Repeating {
            fn next_id(&mut self) -> String {
                self.0.remove(0).to_string()
            }
        }

        let mut ids = Repeating(vec!["X", "", "fresh"]);
        let state = reduce(
            sample_board(),
            BoardStateAction::AddTask {
                column: Column::Done,
                task: task("dup"),
            },
            &mut ids,
        );

        assert_eq!(state.done[0].id, "fresh");
    }

    #[test]
    fn test_add_task_with_stuck_generator_still_gets_unique_id() {
        struct Stuck;
        impl IdGenerator for Stuck {
            fn next_id(&mut self) -> String {
                "X".to_string()
            }
        }

        let before = sample_board();
        let state = reduce(
            before.clone(),
            BoardStateAction::AddTask {
                column: Column::Todo,
                task: task("stuck"),
            },
            &mut Stuck,
        );

        let id = &state.todo[0].id;
        assert!(!id.is_empty());
        assert!(!before.contains_id(id));
        assert_eq!(state.task_count(), before.task_count() + 1);
    }

    #[test]
    fn test_move_to_top() {
        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "Y", Column::Todo, 0),
            &mut SeqIds::default(),
        );
        assert_eq!(state.ids(Column::Todo), ["Y", "X", "Z"]);
    }

    #[test]
    fn test_move_to_bottom() {
        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "Y", Column::Todo, 2),
            &mut SeqIds::default(),
        );
        assert_eq!(state.ids(Column::Todo), ["X", "Z", "Y"]);
    }

    #[test]
    fn test_move_to_middle() {
        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "X", Column::Todo, 1),
            &mut SeqIds::default(),
        );
        assert_eq!(state.ids(Column::Todo), ["Y", "X", "Z"]);
    }

    #[test]
    fn test_move_same_position_is_stable() {
        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "Z", Column::Todo, 2),
            &mut SeqIds::default(),
        );
        assert_eq!(state, sample_board());
    }

    #[test]
    fn test_move_between_columns() {
        let before = sample_board();
        let state = reduce(
            before.clone(),
            move_action(Column::Todo, "X", Column::Done, 0),
            &mut SeqIds::default(),
        );

        assert_eq!(state.ids(Column::Todo), ["Y", "Z"]);
        assert_eq!(state.ids(Column::Done), ["X", "D1", "D2"]);
        assert_eq!(state.in_progress, before.in_progress);
        assert_eq!(state.task_count(), before.task_count());
    }

    #[test]
    fn test_move_between_columns_at_index() {
        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "Z", Column::Done, 1),
            &mut SeqIds::default(),
        );
        assert_eq!(state.ids(Column::Done), ["D1", "Z", "D2"]);
    }

    #[test]
    fn test_move_leaves_empty_column() {
        let state = reduce(
            sample_board(),
            move_action(Column::InProgress, "P", Column::Done, 0),
            &mut SeqIds::default(),
        );
        assert!(state.in_progress.is_empty());
        assert_eq!(state.done.len(), 3);
    }

    #[test]
    fn test_move_index_past_end_appends() {
        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "X", Column::InProgress, 99),
            &mut SeqIds::default(),
        );
        assert_eq!(state.ids(Column::InProgress), ["P", "X"]);

        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "X", Column::Todo, 99),
            &mut SeqIds::default(),
        );
        assert_eq!(state.ids(Column::Todo), ["Y", "Z", "X"]);
    }

    #[test]
    fn test_move_unknown_id_is_noop() {
        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "xxxx", Column::Done, 0),
            &mut SeqIds::default(),
        );
        assert_eq!(state, sample_board());
    }

    #[test]
    fn test_move_id_in_other_column_is_noop() {
        // P exists, but not in the column the drag claims it came from.
        let state = reduce(
            sample_board(),
            move_action(Column::Todo, "P", Column::Done, 0),
            &mut SeqIds::default(),
        );
        assert_eq!(state, sample_board());
    }

    #[test]
    fn test_move_preserves_total_count() {
        let before = sample_board();
        let mut state = before.clone();
        let moves = [
            (Column::Todo, "X", Column::Done, 1),
            (Column::Done, "D2", Column::Todo, 0),
            (Column::InProgress, "P", Column::InProgress, 5),
            (Column::Done, "missing", Column::Todo, 0),
            (Column::Todo, "Z", Column::InProgress, 0),
        ];
        for (from, id, to, index) in moves {
            state = reduce(state, move_action(from, id, to, index), &mut SeqIds::default());
            assert_eq!(state.task_count(), before.task_count());
        }
    }

    #[test]
    fn test_sync_and_load_replace_board() {
        let replacement = sample_board();
        let mut ids = SeqIds::default();

        let synced = reduce(
            BoardState::empty(),
            BoardStateAction::Sync(replacement.clone()),
            &mut ids,
        );
        assert_eq!(synced, replacement);

        let loaded = reduce(synced, BoardStateAction::Load(BoardState::empty()), &mut ids);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_only_sync_skips_persistence() {
        assert!(!BoardStateAction::Sync(BoardState::empty()).persists());
        assert!(BoardStateAction::Load(BoardState::empty()).persists());
        assert!(move_action(Column::Todo, "a", Column::Done, 0).persists());
        assert!(BoardStateAction::AddTask {
            column: Column::Todo,
            task: task("x"),
        }
        .persists());
    }
}
