use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column capacity used when no explicit limit is configured.
pub const DEFAULT_MAX_TASKS_PER_COLUMN: usize = 100;

/// Task fields as entered by the user. The id is assigned by the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    pub title: String,
    pub email_address: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdentifiedTask {
    pub id: String,
    pub title: String,
    pub email_address: String,
    pub description: String,
}

impl IdentifiedTask {
    pub fn new(id: impl Into<String>, task: Task) -> Self {
        Self {
            id: id.into(),
            title: task.title,
            email_address: task.email_address,
            description: task.description,
        }
    }
}

/// One of the three fixed board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Todo,
    InProgress,
    Done,
}

impl Column {
    /// Display order on the board.
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Done];

    /// Key used in the persisted representation.
    pub fn key(self) -> &'static str {
        match self {
            Column::Todo => "todo",
            Column::InProgress => "inProgress",
            Column::Done => "done",
        }
    }

    /// Heading shown above the column.
    pub fn title(self) -> &'static str {
        match self {
            Column::Todo => "To do",
            Column::InProgress => "In progress",
            Column::Done => "Done",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown column: {0} (expected todo, inProgress or done)")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
    type Err = UnknownColumn;

    /// Accepts the persisted key plus the kebab/snake spellings used on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "todo" => Ok(Column::Todo),
            "inProgress" | "in-progress" | "in_progress" | "inprogress" => Ok(Column::InProgress),
            "done" => Ok(Column::Done),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

/// The full board: three ordered task lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BoardState {
    pub todo: Vec<IdentifiedTask>,
    pub in_progress: Vec<IdentifiedTask>,
    pub done: Vec<IdentifiedTask>,
}

impl BoardState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn column(&self, column: Column) -> &[IdentifiedTask] {
        match column {
            Column::Todo => &self.todo,
            Column::InProgress => &self.in_progress,
            Column::Done => &self.done,
        }
    }

    pub fn column_mut(&mut self, column: Column) -> &mut Vec<IdentifiedTask> {
        match column {
            Column::Todo => &mut self.todo,
            Column::InProgress => &mut self.in_progress,
            Column::Done => &mut self.done,
        }
    }

    /// Check whether `id` is used anywhere on the board.
    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Locate a task by id, returning its column and position.
    pub fn find(&self, id: &str) -> Option<(Column, usize)> {
        Column::ALL.into_iter().find_map(|column| {
            self.column(column)
                .iter()
                .position(|t| t.id == id)
                .map(|index| (column, index))
        })
    }

    pub fn task_count(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }

    /// Whether `column` has reached `limit` tasks.
    pub fn is_full(&self, column: Column, limit: usize) -> bool {
        self.column(column).len() >= limit
    }

    /// Ids of one column, in order.
    pub fn ids(&self, column: Column) -> Vec<&str> {
        self.column(column).iter().map(|t| t.id.as_str()).collect()
    }
}
