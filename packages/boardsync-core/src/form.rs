/// Task intake: turns user-entered fields into an `AddTask` action.
use serde::{Deserialize, Serialize};

use crate::reducer::BoardStateAction;
use crate::types::{BoardState, Column, Task};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Title is required")]
    TitleMissing,

    #[error("Email address is required")]
    EmailMissing,

    #[error("Email address {0:?} is not valid")]
    EmailInvalid(String),

    #[error("Description is required")]
    DescriptionMissing,

    #[error("Column {column} is full ({limit} tasks)")]
    ColumnFull { column: Column, limit: usize },
}

/// Unvalidated form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub email_address: String,
    pub description: String,
}

impl TaskDraft {
    /// Check required fields. Values are kept as typed; only emptiness is judged on the trimmed text.
    pub fn validate(&self) -> Result<Task, TaskError> {
        if self.title.trim().is_empty() {
            return Err(TaskError::TitleMissing);
        }
        let email = self.email_address.trim();
        if email.is_empty() {
            return Err(TaskError::EmailMissing);
        }
        if !looks_like_email(email) {
            return Err(TaskError::EmailInvalid(email.to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(TaskError::DescriptionMissing);
        }

        Ok(Task {
            title: self.title.clone(),
            email_address: self.email_address.clone(),
            description: self.description.clone(),
        })
    }
}

/// `local@domain`, no whitespace. Deliberately loose: the address is only an avatar key.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Build the action that adds `draft` to the top of `column`.
pub fn add_task_action(
    state: &BoardState,
    column: Column,
    draft: &TaskDraft,
    limit: usize,
) -> Result<BoardStateAction, TaskError> {
    if state.is_full(column, limit) {
        return Err(TaskError::ColumnFull { column, limit });
    }
    let task = draft.validate()?;
    Ok(BoardStateAction::AddTask { column, task })
}
