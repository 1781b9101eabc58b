/// Board configuration shared by every host of the core.
use serde::{Deserialize, Serialize};

use crate::types::DEFAULT_MAX_TASKS_PER_COLUMN;

/// Store key used when none is configured.
pub const DEFAULT_STORE_KEY: &str = "BOARD_STATE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(default = "default_store_key")]
    pub store_key: String,
    /// Directory shared by every context of this board. Hosts pick a default.
    #[serde(default)]
    pub store_dir: Option<String>,
    #[serde(default = "default_max_tasks")]
    pub max_tasks_per_column: usize,
}

fn default_store_key() -> String {
    DEFAULT_STORE_KEY.to_string()
}

fn default_max_tasks() -> usize {
    DEFAULT_MAX_TASKS_PER_COLUMN
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            store_key: default_store_key(),
            store_dir: None,
            max_tasks_per_column: default_max_tasks(),
        }
    }
}
