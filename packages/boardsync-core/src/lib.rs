//! Board state for a three-column task board shared by several contexts
//! (processes, windows) through one store.
//!
//! [`manager::BoardManager`] owns the board and is the only way to change it;
//! [`storage::BoardStore`] is the port it persists through and hears other
//! contexts' writes from.

pub mod avatar;
pub mod codec;
pub mod config;
pub mod drag;
pub mod form;
pub mod manager;
pub mod presets;
pub mod reducer;
pub mod storage;
pub mod types;
pub mod watcher;

pub use manager::{BoardFault, BoardManager};
pub use reducer::{BoardStateAction, MoveFrom, MoveTo};
pub use storage::{BoardStore, StoreError, StoreSubscription};
pub use types::{BoardState, Column, IdentifiedTask, Task};
