/// Plain-text board output.
use boardsync_core::avatar;
use boardsync_core::types::{BoardState, Column, IdentifiedTask};
use std::fmt::Write;

/// Characters of the id shown next to each task.
const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn render_task(out: &mut String, task: &IdentifiedTask, avatars: bool) {
    let _ = writeln!(
        out,
        "  [{}] {}  <{}>",
        short_id(&task.id),
        task.title,
        task.email_address.trim()
    );
    for line in task.description.lines() {
        let _ = writeln!(out, "      {}", line);
    }
    if avatars {
        let _ = writeln!(out, "      {}", avatar::avatar_url(&task.email_address));
    }
}

/// Render all three columns in board order.
pub fn render_board(state: &BoardState, avatars: bool) -> String {
    let mut out = String::new();
    for column in Column::ALL {
        let tasks = state.column(column);
        let _ = writeln!(out, "{} ({})", column.title(), tasks.len());
        if tasks.is_empty() {
            let _ = writeln!(out, "  -");
        }
        for task in tasks {
            render_task(&mut out, task, avatars);
        }
        out.push('\n');
    }
    out
}
