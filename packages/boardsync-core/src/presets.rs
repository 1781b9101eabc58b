/// Ready-made boards for the "load demo" and "clear" commands.
use crate::types::{BoardState, IdentifiedTask, Task};

fn demo_task(id: &str, title: &str, email: &str, description: &str) -> IdentifiedTask {
    IdentifiedTask::new(
        id,
        Task {
            title: title.to_string(),
            email_address: email.to_string(),
            description: description.to_string(),
        },
    )
}

/// A small sample board with fixed ids.
pub fn demo_board() -> BoardState {
    BoardState {
        todo: vec![
            demo_task(
                "3f0c6f52-6a8e-4c55-9d3c-2f1b8a0e7d11",
                "Write release notes",
                "docs@example.com",
                "Summarize the changes since the last tag.",
            ),
            demo_task(
                "a2d94b1e-0f37-4e2a-8c5b-71e6d9f40c22",
                "Triage new issues",
                "support@example.com",
                "Label and assign everything opened this week.",
            ),
            demo_task(
                "c7e81d03-5b2f-4a96-b0d4-9a3e2c6f8b33",
                "Plan the retro",
                "lead@example.com",
                "Book a room and collect topics from the team.",
            ),
        ],
        in_progress: vec![demo_task(
            "e5b27a4c-8d19-4f63-a7e0-4c1f3b9d2a44",
            "Fix flaky sync test",
            "dev@example.com",
            "Two tabs occasionally disagree after a clear.",
        )],
        done: vec![
            demo_task(
                "18f4c9b2-2e6d-4b07-9f3a-d5a0e8c71b55",
                "Set up CI",
                "ops@example.com",
                "Build and test on every push.",
            ),
            demo_task(
                "6b3d0e8f-7a41-4c2e-b95d-0e2f7a3c4d66",
                "Kickoff meeting",
                "lead@example.com",
                "Agree on scope and the first milestone.",
            ),
        ],
    }
}
