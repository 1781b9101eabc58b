/// Persisted board representation.
///
/// A board is stored as one JSON object with exactly the keys `todo`,
/// `inProgress` and `done`, each an array of `{id, title, emailAddress,
/// description}` objects. No version field.
use crate::types::BoardState;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed board data: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn encode_board(board: &BoardState) -> Result<String, CodecError> {
    Ok(serde_json::to_string(board)?)
}

/// Parse a stored board, rejecting anything that is not exactly the board shape.
pub fn decode_board(raw: &str) -> Result<BoardState, CodecError> {
    Ok(serde_json::from_str(raw)?)
}

/// Board for a raw store value: absent or empty means a fresh, empty board.
pub fn hydrate(raw: Option<&str>) -> Result<BoardState, CodecError> {
    match raw {
        None => Ok(BoardState::empty()),
        Some(s) if s.trim().is_empty() => Ok(BoardState::empty()),
        Some(s) => decode_board(s),
    }
}
