use crate::puzzle::{Col, Row};
use serde::Deserialize;

use super::membership::Direction;

/// Every inbound crossword intent. Deserialized from the `{type, payload}`
/// envelope by the router before dispatch to a room's inbound channel.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Inbound {
    JoinPuzzle { date: String, user_name: String },
    LeavePuzzle,
    CellUpdate { row: Row, col: Col, letter: String },
    CursorMove { row: Row, col: Col, direction: Direction },
    HintVote,
    HintAvailable,
    PausePuzzle,
    ResumePuzzle,
    ClearPuzzle,
    AddAi { difficulty: usize },
    RemoveAi { bot_id: crate::SocketId },
    StartAi { bot_id: crate::SocketId },
    GetAiBots,
}
