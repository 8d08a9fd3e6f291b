use crate::puzzle::{Col, Row};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Serialize)]
pub struct MemberView {
    pub socket_id: crate::SocketId,
    pub user_name: String,
    pub color: String,
    pub cursor_row: Row,
    pub cursor_col: Col,
    pub direction: super::membership::Direction,
    pub is_bot: bool,
}

/// Snapshot sent to a joiner; also rebroadcast implicitly via the finer
/// grained events below as state changes.
#[derive(Clone, Debug, Serialize)]
pub struct RoomState {
    pub date: String,
    pub members: Vec<MemberView>,
    pub user_grid: HashMap<String, String>,
    pub cell_fillers: HashMap<String, String>,
    pub points: HashMap<String, i32>,
    pub guesses: HashMap<String, GuessView>,
    pub accumulated_ms: i64,
    pub paused: bool,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct GuessView {
    pub total: u32,
    pub incorrect: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct UserJoined {
    pub socket_id: crate::SocketId,
    pub user_name: String,
    pub color: String,
    pub is_bot: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct UserLeft {
    pub socket_id: crate::SocketId,
}

#[derive(Clone, Debug, Serialize)]
pub struct CellUpdated {
    pub row: Row,
    pub col: Col,
    pub letter: String,
    pub filler: String,
    pub user_name: String,
    pub delta: i32,
    pub word_bonus: i32,
    pub last_square_bonus: i32,
    pub guess_correct: bool,
    pub fire_event: Option<FireEventKind>,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FireEventKind {
    Started,
    Extended,
    Broken,
}

#[derive(Clone, Debug, Serialize)]
pub struct CursorMoved {
    pub socket_id: crate::SocketId,
    pub row: Row,
    pub col: Col,
    pub direction: super::membership::Direction,
}

#[derive(Clone, Debug, Serialize)]
pub struct FireUpdate {
    pub socket_id: crate::SocketId,
    #[serde(rename = "type")]
    pub kind: FireEventKind,
    pub remaining_ms: i64,
    pub multiplier: f32,
    pub fire_cells: Vec<(Row, Col)>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FireExpired {
    pub socket_id: crate::SocketId,
}

#[derive(Clone, Debug, Serialize)]
pub struct HintVoteUpdate {
    pub votes: usize,
    pub total: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct HintReveal {
    pub cells: Vec<(Row, Col)>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PuzzleCleared;

#[derive(Clone, Debug, Serialize)]
pub struct TimerSync {
    pub accumulated_ms: i64,
    pub running: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PuzzleProgress {
    pub date: String,
    pub filled_cells: usize,
    pub total_cells: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoomCount {
    pub date: String,
    pub humans: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct AiBotEntry {
    pub bot_id: crate::SocketId,
    pub user_name: String,
    pub difficulty: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct AiBotList {
    pub bots: Vec<AiBotEntry>,
}
