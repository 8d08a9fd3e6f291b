use super::phase::{Phase, RoundKind};
use super::player::Player;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub socket_id: crate::SocketId,
    pub user_name: String,
    pub color: String,
    pub score: i32,
    pub is_ai: bool,
}

impl PlayerView {
    pub fn of(socket_id: crate::SocketId, player: &Player) -> Self {
        Self {
            socket_id,
            user_name: player.user_name.clone(),
            color: player.color.clone(),
            score: player.score,
            is_ai: player.is_ai(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RoomState {
    pub room_id: String,
    pub game_id: String,
    pub phase: Phase,
    pub round: RoundKind,
    pub categories: Vec<String>,
    pub players: Vec<PlayerView>,
    pub host_socket: crate::SocketId,
    pub controlling_player: crate::SocketId,
    pub used_clues: Vec<(String, u8)>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerJoined {
    pub player: PlayerView,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerLeft {
    pub socket_id: crate::SocketId,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoundChange {
    pub round: RoundKind,
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PhaseChange {
    pub phase: Phase,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClueSelected {
    pub category: String,
    pub row: u8,
    pub value: i32,
    pub clue: String,
    pub daily_double: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct DailyDouble {
    pub socket_id: crate::SocketId,
    pub min_wager: i32,
    pub max_wager: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct BuzzerResult {
    pub socket_id: crate::SocketId,
}

#[derive(Clone, Debug, Serialize)]
pub struct BuzzerExpired {
    pub correct_answer: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnswerResult {
    pub socket_id: crate::SocketId,
    pub answer: String,
    pub correct: bool,
    pub score_change: i32,
    pub correct_answer: String,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PlayerScore {
    pub socket_id: crate::SocketId,
    pub score: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScoresUpdate {
    pub scores: Vec<PlayerScore>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FinalCategory {
    pub category: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct FinalClue {
    pub clue: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct FinalWagerSubmitted {
    pub socket_id: crate::SocketId,
}

#[derive(Clone, Debug, Serialize)]
pub struct FinalAnswerSubmitted {
    pub socket_id: crate::SocketId,
}

#[derive(Clone, Debug, Serialize)]
pub struct FinalJeopardyReveal {
    pub socket_id: crate::SocketId,
    pub answer: String,
    pub correct: bool,
    pub wager: i32,
    pub score_change: i32,
    pub new_score: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameOver {
    pub winner_socket: Option<crate::SocketId>,
    pub final_scores: Vec<PlayerScore>,
}
