use serde::Deserialize;

/// Inbound trivia-room intents. `create-room`/`join-room`/`random-game`
/// carry a game-content lookup that only the hosting layer can perform
/// (it owns the room registry), so those variants are parsed here but
/// dispatched by the hosting bridge rather than by [`super::room::Room`].
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Inbound {
    CreateRoom {
        user_name: String,
    },
    JoinRoom {
        room_id: String,
        user_name: String,
    },
    LeaveRoom,
    StartGame,
    ChangeGame,
    RandomGame,
    SelectClue {
        category: String,
        row: u8,
    },
    BuzzIn,
    SubmitAnswer {
        answer: String,
    },
    DailyDoubleWager {
        wager: i32,
    },
    FinalJeopardyWager {
        wager: i32,
    },
    FinalJeopardyAnswer {
        answer: String,
    },
    AddCpu {
        difficulty: String,
    },
    RemoveCpu {
        bot_id: crate::SocketId,
    },
}
