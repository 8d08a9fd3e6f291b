use serde::Serialize;

/// One node of the jeopardy room's state machine (spec §4.4's phase table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Lobby,
    SelectingClue,
    ReadingClue,
    BuzzerOpen,
    PlayerAnswering,
    ShowingResult,
    DailyDoubleWager,
    DailyDoubleAnswer,
    FinalCategory,
    FinalWager,
    FinalClue,
    FinalResults,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundKind {
    Jeopardy,
    DoubleJeopardy,
    FinalJeopardy,
}

impl RoundKind {
    pub fn min_wager_floor(self) -> i32 {
        match self {
            RoundKind::Jeopardy => 1000,
            RoundKind::DoubleJeopardy => 2000,
            RoundKind::FinalJeopardy => 0,
        }
    }

    pub fn next(self) -> Option<RoundKind> {
        match self {
            RoundKind::Jeopardy => Some(RoundKind::DoubleJeopardy),
            RoundKind::DoubleJeopardy => Some(RoundKind::FinalJeopardy),
            RoundKind::FinalJeopardy => None,
        }
    }
}
