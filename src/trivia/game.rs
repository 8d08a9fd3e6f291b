use serde::{Deserialize, Serialize};

/// A single clue on a jeopardy/double-jeopardy board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Clue {
    pub category: String,
    pub row: u8, // 1..=5
    pub value: i32,
    pub clue: String,
    pub answer: String,
    pub daily_double: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    pub categories: Vec<String>,
    pub clues: Vec<Clue>,
}

impl Round {
    pub fn clue_at(&self, category: &str, row: u8) -> Option<&Clue> {
        self.clues
            .iter()
            .find(|c| c.category == category && c.row == row)
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, u8)> {
        self.clues.iter().map(|c| (c.category.as_str(), c.row))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalClue {
    pub category: String,
    pub clue: String,
    pub answer: String,
}

/// Immutable trivia game content sourced from the persistence façade.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub game_id: String,
    pub show_number: u32,
    pub air_date: String,
    pub season: u32,
    pub jeopardy_round: Round,
    pub double_jeopardy_round: Round,
    pub final_jeopardy: Option<FinalClue>,
}
