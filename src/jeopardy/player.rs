use super::ai::AiDifficulty;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Player {
    pub user_name: String,
    pub color: String,
    pub score: i32,
    pub ai_difficulty: Option<AiDifficulty>,
    #[serde(skip)]
    pub device_id: Option<String>,
}

impl Player {
    pub fn human(user_name: String, color: String, device_id: Option<String>) -> Self {
        Self {
            user_name,
            color,
            score: 0,
            ai_difficulty: None,
            device_id,
        }
    }

    pub fn cpu(user_name: String, color: String, difficulty: AiDifficulty) -> Self {
        Self {
            user_name,
            color,
            score: 0,
            ai_difficulty: Some(difficulty),
            device_id: None,
        }
    }

    pub fn is_ai(&self) -> bool {
        self.ai_difficulty.is_some()
    }
}
