use rand::Rng;
use serde::{Deserialize, Serialize};

/// CPU opponent difficulty, carrying a `{buzzSpeed, accuracy, skipChance}`
/// profile (spec.md's fixed AI difficulty table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
}

impl AiDifficulty {
    pub fn profile(self) -> (f64, f64, f64) {
        match self {
            AiDifficulty::Easy => crate::AI_EASY,
            AiDifficulty::Medium => crate::AI_MEDIUM,
            AiDifficulty::Hard => crate::AI_HARD,
        }
    }

    pub fn buzz_speed(self) -> f64 {
        self.profile().0
    }

    pub fn accuracy(self) -> f64 {
        self.profile().1
    }

    pub fn skip_chance(self) -> f64 {
        self.profile().2
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "easy" => Some(AiDifficulty::Easy),
            "medium" => Some(AiDifficulty::Medium),
            "hard" => Some(AiDifficulty::Hard),
            _ => None,
        }
    }
}

/// `None` means this CPU rolled its skip chance and will not buzz this window.
pub fn buzz_delay_ms(difficulty: AiDifficulty, rng: &mut impl Rng) -> Option<u64> {
    if rng.random_bool(difficulty.skip_chance()) {
        return None;
    }
    let base = (2.0 - 1.5 * difficulty.buzz_speed()).max(1.0);
    let jitter = rng.random_range(0.0..2.0);
    Some(((base + jitter) * 1000.0).round() as u64)
}

pub fn answers_correctly(difficulty: AiDifficulty, rng: &mut impl Rng) -> bool {
    rng.random_bool(difficulty.accuracy())
}

/// Daily-double / final wager scaled by accuracy with noise, clamped by the
/// caller to the legal wager range.
pub fn wager(difficulty: AiDifficulty, ceiling: i32, rng: &mut impl Rng) -> i32 {
    let noise = rng.random_range(0.8..1.2);
    ((ceiling as f64) * difficulty.accuracy() * noise).round() as i32
}

pub fn pick_clue<'a>(
    unused: &'a [(String, u8)],
    rng: &mut impl Rng,
) -> Option<&'a (String, u8)> {
    if unused.is_empty() {
        return None;
    }
    unused.get(rng.random_range(0..unused.len()))
}
