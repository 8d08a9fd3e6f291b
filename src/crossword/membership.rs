use crate::puzzle::{Col, Row};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

#[derive(Clone, Debug)]
pub struct Membership {
    pub user_name: String,
    pub color: String,
    pub cursor_row: Row,
    pub cursor_col: Col,
    pub direction: Direction,
    pub is_bot: bool,
}

impl Membership {
    pub fn human(user_name: String, color: String) -> Self {
        Self {
            user_name,
            color,
            cursor_row: 0,
            cursor_col: 0,
            direction: Direction::Across,
            is_bot: false,
        }
    }

    pub fn bot(user_name: String, color: String) -> Self {
        Self {
            is_bot: true,
            ..Self::human(user_name, color)
        }
    }
}
