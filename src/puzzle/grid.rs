use serde::{Deserialize, Serialize};

/// A single grid position: either playable (carrying its single-letter
/// correct answer) or blocked (the `.` squares of a `.puz`-style layout).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Cell {
    Letter(String),
    Blocked,
}
