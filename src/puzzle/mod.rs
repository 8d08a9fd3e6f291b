mod dimensions;
mod grid;

pub mod cellmap;

pub use dimensions::Dimensions;
pub use grid::Cell;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Row = usize;
pub type Col = usize;

/// A single across or down entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Clue {
    pub number: u32,
    pub row: Row,
    pub col: Col,
    pub clue: String,
    pub answer: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Clues {
    pub across: Vec<Clue>,
    pub down: Vec<Clue>,
}

/// Immutable crossword content, keyed externally by `date`.
///
/// Invariant: every non-blocked cell has a defined correct answer —
/// `rebus.get(&(r, c))` if present, else `grid[r][c]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Puzzle {
    pub date: String,
    pub dimensions: Dimensions,
    pub grid: Vec<Vec<Cell>>,
    #[serde(with = "cellmap")]
    pub rebus: HashMap<(Row, Col), String>,
    pub clues: Clues,
}

impl Puzzle {
    pub fn is_blocked(&self, r: Row, c: Col) -> bool {
        matches!(self.grid.get(r).and_then(|row| row.get(c)), Some(Cell::Blocked) | None)
    }

    /// The authoritative correct content for a cell: the rebus string when
    /// present, else the single letter from the grid.
    pub fn correct_answer(&self, r: Row, c: Col) -> Option<&str> {
        if self.is_blocked(r, c) {
            return None;
        }
        if let Some(rebus) = self.rebus.get(&(r, c)) {
            return Some(rebus.as_str());
        }
        match self.grid.get(r).and_then(|row| row.get(c)) {
            Some(Cell::Letter(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// All non-blocked `(row, col)` coordinates in reading order.
    pub fn cells(&self) -> impl Iterator<Item = (Row, Col)> + '_ {
        (0..self.dimensions.rows).flat_map(move |r| {
            (0..self.dimensions.cols).filter_map(move |c| (!self.is_blocked(r, c)).then_some((r, c)))
        })
    }

    /// The cell coordinates spanned by a clue, inferred from its answer
    /// length and the grid's block layout (walking right for across,
    /// down for down until a blocked cell or the grid edge).
    pub fn word_cells(&self, clue: &Clue, across: bool) -> Vec<(Row, Col)> {
        let mut cells = Vec::new();
        let (mut r, mut c) = (clue.row, clue.col);
        loop {
            if r >= self.dimensions.rows || c >= self.dimensions.cols || self.is_blocked(r, c) {
                break;
            }
            cells.push((r, c));
            if cells.len() >= clue.answer.chars().count() {
                break;
            }
            if across {
                c += 1;
            } else {
                r += 1;
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Puzzle {
        Puzzle {
            date: "2024-01-01".into(),
            dimensions: Dimensions { rows: 1, cols: 3 },
            grid: vec![vec![
                Cell::Letter("C".into()),
                Cell::Letter("A".into()),
                Cell::Letter("T".into()),
            ]],
            rebus: HashMap::new(),
            clues: Clues {
                across: vec![Clue {
                    number: 1,
                    row: 0,
                    col: 0,
                    clue: "Feline".into(),
                    answer: "CAT".into(),
                }],
                down: vec![],
            },
        }
    }

    #[test]
    fn word_cells_follows_answer_length() {
        let p = sample();
        let cells = p.word_cells(&p.clues.across[0], true);
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn correct_answer_prefers_rebus() {
        let mut p = sample();
        p.rebus.insert((0, 0), "CATS".into());
        assert_eq!(p.correct_answer(0, 0), Some("CATS"));
        assert_eq!(p.correct_answer(0, 1), Some("A"));
    }
}
