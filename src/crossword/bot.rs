use crate::puzzle::{Col, Puzzle, Row};
use crate::{BASE_SOLVE_SECONDS, SOLVE_MULTIPLIER_RANGE, WANDER_CHANCE};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;

const MAX_WANDER_HOPS: u8 = 4;
const MIN_CELL_MS: u64 = 40;
const COMPASS: [(i64, i64); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

struct PlannedWord {
    cells: Vec<(Row, Col)>,
    think_ms: u64,
    cell_ms: Vec<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WordPhase {
    Wandering(u8),
    Filling,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BotAction {
    Wander { row: Row, col: Col, delay_ms: u64 },
    Fill { row: Row, col: Col, letter: String, delay_ms: u64 },
    /// A cell-time slot whose target cell is already correctly filled;
    /// the slot is still spent so the bot's apparent pace stays honest.
    Skip { delay_ms: u64 },
    Finished,
}

/// Per-bot solve plan and cursor through it. Built once at bot creation
/// against a target solve duration, then stepped one action at a time by
/// whatever drives the room's scheduler.
pub struct BotSolver {
    pub bot_id: crate::SocketId,
    pub user_name: String,
    pub color: String,
    pub difficulty: usize,
    rng: rand::rngs::SmallRng,
    words: Vec<PlannedWord>,
    word_index: usize,
    cell_cursor: usize,
    phase: WordPhase,
}

impl BotSolver {
    /// `rotate` staggers which word a bot starts on (pass the bot's
    /// ordinal among the room's live bots) so two bots rarely open on the
    /// same word.
    pub fn new(
        bot_id: crate::SocketId,
        user_name: String,
        color: String,
        difficulty: usize,
        dow: usize,
        rotate: usize,
        puzzle: &Puzzle,
        mut rng: rand::rngs::SmallRng,
    ) -> Self {
        let target = target_seconds(dow, difficulty, &mut rng);
        let words = build_plan(puzzle, target, rotate, &mut rng);
        Self {
            bot_id,
            user_name,
            color,
            difficulty,
            rng,
            words,
            word_index: 0,
            cell_cursor: 0,
            phase: WordPhase::Wandering(MAX_WANDER_HOPS),
        }
    }

    pub fn next_action(&mut self, puzzle: &Puzzle, live_grid: &HashMap<(Row, Col), String>) -> BotAction {
        loop {
            if self.word_index >= self.words.len() {
                return BotAction::Finished;
            }
            let think_ms = self.words[self.word_index].think_ms;
            match self.phase {
                WordPhase::Wandering(hops_left) => {
                    let chance = WANDER_CHANCE.get(self.difficulty).copied().unwrap_or(0.5);
                    if hops_left == 0 || !self.rng.random_bool(chance) {
                        self.phase = WordPhase::Filling;
                        continue;
                    }
                    self.phase = WordPhase::Wandering(hops_left - 1);
                    let (row, col) = self.random_hop(puzzle);
                    let delay = (think_ms / 3).max(MIN_CELL_MS);
                    return BotAction::Wander { row, col, delay_ms: delay };
                }
                WordPhase::Filling => {
                    let word = &self.words[self.word_index];
                    if self.cell_cursor >= word.cells.len() {
                        self.word_index += 1;
                        self.cell_cursor = 0;
                        self.phase = WordPhase::Wandering(MAX_WANDER_HOPS);
                        continue;
                    }
                    let (row, col) = word.cells[self.cell_cursor];
                    let delay = word.cell_ms[self.cell_cursor];
                    self.cell_cursor += 1;
                    let correct = puzzle.correct_answer(row, col);
                    let already_correct =
                        live_grid.get(&(row, col)).map(String::as_str) == correct && correct.is_some();
                    if already_correct {
                        return BotAction::Skip { delay_ms: delay };
                    }
                    return BotAction::Fill {
                        row,
                        col,
                        letter: correct.unwrap_or_default().to_string(),
                        delay_ms: delay,
                    };
                }
            }
        }
    }

    fn random_hop(&mut self, puzzle: &Puzzle) -> (Row, Col) {
        let (base_r, base_c) = self.words[self.word_index].cells[0];
        let distance = self.rng.random_range(2..=5i64);
        let (dr, dc) = COMPASS[self.rng.random_range(0..COMPASS.len())];
        let row = (base_r as i64 + dr * distance).clamp(0, puzzle.dimensions.rows as i64 - 1) as Row;
        let col = (base_c as i64 + dc * distance).clamp(0, puzzle.dimensions.cols as i64 - 1) as Col;
        (row, col)
    }
}

/// `finalSolve = baseTime[dow][difficulty] * uniform(lo, hi)` in seconds.
pub fn target_seconds(dow: usize, difficulty: usize, rng: &mut impl Rng) -> f64 {
    let base = BASE_SOLVE_SECONDS[dow][difficulty];
    let (lo, hi) = SOLVE_MULTIPLIER_RANGE[difficulty];
    base * rng.random_range(lo..=hi)
}

fn build_plan(puzzle: &Puzzle, target_seconds: f64, rotate: usize, rng: &mut impl Rng) -> Vec<PlannedWord> {
    let mut order: Vec<(usize, bool)> = (0..puzzle.clues.across.len())
        .map(|i| (i, true))
        .chain((0..puzzle.clues.down.len()).map(|i| (i, false)))
        .collect();
    order.shuffle(rng);
    if !order.is_empty() {
        order.rotate_left(rotate % order.len());
    }

    let mut words: Vec<PlannedWord> = order
        .into_iter()
        .map(|(idx, across)| {
            let clue = if across { &puzzle.clues.across[idx] } else { &puzzle.clues.down[idx] };
            let cells = puzzle.word_cells(clue, across);
            PlannedWord { cells, think_ms: 0, cell_ms: Vec::new() }
        })
        .filter(|w| !w.cells.is_empty())
        .collect();

    let total_ms = target_seconds * 1000.0;
    let think_budget = total_ms * 0.25;
    let cell_budget = total_ms * 0.75;

    let think_raw = raw_think_times(words.len(), rng);
    let think_ms = normalize_to(&think_raw, think_budget);
    for (word, ms) in words.iter_mut().zip(think_ms) {
        word.think_ms = ms;
    }

    let total_cells: usize = words.iter().map(|w| w.cells.len()).sum();
    let cell_raw = raw_cell_times(total_cells, rng);
    let cell_ms = normalize_to(&cell_raw, cell_budget);
    let mut cursor = 0;
    for word in words.iter_mut() {
        let n = word.cells.len();
        word.cell_ms = cell_ms[cursor..cursor + n].to_vec();
        cursor += n;
    }

    words
}

fn raw_think_times(n: usize, rng: &mut impl Rng) -> Vec<f64> {
    (0..n)
        .map(|_| {
            let roll: f64 = rng.random();
            if roll < 0.25 {
                rng.random_range(3.0..=10.0)
            } else if roll < 0.55 {
                rng.random_range(0.8..=3.0)
            } else {
                rng.random_range(0.1..=0.8)
            }
        })
        .collect()
}

fn raw_cell_times(n: usize, rng: &mut impl Rng) -> Vec<f64> {
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let streak = rng.random_range(2..=8usize).min(n - out.len());
        let roll: f64 = rng.random();
        let (lo, hi) = if roll < 0.34 {
            (0.2, 0.6)
        } else if roll < 0.67 {
            (0.5, 1.5)
        } else {
            (1.5, 4.0)
        };
        for _ in 0..streak {
            let base = rng.random_range(lo..=hi);
            let jitter = rng.random_range(0.6..=1.4);
            out.push(base * jitter);
        }
    }
    out
}

fn normalize_to(raw: &[f64], target_ms: f64) -> Vec<u64> {
    let sum: f64 = raw.iter().sum();
    if sum <= 0.0 || raw.is_empty() {
        return vec![MIN_CELL_MS; raw.len()];
    }
    raw.iter()
        .map(|v| (((v / sum) * target_ms).round() as u64).max(MIN_CELL_MS))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Cell, Clue, Clues, Dimensions};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sample_puzzle() -> Puzzle {
        Puzzle {
            date: "2024-01-01".into(),
            dimensions: Dimensions { rows: 3, cols: 3 },
            grid: vec![
                vec![Cell::Letter("C".into()), Cell::Letter("A".into()), Cell::Letter("T".into())],
                vec![Cell::Letter("A".into()), Cell::Blocked, Cell::Letter("O".into())],
                vec![Cell::Letter("R".into()), Cell::Letter("U".into()), Cell::Letter("G".into())],
            ],
            rebus: Default::default(),
            clues: Clues {
                across: vec![
                    Clue { number: 1, row: 0, col: 0, clue: "Feline".into(), answer: "CAT".into() },
                    Clue { number: 4, row: 2, col: 0, clue: "Carpet".into(), answer: "RUG".into() },
                ],
                down: vec![
                    Clue { number: 1, row: 0, col: 0, clue: "Vehicle".into(), answer: "CAR".into() },
                ],
            },
        }
    }

    #[test]
    fn target_seconds_stays_within_the_multiplier_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let t = target_seconds(1, 2, &mut rng);
        let (lo, hi) = SOLVE_MULTIPLIER_RANGE[2];
        assert!(t >= BASE_SOLVE_SECONDS[1][2] * lo);
        assert!(t <= BASE_SOLVE_SECONDS[1][2] * hi);
    }

    #[test]
    fn solver_eventually_finishes_every_word() {
        let puzzle = sample_puzzle();
        let rng = SmallRng::seed_from_u64(42);
        let mut solver = BotSolver::new(1, "bot-1".into(), "#000".into(), 2, 1, 0, &puzzle, rng);
        let mut live = HashMap::new();
        let mut actions = 0;
        loop {
            match solver.next_action(&puzzle, &live) {
                BotAction::Finished => break,
                BotAction::Fill { row, col, letter, .. } => {
                    live.insert((row, col), letter);
                }
                _ => {}
            }
            actions += 1;
            assert!(actions < 10_000, "solver did not converge");
        }
        for (r, c) in puzzle.cells() {
            assert_eq!(live.get(&(r, c)).map(String::as_str), puzzle.correct_answer(r, c));
        }
    }

    #[test]
    fn already_correct_cells_are_skipped_not_refilled() {
        let puzzle = sample_puzzle();
        let rng = SmallRng::seed_from_u64(3);
        let mut solver = BotSolver::new(2, "bot-2".into(), "#000".into(), 0, 0, 0, &puzzle, rng);
        let mut live = HashMap::new();
        live.insert((0, 0), "C".to_string());
        let mut saw_skip = false;
        for _ in 0..200 {
            match solver.next_action(&puzzle, &live) {
                BotAction::Skip { .. } => saw_skip = true,
                BotAction::Fill { row, col, letter, .. } => {
                    live.insert((row, col), letter);
                }
                BotAction::Finished => break,
                _ => {}
            }
        }
        assert!(saw_skip);
    }
}
