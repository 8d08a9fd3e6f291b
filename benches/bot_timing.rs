criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        sampling_target_seconds,
        building_a_full_solve_plan,
        stepping_a_solve_plan_to_completion,
}

use gridshow::crossword::{target_seconds, BotAction, BotSolver};
use gridshow::puzzle::{Cell, Clue, Clues, Dimensions, Puzzle};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn sample_puzzle() -> Puzzle {
    Puzzle {
        date: "2024-01-01".into(),
        dimensions: Dimensions { rows: 15, cols: 15 },
        grid: vec![vec![Cell::Letter("A".into()); 15]; 15],
        rebus: Default::default(),
        clues: Clues {
            across: (0..15)
                .map(|r| Clue { number: r as u32 + 1, row: r, col: 0, clue: "x".into(), answer: "A".repeat(15) })
                .collect(),
            down: (0..15)
                .map(|c| Clue { number: c as u32 + 16, row: 0, col: c, clue: "x".into(), answer: "A".repeat(15) })
                .collect(),
        },
    }
}

fn sampling_target_seconds(c: &mut criterion::Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);
    c.bench_function("sample a bot's target solve seconds", |b| {
        b.iter(|| target_seconds(4, 2, &mut rng))
    });
}

fn building_a_full_solve_plan(c: &mut criterion::Criterion) {
    let puzzle = sample_puzzle();
    c.bench_function("build a bot's full word/cell timing plan", |b| {
        b.iter(|| {
            let rng = SmallRng::seed_from_u64(2);
            BotSolver::new(1, "bot".into(), "#000".into(), 2, 4, 0, &puzzle, rng)
        })
    });
}

fn stepping_a_solve_plan_to_completion(c: &mut criterion::Criterion) {
    let puzzle = sample_puzzle();
    c.bench_function("step a bot plan through to Finished", |b| {
        b.iter(|| {
            let rng = SmallRng::seed_from_u64(3);
            let mut solver = BotSolver::new(1, "bot".into(), "#000".into(), 2, 4, 0, &puzzle, rng);
            let mut live = HashMap::new();
            loop {
                match solver.next_action(&puzzle, &live) {
                    BotAction::Finished => break,
                    BotAction::Fill { row, col, letter, .. } => {
                        live.insert((row, col), letter);
                    }
                    _ => {}
                }
            }
        })
    });
}
