mod game;

pub use game::{Clue as JeopardyClue, FinalClue, Game as JeopardyGame, Round};
