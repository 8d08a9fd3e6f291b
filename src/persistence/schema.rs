/// Pure schema definitions for Postgres tables.
/// No I/O here — just table/column metadata, built with
/// `const_format::concatcp!` so the SQL strings are assembled at compile time.
pub const PUZZLES: &str = "puzzles";
pub const PUZZLE_STATE: &str = "puzzle_state";
pub const CELL_FILLERS: &str = "cell_fillers";
pub const POINTS: &str = "points";
pub const GUESSES: &str = "guesses";
pub const TIMERS: &str = "timers";
pub const USERS: &str = "users";
pub const JEOPARDY_GAMES: &str = "jeopardy_games";
pub const JEOPARDY_PROGRESS: &str = "jeopardy_progress";

use const_format::concatcp;

pub const CREATE_PUZZLES: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    PUZZLES,
    " (",
    "date        TEXT PRIMARY KEY, ",
    "content     JSONB NOT NULL",
    ")"
);

pub const CREATE_PUZZLE_STATE: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    PUZZLE_STATE,
    " (",
    "date        TEXT PRIMARY KEY, ",
    "user_grid   JSONB NOT NULL DEFAULT '{}', ",
    "updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()",
    ")"
);

pub const CREATE_CELL_FILLERS: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    CELL_FILLERS,
    " (",
    "date        TEXT NOT NULL, ",
    "row         INTEGER NOT NULL, ",
    "col         INTEGER NOT NULL, ",
    "filler      TEXT NOT NULL, ",
    "PRIMARY KEY (date, row, col)",
    ")"
);

pub const CREATE_POINTS: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    POINTS,
    " (",
    "date        TEXT NOT NULL, ",
    "user_name   TEXT NOT NULL, ",
    "score       INTEGER NOT NULL DEFAULT 0, ",
    "PRIMARY KEY (date, user_name)",
    ")"
);

pub const CREATE_GUESSES: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    GUESSES,
    " (",
    "date        TEXT NOT NULL, ",
    "user_name   TEXT NOT NULL, ",
    "total       INTEGER NOT NULL DEFAULT 0, ",
    "incorrect   INTEGER NOT NULL DEFAULT 0, ",
    "PRIMARY KEY (date, user_name)",
    ")"
);

pub const CREATE_TIMERS: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    TIMERS,
    " (",
    "date        TEXT PRIMARY KEY, ",
    "seconds     DOUBLE PRECISION NOT NULL DEFAULT 0",
    ")"
);

pub const CREATE_USERS: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    USERS,
    " (",
    "device_id   TEXT PRIMARY KEY, ",
    "ip          TEXT NOT NULL, ",
    "name        TEXT NOT NULL, ",
    "color       TEXT NOT NULL, ",
    "created_at  TIMESTAMPTZ NOT NULL DEFAULT now()",
    ")"
);

pub const CREATE_JEOPARDY_GAMES: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    JEOPARDY_GAMES,
    " (",
    "game_id     TEXT PRIMARY KEY, ",
    "content     JSONB NOT NULL, ",
    "played      BOOLEAN NOT NULL DEFAULT false",
    ")"
);

pub const CREATE_JEOPARDY_PROGRESS: &str = concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    JEOPARDY_PROGRESS,
    " (",
    "game_id         TEXT PRIMARY KEY, ",
    "clues_answered  INTEGER NOT NULL, ",
    "total_clues     INTEGER NOT NULL, ",
    "current_round   TEXT NOT NULL, ",
    "completed       BOOLEAN NOT NULL, ",
    "updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()",
    ")"
);
