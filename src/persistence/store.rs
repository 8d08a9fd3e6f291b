use super::schema::*;
use crate::puzzle::{Puzzle, Row, Col};
use crate::trivia::JeopardyGame;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use const_format::concatcp;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_postgres::Client;

#[derive(Clone, Debug, Default)]
pub struct GuessStat {
    pub total: u32,
    pub incorrect: u32,
}

#[derive(Clone, Debug)]
pub struct SharedState {
    pub user_grid: HashMap<(Row, Col), String>,
    pub cell_fillers: HashMap<(Row, Col), String>,
    pub points: HashMap<String, i32>,
    pub guesses: HashMap<String, GuessStat>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct User {
    pub device_id: String,
    pub ip: String,
    pub name: String,
    pub color: String,
}

/// Narrow façade the engines are coded against. The core treats this as a
/// slow, fallible key/value-like store — every call can fail independently
/// and callers decide whether a failure is worth logging or swallowing.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_puzzle(&self, date: &str) -> anyhow::Result<Option<Puzzle>>;
    async fn has_puzzle(&self, date: &str) -> anyhow::Result<bool>;
    async fn get_state(&self, date: &str) -> anyhow::Result<Option<SharedState>>;
    async fn upsert_cell(&self, date: &str, row: Row, col: Col, letter: &str) -> anyhow::Result<()>;
    async fn clear_state(&self, date: &str) -> anyhow::Result<()>;
    async fn upsert_cell_filler(&self, date: &str, row: Row, col: Col, filler: &str) -> anyhow::Result<()>;
    async fn get_cell_fillers(&self, date: &str) -> anyhow::Result<HashMap<(Row, Col), String>>;
    async fn add_points(&self, date: &str, name: &str, delta: i32) -> anyhow::Result<()>;
    async fn add_guess(&self, date: &str, name: &str, correct: bool) -> anyhow::Result<()>;
    async fn get_timer(&self, date: &str) -> anyhow::Result<f64>;
    async fn save_timer(&self, date: &str, seconds: f64) -> anyhow::Result<()>;
    async fn get_user(&self, device_id: &str) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, ip: &str, name: &str, color: &str, device_id: &str) -> anyhow::Result<User>;
    async fn get_user_colors(&self, names: &[String]) -> anyhow::Result<HashMap<String, String>>;
    async fn get_user_count(&self) -> anyhow::Result<u64>;
    async fn get_random_jeopardy_game(&self) -> anyhow::Result<Option<JeopardyGame>>;
    async fn get_jeopardy_game(&self, id: &str) -> anyhow::Result<Option<JeopardyGame>>;
    async fn save_jeopardy_progress(
        &self,
        game_id: &str,
        clues_answered: u32,
        total_clues: u32,
        current_round: &str,
        completed: bool,
    ) -> anyhow::Result<()>;
}

#[async_trait]
impl Store for Client {
    async fn get_puzzle(&self, date: &str) -> anyhow::Result<Option<Puzzle>> {
        const SQL: &str = concatcp!("SELECT content FROM ", PUZZLES, " WHERE date = $1");
        match self.query_opt(SQL, &[&date]).await? {
            Some(row) => {
                let content: serde_json::Value = row.get(0);
                Ok(Some(serde_json::from_value(content)?))
            }
            None => Ok(None),
        }
    }

    async fn has_puzzle(&self, date: &str) -> anyhow::Result<bool> {
        const SQL: &str = concatcp!("SELECT 1 FROM ", PUZZLES, " WHERE date = $1");
        Ok(self.query_opt(SQL, &[&date]).await?.is_some())
    }

    async fn get_state(&self, date: &str) -> anyhow::Result<Option<SharedState>> {
        const STATE: &str =
            concatcp!("SELECT user_grid, updated_at FROM ", PUZZLE_STATE, " WHERE date = $1");
        let Some(row) = self.query_opt(STATE, &[&date]).await? else {
            return Ok(None);
        };
        let user_grid_json: serde_json::Value = row.get(0);
        let user_grid = decode_cellmap(user_grid_json)?;
        let updated_at: DateTime<Utc> = row.get(1);

        let cell_fillers = self.get_cell_fillers(date).await?;

        const POINTS_SQL: &str =
            concatcp!("SELECT user_name, score FROM ", POINTS, " WHERE date = $1");
        let points = self
            .query(POINTS_SQL, &[&date])
            .await?
            .into_iter()
            .map(|r| (r.get::<_, String>(0), r.get::<_, i32>(1)))
            .collect();

        const GUESSES_SQL: &str =
            concatcp!("SELECT user_name, total, incorrect FROM ", GUESSES, " WHERE date = $1");
        let guesses = self
            .query(GUESSES_SQL, &[&date])
            .await?
            .into_iter()
            .map(|r| {
                (
                    r.get::<_, String>(0),
                    GuessStat {
                        total: r.get::<_, i32>(1) as u32,
                        incorrect: r.get::<_, i32>(2) as u32,
                    },
                )
            })
            .collect();

        Ok(Some(SharedState {
            user_grid,
            cell_fillers,
            points,
            guesses,
            updated_at,
        }))
    }

    async fn upsert_cell(&self, date: &str, row: Row, col: Col, letter: &str) -> anyhow::Result<()> {
        const SQL: &str = concatcp!(
            "INSERT INTO ",
            PUZZLE_STATE,
            " (date, user_grid, updated_at) ",
            "VALUES ($1, jsonb_build_object($2::text, $3::text), now()) ",
            "ON CONFLICT (date) DO UPDATE SET ",
            "user_grid = ",
            PUZZLE_STATE,
            ".user_grid || jsonb_build_object($2::text, $3::text), ",
            "updated_at = now()"
        );
        let key = cell_key(row, col);
        self.execute(SQL, &[&date, &key, &letter]).await?;
        Ok(())
    }

    async fn clear_state(&self, date: &str) -> anyhow::Result<()> {
        const CLEAR_STATE: &str = concatcp!(
            "UPDATE ",
            PUZZLE_STATE,
            " SET user_grid = '{}', updated_at = now() WHERE date = $1"
        );
        const CLEAR_FILLERS: &str = concatcp!("DELETE FROM ", CELL_FILLERS, " WHERE date = $1");
        const CLEAR_TIMER: &str = concatcp!("UPDATE ", TIMERS, " SET seconds = 0 WHERE date = $1");
        self.execute(CLEAR_STATE, &[&date]).await?;
        self.execute(CLEAR_FILLERS, &[&date]).await?;
        self.execute(CLEAR_TIMER, &[&date]).await?;
        Ok(())
    }

    async fn upsert_cell_filler(&self, date: &str, row: Row, col: Col, filler: &str) -> anyhow::Result<()> {
        const SQL: &str = concatcp!(
            "INSERT INTO ",
            CELL_FILLERS,
            " (date, row, col, filler) VALUES ($1, $2, $3, $4) ",
            "ON CONFLICT (date, row, col) DO UPDATE SET filler = EXCLUDED.filler"
        );
        self.execute(SQL, &[&date, &(row as i32), &(col as i32), &filler])
            .await?;
        Ok(())
    }

    async fn get_cell_fillers(&self, date: &str) -> anyhow::Result<HashMap<(Row, Col), String>> {
        const SQL: &str =
            concatcp!("SELECT row, col, filler FROM ", CELL_FILLERS, " WHERE date = $1");
        Ok(self
            .query(SQL, &[&date])
            .await?
            .into_iter()
            .map(|r| {
                (
                    (r.get::<_, i32>(0) as usize, r.get::<_, i32>(1) as usize),
                    r.get::<_, String>(2),
                )
            })
            .collect())
    }

    async fn add_points(&self, date: &str, name: &str, delta: i32) -> anyhow::Result<()> {
        const SQL: &str = concatcp!(
            "INSERT INTO ",
            POINTS,
            " (date, user_name, score) VALUES ($1, $2, $3) ",
            "ON CONFLICT (date, user_name) DO UPDATE SET score = ",
            POINTS,
            ".score + EXCLUDED.score"
        );
        self.execute(SQL, &[&date, &name, &delta]).await?;
        Ok(())
    }

    async fn add_guess(&self, date: &str, name: &str, correct: bool) -> anyhow::Result<()> {
        const SQL: &str = concatcp!(
            "INSERT INTO ",
            GUESSES,
            " (date, user_name, total, incorrect) VALUES ($1, $2, 1, $3) ",
            "ON CONFLICT (date, user_name) DO UPDATE SET ",
            "total = ",
            GUESSES,
            ".total + 1, ",
            "incorrect = ",
            GUESSES,
            ".incorrect + EXCLUDED.incorrect"
        );
        let incorrect = if correct { 0 } else { 1 };
        self.execute(SQL, &[&date, &name, &incorrect]).await?;
        Ok(())
    }

    async fn get_timer(&self, date: &str) -> anyhow::Result<f64> {
        const SQL: &str = concatcp!("SELECT seconds FROM ", TIMERS, " WHERE date = $1");
        Ok(self
            .query_opt(SQL, &[&date])
            .await?
            .map(|r| r.get::<_, f64>(0))
            .unwrap_or(0.0))
    }

    async fn save_timer(&self, date: &str, seconds: f64) -> anyhow::Result<()> {
        const SQL: &str = concatcp!(
            "INSERT INTO ",
            TIMERS,
            " (date, seconds) VALUES ($1, $2) ",
            "ON CONFLICT (date) DO UPDATE SET seconds = EXCLUDED.seconds"
        );
        self.execute(SQL, &[&date, &seconds]).await?;
        Ok(())
    }

    async fn get_user(&self, device_id: &str) -> anyhow::Result<Option<User>> {
        const SQL: &str = concatcp!(
            "SELECT device_id, ip, name, color FROM ",
            USERS,
            " WHERE device_id = $1"
        );
        Ok(self.query_opt(SQL, &[&device_id]).await?.map(|r| User {
            device_id: r.get(0),
            ip: r.get(1),
            name: r.get(2),
            color: r.get(3),
        }))
    }

    async fn create_user(&self, ip: &str, name: &str, color: &str, device_id: &str) -> anyhow::Result<User> {
        const SQL: &str = concatcp!(
            "INSERT INTO ",
            USERS,
            " (device_id, ip, name, color) VALUES ($1, $2, $3, $4) ",
            "ON CONFLICT (device_id) DO UPDATE SET name = EXCLUDED.name"
        );
        self.execute(SQL, &[&device_id, &ip, &name, &color]).await?;
        Ok(User {
            device_id: device_id.to_string(),
            ip: ip.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        })
    }

    async fn get_user_colors(&self, names: &[String]) -> anyhow::Result<HashMap<String, String>> {
        const SQL: &str = concatcp!("SELECT name, color FROM ", USERS, " WHERE name = ANY($1)");
        Ok(self
            .query(SQL, &[&names])
            .await?
            .into_iter()
            .map(|r| (r.get::<_, String>(0), r.get::<_, String>(1)))
            .collect())
    }

    async fn get_user_count(&self) -> anyhow::Result<u64> {
        const SQL: &str = concatcp!("SELECT COUNT(*) FROM ", USERS);
        Ok(self.query_one(SQL, &[]).await?.get::<_, i64>(0) as u64)
    }

    async fn get_random_jeopardy_game(&self) -> anyhow::Result<Option<JeopardyGame>> {
        const SQL: &str = concatcp!(
            "SELECT content FROM ",
            JEOPARDY_GAMES,
            " WHERE played = false ORDER BY random() LIMIT 1"
        );
        match self.query_opt(SQL, &[]).await? {
            Some(row) => {
                let content: serde_json::Value = row.get(0);
                Ok(Some(serde_json::from_value(content)?))
            }
            None => Ok(None),
        }
    }

    async fn get_jeopardy_game(&self, id: &str) -> anyhow::Result<Option<JeopardyGame>> {
        const SQL: &str = concatcp!("SELECT content FROM ", JEOPARDY_GAMES, " WHERE game_id = $1");
        match self.query_opt(SQL, &[&id]).await? {
            Some(row) => {
                let content: serde_json::Value = row.get(0);
                Ok(Some(serde_json::from_value(content)?))
            }
            None => Ok(None),
        }
    }

    async fn save_jeopardy_progress(
        &self,
        game_id: &str,
        clues_answered: u32,
        total_clues: u32,
        current_round: &str,
        completed: bool,
    ) -> anyhow::Result<()> {
        const SQL: &str = concatcp!(
            "INSERT INTO ",
            JEOPARDY_PROGRESS,
            " (game_id, clues_answered, total_clues, current_round, completed, updated_at) ",
            "VALUES ($1, $2, $3, $4, $5, now()) ",
            "ON CONFLICT (game_id) DO UPDATE SET ",
            "clues_answered = EXCLUDED.clues_answered, ",
            "total_clues = EXCLUDED.total_clues, ",
            "current_round = EXCLUDED.current_round, ",
            "completed = EXCLUDED.completed, ",
            "updated_at = now()"
        );
        self.execute(
            SQL,
            &[
                &game_id,
                &(clues_answered as i32),
                &(total_clues as i32),
                &current_round,
                &completed,
            ],
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for Arc<Client> {
    async fn get_puzzle(&self, date: &str) -> anyhow::Result<Option<Puzzle>> {
        self.as_ref().get_puzzle(date).await
    }
    async fn has_puzzle(&self, date: &str) -> anyhow::Result<bool> {
        self.as_ref().has_puzzle(date).await
    }
    async fn get_state(&self, date: &str) -> anyhow::Result<Option<SharedState>> {
        self.as_ref().get_state(date).await
    }
    async fn upsert_cell(&self, date: &str, row: Row, col: Col, letter: &str) -> anyhow::Result<()> {
        self.as_ref().upsert_cell(date, row, col, letter).await
    }
    async fn clear_state(&self, date: &str) -> anyhow::Result<()> {
        self.as_ref().clear_state(date).await
    }
    async fn upsert_cell_filler(&self, date: &str, row: Row, col: Col, filler: &str) -> anyhow::Result<()> {
        self.as_ref().upsert_cell_filler(date, row, col, filler).await
    }
    async fn get_cell_fillers(&self, date: &str) -> anyhow::Result<HashMap<(Row, Col), String>> {
        self.as_ref().get_cell_fillers(date).await
    }
    async fn add_points(&self, date: &str, name: &str, delta: i32) -> anyhow::Result<()> {
        self.as_ref().add_points(date, name, delta).await
    }
    async fn add_guess(&self, date: &str, name: &str, correct: bool) -> anyhow::Result<()> {
        self.as_ref().add_guess(date, name, correct).await
    }
    async fn get_timer(&self, date: &str) -> anyhow::Result<f64> {
        self.as_ref().get_timer(date).await
    }
    async fn save_timer(&self, date: &str, seconds: f64) -> anyhow::Result<()> {
        self.as_ref().save_timer(date, seconds).await
    }
    async fn get_user(&self, device_id: &str) -> anyhow::Result<Option<User>> {
        self.as_ref().get_user(device_id).await
    }
    async fn create_user(&self, ip: &str, name: &str, color: &str, device_id: &str) -> anyhow::Result<User> {
        self.as_ref().create_user(ip, name, color, device_id).await
    }
    async fn get_user_colors(&self, names: &[String]) -> anyhow::Result<HashMap<String, String>> {
        self.as_ref().get_user_colors(names).await
    }
    async fn get_user_count(&self) -> anyhow::Result<u64> {
        self.as_ref().get_user_count().await
    }
    async fn get_random_jeopardy_game(&self) -> anyhow::Result<Option<JeopardyGame>> {
        self.as_ref().get_random_jeopardy_game().await
    }
    async fn get_jeopardy_game(&self, id: &str) -> anyhow::Result<Option<JeopardyGame>> {
        self.as_ref().get_jeopardy_game(id).await
    }
    async fn save_jeopardy_progress(
        &self,
        game_id: &str,
        clues_answered: u32,
        total_clues: u32,
        current_round: &str,
        completed: bool,
    ) -> anyhow::Result<()> {
        self.as_ref()
            .save_jeopardy_progress(game_id, clues_answered, total_clues, current_round, completed)
            .await
    }
}

fn cell_key(row: Row, col: Col) -> String {
    format!("{row},{col}")
}

fn decode_cellmap(value: serde_json::Value) -> anyhow::Result<HashMap<(Row, Col), String>> {
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("user_grid column is not a JSON object"))?;
    let mut map = HashMap::with_capacity(obj.len());
    for (key, v) in obj {
        let (r, c) = key
            .split_once(',')
            .and_then(|(r, c)| Some((r.parse().ok()?, c.parse().ok()?)))
            .ok_or_else(|| anyhow::anyhow!("malformed cell key: {key}"))?;
        map.insert((r, c), v.as_str().unwrap_or_default().to_string());
    }
    Ok(map)
}
