use super::bot::{BotAction, BotSolver};
use super::event::*;
use super::fire::{FireEvent, FireStreak};
use super::hint::HintState;
use super::membership::{Direction, Membership};
use super::message::Inbound;
use crate::persistence::Store;
use crate::puzzle::{Col, Puzzle, Row};
use crate::scheduler::{Scheduler, TimerFired};
use crate::transport::{Channel, GlobalRoster, OutboundHandle, Roster};
use crate::{
    CROSSWORD_BOT_PALETTE, CROSSWORD_PALETTE, HINT_MAX_CELLS, HINT_SENTINEL, PROGRESS_DEBOUNCE_MS,
    POINTS_LAST_SQUARE, POINTS_LETTER, POINTS_REBUS, POINTS_WORD_DOUBLE, POINTS_WORD_SINGLE,
    POINTS_WRONG,
};
use chrono::{Datelike, NaiveDate, NaiveTime};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

const BOT_ID_BASE: crate::SocketId = 1 << 40;
const PROGRESS_TIMER: &str = "progress";

pub enum RoomEvent {
    Connect { socket: crate::SocketId, outbound: OutboundHandle },
    Disconnect { socket: crate::SocketId },
    Message { socket: crate::SocketId, msg: Inbound },
}

/// Single-writer authority over one calendar date's shared crossword grid.
/// Every mutation happens inline in [`Room::run`]'s loop; nothing here is
/// ever touched concurrently.
pub struct Room {
    date: String,
    puzzle: Arc<Puzzle>,
    store: Arc<dyn Store>,
    channel: Channel<RoomEvent>,
    timers: Channel<TimerFired>,
    roster: Roster,
    calendar: Arc<GlobalRoster>,
    memberships: HashMap<crate::SocketId, Membership>,
    shared_grid: HashMap<(Row, Col), String>,
    cell_fillers: HashMap<(Row, Col), String>,
    points: HashMap<String, i32>,
    guesses: HashMap<String, (u32, u32)>,
    fire: HashMap<crate::SocketId, FireStreak>,
    hints: HintState,
    pause_set: HashSet<crate::SocketId>,
    bots: HashMap<crate::SocketId, BotSolver>,
    scheduler: Scheduler,
    accumulated_ms: i64,
    timer_started_at: Option<Instant>,
    completed: bool,
    next_bot_id: crate::SocketId,
    rng: SmallRng,
}

impl Room {
    pub async fn spawn(date: String, puzzle: Arc<Puzzle>, store: Arc<dyn Store>, calendar: Arc<GlobalRoster>) -> tokio::sync::mpsc::UnboundedSender<RoomEvent> {
        let channel = Channel::default();
        let tx = channel.tx();
        let accumulated = store.get_timer(&date).await.unwrap_or(0.0);
        let room = Self {
            date,
            puzzle,
            store,
            channel,
            timers: Channel::default(),
            roster: Roster::default(),
            calendar,
            memberships: HashMap::new(),
            shared_grid: HashMap::new(),
            cell_fillers: HashMap::new(),
            points: HashMap::new(),
            guesses: HashMap::new(),
            fire: HashMap::new(),
            hints: HintState::default(),
            pause_set: HashSet::new(),
            bots: HashMap::new(),
            scheduler: Scheduler::default(),
            accumulated_ms: (accumulated * 1000.0) as i64,
            timer_started_at: None,
            completed: false,
            next_bot_id: BOT_ID_BASE,
            rng: SmallRng::from_rng(&mut rand::rng()),
        };
        tokio::spawn(room.run());
        tx
    }

    pub async fn run(mut self) -> ! {
        loop {
            tokio::select! {
                event = self.channel.rx().recv() => match event {
                    Some(RoomEvent::Connect { socket, outbound }) => self.roster.join(socket, outbound),
                    Some(RoomEvent::Disconnect { socket }) => self.leave(socket).await,
                    Some(RoomEvent::Message { socket, msg }) => self.dispatch(socket, msg).await,
                    None => std::future::pending::<()>().await,
                },
                Some(fired) = self.timers.rx().recv() => self.on_timer(fired).await,
            }
        }
    }

    async fn dispatch(&mut self, socket: crate::SocketId, msg: Inbound) {
        match msg {
            Inbound::JoinPuzzle { user_name, .. } => self.join(socket, user_name).await,
            Inbound::LeavePuzzle => self.leave(socket).await,
            Inbound::CellUpdate { row, col, letter } => self.cell_update(socket, row, col, letter).await,
            Inbound::CursorMove { row, col, direction } => self.cursor_move(socket, row, col, direction),
            Inbound::HintVote => self.hint_vote(socket).await,
            Inbound::HintAvailable => self.hint_available(socket),
            Inbound::PausePuzzle => self.pause(socket).await,
            Inbound::ResumePuzzle => self.resume(socket),
            Inbound::ClearPuzzle => self.clear_puzzle().await,
            Inbound::AddAi { difficulty } => self.add_ai(difficulty).await,
            Inbound::RemoveAi { bot_id } => self.remove_ai(bot_id),
            Inbound::StartAi { bot_id } => self.start_ai(bot_id),
            Inbound::GetAiBots => self.get_ai_bots(socket),
        }
    }
}

impl Room {
    async fn join(&mut self, socket: crate::SocketId, user_name: String) {
        if self.memberships.is_empty() {
            self.timer_started_at = Some(Instant::now());
        }
        let used: HashSet<&str> = self.memberships.values().map(|m| m.color.as_str()).collect();
        let color = CROSSWORD_PALETTE
            .iter()
            .find(|c| !used.contains(*c))
            .unwrap_or(&CROSSWORD_PALETTE[0])
            .to_string();
        self.memberships.insert(socket, Membership::human(user_name.clone(), color.clone()));

        self.roster.emit_to_room(
            "user-joined",
            &UserJoined { socket_id: socket, user_name, color, is_bot: false },
        );
        self.roster.emit_to_socket(socket, "room-state", &self.snapshot());
        self.roster.emit_to_socket(socket, "timer-sync", &self.timer_sync());
    }

    async fn leave(&mut self, socket: crate::SocketId) {
        let Some(membership) = self.memberships.remove(&socket) else { return };
        self.roster.leave(socket);
        self.scheduler.cancel(&format!("fire:{socket}"));
        if let Some(fire) = self.fire.remove(&socket) {
            if fire.on_fire {
                self.roster.emit_to_room("fire-expired", &FireExpired { socket_id: socket });
            }
        }
        self.pause_set.remove(&socket);

        let humans_left = self.memberships.values().filter(|m| !m.is_bot).count();
        if !membership.is_bot && humans_left == 0 {
            self.stop_timer(true).await;
            self.evict_all_bots();
            self.hints = HintState::default();
        } else if humans_left > 0 && self.all_humans_paused() {
            self.stop_timer(true).await;
        }
        self.roster.emit_to_room("user-left", &UserLeft { socket_id: socket });
    }

    async fn cell_update(&mut self, socket: crate::SocketId, row: Row, col: Col, letter: String) {
        let Some(membership) = self.memberships.get(&socket) else { return };
        let user_name = membership.user_name.clone();
        let is_bot = membership.is_bot;
        let now = Instant::now();

        if letter.is_empty() {
            self.shared_grid.remove(&(row, col));
            self.cell_fillers.remove(&(row, col));
            self.persist_cell(row, col, "", "");
            self.roster.emit_to_room(
                "cell-updated",
                &CellUpdated {
                    row,
                    col,
                    letter,
                    filler: String::new(),
                    user_name,
                    delta: 0,
                    word_bonus: 0,
                    last_square_bonus: 0,
                    guess_correct: false,
                    fire_event: None,
                },
            );
            self.queue_progress();
            return;
        }

        let is_hint_cell = self.hints.is_revealed((row, col));
        self.shared_grid.insert((row, col), letter.clone());
        self.cell_fillers.insert((row, col), user_name.clone());
        self.persist_cell(row, col, &letter, &user_name);

        if is_hint_cell {
            self.roster.emit_to_room(
                "cell-updated",
                &CellUpdated {
                    row,
                    col,
                    letter,
                    filler: user_name,
                    user_name: String::new(),
                    delta: 0,
                    word_bonus: 0,
                    last_square_bonus: 0,
                    guess_correct: false,
                    fire_event: None,
                },
            );
            self.queue_progress();
            return;
        }

        let correct = self.puzzle.correct_answer(row, col).map(str::to_string);
        let is_rebus = self.puzzle.rebus.contains_key(&(row, col)) && letter.chars().count() > 1;
        let base = if is_rebus { POINTS_REBUS } else { POINTS_LETTER };
        let guess_correct = correct.as_deref() == Some(letter.as_str());
        let was_on_fire = self.fire.get(&socket).is_some_and(|f| f.is_live(now));
        let multiplier = self.fire.get(&socket).map(|f| f.multiplier).unwrap_or(1.0);

        let mut delta;
        let mut fire_event = None;
        let mut word_bonus = 0;
        let mut last_square_bonus = 0;

        if guess_correct {
            delta = if was_on_fire { (base as f32 * multiplier).round() as i32 } else { base };
        } else {
            delta = POINTS_WRONG;
            let entry = self.fire.entry(socket).or_default();
            if was_on_fire {
                entry.break_streak();
                fire_event = Some(FireEventKind::Broken);
                self.roster.emit_to_room("fire-expired", &FireExpired { socket_id: socket });
            } else {
                entry.reset_recent();
            }
        }

        self.add_points(&user_name, delta);
        self.add_guess(&user_name, guess_correct);

        if guess_correct {
            let completed = self.words_completed_at(row, col);
            word_bonus = match completed {
                c if c >= 2 => POINTS_WORD_DOUBLE,
                1 => POINTS_WORD_SINGLE,
                _ => 0,
            };
            if was_on_fire && word_bonus > 0 {
                word_bonus = (word_bonus as f32 * multiplier).round() as i32;
            }
            if word_bonus > 0 {
                self.add_points(&user_name, word_bonus);
                self.hints.reopen();

                let entry = self.fire.entry(socket).or_default();
                if was_on_fire {
                    entry.extend(now, completed);
                    fire_event = Some(FireEventKind::Extended);
                } else if let Some(FireEvent::Started) = entry.record(now, completed) {
                    fire_event = Some(FireEventKind::Started);
                }
                if matches!(fire_event, Some(FireEventKind::Started) | Some(FireEventKind::Extended)) {
                    let fire_cells: HashSet<(Row, Col)> = self
                        .cell_fillers
                        .iter()
                        .filter(|(_, filler)| **filler == user_name)
                        .map(|(cell, _)| *cell)
                        .collect();
                    self.fire.get_mut(&socket).unwrap().fire_cells = fire_cells.clone();
                    let remaining_ms = self.fire[&socket]
                        .expires_at
                        .map(|e| e.saturating_duration_since(now).as_millis() as u64)
                        .unwrap_or(0);
                    let multiplier = self.fire[&socket].multiplier;
                    let timer_tx = self.timers.tx();
                    self.scheduler.arm(format!("fire:{socket}"), Duration::from_millis(remaining_ms), timer_tx);
                    if !is_bot {
                        self.roster.emit_to_socket(
                            socket,
                            "fire-update",
                            &FireUpdate {
                                socket_id: socket,
                                kind: fire_event.unwrap(),
                                remaining_ms: remaining_ms as i64,
                                multiplier,
                                fire_cells: fire_cells.into_iter().collect(),
                            },
                        );
                    }
                }
            }

            if !self.completed && self.is_puzzle_complete() {
                last_square_bonus = POINTS_LAST_SQUARE;
                self.add_points(&user_name, last_square_bonus);
                self.completed = true;
                self.evict_all_bots();
            }
        }

        self.roster.emit_to_room(
            "cell-updated",
            &CellUpdated {
                row,
                col,
                letter,
                filler: user_name.clone(),
                user_name,
                delta,
                word_bonus,
                last_square_bonus,
                guess_correct,
                fire_event,
            },
        );
        self.queue_progress();
    }

    fn cursor_move(&mut self, socket: crate::SocketId, row: Row, col: Col, direction: Direction) {
        let Some(membership) = self.memberships.get_mut(&socket) else { return };
        membership.cursor_row = row;
        membership.cursor_col = col;
        membership.direction = direction;
        self.roster.emit_to_peers("cursor-moved", &CursorMoved { socket_id: socket, row, col, direction }, socket);
    }

    async fn pause(&mut self, socket: crate::SocketId) {
        if !self.memberships.contains_key(&socket) {
            return;
        }
        self.pause_set.insert(socket);
        if self.all_humans_paused() {
            self.stop_timer(true).await;
        }
    }

    fn resume(&mut self, socket: crate::SocketId) {
        let was_fully_paused = self.all_humans_paused();
        self.pause_set.remove(&socket);
        if was_fully_paused && !self.all_humans_paused() {
            self.timer_started_at = Some(Instant::now());
            self.roster.emit_to_room("timer-sync", &self.timer_sync());
        }
    }

    async fn hint_vote(&mut self, socket: crate::SocketId) {
        if self.hints.exhausted() {
            return;
        }
        let votes = self.hints.vote(socket);
        let total = self.memberships.values().filter(|m| !m.is_bot).count();
        self.roster.emit_to_room("hint-vote-update", &HintVoteUpdate { votes, total });
        if total > 0 && votes >= total {
            self.reveal_hints().await;
        }
    }

    fn hint_available(&mut self, socket: crate::SocketId) {
        let _ = socket;
        if self.hints.try_announce() {
            self.roster.emit_to_room("hint-available", &());
        }
    }

    async fn reveal_hints(&mut self) {
        let mut candidates: Vec<(Row, Col)> = self
            .puzzle
            .cells()
            .filter(|cell| {
                let correct = self.puzzle.correct_answer(cell.0, cell.1);
                self.shared_grid.get(cell).map(String::as_str) != correct && !self.hints.is_revealed(*cell)
            })
            .collect();
        candidates.shuffle(&mut self.rng);
        let remaining = HINT_MAX_CELLS.saturating_sub(self.hints.revealed.len());
        candidates.truncate(remaining);

        let mut revealed = Vec::with_capacity(candidates.len());
        for (row, col) in candidates {
            if let Some(letter) = self.puzzle.correct_answer(row, col) {
                self.shared_grid.insert((row, col), letter.to_string());
                self.cell_fillers.insert((row, col), HINT_SENTINEL.to_string());
                self.persist_cell(row, col, letter, HINT_SENTINEL);
                self.hints.reveal((row, col));
                revealed.push((row, col));
            }
        }
        self.roster.emit_to_room("hint-reveal", &HintReveal { cells: revealed });
        self.hints.clear_votes();
        self.queue_progress();
    }

    async fn clear_puzzle(&mut self) {
        self.evict_all_bots();
        let _ = self.store.clear_state(&self.date).await;
        self.shared_grid.clear();
        self.cell_fillers.clear();
        self.hints = HintState::default();
        self.completed = false;
        for (socket, fire) in self.fire.iter_mut() {
            if fire.on_fire {
                self.roster.emit_to_room("fire-expired", &FireExpired { socket_id: *socket });
            }
        }
        self.fire.clear();
        self.accumulated_ms = 0;
        self.timer_started_at = Some(Instant::now());
        self.roster.emit_to_room("timer-sync", &self.timer_sync());
        self.roster.emit_to_room("puzzle-cleared", &PuzzleCleared);
    }
}

impl Room {
    async fn add_ai(&mut self, difficulty: usize) {
        let bot_id = self.next_bot_id;
        self.next_bot_id += 1;
        let used: HashSet<&str> = self.memberships.values().map(|m| m.color.as_str()).collect();
        let color = CROSSWORD_BOT_PALETTE
            .iter()
            .find(|c| !used.contains(*c))
            .unwrap_or(&CROSSWORD_BOT_PALETTE[0])
            .to_string();
        let user_name = format!("Bot {}", self.bots.len() + 1);
        self.memberships.insert(bot_id, Membership::bot(user_name.clone(), color.clone()));

        let dow = noon_weekday(&self.date);
        let rotate = self.bots.len();
        let rng = SmallRng::from_rng(&mut rand::rng());
        let solver = BotSolver::new(bot_id, user_name.clone(), color.clone(), difficulty.min(4), dow, rotate, &self.puzzle, rng);
        self.bots.insert(bot_id, solver);

        self.roster.emit_to_room(
            "user-joined",
            &UserJoined { socket_id: bot_id, user_name, color, is_bot: true },
        );
    }

    fn start_ai(&mut self, bot_id: crate::SocketId) {
        if self.bots.contains_key(&bot_id) {
            self.scheduler.arm(format!("bot:{bot_id}:step"), Duration::from_millis(200), self.timers.tx());
        }
    }

    fn remove_ai(&mut self, bot_id: crate::SocketId) {
        self.evict_bot(bot_id);
    }

    fn get_ai_bots(&mut self, socket: crate::SocketId) {
        let bots = self
            .bots
            .iter()
            .map(|(id, solver)| AiBotEntry { bot_id: *id, user_name: solver.user_name.clone(), difficulty: solver.difficulty })
            .collect();
        self.roster.emit_to_socket(socket, "ai-bot-list", &AiBotList { bots });
    }

    fn evict_all_bots(&mut self) {
        let ids: Vec<_> = self.bots.keys().copied().collect();
        for id in ids {
            self.evict_bot(id);
        }
    }

    fn evict_bot(&mut self, bot_id: crate::SocketId) {
        if self.bots.remove(&bot_id).is_none() {
            return;
        }
        self.memberships.remove(&bot_id);
        self.scheduler.cancel_prefixed(&format!("bot:{bot_id}:"));
        if let Some(fire) = self.fire.remove(&bot_id) {
            if fire.on_fire {
                self.roster.emit_to_room("fire-expired", &FireExpired { socket_id: bot_id });
            }
        }
        self.roster.emit_to_room("user-left", &UserLeft { socket_id: bot_id });
    }

    async fn on_timer(&mut self, fired: TimerFired) {
        if !self.scheduler.is_current(&fired) {
            return;
        }
        if fired.name == PROGRESS_TIMER {
            self.broadcast_progress();
        } else if let Some(rest) = fired.name.strip_prefix("fire:") {
            if let Ok(socket) = rest.parse::<crate::SocketId>() {
                if let Some(fire) = self.fire.get_mut(&socket) {
                    fire.break_streak();
                    self.roster.emit_to_room("fire-expired", &FireExpired { socket_id: socket });
                }
            }
        } else if let Some(rest) = fired.name.strip_prefix("bot:") {
            if let Some((id_str, _tag)) = rest.split_once(':') {
                if let Ok(bot_id) = id_str.parse::<crate::SocketId>() {
                    self.step_bot(bot_id).await;
                }
            }
        }
    }

    async fn step_bot(&mut self, bot_id: crate::SocketId) {
        if !self.bots.contains_key(&bot_id) {
            return;
        }
        let action = {
            let grid = &self.shared_grid;
            let puzzle = &self.puzzle;
            self.bots.get_mut(&bot_id).unwrap().next_action(puzzle, grid)
        };
        match action {
            BotAction::Wander { row, col, delay_ms } => {
                if let Some(m) = self.memberships.get_mut(&bot_id) {
                    m.cursor_row = row;
                    m.cursor_col = col;
                }
                self.roster.emit_to_room(
                    "cursor-moved",
                    &CursorMoved { socket_id: bot_id, row, col, direction: Direction::Across },
                );
                self.scheduler.arm(format!("bot:{bot_id}:step"), Duration::from_millis(delay_ms), self.timers.tx());
            }
            BotAction::Fill { row, col, letter, delay_ms } => {
                self.roster.emit_to_room(
                    "cursor-moved",
                    &CursorMoved { socket_id: bot_id, row, col, direction: Direction::Across },
                );
                self.cell_update(bot_id, row, col, letter).await;
                self.scheduler.arm(format!("bot:{bot_id}:step"), Duration::from_millis(delay_ms), self.timers.tx());
            }
            BotAction::Skip { delay_ms } => {
                self.scheduler.arm(format!("bot:{bot_id}:step"), Duration::from_millis(delay_ms), self.timers.tx());
            }
            BotAction::Finished => {}
        }
    }
}

impl Room {
    fn add_points(&mut self, name: &str, delta: i32) {
        *self.points.entry(name.to_string()).or_insert(0) += delta;
        let store = self.store.clone();
        let (date, name, delta) = (self.date.clone(), name.to_string(), delta);
        tokio::spawn(async move {
            if let Err(e) = store.add_points(&date, &name, delta).await {
                log::warn!("add_points persistence failed for {name}: {e}");
            }
        });
    }

    fn add_guess(&mut self, name: &str, correct: bool) {
        let stat = self.guesses.entry(name.to_string()).or_insert((0, 0));
        stat.0 += 1;
        if !correct {
            stat.1 += 1;
        }
        let store = self.store.clone();
        let (date, name) = (self.date.clone(), name.to_string());
        tokio::spawn(async move {
            if let Err(e) = store.add_guess(&date, &name, correct).await {
                log::warn!("add_guess persistence failed for {name}: {e}");
            }
        });
    }

    fn persist_cell(&self, row: Row, col: Col, letter: &str, filler: &str) {
        let store = self.store.clone();
        let date = self.date.clone();
        let (letter, filler) = (letter.to_string(), filler.to_string());
        tokio::spawn(async move {
            if let Err(e) = store.upsert_cell(&date, row, col, &letter).await {
                log::warn!("upsert_cell persistence failed: {e}");
            }
            if let Err(e) = store.upsert_cell_filler(&date, row, col, &filler).await {
                log::warn!("upsert_cell_filler persistence failed: {e}");
            }
        });
    }

    async fn stop_timer(&mut self, persist: bool) {
        self.accumulated_ms += self.running_elapsed_ms();
        self.timer_started_at = None;
        if persist {
            let _ = self.store.save_timer(&self.date, self.accumulated_ms as f64 / 1000.0).await;
        }
    }

    fn running_elapsed_ms(&self) -> i64 {
        self.timer_started_at.map(|s| s.elapsed().as_millis() as i64).unwrap_or(0)
    }

    fn all_humans_paused(&self) -> bool {
        let humans: Vec<_> = self.memberships.iter().filter(|(_, m)| !m.is_bot).map(|(id, _)| *id).collect();
        !humans.is_empty() && humans.iter().all(|id| self.pause_set.contains(id))
    }

    fn words_completed_at(&self, row: Row, col: Col) -> u32 {
        let mut completed = 0;
        for clue in &self.puzzle.clues.across {
            if self.word_is_complete(clue, true, row, col) {
                completed += 1;
            }
        }
        for clue in &self.puzzle.clues.down {
            if self.word_is_complete(clue, false, row, col) {
                completed += 1;
            }
        }
        completed
    }

    fn word_is_complete(&self, clue: &crate::puzzle::Clue, across: bool, row: Row, col: Col) -> bool {
        let cells = self.puzzle.word_cells(clue, across);
        if !cells.contains(&(row, col)) {
            return false;
        }
        cells.iter().all(|(r, c)| self.shared_grid.get(&(*r, *c)).map(String::as_str) == self.puzzle.correct_answer(*r, *c))
    }

    fn is_puzzle_complete(&self) -> bool {
        self.puzzle.cells().all(|(r, c)| self.shared_grid.get(&(r, c)).map(String::as_str) == self.puzzle.correct_answer(r, c))
    }

    fn queue_progress(&mut self) {
        self.scheduler.arm(PROGRESS_TIMER, Duration::from_millis(PROGRESS_DEBOUNCE_MS), self.timers.tx());
    }

    fn broadcast_progress(&self) {
        let progress = PuzzleProgress {
            date: self.date.clone(),
            filled_cells: self.shared_grid.len(),
            total_cells: self.puzzle.cells().count(),
        };
        let count =
            RoomCount { date: self.date.clone(), humans: self.memberships.values().filter(|m| !m.is_bot).count() };
        self.roster.emit_to_room("puzzle-progress", &progress);
        self.roster.emit_to_room("room-count", &count);
        let calendar = self.calendar.clone();
        tokio::spawn(async move {
            calendar.emit("puzzle-progress", &progress).await;
            calendar.emit("room-count", &count).await;
        });
    }

    fn timer_sync(&self) -> TimerSync {
        TimerSync { accumulated_ms: self.accumulated_ms + self.running_elapsed_ms(), running: self.timer_started_at.is_some() }
    }

    fn snapshot(&self) -> RoomState {
        RoomState {
            date: self.date.clone(),
            members: self
                .memberships
                .iter()
                .map(|(id, m)| MemberView {
                    socket_id: *id,
                    user_name: m.user_name.clone(),
                    color: m.color.clone(),
                    cursor_row: m.cursor_row,
                    cursor_col: m.cursor_col,
                    direction: m.direction,
                    is_bot: m.is_bot,
                })
                .collect(),
            user_grid: self.shared_grid.iter().map(|((r, c), v)| (format!("{r},{c}"), v.clone())).collect(),
            cell_fillers: self.cell_fillers.iter().map(|((r, c), v)| (format!("{r},{c}"), v.clone())).collect(),
            points: self.points.clone(),
            guesses: self
                .guesses
                .iter()
                .map(|(name, (total, incorrect))| (name.clone(), GuessView { total: *total, incorrect: *incorrect }))
                .collect(),
            accumulated_ms: self.accumulated_ms + self.running_elapsed_ms(),
            paused: self.all_humans_paused(),
        }
    }
}

/// Weekday of `date` (YYYY-MM-DD) interpreted at noon local time.
fn noon_weekday(date: &str) -> usize {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()))
        .map(|dt| dt.weekday().num_days_from_sunday() as usize)
        .unwrap_or(0)
}
