use super::ai::{self, AiDifficulty};
use super::event::*;
use super::message::Inbound;
use super::phase::{Phase, RoundKind};
use super::player::Player;
use crate::judge::AnswerJudge;
use crate::persistence::Store;
use crate::scheduler::{Scheduler, TimerFired};
use crate::transport::{Channel, OutboundHandle, Roster};
use crate::trivia::{JeopardyGame, Round};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// bots mint ids above every possible connection-assigned socket id
const BOT_ID_BASE: crate::SocketId = 1 << 41;
const MAX_PLAYERS: usize = 4;

const READING_DELAY_MS: u64 = 3_000;
const BUZZER_WINDOW_MS: u64 = 5_000;
const ANSWER_TIMEOUT_MS: u64 = 10_000;
const REBUZZ_DELAY_MS: u64 = 1_500;
const REVEAL_DELAY_MS: u64 = 3_000;
const CORRECT_ADVANCE_MS: u64 = 2_500;
const ROUND_ADVANCE_MS: u64 = 3_000;
const FINAL_CATEGORY_DELAY_MS: u64 = 5_000;
const FINAL_ANSWER_WINDOW_MS: u64 = 30_000;
const FINAL_REVEAL_INTERVAL_MS: u64 = 3_000;
const EVICT_DELAY_MS: u64 = 5 * 60 * 1_000;
const CPU_SELECT_DELAY_MS: u64 = 1_500;
const CPU_ANSWER_DELAY_MS: u64 = 1_500;

pub enum RoomEvent {
    Connect {
        socket: crate::SocketId,
        outbound: OutboundHandle,
    },
    Disconnect {
        socket: crate::SocketId,
    },
    Message {
        socket: crate::SocketId,
        msg: Inbound,
    },
}

#[derive(Clone)]
struct CurrentClue {
    category: String,
    row: u8,
    value: i32,
    answer: String,
    daily_double: bool,
}

pub struct Room {
    room_id: String,
    game: JeopardyGame,
    store: Arc<dyn Store>,
    channel: Channel<RoomEvent>,
    timers: Channel<TimerFired>,
    roster: Roster,
    join_order: Vec<crate::SocketId>,
    players: HashMap<crate::SocketId, Player>,
    host_socket: crate::SocketId,
    controlling_player: crate::SocketId,
    phase: Phase,
    round: RoundKind,
    used_clues: HashSet<(String, u8)>,
    current_clue: Option<CurrentClue>,
    buzzed_players: HashSet<crate::SocketId>,
    answering_player: Option<crate::SocketId>,
    daily_double_wager: i32,
    final_wagers: HashMap<crate::SocketId, i32>,
    final_answers: HashMap<crate::SocketId, String>,
    final_reveal_order: Vec<crate::SocketId>,
    final_reveal_index: usize,
    clues_answered: u32,
    total_clues: u32,
    scheduler: Scheduler,
    next_bot_id: crate::SocketId,
    rng: SmallRng,
}

impl Room {
    pub fn spawn(
        room_id: String,
        game: JeopardyGame,
        store: Arc<dyn Store>,
        host_socket: crate::SocketId,
        host_outbound: OutboundHandle,
        host_name: String,
    ) -> UnboundedSender<RoomEvent> {
        let total_clues =
            (game.jeopardy_round.clues.len() + game.double_jeopardy_round.clues.len()) as u32;
        let mut roster = Roster::default();
        roster.join(host_socket, host_outbound);
        let mut players = HashMap::new();
        players.insert(
            host_socket,
            Player::human(clamp_name(&host_name), crate::MATERIAL_PALETTE[0].to_string(), None),
        );
        let channel = Channel::default();
        let tx = channel.tx();
        let room = Self {
            room_id,
            game,
            store,
            channel,
            timers: Channel::default(),
            roster,
            join_order: vec![host_socket],
            players,
            host_socket,
            controlling_player: host_socket,
            phase: Phase::Lobby,
            round: RoundKind::Jeopardy,
            used_clues: HashSet::new(),
            current_clue: None,
            buzzed_players: HashSet::new(),
            answering_player: None,
            daily_double_wager: 0,
            final_wagers: HashMap::new(),
            final_answers: HashMap::new(),
            final_reveal_order: Vec::new(),
            final_reveal_index: 0,
            clues_answered: 0,
            total_clues,
            scheduler: Scheduler::default(),
            next_bot_id: BOT_ID_BASE,
            rng: SmallRng::from_rng(&mut rand::rng()),
        };
        tokio::spawn(room.run());
        tx
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.channel.rx().recv() => match event {
                    Some(RoomEvent::Connect { socket, outbound }) => self.roster.join(socket, outbound),
                    Some(RoomEvent::Disconnect { socket }) => self.on_disconnect(socket).await,
                    Some(RoomEvent::Message { socket, msg }) => self.dispatch(socket, msg).await,
                    None => return,
                },
                Some(fired) = self.timers.rx().recv() => {
                    let is_evict = fired.name == "evict" && self.scheduler.is_current(&fired);
                    self.on_timer(fired).await;
                    if is_evict {
                        return;
                    }
                },
            }
            if self.players.is_empty() {
                return;
            }
        }
    }

    async fn dispatch(&mut self, socket: crate::SocketId, msg: Inbound) {
        match msg {
            Inbound::CreateRoom { .. } => {}
            Inbound::JoinRoom { user_name, .. } => self.join_room(socket, user_name).await,
            Inbound::LeaveRoom => self.on_disconnect(socket).await,
            Inbound::StartGame => self.start_game(socket).await,
            Inbound::ChangeGame | Inbound::RandomGame => self.change_game(socket).await,
            Inbound::SelectClue { category, row } => self.select_clue(socket, category, row).await,
            Inbound::BuzzIn => self.buzz_in(socket).await,
            Inbound::SubmitAnswer { answer } => self.submit_answer(socket, answer).await,
            Inbound::DailyDoubleWager { wager } => self.daily_double_wager(socket, wager).await,
            Inbound::FinalJeopardyWager { wager } => self.final_wager(socket, wager).await,
            Inbound::FinalJeopardyAnswer { answer } => self.final_answer(socket, answer).await,
            Inbound::AddCpu { difficulty } => self.add_cpu(socket, difficulty).await,
            Inbound::RemoveCpu { bot_id } => self.remove_cpu(socket, bot_id).await,
        }
    }

    async fn join_room(&mut self, socket: crate::SocketId, user_name: String) {
        if self.phase != Phase::Lobby
            || self.players.len() >= MAX_PLAYERS
            || self.players.contains_key(&socket)
        {
            return;
        }
        let color = self.next_color();
        let player = Player::human(clamp_name(&user_name), color, None);
        self.join_order.push(socket);
        self.players.insert(socket, player.clone());
        self.roster.emit_to_room(
            "player-joined",
            &PlayerJoined { player: PlayerView::of(socket, &player) },
        );
        self.roster.emit_to_socket(socket, "room-state", &self.snapshot());
    }

    async fn start_game(&mut self, socket: crate::SocketId) {
        if socket != self.host_socket || self.phase != Phase::Lobby {
            return;
        }
        self.seed_used_clues();
        self.phase = Phase::SelectingClue;
        self.broadcast_phase();
        self.maybe_schedule_cpu_select();
    }

    async fn change_game(&mut self, socket: crate::SocketId) {
        if socket != self.host_socket || self.phase != Phase::Lobby {
            return;
        }
        if let Ok(Some(game)) = self.store.get_random_jeopardy_game().await {
            self.total_clues =
                (game.jeopardy_round.clues.len() + game.double_jeopardy_round.clues.len()) as u32;
            self.clues_answered = 0;
            self.round = RoundKind::Jeopardy;
            self.used_clues.clear();
            self.game = game;
            self.roster.emit_to_room("room-state", &self.snapshot());
        }
    }

    async fn select_clue(&mut self, socket: crate::SocketId, category: String, row: u8) {
        if socket != self.controlling_player || self.phase != Phase::SelectingClue {
            return;
        }
        if !(1..=5).contains(&row) || self.used_clues.contains(&(category.clone(), row)) {
            return;
        }
        let Some(clue) = self.current_round_data().clue_at(&category, row).cloned() else {
            return;
        };
        self.used_clues.insert((category.clone(), row));
        self.current_clue = Some(CurrentClue {
            category: category.clone(),
            row,
            value: clue.value,
            answer: clue.answer.clone(),
            daily_double: clue.daily_double,
        });
        self.buzzed_players.clear();

        if clue.daily_double {
            self.answering_player = Some(self.controlling_player);
            self.phase = Phase::DailyDoubleWager;
            let (min, max) = self.daily_double_wager_bounds(self.controlling_player);
            self.roster.emit_to_room(
                "daily-double",
                &DailyDouble { socket_id: self.controlling_player, min_wager: min, max_wager: max },
            );
            self.broadcast_phase();
            self.maybe_submit_cpu_wager(self.controlling_player).await;
        } else {
            self.phase = Phase::ReadingClue;
            self.roster.emit_to_room(
                "clue-selected",
                &ClueSelected { category, row, value: clue.value, clue: clue.clue, daily_double: false },
            );
            self.broadcast_phase();
            let tx = self.timers.tx();
            self.scheduler.arm("reading", Duration::from_millis(READING_DELAY_MS), tx);
        }
    }

    fn enter_buzzer_open(&mut self) {
        self.phase = Phase::BuzzerOpen;
        self.broadcast_phase();
        let tx = self.timers.tx();
        self.scheduler.arm("buzzer-open", Duration::from_millis(BUZZER_WINDOW_MS), tx);
        self.schedule_cpu_buzzes();
    }

    fn schedule_cpu_buzzes(&mut self) {
        let candidates: Vec<(crate::SocketId, AiDifficulty)> = self
            .players
            .iter()
            .filter(|(id, _)| !self.buzzed_players.contains(*id))
            .filter_map(|(id, p)| p.ai_difficulty.map(|d| (*id, d)))
            .collect();
        for (id, difficulty) in candidates {
            if let Some(delay_ms) = ai::buzz_delay_ms(difficulty, &mut self.rng) {
                let tx = self.timers.tx();
                self.scheduler.arm(format!("cpu-buzz:{id}"), Duration::from_millis(delay_ms), tx);
            }
        }
    }

    async fn buzz_in(&mut self, socket: crate::SocketId) {
        if self.phase != Phase::BuzzerOpen
            || self.buzzed_players.contains(&socket)
            || !self.players.contains_key(&socket)
        {
            return;
        }
        self.scheduler.cancel("buzzer-open");
        self.scheduler.cancel_prefixed("cpu-buzz:");
        self.buzzed_players.insert(socket);
        self.answering_player = Some(socket);
        self.phase = Phase::PlayerAnswering;
        self.roster.emit_to_room("buzzer-result", &BuzzerResult { socket_id: socket });
        self.broadcast_phase();
        let tx = self.timers.tx();
        self.scheduler.arm("answer", Duration::from_millis(ANSWER_TIMEOUT_MS), tx);
        self.maybe_schedule_cpu_answer(socket);
    }

    async fn submit_answer(&mut self, socket: crate::SocketId, answer: String) {
        let valid_phase = matches!(self.phase, Phase::PlayerAnswering | Phase::DailyDoubleAnswer);
        if !valid_phase || Some(socket) != self.answering_player {
            return;
        }
        self.scheduler.cancel("answer");
        self.resolve_answer(socket, answer).await;
    }

    async fn resolve_answer(&mut self, socket: crate::SocketId, answer: String) {
        let Some(clue) = self.current_clue.clone() else { return };
        let judgment = AnswerJudge::check(&answer, &clue.answer);
        let wager = if clue.daily_double { self.daily_double_wager } else { clue.value };
        let delta = if judgment.correct { wager } else { -wager };
        self.apply_score(socket, delta);
        self.roster.emit_to_room(
            "answer-result",
            &AnswerResult {
                socket_id: socket,
                answer,
                correct: judgment.correct,
                score_change: delta,
                correct_answer: clue.answer.clone(),
            },
        );
        self.broadcast_scores();
        self.answering_player = None;
        self.phase = Phase::ShowingResult;
        self.broadcast_phase();

        if clue.daily_double {
            self.clues_answered += 1;
            self.persist_progress();
            let delay = if judgment.correct { CORRECT_ADVANCE_MS } else { ROUND_ADVANCE_MS };
            let tx = self.timers.tx();
            self.scheduler.arm("advance", Duration::from_millis(delay), tx);
            return;
        }

        if judgment.correct {
            self.controlling_player = socket;
            self.clues_answered += 1;
            self.persist_progress();
            let tx = self.timers.tx();
            self.scheduler.arm("advance", Duration::from_millis(CORRECT_ADVANCE_MS), tx);
        } else if self.anyone_left_to_buzz() {
            // clue stays live for the remaining un-buzzed players
            let tx = self.timers.tx();
            self.scheduler.arm("rebuzz", Duration::from_millis(REBUZZ_DELAY_MS), tx);
        } else {
            self.clues_answered += 1;
            self.persist_progress();
            let tx = self.timers.tx();
            self.scheduler.arm("advance", Duration::from_millis(ROUND_ADVANCE_MS), tx);
        }
    }

    fn anyone_left_to_buzz(&self) -> bool {
        self.players.keys().any(|s| !self.buzzed_players.contains(s))
    }

    async fn on_buzzer_timeout(&mut self) {
        self.scheduler.cancel_prefixed("cpu-buzz:");
        let Some(clue) = self.current_clue.clone() else { return };
        self.clues_answered += 1;
        self.persist_progress();
        self.roster.emit_to_room("buzzer-expired", &BuzzerExpired { correct_answer: clue.answer });
        self.phase = Phase::ShowingResult;
        self.broadcast_phase();
        let tx = self.timers.tx();
        self.scheduler.arm("advance", Duration::from_millis(REVEAL_DELAY_MS), tx);
    }

    async fn enter_selecting_clue(&mut self) {
        self.current_clue = None;
        self.buzzed_players.clear();
        self.answering_player = None;
        if self.all_clues_used() {
            match self.round.next() {
                Some(RoundKind::FinalJeopardy) => {
                    self.round = RoundKind::FinalJeopardy;
                    self.enter_final_category();
                    return;
                }
                Some(next) => {
                    self.round = next;
                    self.used_clues.clear();
                    self.seed_used_clues();
                    self.roster.emit_to_room(
                        "round-change",
                        &RoundChange { round: self.round, categories: self.current_round_data().categories.clone() },
                    );
                }
                None => {}
            }
        }
        self.phase = Phase::SelectingClue;
        self.broadcast_phase();
        self.maybe_schedule_cpu_select();
    }

    fn all_clues_used(&self) -> bool {
        self.current_round_data()
            .slots()
            .all(|(cat, row)| self.used_clues.contains(&(cat.to_string(), row)))
    }

    fn seed_used_clues(&mut self) {
        let round = self.current_round_data();
        let missing: Vec<(String, u8)> = round
            .categories
            .iter()
            .flat_map(|cat| (1..=5u8).map(move |row| (cat.clone(), row)))
            .filter(|(cat, row)| round.clue_at(cat, *row).is_none())
            .collect();
        self.used_clues.extend(missing);
    }

    fn current_round_data(&self) -> &Round {
        match self.round {
            RoundKind::Jeopardy => &self.game.jeopardy_round,
            RoundKind::DoubleJeopardy => &self.game.double_jeopardy_round,
            RoundKind::FinalJeopardy => unreachable!("final jeopardy has no category board"),
        }
    }

    fn daily_double_wager_bounds(&self, socket: crate::SocketId) -> (i32, i32) {
        let score = self.players.get(&socket).map(|p| p.score).unwrap_or(0);
        let floor = self.round.min_wager_floor();
        if score < 0 {
            (floor, floor)
        } else {
            (5, floor.max(score))
        }
    }

    async fn daily_double_wager(&mut self, socket: crate::SocketId, wager: i32) {
        if self.phase != Phase::DailyDoubleWager || Some(socket) != self.answering_player {
            return;
        }
        let (min, max) = self.daily_double_wager_bounds(socket);
        self.apply_daily_double_wager(socket, wager.clamp(min, max));
    }

    async fn maybe_submit_cpu_wager(&mut self, socket: crate::SocketId) {
        let Some(difficulty) = self.players.get(&socket).and_then(|p| p.ai_difficulty) else { return };
        let (min, max) = self.daily_double_wager_bounds(socket);
        let wager = ai::wager(difficulty, max, &mut self.rng).clamp(min, max);
        self.apply_daily_double_wager(socket, wager);
    }

    fn apply_daily_double_wager(&mut self, socket: crate::SocketId, wager: i32) {
        self.daily_double_wager = wager;
        self.phase = Phase::DailyDoubleAnswer;
        self.broadcast_phase();
        let tx = self.timers.tx();
        self.scheduler.arm("answer", Duration::from_millis(ANSWER_TIMEOUT_MS), tx);
        self.maybe_schedule_cpu_answer(socket);
    }

    fn maybe_schedule_cpu_answer(&mut self, socket: crate::SocketId) {
        if self.players.get(&socket).map(|p| p.is_ai()).unwrap_or(false) {
            let tx = self.timers.tx();
            self.scheduler.arm(format!("cpu-answer:{socket}"), Duration::from_millis(CPU_ANSWER_DELAY_MS), tx);
        }
    }

    fn maybe_schedule_cpu_select(&mut self) {
        if self.players.get(&self.controlling_player).map(|p| p.is_ai()).unwrap_or(false) {
            let tx = self.timers.tx();
            self.scheduler.arm("cpu-select", Duration::from_millis(CPU_SELECT_DELAY_MS), tx);
        }
    }

    async fn on_cpu_select(&mut self) {
        if self.phase != Phase::SelectingClue {
            return;
        }
        if self.players.get(&self.controlling_player).and_then(|p| p.ai_difficulty).is_none() {
            return;
        }
        let unused: Vec<(String, u8)> = self
            .current_round_data()
            .slots()
            .map(|(cat, row)| (cat.to_string(), row))
            .filter(|slot| !self.used_clues.contains(slot))
            .collect();
        if let Some((category, row)) = ai::pick_clue(&unused, &mut self.rng).cloned() {
            let controller = self.controlling_player;
            self.select_clue(controller, category, row).await;
        }
    }

    async fn on_cpu_buzz(&mut self, raw: &str) {
        if let Ok(socket) = raw.parse::<crate::SocketId>() {
            self.buzz_in(socket).await;
        }
    }

    async fn on_cpu_answer(&mut self, raw: &str) {
        let Ok(socket) = raw.parse::<crate::SocketId>() else { return };
        if Some(socket) != self.answering_player {
            return;
        }
        let Some(difficulty) = self.players.get(&socket).and_then(|p| p.ai_difficulty) else { return };
        let correct = ai::answers_correctly(difficulty, &mut self.rng);
        let answer = if correct {
            self.current_clue.as_ref().map(|c| c.answer.clone()).unwrap_or_default()
        } else {
            String::new()
        };
        self.scheduler.cancel("answer");
        self.resolve_answer(socket, answer).await;
    }

    async fn final_wager(&mut self, socket: crate::SocketId, wager: i32) {
        if self.phase != Phase::FinalWager
            || !self.players.contains_key(&socket)
            || self.final_wagers.contains_key(&socket)
        {
            return;
        }
        let ceiling = self.players[&socket].score.max(0);
        self.final_wagers.insert(socket, wager.clamp(0, ceiling));
        self.roster.emit_to_room("final-wager-submitted", &FinalWagerSubmitted { socket_id: socket });
        self.maybe_advance_to_final_clue();
    }

    fn enter_final_category(&mut self) {
        self.phase = Phase::FinalCategory;
        self.final_wagers.clear();
        self.final_answers.clear();
        self.final_reveal_order.clear();
        self.final_reveal_index = 0;
        let category = self.game.final_jeopardy.as_ref().map(|f| f.category.clone()).unwrap_or_default();
        self.roster.emit_to_room("final-category", &FinalCategory { category });
        self.broadcast_phase();
        let tx = self.timers.tx();
        self.scheduler.arm("final-wager-open", Duration::from_millis(FINAL_CATEGORY_DELAY_MS), tx);
    }

    fn enter_final_wager(&mut self) {
        self.phase = Phase::FinalWager;
        self.broadcast_phase();
        let cpus: Vec<(crate::SocketId, AiDifficulty, i32)> = self
            .players
            .iter()
            .filter_map(|(id, p)| p.ai_difficulty.map(|d| (*id, d, p.score.max(0))))
            .collect();
        for (id, difficulty, ceiling) in cpus {
            let w = ai::wager(difficulty, ceiling, &mut self.rng).clamp(0, ceiling);
            self.final_wagers.insert(id, w);
            self.roster.emit_to_room("final-wager-submitted", &FinalWagerSubmitted { socket_id: id });
        }
        self.maybe_advance_to_final_clue();
    }

    fn maybe_advance_to_final_clue(&mut self) {
        if self.final_wagers.len() == self.players.len() {
            self.scheduler.cancel("final-wager-open");
            self.enter_final_clue();
        }
    }

    fn enter_final_clue(&mut self) {
        self.phase = Phase::FinalClue;
        let clue = self.game.final_jeopardy.as_ref().map(|f| f.clue.clone()).unwrap_or_default();
        self.roster.emit_to_room("final-clue", &FinalClue { clue });
        self.broadcast_phase();
        let tx = self.timers.tx();
        self.scheduler.arm("final-answer-close", Duration::from_millis(FINAL_ANSWER_WINDOW_MS), tx);

        let cpus: Vec<(crate::SocketId, AiDifficulty)> = self
            .players
            .iter()
            .filter_map(|(id, p)| p.ai_difficulty.map(|d| (*id, d)))
            .collect();
        for (id, difficulty) in cpus {
            let correct = ai::answers_correctly(difficulty, &mut self.rng);
            let answer = if correct {
                self.game.final_jeopardy.as_ref().map(|f| f.answer.clone()).unwrap_or_default()
            } else {
                String::new()
            };
            self.final_answers.insert(id, answer);
            self.roster.emit_to_room("final-answer-submitted", &FinalAnswerSubmitted { socket_id: id });
        }
        self.maybe_advance_to_final_results();
    }

    async fn final_answer(&mut self, socket: crate::SocketId, answer: String) {
        if self.phase != Phase::FinalClue
            || !self.players.contains_key(&socket)
            || self.final_answers.contains_key(&socket)
        {
            return;
        }
        self.final_answers.insert(socket, answer);
        self.roster.emit_to_room("final-answer-submitted", &FinalAnswerSubmitted { socket_id: socket });
        self.maybe_advance_to_final_results();
    }

    fn maybe_advance_to_final_results(&mut self) {
        if self.final_answers.len() == self.players.len() {
            self.scheduler.cancel("final-answer-close");
            self.enter_final_results();
        }
    }

    fn enter_final_results(&mut self) {
        self.phase = Phase::FinalResults;
        self.broadcast_phase();
        let mut order: Vec<(crate::SocketId, i32)> =
            self.players.iter().map(|(id, p)| (*id, p.score)).collect();
        order.sort_by_key(|(_, score)| *score);
        self.final_reveal_order = order.into_iter().map(|(id, _)| id).collect();
        self.final_reveal_index = 0;
        let tx = self.timers.tx();
        self.scheduler.arm("final-reveal", Duration::from_millis(FINAL_REVEAL_INTERVAL_MS), tx);
    }

    fn reveal_one(&mut self) {
        let Some(&socket) = self.final_reveal_order.get(self.final_reveal_index) else {
            self.broadcast_scores();
            self.enter_game_over();
            return;
        };
        let Some(final_clue) = self.game.final_jeopardy.clone() else {
            self.enter_game_over();
            return;
        };
        let wager = self.final_wagers.get(&socket).copied().unwrap_or(0);
        let answer = self.final_answers.get(&socket).cloned().unwrap_or_default();
        let judgment = AnswerJudge::check(&answer, &final_clue.answer);
        let delta = if judgment.correct { wager } else { -wager };
        self.apply_score(socket, delta);
        let new_score = self.players.get(&socket).map(|p| p.score).unwrap_or(0);
        self.roster.emit_to_room(
            "final-jeopardy-reveal",
            &FinalJeopardyReveal {
                socket_id: socket,
                answer,
                correct: judgment.correct,
                wager,
                score_change: delta,
                new_score,
            },
        );
        self.final_reveal_index += 1;
        let tx = self.timers.tx();
        self.scheduler.arm("final-reveal", Duration::from_millis(FINAL_REVEAL_INTERVAL_MS), tx);
    }

    fn enter_game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.broadcast_phase();
        let winner = self.players.iter().max_by_key(|(_, p)| p.score).map(|(id, _)| *id);
        let final_scores = self.players.iter().map(|(id, p)| PlayerScore { socket_id: *id, score: p.score }).collect();
        self.roster.emit_to_room("game-over", &GameOver { winner_socket: winner, final_scores });
        self.persist_progress();
        let tx = self.timers.tx();
        self.scheduler.arm("evict", Duration::from_millis(EVICT_DELAY_MS), tx);
    }

    async fn add_cpu(&mut self, socket: crate::SocketId, difficulty: String) {
        if socket != self.host_socket || self.phase != Phase::Lobby || self.players.len() >= MAX_PLAYERS {
            return;
        }
        let Some(difficulty) = AiDifficulty::parse(&difficulty) else { return };
        let bot_id = self.next_bot_id;
        self.next_bot_id += 1;
        let color = self.next_color();
        let user_name = format!("CPU-{}", bot_id - BOT_ID_BASE + 1);
        let player = Player::cpu(user_name, color, difficulty);
        self.join_order.push(bot_id);
        self.players.insert(bot_id, player.clone());
        self.roster.emit_to_room("player-joined", &PlayerJoined { player: PlayerView::of(bot_id, &player) });
    }

    async fn remove_cpu(&mut self, socket: crate::SocketId, bot_id: crate::SocketId) {
        if socket != self.host_socket || bot_id < BOT_ID_BASE {
            return;
        }
        if self.players.remove(&bot_id).is_some() {
            self.join_order.retain(|&id| id != bot_id);
            self.scheduler.cancel_prefixed(&format!("cpu-buzz:{bot_id}"));
            self.scheduler.cancel(&format!("cpu-answer:{bot_id}"));
            self.reassign_roles_if(bot_id);
            self.roster.emit_to_room("player-left", &PlayerLeft { socket_id: bot_id });
        }
    }

    async fn on_disconnect(&mut self, socket: crate::SocketId) {
        self.roster.leave(socket);
        if self.players.remove(&socket).is_none() {
            return;
        }
        self.join_order.retain(|&id| id != socket);
        self.scheduler.cancel_prefixed(&format!("cpu-buzz:{socket}"));
        self.scheduler.cancel(&format!("cpu-answer:{socket}"));
        self.buzzed_players.remove(&socket);
        self.final_wagers.remove(&socket);
        self.final_answers.remove(&socket);
        self.roster.emit_to_room("player-left", &PlayerLeft { socket_id: socket });

        if self.players.is_empty() {
            return;
        }

        self.reassign_roles_if(socket);

        if self.answering_player == Some(socket) {
            match self.phase {
                Phase::PlayerAnswering => {
                    self.scheduler.cancel("answer");
                    self.answering_player = None;
                    if self.anyone_left_to_buzz() {
                        self.enter_buzzer_open();
                    } else {
                        self.enter_selecting_clue().await;
                    }
                }
                Phase::DailyDoubleAnswer => {
                    self.scheduler.cancel("answer");
                    self.answering_player = None;
                    self.enter_selecting_clue().await;
                }
                _ => {}
            }
        }
        self.broadcast_scores();
    }

    fn reassign_roles_if(&mut self, departed: crate::SocketId) {
        let Some(&replacement) = self.join_order.first() else { return };
        if self.host_socket == departed {
            self.host_socket = replacement;
        }
        if self.controlling_player == departed {
            self.controlling_player = replacement;
        }
    }

    fn apply_score(&mut self, socket: crate::SocketId, delta: i32) {
        if let Some(player) = self.players.get_mut(&socket) {
            player.score += delta;
        }
    }

    fn broadcast_scores(&self) {
        let scores = self.players.iter().map(|(id, p)| PlayerScore { socket_id: *id, score: p.score }).collect();
        self.roster.emit_to_room("scores-update", &ScoresUpdate { scores });
    }

    fn broadcast_phase(&self) {
        self.roster.emit_to_room("phase-change", &PhaseChange { phase: self.phase });
    }

    fn next_color(&self) -> String {
        crate::MATERIAL_PALETTE[self.players.len() % crate::MATERIAL_PALETTE.len()].to_string()
    }

    fn persist_progress(&self) {
        let store = self.store.clone();
        let game_id = self.game.game_id.clone();
        let clues_answered = self.clues_answered;
        let total_clues = self.total_clues;
        let round = round_label(self.round).to_string();
        let completed = self.phase == Phase::GameOver;
        tokio::spawn(async move {
            if let Err(err) = store
                .save_jeopardy_progress(&game_id, clues_answered, total_clues, &round, completed)
                .await
            {
                log::warn!("failed to persist jeopardy progress for {game_id}: {err}");
            }
        });
    }

    async fn on_timer(&mut self, fired: TimerFired) {
        if !self.scheduler.is_current(&fired) {
            return;
        }
        if let Some(raw) = fired.name.strip_prefix("cpu-buzz:") {
            self.on_cpu_buzz(raw).await;
            return;
        }
        if let Some(raw) = fired.name.strip_prefix("cpu-answer:") {
            self.on_cpu_answer(raw).await;
            return;
        }
        match fired.name.as_str() {
            "reading" => self.enter_buzzer_open(),
            "buzzer-open" => self.on_buzzer_timeout().await,
            "rebuzz" => self.enter_buzzer_open(),
            "advance" => self.enter_selecting_clue().await,
            "final-wager-open" => self.enter_final_wager(),
            "final-answer-close" => self.enter_final_results(),
            "final-reveal" => self.reveal_one(),
            "cpu-select" => self.on_cpu_select().await,
            "evict" => self.scheduler.cancel_all(),
            _ => {}
        }
    }

    fn snapshot(&self) -> RoomState {
        let categories = if self.round == RoundKind::FinalJeopardy {
            self.game.final_jeopardy.as_ref().map(|f| vec![f.category.clone()]).unwrap_or_default()
        } else {
            self.current_round_data().categories.clone()
        };
        RoomState {
            room_id: self.room_id.clone(),
            game_id: self.game.game_id.clone(),
            phase: self.phase,
            round: self.round,
            categories,
            players: self.players.iter().map(|(id, p)| PlayerView::of(*id, p)).collect(),
            host_socket: self.host_socket,
            controlling_player: self.controlling_player,
            used_clues: self.used_clues.iter().cloned().collect(),
        }
    }
}

fn round_label(round: RoundKind) -> &'static str {
    match round {
        RoundKind::Jeopardy => "jeopardy",
        RoundKind::DoubleJeopardy => "doubleJeopardy",
        RoundKind::FinalJeopardy => "finalJeopardy",
    }
}

fn clamp_name(raw: &str) -> String {
    raw.trim().chars().take(20).collect()
}
