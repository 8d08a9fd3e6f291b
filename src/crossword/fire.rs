use crate::puzzle::{Col, Row};
use crate::{FIRE_BASE_MULTIPLIER, FIRE_DURATION_MS, FIRE_EXTEND_MS, FIRE_WINDOW_MS, FIRE_WORDS_TO_IGNITE};
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
struct Completion {
    at: Instant,
    count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireEvent {
    Started,
    Extended,
    Broken,
}

/// Per-membership streak bonus state. `on_fire` is kept in sync with an
/// armed expiry timer by the room: whenever this struct flips `on_fire` to
/// true, the room must arm the matching expiry timer in the same tick, and
/// whenever the timer fires the room must call [`FireStreak::break_streak`].
#[derive(Debug, Default, Clone)]
pub struct FireStreak {
    recent: VecDeque<Completion>,
    pub on_fire: bool,
    pub expires_at: Option<Instant>,
    pub fire_cells: HashSet<(Row, Col)>,
    pub multiplier: f32,
    pub words_completed_on_fire: u32,
}

impl FireStreak {
    pub fn is_live(&self, now: Instant) -> bool {
        self.on_fire && self.expires_at.is_some_and(|e| now < e)
    }

    /// Record a word completion that happened while NOT already on fire.
    /// Returns `Started` once the rolling 30s count reaches the ignition
    /// threshold; the caller is responsible for filling in `fire_cells`
    /// from the room's filler map before broadcasting.
    pub fn record(&mut self, now: Instant, completed: u32) -> Option<FireEvent> {
        self.recent.push_back(Completion { at: now, count: completed });
        self.prune(now);
        let total: u32 = self.recent.iter().map(|c| c.count).sum();
        if total >= FIRE_WORDS_TO_IGNITE {
            self.ignite(now);
            Some(FireEvent::Started)
        } else {
            None
        }
    }

    pub fn ignite(&mut self, now: Instant) {
        self.on_fire = true;
        self.expires_at = Some(now + Duration::from_millis(FIRE_DURATION_MS as u64));
        self.multiplier = FIRE_BASE_MULTIPLIER;
        self.words_completed_on_fire = 0;
        self.recent.clear();
    }

    /// Extend an already-burning streak. Multiplier is monotonically
    /// non-decreasing while on fire (it only ever grows with more
    /// completions), matching the invariant in spec.md §8.
    pub fn extend(&mut self, now: Instant, completed: u32) {
        let base = self.expires_at.unwrap_or(now);
        self.expires_at = Some(base + Duration::from_millis(FIRE_EXTEND_MS as u64));
        self.words_completed_on_fire += completed;
        self.multiplier = FIRE_BASE_MULTIPLIER + 0.5 * (self.words_completed_on_fire / 3) as f32;
    }

    pub fn break_streak(&mut self) {
        self.on_fire = false;
        self.expires_at = None;
        self.recent.clear();
    }

    /// Drop the rolling completion window without touching `on_fire` —
    /// used when an incorrect fill resets the streak-to-ignition count.
    pub fn reset_recent(&mut self) {
        self.recent.clear();
    }

    fn prune(&mut self, now: Instant) {
        let window = Duration::from_millis(FIRE_WINDOW_MS as u64);
        while let Some(front) = self.recent.front() {
            if now.duration_since(front.at) > window {
                self.recent.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignites_once_threshold_reached() {
        let mut fire = FireStreak::default();
        let t0 = Instant::now();
        assert!(fire.record(t0, 1).is_none());
        assert!(fire.record(t0, 1).is_none());
        assert_eq!(fire.record(t0, 1), Some(FireEvent::Started));
        assert!(fire.on_fire);
        assert_eq!(fire.multiplier, 1.5);
    }

    #[test]
    fn multiplier_never_decreases_while_on_fire() {
        let mut fire = FireStreak::default();
        let t0 = Instant::now();
        fire.ignite(t0);
        let m0 = fire.multiplier;
        fire.extend(t0, 3);
        assert!(fire.multiplier >= m0);
        let m1 = fire.multiplier;
        fire.extend(t0, 3);
        assert!(fire.multiplier >= m1);
    }

    #[test]
    fn reignition_resets_multiplier_to_base() {
        let mut fire = FireStreak::default();
        let t0 = Instant::now();
        fire.ignite(t0);
        fire.extend(t0, 6);
        assert!(fire.multiplier > FIRE_BASE_MULTIPLIER);
        fire.break_streak();
        fire.ignite(t0);
        assert_eq!(fire.multiplier, FIRE_BASE_MULTIPLIER);
    }

    #[test]
    fn old_completions_fall_out_of_the_window() {
        let mut fire = FireStreak::default();
        let t0 = Instant::now();
        fire.record(t0, 2);
        let later = t0 + Duration::from_millis(FIRE_WINDOW_MS as u64 + 1);
        assert_eq!(fire.record(later, 1), None);
    }
}
