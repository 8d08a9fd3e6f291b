use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Delivered back onto a room's inbound channel when a named timer elapses.
/// `epoch` pins this delivery to the state of the scheduler at arm-time;
/// compare it against [`Scheduler::is_current`] before acting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerFired {
    pub name: String,
    pub epoch: u64,
}

/// Named one-shot timers, cancellable atomically with state transitions.
///
/// Every `arm` bumps the timer's epoch and spawns a sleep that reports back
/// with the epoch it was armed at. `cancel` just bumps the epoch again with
/// nothing spawned, so an in-flight callback that later fires finds its
/// epoch stale and is a no-op by construction — no call site needs to
/// remember to check phase/membership by hand. Room shutdown is a cancel
/// of every named timer, including whole arrays of bot timers.
#[derive(Default)]
pub struct Scheduler {
    epochs: HashMap<String, u64>,
}

impl Scheduler {
    pub fn arm(&mut self, name: impl Into<String>, after: Duration, sink: UnboundedSender<TimerFired>) {
        let name = name.into();
        let epoch = self.bump(&name);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = sink.send(TimerFired { name, epoch });
        });
    }

    /// Idempotent: cancelling a timer that was never armed just claims the
    /// name so a subsequent arm starts fresh.
    pub fn cancel(&mut self, name: &str) {
        self.bump(name);
    }

    pub fn cancel_all(&mut self) {
        let names: Vec<String> = self.epochs.keys().cloned().collect();
        for name in names {
            self.bump(&name);
        }
    }

    /// Cancel every timer whose name starts with `prefix` — used to evict
    /// a single bot's whole timer array in one call.
    pub fn cancel_prefixed(&mut self, prefix: &str) {
        let names: Vec<String> = self
            .epochs
            .keys()
            .filter(|n| n.starts_with(prefix))
            .cloned()
            .collect();
        for name in names {
            self.bump(&name);
        }
    }

    /// Whether a delivered [`TimerFired`] still matches the latest epoch for
    /// its name — false means a cancelling transition intervened.
    pub fn is_current(&self, fired: &TimerFired) -> bool {
        self.epochs.get(&fired.name).copied() == Some(fired.epoch)
    }

    fn bump(&mut self, name: &str) -> u64 {
        match self.epochs.get_mut(name) {
            Some(epoch) => {
                *epoch += 1;
                *epoch
            }
            None => {
                self.epochs.insert(name.to_string(), 1);
                1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_timer_fires_stale() {
        let mut scheduler = Scheduler::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        scheduler.arm("t", Duration::from_millis(10), tx);
        scheduler.cancel("t");
        let fired = rx.recv().await.unwrap();
        assert!(!scheduler.is_current(&fired));
    }

    #[tokio::test]
    async fn live_timer_fires_current() {
        let mut scheduler = Scheduler::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        scheduler.arm("t", Duration::from_millis(5), tx);
        let fired = rx.recv().await.unwrap();
        assert!(scheduler.is_current(&fired));
    }

    #[tokio::test]
    async fn rearming_supersedes_the_previous_epoch() {
        let mut scheduler = Scheduler::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        scheduler.arm("t", Duration::from_millis(5), tx.clone());
        scheduler.arm("t", Duration::from_millis(10), tx);
        let first = rx.recv().await.unwrap();
        assert!(!scheduler.is_current(&first));
        let second = rx.recv().await.unwrap();
        assert!(scheduler.is_current(&second));
    }

    #[tokio::test]
    async fn cancel_prefixed_evicts_a_whole_bot_array() {
        let mut scheduler = Scheduler::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        scheduler.arm("bot:7:word", Duration::from_millis(5), tx.clone());
        scheduler.arm("bot:7:cell", Duration::from_millis(5), tx.clone());
        scheduler.arm("bot:8:word", Duration::from_millis(5), tx);
        scheduler.cancel_prefixed("bot:7:");
        let a = rx.recv().await.unwrap();
        let b = rx.recv().await.unwrap();
        let c = rx.recv().await.unwrap();
        for fired in [a, b, c] {
            if fired.name.starts_with("bot:7:") {
                assert!(!scheduler.is_current(&fired));
            } else {
                assert!(scheduler.is_current(&fired));
            }
        }
    }
}
