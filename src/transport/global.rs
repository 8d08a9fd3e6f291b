use super::{OutboundHandle, Roster};
use crate::SocketId;
use serde::Serialize;
use tokio::sync::Mutex;

/// Cross-room listener group: clients that want a feed of every room's
/// summary events (the calendar view) without joining any single room's
/// roster. Shared by `Arc` across the hosting layer and every crossword
/// room, so it's mutex-guarded rather than single-writer like a room's own
/// [`Roster`].
#[derive(Default)]
pub struct GlobalRoster(Mutex<Roster>);

impl GlobalRoster {
    pub async fn join(&self, id: SocketId, handle: OutboundHandle) {
        self.0.lock().await.join(id, handle);
    }

    pub async fn leave(&self, id: SocketId) {
        self.0.lock().await.leave(id);
    }

    pub async fn emit<T: Serialize>(&self, event: &str, payload: &T) {
        self.0.lock().await.emit_to_room(event, payload);
    }
}
