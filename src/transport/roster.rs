use crate::SocketId;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug)]
pub struct SendError;

/// A socket's outbound half: serializes `{type, payload}` envelopes and
/// pushes them onto the transport bridge for this connection.
#[derive(Clone)]
pub struct OutboundHandle(UnboundedSender<String>);

impl OutboundHandle {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self(tx)
    }

    pub fn send_event<T: Serialize>(&self, event: &str, payload: &T) -> Result<(), SendError> {
        let envelope = serde_json::json!({ "type": event, "payload": payload });
        self.0.send(envelope.to_string()).map_err(|_| SendError)
    }
}

/// Join/leave/broadcast over a room's (or a global listener group's)
/// membership. Ordering within a single room per single emitter is
/// preserved because sends go out sequentially over this one structure;
/// cross-socket ordering is not guaranteed beyond that.
#[derive(Default)]
pub struct Roster {
    members: HashMap<SocketId, OutboundHandle>,
}

impl Roster {
    pub fn join(&mut self, id: SocketId, handle: OutboundHandle) {
        self.members.insert(id, handle);
    }

    pub fn leave(&mut self, id: SocketId) -> Option<OutboundHandle> {
        self.members.remove(&id)
    }

    pub fn contains(&self, id: SocketId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = SocketId> + '_ {
        self.members.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn emit_to_room<T: Serialize>(&self, event: &str, payload: &T) {
        for (id, handle) in self.members.iter() {
            if handle.send_event(event, payload).is_err() {
                log::warn!("failed broadcast of {event} to socket {id}");
            }
        }
    }

    pub fn emit_to_peers<T: Serialize>(&self, event: &str, payload: &T, exclude: SocketId) {
        for (id, handle) in self.members.iter().filter(|(id, _)| **id != exclude) {
            if handle.send_event(event, payload).is_err() {
                log::warn!("failed broadcast of {event} to socket {id}");
            }
        }
    }

    pub fn emit_to_socket<T: Serialize>(&self, id: SocketId, event: &str, payload: &T) {
        match self.members.get(&id) {
            Some(handle) => {
                if handle.send_event(event, payload).is_err() {
                    log::warn!("failed unicast of {event} to socket {id}");
                }
            }
            None => log::warn!("emit_to_socket: unknown socket {id}"),
        }
    }
}
