use crate::persistence::Store;
use crate::transport::{GlobalRoster, OutboundHandle};
use crate::{crossword, jeopardy};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;

/// Registry of live room actors, keyed per domain the way each domain is
/// addressed by its clients: crossword rooms by calendar date, trivia rooms
/// by their minted 4-char id. Mirrors the host's `Casino` — a map from room
/// key to the inbound sender half, behind an `RwLock` since lookups vastly
/// outnumber inserts.
#[derive(Default)]
pub struct Arena {
    crosswords: RwLock<HashMap<String, UnboundedSender<crossword::RoomEvent>>>,
    trivias: RwLock<HashMap<String, UnboundedSender<jeopardy::RoomEvent>>>,
    calendar: Arc<GlobalRoster>,
}

impl Arena {
    /// Returns the sender for `date`'s crossword room, spawning it on first
    /// request. The room persists until its last human leaves (see
    /// [`crossword::Room`]), so once spawned it stays registered for the
    /// life of the process.
    pub async fn crossword_room(
        &self,
        date: &str,
        store: Arc<dyn Store>,
    ) -> anyhow::Result<UnboundedSender<crossword::RoomEvent>> {
        if let Some(tx) = self.crosswords.read().await.get(date) {
            return Ok(tx.clone());
        }
        let mut crosswords = self.crosswords.write().await;
        if let Some(tx) = crosswords.get(date) {
            return Ok(tx.clone());
        }
        let content = store
            .get_puzzle(date)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no puzzle for {date}"))?;
        let tx =
            crossword::Room::spawn(date.to_string(), Arc::new(content), store, self.calendar.clone()).await;
        crosswords.insert(date.to_string(), tx.clone());
        log::info!("opened crossword room {date}");
        Ok(tx)
    }

    /// The cross-room "calendar" listener group: clients that want a feed of
    /// every puzzle's progress without joining any one room.
    pub fn calendar(&self) -> Arc<GlobalRoster> {
        self.calendar.clone()
    }

    /// Mints a fresh 4-char room id, picks a random unplayed game, seats the
    /// creator as host, and registers the spawned room.
    pub async fn create_trivia_room(
        &self,
        store: Arc<dyn Store>,
        host_socket: crate::SocketId,
        host_outbound: OutboundHandle,
        host_name: String,
    ) -> anyhow::Result<(String, UnboundedSender<jeopardy::RoomEvent>)> {
        let game = store
            .get_random_jeopardy_game()
            .await?
            .ok_or_else(|| anyhow::anyhow!("no unplayed jeopardy games available"))?;
        let mut trivias = self.trivias.write().await;
        let room_id = loop {
            let candidate = mint_room_id();
            if !trivias.contains_key(&candidate) {
                break candidate;
            }
        };
        let tx = jeopardy::Room::spawn(
            room_id.clone(),
            game,
            store,
            host_socket,
            host_outbound,
            host_name,
        );
        trivias.insert(room_id.clone(), tx.clone());
        log::info!("opened trivia room {room_id}");
        Ok((room_id, tx))
    }

    pub async fn trivia_room(&self, room_id: &str) -> Option<UnboundedSender<jeopardy::RoomEvent>> {
        self.trivias.read().await.get(room_id).cloned()
    }

    /// Drops dead senders so a long-running process doesn't leak map
    /// entries for trivia rooms that evicted themselves.
    pub async fn reap_trivia(&self) {
        self.trivias.write().await.retain(|_, tx| !tx.is_closed());
    }
}

fn mint_room_id() -> String {
    let mut rng = rand::rng();
    (0..crate::ROOM_ID_LEN)
        .map(|_| crate::ROOM_ID_ALPHABET[rng.random_range(0..crate::ROOM_ID_ALPHABET.len())] as char)
        .collect()
}
