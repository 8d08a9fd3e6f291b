//! Binds a raw socket text frame to the correct room and validates shape
//! before it is allowed onto that room's single inbound channel. Role and
//! phase authority (host-only, controller-only, answering-player-only,
//! `select-clue` only in `selectingClue`, etc.) are checked inline by the
//! room itself on dispatch, matching the host's `Room::ask` pattern of
//! "checked precondition, silent continue" — this module only guards the
//! envelope shape a room should never have to second-guess.

use crate::crossword;
use crate::jeopardy;
use crate::SocketId;
use tokio::sync::mpsc::UnboundedSender;

const NAME_MAX_CODEPOINTS: usize = 20;
const JEOPARDY_ROW_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

pub(crate) fn clamp_name(raw: String) -> String {
    raw.trim().chars().take(NAME_MAX_CODEPOINTS).collect()
}

/// Parse and shape-validate a raw `{type, payload}` frame as a crossword
/// intent, forwarding it to `tx` only if it passes. Anything that fails to
/// parse, or whose payload is out of bounds, is silently dropped.
pub fn route_crossword(raw: &str, socket: SocketId, tx: &UnboundedSender<crossword::RoomEvent>) {
    let Ok(msg) = serde_json::from_str::<crossword::Inbound>(raw) else {
        return;
    };
    let msg = match msg {
        crossword::Inbound::JoinPuzzle { date, user_name } => crossword::Inbound::JoinPuzzle {
            date,
            user_name: clamp_name(user_name),
        },
        other => other,
    };
    let _ = tx.send(crossword::RoomEvent::Message { socket, msg });
}

/// Same as [`route_crossword`] for trivia/jeopardy intents. `select-clue`
/// row bounds are checked here (they're a pure payload-shape fact); the
/// category string is validated against the live board by the room, since
/// only the room knows the current round's categories.
pub fn route_jeopardy(raw: &str, socket: SocketId, tx: &UnboundedSender<jeopardy::RoomEvent>) {
    let Ok(msg) = serde_json::from_str::<jeopardy::Inbound>(raw) else {
        return;
    };
    let msg = match msg {
        jeopardy::Inbound::CreateRoom { user_name } => jeopardy::Inbound::CreateRoom {
            user_name: clamp_name(user_name),
        },
        jeopardy::Inbound::JoinRoom { room_id, user_name } => jeopardy::Inbound::JoinRoom {
            room_id,
            user_name: clamp_name(user_name),
        },
        jeopardy::Inbound::SelectClue { category, row } => {
            if !JEOPARDY_ROW_RANGE.contains(&row) {
                return;
            }
            jeopardy::Inbound::SelectClue { category, row }
        }
        jeopardy::Inbound::SubmitAnswer { answer } => {
            jeopardy::Inbound::SubmitAnswer { answer: answer.trim().to_string() }
        }
        jeopardy::Inbound::FinalJeopardyAnswer { answer } => {
            jeopardy::Inbound::FinalJeopardyAnswer { answer: answer.trim().to_string() }
        }
        jeopardy::Inbound::DailyDoubleWager { wager } => {
            jeopardy::Inbound::DailyDoubleWager { wager: wager.max(0) }
        }
        jeopardy::Inbound::FinalJeopardyWager { wager } => {
            jeopardy::Inbound::FinalJeopardyWager { wager: wager.max(0) }
        }
        other => other,
    };
    let _ = tx.send(jeopardy::RoomEvent::Message { socket, msg });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_overlong_names() {
        let name: String = std::iter::repeat('x').take(40).collect();
        assert_eq!(clamp_name(name).chars().count(), NAME_MAX_CODEPOINTS);
    }

    #[test]
    fn trims_whitespace_before_clamping() {
        assert_eq!(clamp_name("  bob  ".to_string()), "bob");
    }

    #[tokio::test]
    async fn drops_unparseable_frame() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        route_jeopardy("not json", 1, &tx);
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn drops_out_of_range_clue_row() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let raw = r#"{"type":"select-clue","payload":{"category":"History","row":9}}"#;
        route_jeopardy(raw, 1, &tx);
        drop(tx);
        assert!(rx.recv().await.is_none());
    }
}
