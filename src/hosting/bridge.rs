use super::arena::Arena;
use crate::persistence::Store;
use crate::transport::OutboundHandle;
use crate::{crossword, jeopardy, router};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

static NEXT_SOCKET: AtomicU64 = AtomicU64::new(1);

fn next_socket_id() -> crate::SocketId {
    NEXT_SOCKET.fetch_add(1, Ordering::Relaxed)
}

/// Bridges a crossword websocket session to `date`'s room. The room is
/// resolved (and the socket registered in its roster) before any client
/// frame arrives, since the date is already known from the URL.
pub async fn bridge_crossword(
    arena: Arc<Arena>,
    store: Arc<dyn Store>,
    date: String,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) -> anyhow::Result<()> {
    let tx = arena.crossword_room(&date, store).await?;
    let socket = next_socket_id();
    let (out_tx, mut out_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let _ = tx.send(crossword::RoomEvent::Connect {
        socket,
        outbound: OutboundHandle::new(out_tx),
    });
    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                biased;
                outgoing = out_rx.recv() => match outgoing {
                    Some(json) => if session.text(json).await.is_err() { break },
                    None => break,
                },
                incoming = stream.next() => match incoming {
                    Some(Ok(actix_ws::Message::Text(text))) => router::route_crossword(&text, socket, &tx),
                    Some(Ok(actix_ws::Message::Close(_))) => break,
                    Some(Err(_)) => break,
                    None => break,
                    _ => continue,
                },
            }
        }
        let _ = tx.send(crossword::RoomEvent::Disconnect { socket });
        log::info!("crossword socket {socket} disconnected from {date}");
    });
    Ok(())
}

/// Bridges a trivia websocket session that isn't bound to any room yet.
/// The connection stays in an unbound state, forwarding nothing, until the
/// client's first frame is `create-room` or `join-room` — only the hosting
/// layer can resolve those (it owns the room registry), per
/// [`jeopardy::Inbound`]'s doc comment.
pub async fn bridge_trivia(
    arena: Arc<Arena>,
    store: Arc<dyn Store>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) -> anyhow::Result<()> {
    let socket = next_socket_id();
    let (out_tx, mut out_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let outbound = OutboundHandle::new(out_tx);

    actix_web::rt::spawn(async move {
        let mut room_tx: Option<UnboundedSender<jeopardy::RoomEvent>> = None;
        loop {
            tokio::select! {
                biased;
                outgoing = out_rx.recv() => match outgoing {
                    Some(json) => if session.text(json).await.is_err() { break },
                    None => break,
                },
                incoming = stream.next() => match incoming {
                    Some(Ok(actix_ws::Message::Text(text))) => match &room_tx {
                        None => room_tx = bind_trivia_socket(&arena, &store, &text, socket, outbound.clone()).await,
                        Some(tx) => router::route_jeopardy(&text, socket, tx),
                    },
                    Some(Ok(actix_ws::Message::Close(_))) => break,
                    Some(Err(_)) => break,
                    None => break,
                    _ => continue,
                },
            }
        }
        if let Some(tx) = room_tx {
            let _ = tx.send(jeopardy::RoomEvent::Disconnect { socket });
        }
        log::info!("trivia socket {socket} disconnected");
    });
    Ok(())
}

/// Bridges a calendar-listener socket: it never joins a room and never
/// sends meaningful inbound frames, it only receives the `puzzle-progress`
/// / `room-count` feed broadcast across every open crossword room.
pub async fn bridge_calendar(
    arena: Arc<Arena>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) -> anyhow::Result<()> {
    let socket = next_socket_id();
    let (out_tx, mut out_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    arena.calendar().join(socket, OutboundHandle::new(out_tx)).await;
    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                biased;
                outgoing = out_rx.recv() => match outgoing {
                    Some(json) => if session.text(json).await.is_err() { break },
                    None => break,
                },
                incoming = stream.next() => match incoming {
                    Some(Ok(actix_ws::Message::Close(_))) => break,
                    Some(Err(_)) => break,
                    None => break,
                    _ => continue,
                },
            }
        }
        arena.calendar().leave(socket).await;
        log::info!("calendar socket {socket} disconnected");
    });
    Ok(())
}

/// Resolves (or mints) the room this socket belongs to from its first
/// frame. Returns `None` (staying unbound) on anything else, including a
/// create/join that failed.
async fn bind_trivia_socket(
    arena: &Arena,
    store: &Arc<dyn Store>,
    raw: &str,
    socket: crate::SocketId,
    outbound: OutboundHandle,
) -> Option<UnboundedSender<jeopardy::RoomEvent>> {
    let msg: jeopardy::Inbound = serde_json::from_str(raw).ok()?;
    match msg {
        jeopardy::Inbound::CreateRoom { user_name } => {
            let name = router::clamp_name(user_name);
            match arena.create_trivia_room(store.clone(), socket, outbound.clone(), name).await {
                Ok((room_id, tx)) => {
                    let _ = outbound.send_event(
                        "room-created",
                        &serde_json::json!({ "room_id": room_id, "socket_id": socket }),
                    );
                    Some(tx)
                }
                Err(e) => {
                    log::warn!("failed to create trivia room: {e}");
                    None
                }
            }
        }
        jeopardy::Inbound::JoinRoom { room_id, user_name } => {
            let tx = arena.trivia_room(&room_id).await?;
            let _ = tx.send(jeopardy::RoomEvent::Connect { socket, outbound });
            let _ = tx.send(jeopardy::RoomEvent::Message {
                socket,
                msg: jeopardy::Inbound::JoinRoom { room_id, user_name: router::clamp_name(user_name) },
            });
            Some(tx)
        }
        _ => None,
    }
}
