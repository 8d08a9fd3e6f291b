mod ai;
mod event;
mod message;
mod phase;
mod player;
mod room;

pub use ai::AiDifficulty;
pub use event::*;
pub use message::Inbound;
pub use phase::{Phase, RoundKind};
pub use player::Player;
pub use room::{Room, RoomEvent};
