mod bot;
mod event;
mod fire;
mod hint;
mod membership;
mod message;
mod room;

pub use bot::{target_seconds, BotAction, BotSolver};
pub use event::*;
pub use fire::{FireEvent, FireStreak};
pub use hint::HintState;
pub use membership::{Direction, Membership};
pub use message::Inbound;
pub use room::{Room, RoomEvent};
