mod channel;
mod global;
mod roster;

pub use channel::Channel;
pub use global::GlobalRoster;
pub use roster::{OutboundHandle, Roster, SendError};
