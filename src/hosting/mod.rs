mod arena;
mod bridge;
mod server;

pub use arena::Arena;
pub use server::Server;
