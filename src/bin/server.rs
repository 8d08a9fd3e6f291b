//! Hosting server binary.
//!
//! Runs the HTTP/WebSocket server for the crossword and trivia rooms.

use gridshow::*;

#[tokio::main]
async fn main() {
    init();
    let client = db().await;
    hosting::Server::run(client).await.unwrap();
}
