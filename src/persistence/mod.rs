mod schema;
mod store;

pub use store::{GuessStat, SharedState, Store, User};

/// Create every table this core depends on if it doesn't already exist.
/// Called once at startup from [`crate::db`].
pub async fn migrate(client: &tokio_postgres::Client) -> anyhow::Result<()> {
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    client.batch_execute(schema::CREATE_PUZZLES).await?;
    client.batch_execute(schema::CREATE_PUZZLE_STATE).await?;
    client.batch_execute(schema::CREATE_CELL_FILLERS).await?;
    client.batch_execute(schema::CREATE_POINTS).await?;
    client.batch_execute(schema::CREATE_GUESSES).await?;
    client.batch_execute(schema::CREATE_TIMERS).await?;
    client.batch_execute(schema::CREATE_USERS).await?;
    client.batch_execute(schema::CREATE_JEOPARDY_GAMES).await?;
    client.batch_execute(schema::CREATE_JEOPARDY_PROGRESS).await?;
    Ok(())
}
