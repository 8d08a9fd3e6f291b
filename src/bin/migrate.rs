//! Standalone schema migration runner, for deploys that want migrations
//! applied as a discrete step rather than implicitly on server boot.

use gridshow::persistence;

#[tokio::main]
async fn main() {
    env_logger::init();
    let url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(&url, tokio_postgres::tls::NoTls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    persistence::migrate(&client).await.expect("run schema migrations");
    log::info!("migrations applied");
}
