pub mod crossword;
pub mod hosting;
pub mod jeopardy;
pub mod judge;
pub mod persistence;
pub mod puzzle;
pub mod router;
pub mod scheduler;
pub mod transport;
pub mod trivia;

/// socket identifier minted per connection, human or bot/CPU
pub type SocketId = u64;

// fire streak parameters
pub const FIRE_WINDOW_MS: i64 = 30_000;
pub const FIRE_DURATION_MS: i64 = 30_000;
pub const FIRE_EXTEND_MS: i64 = 5_000;
pub const FIRE_WORDS_TO_IGNITE: u32 = 3;
pub const FIRE_BASE_MULTIPLIER: f32 = 1.5;

// scoring constants
pub const POINTS_LETTER: i32 = 10;
pub const POINTS_REBUS: i32 = 50;
pub const POINTS_WRONG: i32 = -30;
pub const POINTS_WORD_DOUBLE: i32 = 250;
pub const POINTS_WORD_SINGLE: i32 = 50;
pub const POINTS_LAST_SQUARE: i32 = 250;

// hint mechanics
pub const HINT_MAX_CELLS: usize = 5;
pub const HINT_SENTINEL: &str = "(hint)";

// progress broadcast debounce
pub const PROGRESS_DEBOUNCE_MS: u64 = 200;

/// eight-color material palette used for trivia seating and as the tail of
/// the crossword bot palette.
pub const MATERIAL_PALETTE: [&str; 8] = [
    "#4CAF50", "#2196F3", "#FF9800", "#E91E63", "#9C27B0", "#00BCD4", "#FFC107", "#795548",
];

/// human crossword palette (spec.md §6)
pub const CROSSWORD_PALETTE: [&str; 6] =
    ["#4CAF50", "#222222", "#FF9800", "#E91E63", "#9C27B0", "#FF00FF"];

/// distinct palette reserved for synthetic solver bots
pub const CROSSWORD_BOT_PALETTE: [&str; 6] =
    ["#607D8B", "#3F51B5", "#009688", "#CDDC39", "#8BC34A", "#F44336"];

/// room id alphabet excludes visually ambiguous characters
pub const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_ID_LEN: usize = 4;

/// normalize the trivia answer stop-word set
pub const STOP_WORDS: [&str; 17] = [
    "the", "a", "an", "of", "and", "in", "on", "at", "to", "for", "is", "are", "was", "were",
    "what", "who",
];

/// crossword bot target-solve seconds, `BASE_SOLVE_SECONDS[dow][difficulty]`
/// dow: 0 = Sunday .. 6 = Saturday. difficulty: 0=Easy .. 4=Expert.
pub const BASE_SOLVE_SECONDS: [[f64; 5]; 7] = [
    [2940.0, 2390.0, 1835.0, 1560.0, 1195.0], // Sun
    [630.0, 510.0, 395.0, 335.0, 255.0],      // Mon
    [770.0, 625.0, 480.0, 410.0, 310.0],      // Tue
    [1320.0, 1075.0, 825.0, 700.0, 535.0],    // Wed
    [1680.0, 1365.0, 1050.0, 890.0, 680.0],   // Thu
    [2000.0, 1625.0, 1250.0, 1065.0, 810.0],  // Fri
    [2400.0, 1950.0, 1500.0, 1275.0, 975.0],  // Sat
];

/// multiplier ranges `[lo, hi]` per difficulty
pub const SOLVE_MULTIPLIER_RANGE: [(f64, f64); 5] = [
    (0.85, 1.25),
    (0.90, 1.18),
    (0.92, 1.15),
    (0.94, 1.12),
    (0.96, 1.08),
];

/// wander chance per difficulty
pub const WANDER_CHANCE: [f64; 5] = [0.75, 0.65, 0.55, 0.40, 0.25];

/// trivia CPU difficulty profiles `{buzz_speed, accuracy, skip_chance}`
pub const AI_EASY: (f64, f64, f64) = (0.3, 0.5, 0.35);
pub const AI_MEDIUM: (f64, f64, f64) = (0.5, 0.7, 0.15);
pub const AI_HARD: (f64, f64, f64) = (0.8, 0.9, 0.05);

/// initialize logging and force a clean process exit on ctrl-c
pub fn init() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// connect to postgres, run schema migrations, and return a shared client
pub async fn db() -> std::sync::Arc<tokio_postgres::Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    persistence::migrate(&client)
        .await
        .expect("run schema migrations");
    std::sync::Arc::new(client)
}
