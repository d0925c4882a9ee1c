pub mod app;
pub mod chart;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod persistence;
pub mod series;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use series::SeriesState;
pub use state::AppState;
pub use storage::{CookieStore, KeyValueStore, MemoryStore};
