pub mod app;
pub mod config;
pub mod csv_io;
pub mod days;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod remote;
pub mod roster;
pub mod state;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use store::AttendanceStore;
