mod app;
mod config;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
pub use config::Overrides;
