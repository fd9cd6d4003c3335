//! Clock spawner demo
//!
//! Usage: `clock_app [config.toml|config.ron]`

mod app;

use app::{ClockApp, ClockAppConfig};
use frame_engine::{config::Config, foundation::logging, Engine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ClockAppConfig::load_from_file(path)?,
        None => ClockAppConfig::default(),
    };

    log::info!("Starting clock demo");
    let mut app = ClockApp::new(config.clone());
    Engine::run(config.engine, &mut app)?;

    log::info!("Clock demo finished successfully");
    Ok(())
}
