//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pocketnote_core` linkage and open a store outside the mobile app.
//! - Print the launch route and note count for a data directory.
//!
//! Usage: `pocketnote [DATA_DIR]` (defaults to `$POCKETNOTE_DATA_DIR`, then
//! the current directory). `$POCKETNOTE_LOG_LEVEL` sets the level of the log
//! files written under `DATA_DIR/logs`.

use pocketnote_core::config::LOG_LEVEL_ENV;
use pocketnote_core::{init_logging_from_config, Core, CoreConfig, JsonStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("pocketnote_core ping={}", pocketnote_core::ping());
    println!("pocketnote_core version={}", pocketnote_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        // An explicit directory beats the environment; the level still comes from it.
        Some(dir) => CoreConfig::from_lookup(dir, |name| match name {
            LOG_LEVEL_ENV => std::env::var(name).ok(),
            _ => None,
        })?,
        None => CoreConfig::from_env(std::env::current_dir()?)?,
    };
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }
    let core = Core::new(JsonStore::new(config.open_store()?));

    println!("store={}", config.db_path().display());
    println!("route={}", core.profile.launch_route()?.as_str());
    let notes = core.notes.list_notes()?;
    let pinned = notes.iter().filter(|note| note.is_pinned).count();
    println!("notes={} pinned={pinned}", notes.len());
    Ok(())
}
