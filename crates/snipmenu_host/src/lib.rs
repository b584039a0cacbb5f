//! Coordinator host library.
//!
//! Exposes the worker protocol, menu synchronization, the page-side insertion
//! context, and the stdio bridge, plus a `run` helper so the binary can start
//! the host without duplicating initialization logic.

/// Backend worker + protocol types used by the bridge and headless tests.
pub mod backend;
/// Line-delimited JSON bridge framing and pumps.
pub mod bridge;
/// Page-side insertion context and duplicate-delivery guard.
pub mod insert;
/// Native menu synchronization behind the `MenuHost` seam.
pub mod menu;

use snipmenu_core::{AppError, Config, RemoteFetcher, Store};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("snipmenu_core=warn,snipmenu_host=info"))
        .unwrap();

    // Stdout carries the bridge protocol; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Start the stdio coordinator host with tracing enabled.
///
/// Opens the store, spawns the worker, performs the startup menu reload, then
/// pumps bridge messages until stdin closes.
///
/// # Errors
/// Returns an error when the store cannot be opened.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let config = Config::from_env();
    let store = Store::open(&config.store_path)?;
    let handle = backend::spawn_backend(store, RemoteFetcher::new());

    // Startup counts as a reload trigger: the menu must exist before the
    // first click can arrive.
    if config.initial_reload {
        let _ = handle.cmd_tx.send(backend::CoreCmd::ReloadMenu);
    }

    bridge::run(handle);
    Ok(())
}
