//! Line-delimited JSON bridge between an embedding shell and the coordinator.
//!
//! One request line maps onto one [`CoreCmd`]; every [`CoreEvent`] goes out
//! as one reply line, including the menu mutations the shell mirrors into its
//! native menu. Delivery is at-most-once with no acknowledgement: malformed
//! request lines are logged and dropped.

use crate::backend::{BackendHandle, CoreCmd, CoreEvent};
use crossbeam_channel::{Receiver, Sender};
use snipmenu_core::error::AppError;
use std::io::{BufRead, Write};
use std::thread;
use tracing::{debug, warn};

/// Decode one request line into a coordinator command.
///
/// # Errors
/// Returns [`AppError::BadRequest`] for malformed JSON or unknown kinds.
pub fn decode_request(line: &str) -> Result<CoreCmd, AppError> {
    serde_json::from_str(line)
        .map_err(|err| AppError::BadRequest(format!("malformed bridge request: {}", err)))
}

/// Encode a coordinator event as one reply line.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn encode_event(event: &CoreEvent) -> Result<String, AppError> {
    Ok(serde_json::to_string(event)?)
}

/// Forward request lines to the worker until the input closes.
pub fn pump_requests<R: BufRead>(reader: R, cmd_tx: &Sender<CoreCmd>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("bridge input error: {}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match decode_request(&line) {
            Ok(cmd) => {
                if cmd_tx.send(cmd).is_err() {
                    debug!("coordinator gone, stopping request pump");
                    break;
                }
            }
            Err(err) => warn!("dropping bridge request: {}", err),
        }
    }
}

/// Write each coordinator event as one line until the event channel closes.
pub fn pump_events<W: Write>(evt_rx: &Receiver<CoreEvent>, mut writer: W) {
    for event in evt_rx.iter() {
        match encode_event(&event) {
            Ok(encoded) => {
                if writeln!(writer, "{}", encoded)
                    .and_then(|_| writer.flush())
                    .is_err()
                {
                    break;
                }
            }
            Err(err) => warn!("failed to encode event: {}", err),
        }
    }
}

/// Run the stdio bridge over a spawned coordinator until stdin closes.
///
/// # Panics
/// Panics if the writer thread cannot be spawned.
pub fn run(handle: BackendHandle) {
    let BackendHandle { cmd_tx, evt_rx } = handle;

    let writer = thread::Builder::new()
        .name("snipmenu-bridge-out".to_string())
        .spawn(move || pump_events(&evt_rx, std::io::stdout().lock()))
        .expect("spawn bridge writer thread");

    pump_requests(std::io::stdin().lock(), &cmd_tx);

    // Closing the command channel ends the worker, which closes the event
    // channel and lets the writer drain.
    drop(cmd_tx);
    let _ = writer.join();
}
