//! Ctrl+C and SIGTERM handling for long extractions

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Exit status used when a second signal arrives before the run has stopped.
const FORCED_EXIT_CODE: i32 = 130;

/// Latch `cancel` on SIGINT or SIGTERM.
///
/// The first signal only sets the flag so the extraction can stop between
/// entries and report what it wrote. A second one terminates the process.
pub fn install_cancel_handlers(cancel: &Arc<AtomicBool>) -> std::io::Result<()> {
    for signal in [SIGINT, SIGTERM] {
        // Registered first so it sees the flag before this signal sets it.
        flag::register_conditional_shutdown(signal, FORCED_EXIT_CODE, Arc::clone(cancel))?;
        flag::register(signal, Arc::clone(cancel))?;
    }
    Ok(())
}
