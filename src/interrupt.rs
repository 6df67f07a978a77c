use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;

use crate::error::{LayerError, LayerResult};

/// Exit status reported for a run stopped by SIGINT or SIGTERM.
pub const INTERRUPTED_EXIT: u8 = 130;

static REQUESTED: OnceLock<Arc<AtomicBool>> = OnceLock::new();

fn requested_flag() -> &'static Arc<AtomicBool> {
    REQUESTED.get_or_init(|| Arc::new(AtomicBool::new(false)))
}

/// Route SIGINT/SIGTERM into a flag instead of killing the process.
///
/// The first signal only raises the flag, so the running step can stop its
/// child and unwind (dropping staged files on the way). A second signal exits
/// immediately.
pub fn install_handler() -> LayerResult<()> {
    let requested = requested_flag();
    for signal in [SIGINT, SIGTERM] {
        flag::register_conditional_shutdown(
            signal,
            i32::from(INTERRUPTED_EXIT),
            Arc::clone(requested),
        )
        .with_context(|| format!("failed to install handler for signal {signal}"))?;
        flag::register(signal, Arc::clone(requested))
            .with_context(|| format!("failed to install handler for signal {signal}"))?;
    }
    tracing::debug!("interrupt handler installed");
    Ok(())
}

pub fn requested() -> bool {
    requested_flag().load(Ordering::Relaxed)
}

/// Fail with [`LayerError::Interrupted`] once a signal has arrived.
pub fn check() -> LayerResult<()> {
    if requested() {
        return Err(LayerError::Interrupted);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_passes_without_a_signal() {
        // Nothing in the unit tests raises SIGINT, so the flag stays clear.
        assert!(!requested());
        assert!(check().is_ok());
    }
}
