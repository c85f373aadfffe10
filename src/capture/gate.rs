use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::foundation::error::{CaptureError, CaptureResult};

/// Allows at most one capture run at a time.
///
/// Clones share the same flag, so every entry point that can start a run should hold a clone of
/// one gate.
#[derive(Clone, Debug, Default)]
pub struct CaptureGate {
    busy: Arc<AtomicBool>,
}

impl CaptureGate {
    /// Create an idle gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the gate for a run, or fail with [`CaptureError::Concurrency`].
    pub fn try_claim(&self) -> CaptureResult<CaptureClaim> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CaptureError::concurrency("recording already in progress"))?;
        Ok(CaptureClaim {
            busy: Arc::clone(&self.busy),
        })
    }
}

/// Proof of an exclusive claim; releases the gate when dropped.
#[derive(Debug)]
pub struct CaptureClaim {
    busy: Arc<AtomicBool>,
}

impl Drop for CaptureClaim {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/gate.rs"]
mod tests;
