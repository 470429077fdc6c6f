use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Global on/off switch shared by every recorder of one diagnostics instance.
/// While off, ingestion calls are no-ops.
#[derive(Debug, Clone)]
pub struct RecordingSwitch(Arc<AtomicBool>);

impl RecordingSwitch {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

impl Default for RecordingSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}
