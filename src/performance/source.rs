use crate::performance::types::FrameTiming;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type FrameCallback = Arc<dyn Fn(&[FrameTiming]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Anything that reports rendered-frame timings in batches.
pub trait FrameTimingSource: Send + Sync {
    fn subscribe(&self, callback: FrameCallback) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// In-process fan-out point the host's frame scheduler pushes timings into.
#[derive(Default)]
pub struct FrameTimingHub {
    subscribers: Mutex<Vec<(SubscriptionId, FrameCallback)>>,
    next_id: AtomicU64,
}

impl FrameTimingHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `frames` to every subscriber. Callbacks run outside the
    /// subscriber lock, so they may subscribe or unsubscribe.
    pub fn emit(&self, frames: &[FrameTiming]) {
        if frames.is_empty() {
            return;
        }
        let callbacks: Vec<FrameCallback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(frames);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl FrameTimingSource for FrameTimingHub {
    fn subscribe(&self, callback: FrameCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|(existing, _)| *existing != id);
    }
}

impl std::fmt::Debug for FrameTimingHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTimingHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Best-effort resident memory reading.
pub trait MemoryProbe: Send + Sync {
    fn resident_bytes(&self) -> Option<u64>;
}

/// Resident set size of the current process, read through `sysinfo`.
/// Yields `None` where the platform does not expose it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessMemoryProbe;

impl MemoryProbe for ProcessMemoryProbe {
    fn resident_bytes(&self) -> Option<u64> {
        use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        let bytes = system.process(pid)?.memory();
        tracing::trace!(bytes, "process memory sampled");
        Some(bytes)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn resident_bytes(&self) -> Option<u64> {
        None
    }
}
