use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces ids of the form `<micros>-<seq>`. The sequence suffix keeps ids
/// unique when several are issued within the same microsecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    sequence: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Local::now().timestamp_micros(), seq)
    }
}
