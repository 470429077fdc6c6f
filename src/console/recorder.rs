use crate::capture::{ChangeNotifier, IdGenerator, RecordingSwitch, RingBuffer};
use crate::console::record::{LogLevel, LogRecord};
use crate::error::Result;
use chrono::Local;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt::Display;
use strum::IntoEnumIterator;
use tokio::sync::watch;

/// Captures leveled free-text events.
#[derive(Debug)]
pub struct LogRecorder {
    records: RwLock<RingBuffer<LogRecord>>,
    ids: IdGenerator,
    switch: RecordingSwitch,
    notifier: ChangeNotifier,
}

impl LogRecorder {
    pub fn new(capacity: usize, switch: RecordingSwitch) -> Self {
        Self {
            records: RwLock::new(RingBuffer::new(capacity)),
            ids: IdGenerator::new(),
            switch,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn log(&self, message: impl Into<String>, tag: Option<&str>, level: LogLevel) {
        self.insert(message.into(), tag, level, None, None);
    }

    pub fn log_error(
        &self,
        message: impl Into<String>,
        error: Option<&dyn Display>,
        stack_trace: Option<&str>,
        tag: Option<&str>,
    ) {
        self.insert(
            message.into(),
            tag,
            LogLevel::Error,
            error.map(|e| e.to_string()),
            stack_trace.map(str::to_string),
        );
    }

    pub fn verbose(&self, message: impl Into<String>) {
        self.log(message, None, LogLevel::Verbose);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(message, None, LogLevel::Debug);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(message, None, LogLevel::Info);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(message, None, LogLevel::Warning);
    }

    fn insert(
        &self,
        message: String,
        tag: Option<&str>,
        level: LogLevel,
        error: Option<String>,
        stack_trace: Option<String>,
    ) {
        if !self.switch.is_enabled() {
            return;
        }

        let record = LogRecord {
            id: self.ids.next_id(),
            message,
            tag: tag.map(str::to_string),
            level,
            timestamp: Local::now(),
            error,
            stack_trace,
        };
        self.records.write().push(record);
        self.notifier.bump();
    }

    /// All records, newest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.read().snapshot_newest_first()
    }

    /// Records at exactly `level`, or everything when `level` is `None`.
    pub fn filter_by_level(&self, level: Option<LogLevel>) -> Vec<LogRecord> {
        let records = self.records.read();
        match level {
            None => records.snapshot_newest_first(),
            Some(level) => records
                .iter_newest_first()
                .filter(|record| record.level == level)
                .cloned()
                .collect(),
        }
    }

    /// Case-insensitive substring match on message, tag and level.
    pub fn search(&self, query: &str) -> Vec<LogRecord> {
        let query = query.to_lowercase();
        self.records
            .read()
            .iter_newest_first()
            .filter(|record| record.matches_query(&query))
            .cloned()
            .collect()
    }

    pub fn count_by_level(&self, level: LogLevel) -> usize {
        self.records
            .read()
            .iter()
            .filter(|record| record.level == level)
            .count()
    }

    pub fn counts_by_level(&self) -> BTreeMap<LogLevel, usize> {
        let records = self.records.read();
        let mut counts: BTreeMap<LogLevel, usize> = LogLevel::iter().map(|l| (l, 0)).collect();
        for record in records.iter() {
            *counts.entry(record.level).or_insert(0) += 1;
        }
        counts
    }

    pub fn total_count(&self) -> usize {
        self.records.read().len()
    }

    pub fn clear(&self) {
        let mut records = self.records.write();
        if records.is_empty() {
            return;
        }
        records.clear();
        drop(records);

        self.notifier.bump();
    }

    pub fn capacity(&self) -> usize {
        self.records.read().capacity()
    }

    pub fn set_capacity(&self, capacity: usize) {
        let evicted = self.records.write().set_capacity(capacity);
        if !evicted.is_empty() {
            self.notifier.bump();
        }
    }

    pub fn version(&self) -> u64 {
        self.notifier.version()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }

    /// Pretty JSON array of every record, oldest first.
    pub fn export_json(&self) -> Result<String> {
        let records = self.records.read();
        let records: Vec<&LogRecord> = records.iter().collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// One line per record, oldest first.
    pub fn export_text(&self) -> String {
        self.records
            .read()
            .iter()
            .map(LogRecord::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
