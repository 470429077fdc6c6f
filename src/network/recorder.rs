use crate::capture::{
    ChangeNotifier, FieldMap, IdGenerator, RecordingSwitch, RedactionPolicy, RingBuffer,
};
use crate::error::Result;
use crate::network::body::Body;
use crate::network::record::{Completion, CorrelationId, NetworkRecord, StatusFilter};
use chrono::Local;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::watch;

/// Buffered record tagged with its append sequence number and the
/// monotonic instant it was appended at.
#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    started: Instant,
    record: NetworkRecord,
}

/// Records buffered in append order plus an id -> sequence index. Sequence
/// numbers are contiguous inside the buffer, so a record's position is its
/// sequence minus the sequence at the head.
#[derive(Debug)]
struct NetworkState {
    records: RingBuffer<Slot>,
    index: HashMap<CorrelationId, u64>,
    next_seq: u64,
    policy: RedactionPolicy,
}

impl NetworkState {
    fn position_of(&self, id: &CorrelationId) -> Option<usize> {
        let seq = *self.index.get(id)?;
        let head = self.records.front()?.seq;
        seq.checked_sub(head).map(|offset| offset as usize)
    }

    fn append(&mut self, record: NetworkRecord, started: Instant) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(record.id.clone(), seq);
        let evicted = self.records.push(Slot {
            seq,
            started,
            record,
        });
        self.unindex(evicted);
    }

    fn unindex(&mut self, evicted: Vec<Slot>) {
        for slot in evicted {
            self.index.remove(&slot.record.id);
        }
    }

    fn iter_newest_first(&self) -> impl Iterator<Item = &NetworkRecord> {
        self.records.iter_newest_first().map(|slot| &slot.record)
    }
}

/// Aggregate counts derived live from the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub total: usize,
    pub success: usize,
    pub error: usize,
    pub pending: usize,
}

/// Captures two-phase request/response lifecycles.
#[derive(Debug)]
pub struct NetworkRecorder {
    state: RwLock<NetworkState>,
    ids: IdGenerator,
    switch: RecordingSwitch,
    notifier: ChangeNotifier,
}

impl NetworkRecorder {
    pub fn new(capacity: usize, policy: RedactionPolicy, switch: RecordingSwitch) -> Self {
        Self {
            state: RwLock::new(NetworkState {
                records: RingBuffer::new(capacity),
                index: HashMap::new(),
                next_seq: 0,
                policy,
            }),
            ids: IdGenerator::new(),
            switch,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Creates a pending record and returns its correlation id. Returns
    /// [`CorrelationId::disabled`] while recording is off.
    pub fn begin_request(
        &self,
        method: &str,
        url: &str,
        headers: Option<FieldMap>,
        body: Body,
    ) -> CorrelationId {
        if !self.switch.is_enabled() {
            return CorrelationId::disabled();
        }

        let id = CorrelationId::new(self.ids.next_id());
        let started = Instant::now();
        let mut state = self.state.write();
        let record = NetworkRecord {
            id: id.clone(),
            method: method.trim().to_uppercase(),
            url: url.to_string(),
            request_headers: headers.map(|h| state.policy.apply(&h)),
            request_size: body.estimated_size(),
            request_body: body,
            status: None,
            response_body: Body::Absent,
            response_headers: None,
            started_at: Local::now(),
            completed_at: None,
            duration: None,
            error: None,
            response_size: None,
        };
        state.append(record, started);
        drop(state);

        self.notifier.bump();
        id
    }

    /// Moves the matching record to its completed state. Unknown or evicted
    /// ids are ignored.
    pub fn complete_request(&self, id: &CorrelationId, completion: Completion) {
        if !self.switch.is_enabled() || id.is_disabled() {
            return;
        }

        let mut state = self.state.write();
        let Some(position) = state.position_of(id) else {
            tracing::debug!(id = %id, "completion for unknown or evicted request dropped");
            return;
        };

        let response_headers = completion.headers.map(|h| state.policy.apply(&h));
        let Some(slot) = state.records.get_mut(position) else {
            return;
        };
        let duration = completion
            .duration
            .unwrap_or_else(|| slot.started.elapsed());
        let record = &mut slot.record;
        if !record.is_pending() {
            tracing::debug!(id = %id, "request completed twice, keeping the latest outcome");
        }

        *record = NetworkRecord {
            status: completion.status,
            response_size: completion.body.estimated_size(),
            response_body: completion.body,
            response_headers,
            completed_at: Some(Local::now()),
            duration: Some(duration),
            error: completion.error,
            ..record.clone()
        };
        drop(state);

        self.notifier.bump();
    }

    /// Records a call that is already finished, for call sites that cannot
    /// straddle start and completion.
    pub fn record_complete(
        &self,
        method: &str,
        url: &str,
        headers: Option<FieldMap>,
        body: Body,
        completion: Completion,
    ) -> CorrelationId {
        if !self.switch.is_enabled() {
            return CorrelationId::disabled();
        }

        let id = CorrelationId::new(self.ids.next_id());
        let completed_at = Local::now();
        let started_at = completion
            .duration
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| completed_at - d)
            .unwrap_or(completed_at);

        let mut state = self.state.write();
        let record = NetworkRecord {
            id: id.clone(),
            method: method.trim().to_uppercase(),
            url: url.to_string(),
            request_headers: headers.map(|h| state.policy.apply(&h)),
            request_size: body.estimated_size(),
            request_body: body,
            status: completion.status,
            response_size: completion.body.estimated_size(),
            response_body: completion.body,
            response_headers: completion.headers.map(|h| state.policy.apply(&h)),
            started_at,
            completed_at: Some(completed_at),
            duration: completion.duration,
            error: completion.error,
        };
        state.append(record, Instant::now());
        drop(state);

        self.notifier.bump();
        id
    }

    pub fn get(&self, id: &CorrelationId) -> Option<NetworkRecord> {
        let state = self.state.read();
        let position = state.position_of(id)?;
        state.records.get(position).map(|slot| slot.record.clone())
    }

    /// All records, newest first.
    pub fn records(&self) -> Vec<NetworkRecord> {
        self.state.read().iter_newest_first().cloned().collect()
    }

    /// Case-insensitive substring match on URL, method and status text.
    pub fn search(&self, query: &str) -> Vec<NetworkRecord> {
        let query = query.to_lowercase();
        self.state
            .read()
            .iter_newest_first()
            .filter(|record| record.matches_query(&query))
            .cloned()
            .collect()
    }

    pub fn filter_by_status(&self, filter: StatusFilter) -> Vec<NetworkRecord> {
        self.state
            .read()
            .iter_newest_first()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> NetworkStats {
        let state = self.state.read();
        state
            .iter_newest_first()
            .fold(NetworkStats::default(), |mut stats, record| {
                stats.total += 1;
                if record.is_success() {
                    stats.success += 1;
                }
                if record.is_failure() {
                    stats.error += 1;
                }
                if record.is_pending() {
                    stats.pending += 1;
                }
                stats
            })
    }

    pub fn total_count(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn success_count(&self) -> usize {
        self.stats().success
    }

    pub fn error_count(&self) -> usize {
        self.stats().error
    }

    pub fn pending_count(&self) -> usize {
        self.stats().pending
    }

    pub fn clear(&self) {
        let mut state = self.state.write();
        if state.records.is_empty() {
            return;
        }
        state.records.clear();
        state.index.clear();
        drop(state);

        self.notifier.bump();
    }

    pub fn capacity(&self) -> usize {
        self.state.read().records.capacity()
    }

    pub fn set_capacity(&self, capacity: usize) {
        let mut state = self.state.write();
        let evicted = state.records.set_capacity(capacity);
        let changed = !evicted.is_empty();
        state.unindex(evicted);
        drop(state);

        if changed {
            self.notifier.bump();
        }
    }

    /// Replaces the redaction policy. Applies to records captured afterwards.
    pub fn set_redacted_headers<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.state.write().policy = RedactionPolicy::new(names);
    }

    pub fn version(&self) -> u64 {
        self.notifier.version()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }

    /// Pretty JSON array of every record, oldest first.
    pub fn export_json(&self) -> Result<String> {
        let state = self.state.read();
        let records: Vec<&NetworkRecord> = state.records.iter().map(|slot| &slot.record).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// One line per record, oldest first.
    pub fn export_text(&self) -> String {
        let state = self.state.read();
        state
            .records
            .iter()
            .map(|slot| slot.record.to_line())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
