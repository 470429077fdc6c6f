//! JSON-lines trace replay.
//!
//! Each non-empty line is one [`TraceEvent`]. Trace-local request keys are
//! mapped to the correlation ids the network recorder hands out, so a trace
//! captured elsewhere can be replayed through the public ingestion calls.

use crate::capture::FieldMap;
use crate::console::LogLevel;
use crate::diagnostics::Diagnostics;
use crate::error::{AppError, Result};
use crate::network::{Body, Completion, CorrelationId};
use crate::performance::FrameTiming;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::BufRead;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    RequestStart {
        key: String,
        method: String,
        url: String,
        #[serde(default)]
        headers: Option<FieldMap>,
        #[serde(default)]
        body: Option<serde_json::Value>,
    },
    RequestEnd {
        key: String,
        #[serde(flatten)]
        outcome: TraceOutcome,
    },
    Request {
        method: String,
        url: String,
        #[serde(default)]
        headers: Option<FieldMap>,
        #[serde(default)]
        body: Option<serde_json::Value>,
        #[serde(flatten)]
        outcome: TraceOutcome,
    },
    Log {
        message: String,
        #[serde(default)]
        tag: Option<String>,
        #[serde(default)]
        level: LogLevel,
    },
    LogError {
        message: String,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        stack_trace: Option<String>,
        #[serde(default)]
        tag: Option<String>,
    },
    Frames {
        frames: Vec<TraceFrame>,
    },
    Rebuild,
    Tick,
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TraceOutcome {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub response_body: Option<serde_json::Value>,
    #[serde(default)]
    pub response_headers: Option<FieldMap>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<TraceOutcome> for Completion {
    fn from(outcome: TraceOutcome) -> Self {
        Completion {
            status: outcome.status,
            body: body_from(outcome.response_body),
            headers: outcome.response_headers,
            duration: outcome.duration_ms.map(Duration::from_millis),
            error: outcome.error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TraceFrame {
    pub build_us: u64,
    pub raster_us: u64,
}

/// Strings are replayed as text bodies, anything else as structured JSON.
fn body_from(value: Option<serde_json::Value>) -> Body {
    match value {
        None | Some(serde_json::Value::Null) => Body::Absent,
        Some(serde_json::Value::String(text)) => Body::Text(text),
        Some(value) => Body::Json(value),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub events: usize,
    pub unmatched_completions: usize,
}

/// Feeds events into `diagnostics`, keeping the key -> correlation id map
/// across calls.
pub struct Replayer<'a> {
    diagnostics: &'a Diagnostics,
    in_flight: HashMap<String, CorrelationId>,
    report: ReplayReport,
}

impl<'a> Replayer<'a> {
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Self {
            diagnostics,
            in_flight: HashMap::new(),
            report: ReplayReport::default(),
        }
    }

    pub fn apply(&mut self, event: TraceEvent) {
        self.report.events += 1;
        let diagnostics = self.diagnostics;
        match event {
            TraceEvent::RequestStart {
                key,
                method,
                url,
                headers,
                body,
            } => {
                let id = diagnostics
                    .network()
                    .begin_request(&method, &url, headers, body_from(body));
                self.in_flight.insert(key, id);
            }
            TraceEvent::RequestEnd { key, outcome } => match self.in_flight.remove(&key) {
                Some(id) => diagnostics.network().complete_request(&id, outcome.into()),
                None => {
                    tracing::debug!(key = %key, "request_end without matching request_start");
                    self.report.unmatched_completions += 1;
                }
            },
            TraceEvent::Request {
                method,
                url,
                headers,
                body,
                outcome,
            } => {
                diagnostics.network().record_complete(
                    &method,
                    &url,
                    headers,
                    body_from(body),
                    outcome.into(),
                );
            }
            TraceEvent::Log {
                message,
                tag,
                level,
            } => diagnostics.console().log(message, tag.as_deref(), level),
            TraceEvent::LogError {
                message,
                error,
                stack_trace,
                tag,
            } => diagnostics.console().log_error(
                message,
                error.as_ref().map(|e| e as &dyn std::fmt::Display),
                stack_trace.as_deref(),
                tag.as_deref(),
            ),
            TraceEvent::Frames { frames } => {
                let timings: Vec<FrameTiming> = frames
                    .iter()
                    .map(|f| FrameTiming::from_micros(f.build_us, f.raster_us))
                    .collect();
                diagnostics.frames().emit(&timings);
            }
            TraceEvent::Rebuild => diagnostics.performance().track_rebuild(),
            TraceEvent::Tick => diagnostics.performance().tick(),
            TraceEvent::Clear => {
                self.in_flight.clear();
                diagnostics.clear_all();
            }
        }
    }

    /// Parses and applies every line of `reader`. Blank lines are skipped.
    pub fn replay<R: BufRead>(&mut self, reader: R) -> Result<ReplayReport> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event = parse_line(&line).map_err(|err| AppError::Trace {
                line: index + 1,
                message: err.to_string(),
            })?;
            self.apply(event);
        }
        Ok(self.report)
    }

    pub fn report(&self) -> ReplayReport {
        self.report
    }
}

pub fn parse_line(line: &str) -> serde_json::Result<TraceEvent> {
    serde_json::from_str(line)
}
