//! Composition root bundling the three recorders behind one shared switch.
//!
//! Hosts build a [`Diagnostics`] from a [`Config`], keep the `Arc` wherever
//! their dependency wiring lives, and may additionally [`Diagnostics::install`]
//! it so instrumentation deep in the call graph can reach it through
//! [`global`]. Nothing is created implicitly: until `install` runs, `global`
//! returns `None`.

use crate::capture::{RecordingSwitch, RedactionPolicy};
use crate::config::Config;
use crate::console::{LogLevel, LogRecorder};
use crate::error::{AppError, Result};
use crate::network::{NetworkRecorder, NetworkStats};
use crate::performance::{
    FrameTimingHub, FrameTimingSource, MemoryProbe, PerformanceSampler, PerformanceStats,
    ProcessMemoryProbe,
};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

static INSTALLED: Lazy<RwLock<Option<Arc<Diagnostics>>>> = Lazy::new(|| RwLock::new(None));

/// The installed instance, if any.
pub fn global() -> Option<Arc<Diagnostics>> {
    INSTALLED.read().clone()
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsSummary {
    pub enabled: bool,
    pub network: NetworkStats,
    pub logs: BTreeMap<LogLevel, usize>,
    pub performance: PerformanceStats,
}

#[derive(Debug)]
pub struct Diagnostics {
    switch: RecordingSwitch,
    network: NetworkRecorder,
    console: LogRecorder,
    performance: PerformanceSampler,
    frames: Arc<FrameTimingHub>,
}

impl Diagnostics {
    /// Builds every recorder from `config`, with an in-process frame hub and
    /// the procfs memory probe.
    pub fn new(config: &Config) -> Self {
        let frames = Arc::new(FrameTimingHub::new());
        Self::with_sources(config, frames, Arc::new(ProcessMemoryProbe))
    }

    pub fn with_sources(
        config: &Config,
        frames: Arc<FrameTimingHub>,
        memory: Arc<dyn MemoryProbe>,
    ) -> Self {
        let switch = RecordingSwitch::new(config.enabled);
        let source: Arc<dyn FrameTimingSource> = frames.clone();
        Self {
            network: NetworkRecorder::new(
                config.network.capacity,
                RedactionPolicy::new(&config.network.redacted_headers),
                switch.clone(),
            ),
            console: LogRecorder::new(config.console.capacity, switch.clone()),
            performance: PerformanceSampler::new(
                &config.performance,
                source,
                memory,
                switch.clone(),
            ),
            frames,
            switch,
        }
    }

    /// Makes `diagnostics` reachable through [`global`].
    pub fn install(diagnostics: Arc<Diagnostics>) -> Result<()> {
        let mut installed = INSTALLED.write();
        if installed.is_some() {
            return Err(AppError::AlreadyInstalled);
        }
        *installed = Some(diagnostics);
        tracing::info!("diagnostics installed");
        Ok(())
    }

    /// Stops sampling and releases the installed instance.
    pub fn uninstall() -> Option<Arc<Diagnostics>> {
        let previous = INSTALLED.write().take();
        if let Some(diagnostics) = &previous {
            diagnostics.performance.stop();
            tracing::info!("diagnostics uninstalled");
        }
        previous
    }

    pub fn network(&self) -> &NetworkRecorder {
        &self.network
    }

    pub fn console(&self) -> &LogRecorder {
        &self.console
    }

    pub fn performance(&self) -> &PerformanceSampler {
        &self.performance
    }

    /// Hub the host's frame scheduler pushes timings into.
    pub fn frames(&self) -> &Arc<FrameTimingHub> {
        &self.frames
    }

    pub fn is_enabled(&self) -> bool {
        self.switch.is_enabled()
    }

    /// Turning recording off also stops the sampler.
    pub fn set_enabled(&self, enabled: bool) {
        self.switch.set_enabled(enabled);
        if !enabled {
            self.performance.stop();
        }
    }

    pub fn clear_all(&self) {
        self.network.clear();
        self.console.clear();
        self.performance.clear();
    }

    pub fn summary(&self) -> DiagnosticsSummary {
        DiagnosticsSummary {
            enabled: self.is_enabled(),
            network: self.network.stats(),
            logs: self.console.counts_by_level(),
            performance: self.performance.stats(),
        }
    }
}
