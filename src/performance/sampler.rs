use crate::capture::{ChangeNotifier, RecordingSwitch, RingBuffer};
use crate::config::PerformanceConfig;
use crate::error::Result;
use crate::performance::source::{FrameCallback, FrameTimingSource, MemoryProbe, SubscriptionId};
use crate::performance::types::{
    FpsStatus, FrameSample, FrameTiming, PerformanceSnapshot, PerformanceStats, DEFAULT_FPS,
    MAX_FPS,
};
use chrono::Local;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerState {
    Idle,
    Monitoring,
}

/// Mutable sampler state. Window sums are kept in whole microseconds so the
/// rolling averages never accumulate floating-point drift.
#[derive(Debug)]
struct SamplerCore {
    state: SamplerState,
    window: RingBuffer<FrameSample>,
    build_sum_us: u128,
    raster_sum_us: u128,
    jank_in_window: usize,
    fps: f64,
    avg_build: Duration,
    avg_raster: Duration,
    total_jank_frames: u64,
    rebuilds: u64,
    snapshots: RingBuffer<PerformanceSnapshot>,
    subscription: Option<SubscriptionId>,
    timer: Option<JoinHandle<()>>,
}

impl SamplerCore {
    fn new(frame_window: usize, snapshot_capacity: usize) -> Self {
        Self {
            state: SamplerState::Idle,
            window: RingBuffer::new(frame_window),
            build_sum_us: 0,
            raster_sum_us: 0,
            jank_in_window: 0,
            fps: DEFAULT_FPS,
            avg_build: Duration::ZERO,
            avg_raster: Duration::ZERO,
            total_jank_frames: 0,
            rebuilds: 0,
            snapshots: RingBuffer::new(snapshot_capacity),
            subscription: None,
            timer: None,
        }
    }

    fn push_sample(&mut self, sample: FrameSample) {
        if sample.is_jank {
            self.total_jank_frames += 1;
            self.jank_in_window += 1;
        }
        self.build_sum_us += sample.build.as_micros();
        self.raster_sum_us += sample.raster.as_micros();

        for evicted in self.window.push(sample) {
            self.build_sum_us -= evicted.build.as_micros();
            self.raster_sum_us -= evicted.raster.as_micros();
            if evicted.is_jank {
                self.jank_in_window -= 1;
            }
        }
    }

    fn recompute(&mut self) {
        let n = self.window.len() as u128;
        if n < 2 {
            return;
        }
        let avg_build_us = self.build_sum_us / n;
        let avg_raster_us = self.raster_sum_us / n;
        self.avg_build = Duration::from_micros(avg_build_us as u64);
        self.avg_raster = Duration::from_micros(avg_raster_us as u64);

        let avg_total_us = (self.build_sum_us + self.raster_sum_us) as f64 / n as f64;
        self.fps = if avg_total_us > 0.0 {
            (1_000_000.0 / avg_total_us).clamp(0.0, MAX_FPS)
        } else {
            MAX_FPS
        };
    }

    fn jank_percentage(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.jank_in_window as f64 / self.window.len() as f64 * 100.0
    }

    fn is_pristine(&self) -> bool {
        self.window.is_empty()
            && self.snapshots.is_empty()
            && self.total_jank_frames == 0
            && self.rebuilds == 0
            && self.fps == DEFAULT_FPS
    }

    fn reset(&mut self) {
        self.window.clear();
        self.snapshots.clear();
        self.build_sum_us = 0;
        self.raster_sum_us = 0;
        self.jank_in_window = 0;
        self.fps = DEFAULT_FPS;
        self.avg_build = Duration::ZERO;
        self.avg_raster = Duration::ZERO;
        self.total_jank_frames = 0;
        self.rebuilds = 0;
    }
}

struct SamplerShared {
    core: Mutex<SamplerCore>,
    notifier: ChangeNotifier,
    switch: RecordingSwitch,
    memory: Arc<dyn MemoryProbe>,
}

impl SamplerShared {
    fn on_frames(&self, frames: &[FrameTiming]) {
        if frames.is_empty() || !self.switch.is_enabled() {
            return;
        }
        let mut core = self.core.lock();
        if core.state != SamplerState::Monitoring {
            return;
        }
        for timing in frames {
            core.push_sample(FrameSample::from(*timing));
        }
        core.recompute();
        drop(core);

        self.notifier.bump();
    }

    fn capture_snapshot(&self) {
        if !self.switch.is_enabled() || self.core.lock().state != SamplerState::Monitoring {
            return;
        }
        let memory_bytes = self.memory.resident_bytes().unwrap_or(0);

        let mut core = self.core.lock();
        if core.state != SamplerState::Monitoring {
            return;
        }
        let snapshot = PerformanceSnapshot {
            timestamp: Local::now(),
            fps: core.fps,
            sample_count: core.window.len(),
            avg_build: core.avg_build,
            avg_raster: core.avg_raster,
            memory_bytes,
            rebuilds: core.rebuilds,
        };
        core.snapshots.push(snapshot);
        core.rebuilds = 0;
        drop(core);

        self.notifier.bump();
    }
}

#[derive(Serialize)]
struct PerformanceExport<'a> {
    stats: PerformanceStats,
    snapshots: Vec<&'a PerformanceSnapshot>,
    window: Vec<&'a FrameSample>,
}

/// Samples frame timings into a sliding window and rolls them up into
/// periodic snapshots while monitoring.
pub struct PerformanceSampler {
    shared: Arc<SamplerShared>,
    source: Arc<dyn FrameTimingSource>,
    snapshot_interval: Duration,
}

impl PerformanceSampler {
    pub fn new(
        config: &PerformanceConfig,
        source: Arc<dyn FrameTimingSource>,
        memory: Arc<dyn MemoryProbe>,
        switch: RecordingSwitch,
    ) -> Self {
        Self {
            shared: Arc::new(SamplerShared {
                core: Mutex::new(SamplerCore::new(
                    config.frame_window,
                    config.snapshot_capacity,
                )),
                notifier: ChangeNotifier::new(),
                switch,
                memory,
            }),
            source,
            snapshot_interval: config.snapshot_interval.max(Duration::from_millis(1)),
        }
    }

    /// Idle -> Monitoring. Subscribes to the frame source and, when called
    /// inside a tokio runtime, arms the periodic snapshot timer. Without a
    /// runtime, snapshots are only taken through [`PerformanceSampler::tick`].
    pub fn start(&self) {
        self.start_inner(true);
    }

    /// Like [`PerformanceSampler::start`] but never arms the timer, so
    /// snapshots happen only on [`PerformanceSampler::tick`].
    pub fn start_manual(&self) {
        self.start_inner(false);
    }

    fn start_inner(&self, with_timer: bool) {
        if !self.shared.switch.is_enabled() {
            return;
        }
        let mut core = self.shared.core.lock();
        if core.state == SamplerState::Monitoring {
            return;
        }
        core.state = SamplerState::Monitoring;
        if with_timer {
            core.timer = self.spawn_timer();
        }
        drop(core);

        // Sources may deliver buffered frames from inside `subscribe`.
        let weak = Arc::downgrade(&self.shared);
        let callback: FrameCallback = Arc::new(move |frames: &[FrameTiming]| {
            if let Some(shared) = weak.upgrade() {
                shared.on_frames(frames);
            }
        });
        let id = self.source.subscribe(callback);

        let mut core = self.shared.core.lock();
        if core.state == SamplerState::Monitoring && core.subscription.is_none() {
            core.subscription = Some(id);
        } else {
            drop(core);
            self.source.unsubscribe(id);
        }

        tracing::info!(interval = ?self.snapshot_interval, "performance sampling started");
    }

    /// Monitoring -> Idle. Unsubscribes and disarms the timer.
    pub fn stop(&self) {
        let mut core = self.shared.core.lock();
        if core.state == SamplerState::Idle {
            return;
        }
        core.state = SamplerState::Idle;
        let subscription = core.subscription.take();
        let timer = core.timer.take();
        drop(core);

        if let Some(id) = subscription {
            self.source.unsubscribe(id);
        }
        if let Some(timer) = timer {
            timer.abort();
        }
        tracing::info!("performance sampling stopped");
    }

    fn spawn_timer(&self) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("no tokio runtime, snapshots require manual ticks");
                return None;
            }
        };
        let weak: Weak<SamplerShared> = Arc::downgrade(&self.shared);
        let period = self.snapshot_interval;

        Some(handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(shared) => shared.capture_snapshot(),
                    None => break,
                }
            }
        }))
    }

    /// Feeds a batch of frame timings directly, for hosts that do not route
    /// frames through a [`FrameTimingSource`]. Ignored while idle.
    pub fn record_frames(&self, frames: &[FrameTiming]) {
        self.shared.on_frames(frames);
    }

    /// Captures a snapshot now. Ignored while idle.
    pub fn tick(&self) {
        self.shared.capture_snapshot();
    }

    pub fn track_rebuild(&self) {
        if !self.shared.switch.is_enabled() {
            return;
        }
        let mut core = self.shared.core.lock();
        if core.state == SamplerState::Monitoring {
            core.rebuilds += 1;
        }
    }

    /// Resets samples, snapshots and counters. Leaves the state untouched.
    pub fn clear(&self) {
        let mut core = self.shared.core.lock();
        if core.is_pristine() {
            return;
        }
        core.reset();
        drop(core);

        self.shared.notifier.bump();
    }

    pub fn state(&self) -> SamplerState {
        self.shared.core.lock().state
    }

    pub fn is_monitoring(&self) -> bool {
        self.state() == SamplerState::Monitoring
    }

    pub fn current_fps(&self) -> f64 {
        self.shared.core.lock().fps
    }

    pub fn fps_status(&self) -> FpsStatus {
        FpsStatus::from_fps(self.current_fps())
    }

    pub fn average_build_time(&self) -> Duration {
        self.shared.core.lock().avg_build
    }

    pub fn average_raster_time(&self) -> Duration {
        self.shared.core.lock().avg_raster
    }

    pub fn jank_percentage(&self) -> f64 {
        self.shared.core.lock().jank_percentage()
    }

    pub fn total_jank_frames(&self) -> u64 {
        self.shared.core.lock().total_jank_frames
    }

    pub fn pending_rebuilds(&self) -> u64 {
        self.shared.core.lock().rebuilds
    }

    /// Window contents, newest first.
    pub fn frame_samples(&self) -> Vec<FrameSample> {
        self.shared.core.lock().window.snapshot_newest_first()
    }

    /// Snapshot history, newest first.
    pub fn snapshots(&self) -> Vec<PerformanceSnapshot> {
        self.shared.core.lock().snapshots.snapshot_newest_first()
    }

    pub fn latest_snapshot(&self) -> Option<PerformanceSnapshot> {
        self.shared.core.lock().snapshots.latest().cloned()
    }

    pub fn stats(&self) -> PerformanceStats {
        let core = self.shared.core.lock();
        stats_of(&core)
    }

    pub fn set_snapshot_capacity(&self, capacity: usize) {
        let evicted = self.shared.core.lock().snapshots.set_capacity(capacity);
        if !evicted.is_empty() {
            self.shared.notifier.bump();
        }
    }

    pub fn version(&self) -> u64 {
        self.shared.notifier.version()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.notifier.subscribe()
    }

    /// Aggregates, snapshot history and frame window as pretty JSON, all
    /// lists oldest first.
    pub fn export_json(&self) -> Result<String> {
        let core = self.shared.core.lock();
        let export = PerformanceExport {
            stats: stats_of(&core),
            snapshots: core.snapshots.iter().collect(),
            window: core.window.iter().collect(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// One line per snapshot, oldest first.
    pub fn export_text(&self) -> String {
        self.shared
            .core
            .lock()
            .snapshots
            .iter()
            .map(PerformanceSnapshot::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn stats_of(core: &SamplerCore) -> PerformanceStats {
    PerformanceStats {
        monitoring: core.state == SamplerState::Monitoring,
        fps: core.fps,
        fps_status: FpsStatus::from_fps(core.fps),
        avg_build: core.avg_build,
        avg_raster: core.avg_raster,
        window_len: core.window.len(),
        jank_percentage: core.jank_percentage(),
        total_jank_frames: core.total_jank_frames,
        pending_rebuilds: core.rebuilds,
        snapshot_count: core.snapshots.len(),
    }
}

impl Drop for PerformanceSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PerformanceSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceSampler")
            .field("state", &self.state())
            .field("snapshot_interval", &self.snapshot_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::source::{FrameTimingHub, NoMemoryProbe};
    use pretty_assertions::assert_eq;

    struct FixedMemory(u64);

    impl MemoryProbe for FixedMemory {
        fn resident_bytes(&self) -> Option<u64> {
            Some(self.0)
        }
    }

    fn config(frame_window: usize) -> PerformanceConfig {
        PerformanceConfig {
            frame_window,
            snapshot_capacity: 5,
            snapshot_interval: Duration::from_secs(1),
        }
    }

    fn sampler_with(hub: &Arc<FrameTimingHub>, frame_window: usize) -> PerformanceSampler {
        PerformanceSampler::new(
            &config(frame_window),
            hub.clone(),
            Arc::new(NoMemoryProbe),
            RecordingSwitch::new(true),
        )
    }

    fn frame_ms(build: u64, raster: u64) -> FrameTiming {
        FrameTiming::from_micros(build * 1000, raster * 1000)
    }

    #[test]
    fn test_start_stop_transitions() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        assert_eq!(sampler.state(), SamplerState::Idle);

        sampler.start();
        assert!(sampler.is_monitoring());
        assert_eq!(hub.subscriber_count(), 1);

        sampler.start();
        assert_eq!(hub.subscriber_count(), 1);

        sampler.stop();
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert_eq!(hub.subscriber_count(), 0);

        let version = sampler.version();
        sampler.stop();
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert_eq!(sampler.version(), version);
    }

    #[test]
    fn test_start_is_noop_when_disabled() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = PerformanceSampler::new(
            &config(10),
            hub.clone(),
            Arc::new(NoMemoryProbe),
            RecordingSwitch::new(false),
        );

        sampler.start();

        assert_eq!(sampler.state(), SamplerState::Idle);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_disabled_switch_freezes_monitoring_sampler() {
        let hub = Arc::new(FrameTimingHub::new());
        let switch = RecordingSwitch::new(true);
        let sampler = PerformanceSampler::new(
            &config(10),
            hub.clone(),
            Arc::new(NoMemoryProbe),
            switch.clone(),
        );
        sampler.start();
        switch.set_enabled(false);

        hub.emit(&[frame_ms(5, 5), frame_ms(5, 5)]);
        sampler.track_rebuild();
        sampler.tick();

        assert!(sampler.is_monitoring());
        assert!(sampler.frame_samples().is_empty());
        assert!(sampler.snapshots().is_empty());
        assert_eq!(sampler.pending_rebuilds(), 0);
        assert_eq!(sampler.version(), 0);

        switch.set_enabled(true);
        hub.emit(&[frame_ms(5, 5), frame_ms(5, 5)]);
        assert_eq!(sampler.frame_samples().len(), 2);
    }

    /// Replays a buffered batch synchronously while subscribing.
    struct ReplayingSource {
        hub: FrameTimingHub,
        buffered: Vec<FrameTiming>,
    }

    impl FrameTimingSource for ReplayingSource {
        fn subscribe(&self, callback: FrameCallback) -> SubscriptionId {
            callback(self.buffered.as_slice());
            self.hub.subscribe(callback)
        }

        fn unsubscribe(&self, id: SubscriptionId) {
            self.hub.unsubscribe(id);
        }
    }

    #[test]
    fn test_source_may_deliver_frames_while_subscribing() {
        let source = Arc::new(ReplayingSource {
            hub: FrameTimingHub::new(),
            buffered: vec![frame_ms(5, 5), frame_ms(5, 5)],
        });
        let sampler = PerformanceSampler::new(
            &config(10),
            source.clone(),
            Arc::new(NoMemoryProbe),
            RecordingSwitch::new(true),
        );

        sampler.start();

        assert_eq!(sampler.frame_samples().len(), 2);
        assert_eq!(source.hub.subscriber_count(), 1);

        sampler.stop();
        assert_eq!(source.hub.subscriber_count(), 0);
    }

    #[test]
    fn test_fps_from_two_frames() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start();

        hub.emit(&[frame_ms(5, 5), frame_ms(5, 5)]);

        assert!((sampler.current_fps() - 100.0).abs() < 1e-9);
        assert_eq!(sampler.average_build_time(), Duration::from_millis(5));
        assert_eq!(sampler.average_raster_time(), Duration::from_millis(5));
        assert_eq!(sampler.fps_status(), FpsStatus::Good);
    }

    #[test]
    fn test_single_sample_does_not_recompute() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start();

        hub.emit(&[FrameTiming::from_micros(0, 1)]);

        assert_eq!(sampler.current_fps(), DEFAULT_FPS);
        assert_eq!(sampler.average_build_time(), Duration::ZERO);
        assert_eq!(sampler.frame_samples().len(), 1);
    }

    #[test]
    fn test_fps_is_clamped() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start();

        hub.emit(&[FrameTiming::from_micros(1, 1), FrameTiming::from_micros(1, 1)]);

        assert_eq!(sampler.current_fps(), MAX_FPS);
    }

    #[test]
    fn test_averages_use_window_only() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 2);
        sampler.start();

        hub.emit(&[frame_ms(30, 10), frame_ms(4, 4), frame_ms(6, 6)]);

        assert_eq!(sampler.frame_samples().len(), 2);
        assert_eq!(sampler.average_build_time(), Duration::from_millis(5));
        assert_eq!(sampler.average_raster_time(), Duration::from_millis(5));
        assert!((sampler.current_fps() - 100.0).abs() < 1e-9);
        assert_eq!(sampler.total_jank_frames(), 1);
        assert_eq!(sampler.jank_percentage(), 0.0);
    }

    #[test]
    fn test_jank_percentage_over_window() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start();

        hub.emit(&[frame_ms(10, 8), frame_ms(8, 8), frame_ms(20, 5), frame_ms(2, 2)]);

        assert_eq!(sampler.jank_percentage(), 50.0);
        assert_eq!(sampler.total_jank_frames(), 2);
    }

    #[test]
    fn test_frames_ignored_while_idle() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);

        sampler.record_frames(&[frame_ms(5, 5), frame_ms(5, 5)]);

        assert!(sampler.frame_samples().is_empty());
        assert_eq!(sampler.version(), 0);
    }

    #[test]
    fn test_tick_captures_snapshot_and_resets_rebuilds() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = PerformanceSampler::new(
            &config(10),
            hub.clone(),
            Arc::new(FixedMemory(4096)),
            RecordingSwitch::new(true),
        );
        sampler.track_rebuild();
        assert_eq!(sampler.pending_rebuilds(), 0);

        sampler.start();
        hub.emit(&[frame_ms(5, 5), frame_ms(5, 5)]);
        sampler.track_rebuild();
        sampler.track_rebuild();
        sampler.tick();

        let snapshot = sampler.latest_snapshot().unwrap();
        assert_eq!(snapshot.rebuilds, 2);
        assert_eq!(snapshot.sample_count, 2);
        assert_eq!(snapshot.memory_bytes, 4096);
        assert!((snapshot.fps - 100.0).abs() < 1e-9);
        assert_eq!(sampler.pending_rebuilds(), 0);

        sampler.tick();
        assert_eq!(sampler.latest_snapshot().unwrap().rebuilds, 0);
        assert_eq!(sampler.snapshots().len(), 2);
    }

    #[test]
    fn test_no_snapshots_while_idle() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);

        sampler.tick();

        assert!(sampler.snapshots().is_empty());
    }

    #[test]
    fn test_snapshot_history_is_bounded() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start();

        for _ in 0..8 {
            sampler.tick();
        }

        assert_eq!(sampler.snapshots().len(), 5);
        sampler.set_snapshot_capacity(2);
        assert_eq!(sampler.snapshots().len(), 2);
    }

    #[test]
    fn test_clear_keeps_state_and_is_idempotent() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start();
        hub.emit(&[frame_ms(10, 10), frame_ms(10, 10)]);
        sampler.track_rebuild();
        sampler.tick();

        sampler.clear();
        let first = sampler.stats();
        let version = sampler.version();
        sampler.clear();

        assert_eq!(sampler.stats(), first);
        assert_eq!(sampler.version(), version);
        assert!(first.monitoring);
        assert_eq!(first.fps, DEFAULT_FPS);
        assert_eq!(first.window_len, 0);
        assert_eq!(first.total_jank_frames, 0);
        assert_eq!(first.snapshot_count, 0);
        assert_eq!(first.pending_rebuilds, 0);
    }

    #[test]
    fn test_exports() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start();
        hub.emit(&[frame_ms(5, 5), frame_ms(5, 5)]);
        sampler.tick();

        let json: serde_json::Value =
            serde_json::from_str(&sampler.export_json().unwrap()).unwrap();
        assert_eq!(json["stats"]["window_len"], 2);
        assert_eq!(json["snapshots"].as_array().unwrap().len(), 1);
        assert_eq!(json["window"][0]["total"], 10.0);

        let text = sampler.export_text();
        assert!(text.contains("fps=100.0 samples=2 build=5.00ms raster=5.00ms memory=0 B rebuilds=0"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_snapshots_every_interval() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(sampler.snapshots().len(), 3);

        sampler.stop();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(sampler.snapshots().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_start_never_ticks_on_its_own() {
        let hub = Arc::new(FrameTimingHub::new());
        let sampler = sampler_with(&hub, 10);
        sampler.start_manual();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(sampler.snapshots().is_empty());

        sampler.tick();
        assert_eq!(sampler.snapshots().len(), 1);
    }
}
