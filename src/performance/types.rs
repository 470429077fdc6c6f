//! Frame timing and performance rollup types.

use crate::capture::duration_millis;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::Display;

/// Frame budget at 60 fps. Frames whose total time exceeds it are jank.
pub const JANK_THRESHOLD: Duration = Duration::from_micros(16_667);

/// Upper clamp for the derived frame rate.
pub const MAX_FPS: f64 = 120.0;

/// Frame rate reported before enough samples exist, and after a clear.
pub const DEFAULT_FPS: f64 = 60.0;

/// Raw timing delivered by the frame-timing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTiming {
    #[serde(with = "duration_millis")]
    pub build: Duration,
    #[serde(with = "duration_millis")]
    pub raster: Duration,
}

impl FrameTiming {
    pub fn new(build: Duration, raster: Duration) -> Self {
        Self { build, raster }
    }

    pub fn from_micros(build_us: u64, raster_us: u64) -> Self {
        Self::new(
            Duration::from_micros(build_us),
            Duration::from_micros(raster_us),
        )
    }
}

/// One frame inside the sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSample {
    #[serde(with = "duration_millis")]
    pub build: Duration,
    #[serde(with = "duration_millis")]
    pub raster: Duration,
    #[serde(with = "duration_millis")]
    pub total: Duration,
    pub is_jank: bool,
}

impl From<FrameTiming> for FrameSample {
    fn from(timing: FrameTiming) -> Self {
        let total = timing.build + timing.raster;
        Self {
            build: timing.build,
            raster: timing.raster,
            total,
            is_jank: total > JANK_THRESHOLD,
        }
    }
}

/// Periodic rollup of the sampler state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub timestamp: DateTime<Local>,
    pub fps: f64,
    pub sample_count: usize,
    #[serde(rename = "avg_build_ms", with = "duration_millis")]
    pub avg_build: Duration,
    #[serde(rename = "avg_raster_ms", with = "duration_millis")]
    pub avg_raster: Duration,
    /// Resident memory in bytes, zero when unavailable.
    pub memory_bytes: u64,
    /// Rebuilds tracked since the previous snapshot.
    pub rebuilds: u64,
}

impl PerformanceSnapshot {
    pub fn to_line(&self) -> String {
        format!(
            "[{}] fps={:.1} samples={} build={:.2}ms raster={:.2}ms memory={} rebuilds={}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.fps,
            self.sample_count,
            self.avg_build.as_secs_f64() * 1000.0,
            self.avg_raster.as_secs_f64() * 1000.0,
            crate::capture::format_bytes(self.memory_bytes),
            self.rebuilds,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FpsStatus {
    Good,
    Ok,
    Bad,
}

impl FpsStatus {
    pub fn from_fps(fps: f64) -> Self {
        if fps >= 55.0 {
            FpsStatus::Good
        } else if fps >= 30.0 {
            FpsStatus::Ok
        } else {
            FpsStatus::Bad
        }
    }
}

/// Point-in-time view of the sampler aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub monitoring: bool,
    pub fps: f64,
    pub fps_status: FpsStatus,
    #[serde(rename = "avg_build_ms", with = "duration_millis")]
    pub avg_build: Duration,
    #[serde(rename = "avg_raster_ms", with = "duration_millis")]
    pub avg_raster: Duration,
    pub window_len: usize,
    pub jank_percentage: f64,
    pub total_jank_frames: u64,
    pub pending_rebuilds: u64,
    pub snapshot_count: usize,
}
