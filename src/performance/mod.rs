pub mod sampler;
pub mod source;
pub mod types;

pub use sampler::{PerformanceSampler, SamplerState};
pub use source::{
    FrameCallback, FrameTimingHub, FrameTimingSource, MemoryProbe, NoMemoryProbe,
    ProcessMemoryProbe, SubscriptionId,
};
pub use types::{
    FpsStatus, FrameSample, FrameTiming, PerformanceSnapshot, PerformanceStats, DEFAULT_FPS,
    JANK_THRESHOLD, MAX_FPS,
};
