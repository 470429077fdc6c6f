pub mod body;
pub mod record;
pub mod recorder;

pub use body::Body;
pub use record::{Completion, CorrelationId, NetworkRecord, StatusFilter};
pub use recorder::{NetworkRecorder, NetworkStats};
