pub mod record;
pub mod recorder;

pub use record::{LogLevel, LogRecord};
pub use recorder::LogRecorder;
