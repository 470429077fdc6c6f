pub mod duration_millis;
pub mod id;
pub mod notifier;
pub mod redaction;
pub mod ring_buffer;
pub mod switch;

pub use id::IdGenerator;
pub use notifier::ChangeNotifier;
pub use redaction::{FieldMap, RedactionPolicy, REDACTED};
pub use ring_buffer::RingBuffer;
pub use switch::RecordingSwitch;

/// Formats a byte count as a short human-readable string ("1.5 KB").
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;
    match bytes {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}
