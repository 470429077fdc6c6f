use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Verbose,
    #[default]
    Debug,
    Info,
    Warning,
    Error,
}

/// One leveled text event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: String,
    pub message: String,
    pub tag: Option<String>,
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub error: Option<String>,
    pub stack_trace: Option<String>,
}

impl LogRecord {
    pub(crate) fn matches_query(&self, query_lower: &str) -> bool {
        self.message.to_lowercase().contains(query_lower)
            || self
                .tag
                .as_ref()
                .is_some_and(|tag| tag.to_lowercase().contains(query_lower))
            || self.level.to_string().to_lowercase().contains(query_lower)
    }

    /// `[timestamp] [LEVEL] [tag] message | error: .. | stack: ..`, with
    /// embedded newlines escaped so each record stays on one line.
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "[{}] [{}] [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.level,
            self.tag.as_deref().unwrap_or("-"),
            escape_newlines(&self.message),
        );
        if let Some(error) = &self.error {
            line.push_str(" | error: ");
            line.push_str(&escape_newlines(error));
        }
        if let Some(stack) = &self.stack_trace {
            line.push_str(" | stack: ");
            line.push_str(&escape_newlines(stack.trim_end()));
        }
        line
    }
}

fn escape_newlines(text: &str) -> String {
    text.replace('\r', "").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(level: LogLevel, tag: Option<&str>) -> LogRecord {
        LogRecord {
            id: "1-0".to_string(),
            message: "login failed".to_string(),
            tag: tag.map(str::to_string),
            level,
            timestamp: Local.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
            error: None,
            stack_trace: None,
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Verbose < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert_eq!(LogLevel::default(), LogLevel::Debug);
    }

    #[test]
    fn test_level_parse_and_display() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::Info.to_string(), "INFO");
    }

    #[test]
    fn test_to_line_plain() {
        insta::assert_snapshot!(
            record(LogLevel::Info, Some("auth")).to_line(),
            @"[2026-10-16 09:30:00.000] [INFO] [auth] login failed"
        );
    }

    #[test]
    fn test_to_line_with_error_and_stack() {
        let mut rec = record(LogLevel::Error, None);
        rec.error = Some("bad password".to_string());
        rec.stack_trace = Some("at login()\nat main()\n".to_string());

        insta::assert_snapshot!(
            rec.to_line(),
            @r"[2026-10-16 09:30:00.000] [ERROR] [-] login failed | error: bad password | stack: at login()\nat main()"
        );
    }

    #[test]
    fn test_matches_query() {
        let rec = record(LogLevel::Warning, Some("Network"));
        assert!(rec.matches_query("login"));
        assert!(rec.matches_query("network"));
        assert!(rec.matches_query("warn"));
        assert!(!rec.matches_query("database"));
    }
}
