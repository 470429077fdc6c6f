use devlens::config::Config;
use devlens::console::LogLevel;
use devlens::export::{self, ExportFormat, ExportTarget};
use devlens::network::StatusFilter;
use devlens::performance::{FrameTimingHub, NoMemoryProbe};
use devlens::trace::Replayer;
use devlens::{AppError, Diagnostics};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const TRACE: &str = r#"
{"type":"request_start","key":"login","method":"post","url":"https://api.example.com/login","headers":{"Authorization":"Bearer secret","Accept":"application/json"},"body":{"user":"ada"}}
{"type":"request_start","key":"feed","method":"get","url":"https://api.example.com/feed?page=1"}
{"type":"log","message":"login submitted","tag":"auth","level":"info"}
{"type":"frames","frames":[{"build_us":5000,"raster_us":5000},{"build_us":10000,"raster_us":8000}]}
{"type":"rebuild"}
{"type":"request_end","key":"login","status":200,"response_body":"ok","response_headers":{"Set-Cookie":"sid=1"},"duration_ms":87}
{"type":"request_end","key":"ghost","status":500}
{"type":"request","method":"get","url":"https://cdn.example.com/logo.png","status":404,"duration_ms":12}
{"type":"log_error","message":"feed stalled","error":"timeout","stack_trace":"at feed()"}
{"type":"tick"}
"#;

fn diagnostics() -> Diagnostics {
    Diagnostics::with_sources(
        &Config::default(),
        Arc::new(FrameTimingHub::new()),
        Arc::new(NoMemoryProbe),
    )
}

#[test]
fn test_replay_populates_every_recorder() {
    let diagnostics = diagnostics();
    diagnostics.performance().start_manual();

    let report = Replayer::new(&diagnostics)
        .replay(TRACE.as_bytes())
        .unwrap();

    assert_eq!(report.events, 10);
    assert_eq!(report.unmatched_completions, 1);

    let network = diagnostics.network();
    let stats = network.stats();
    assert_eq!((stats.total, stats.success, stats.error, stats.pending), (3, 1, 1, 1));

    let login = &network.search("login")[0];
    assert_eq!(login.method, "POST");
    assert_eq!(login.request_headers.as_ref().unwrap()["Authorization"], "[REDACTED]");
    assert_eq!(login.request_headers.as_ref().unwrap()["Accept"], "application/json");
    assert_eq!(login.response_headers.as_ref().unwrap()["Set-Cookie"], "[REDACTED]");
    assert_eq!(login.request_size, Some(14));
    assert_eq!(login.formatted_duration(), "87ms");

    let pending = network.filter_by_status(StatusFilter::Pending);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].path(), "/feed");

    let console = diagnostics.console();
    assert_eq!(console.count_by_level(LogLevel::Info), 1);
    assert_eq!(console.count_by_level(LogLevel::Error), 1);
    assert_eq!(console.records()[0].error.as_deref(), Some("timeout"));

    let performance = diagnostics.performance();
    assert_eq!(performance.total_jank_frames(), 1);
    assert_eq!(performance.jank_percentage(), 50.0);
    let snapshot = performance.latest_snapshot().unwrap();
    assert_eq!(snapshot.rebuilds, 1);
    assert_eq!(snapshot.sample_count, 2);
    assert_eq!(snapshot.memory_bytes, 0);
}

#[test]
fn test_replay_reports_bad_line() {
    let diagnostics = diagnostics();
    let trace = "{\"type\":\"log\",\"message\":\"ok\"}\n\nnot json\n";

    let err = Replayer::new(&diagnostics)
        .replay(trace.as_bytes())
        .unwrap_err();

    assert!(matches!(err, AppError::Trace { line: 3, .. }));
    assert_eq!(diagnostics.console().total_count(), 1);
}

#[test]
fn test_clear_event_resets_state() {
    let diagnostics = diagnostics();
    diagnostics.performance().start_manual();
    let trace = format!("{}\n{{\"type\":\"clear\"}}\n", TRACE.trim());

    Replayer::new(&diagnostics).replay(trace.as_bytes()).unwrap();

    let summary = diagnostics.summary();
    assert_eq!(summary.network.total, 0);
    assert_eq!(summary.logs.values().sum::<usize>(), 0);
    assert_eq!(summary.performance.snapshot_count, 0);
    assert!(summary.performance.monitoring);
}

#[test]
fn test_replay_then_export_text() {
    let dir = tempfile::tempdir().unwrap();
    let diagnostics = diagnostics();
    diagnostics.performance().start_manual();
    Replayer::new(&diagnostics).replay(TRACE.as_bytes()).unwrap();

    let path = export::export_to_file(
        &diagnostics,
        ExportTarget::Network,
        ExportFormat::Text,
        dir.path().to_str(),
    )
    .unwrap();

    let contents = std::fs::read_to_string(path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("POST 200 https://api.example.com/login"));
    assert!(lines[1].contains("GET PENDING https://api.example.com/feed?page=1"));
    assert!(lines[2].contains("GET 404 https://cdn.example.com/logo.png"));
    assert!(!contents.contains("Bearer secret"));
}
