use crate::export::{ExportFormat, ExportTarget};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "devlens")]
#[command(author = "Anurag Ambuj")]
#[command(version)]
#[command(about = "Replay a captured diagnostics trace and export the recorder state", long_about = None)]
pub struct Cli {
    #[arg(help = "JSON-lines trace file, or - for stdin")]
    pub trace: PathBuf,

    #[arg(
        short = 'c',
        long,
        help = "Path to configuration file",
        env = "DEVLENS_CONFIG"
    )]
    pub config: Option<PathBuf>,

    #[arg(short = 'o', long, help = "Directory for the export file (~ is expanded)")]
    pub export_dir: Option<String>,

    #[arg(short, long, default_value = "json", help = "Export format: json or text")]
    pub format: ExportFormat,

    #[arg(
        short,
        long,
        default_value = "all",
        help = "What to export: network, console, performance or all"
    )]
    pub target: ExportTarget,

    #[arg(long, help = "Print the export to stdout instead of writing a file")]
    pub stdout: bool,
}
