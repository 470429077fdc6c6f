use crate::diagnostics::Diagnostics;
use crate::error::Result;
use chrono::Local;
use serde_json::json;
use std::path::PathBuf;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportTarget {
    Network,
    Console,
    Performance,
    All,
}

fn embed(exported: &str) -> Result<serde_json::Value> {
    Ok(serde_json::from_str(exported)?)
}

/// Renders the chosen recorder(s) in memory.
pub fn render(
    diagnostics: &Diagnostics,
    target: ExportTarget,
    format: ExportFormat,
) -> Result<String> {
    let rendered = match (target, format) {
        (ExportTarget::Network, ExportFormat::Json) => diagnostics.network().export_json()?,
        (ExportTarget::Network, ExportFormat::Text) => diagnostics.network().export_text(),
        (ExportTarget::Console, ExportFormat::Json) => diagnostics.console().export_json()?,
        (ExportTarget::Console, ExportFormat::Text) => diagnostics.console().export_text(),
        (ExportTarget::Performance, ExportFormat::Json) => {
            diagnostics.performance().export_json()?
        }
        (ExportTarget::Performance, ExportFormat::Text) => diagnostics.performance().export_text(),
        (ExportTarget::All, ExportFormat::Json) => {
            let document = json!({
                "exported_at": Local::now().to_rfc3339(),
                "summary": diagnostics.summary(),
                "network": embed(&diagnostics.network().export_json()?)?,
                "console": embed(&diagnostics.console().export_json()?)?,
                "performance": embed(&diagnostics.performance().export_json()?)?,
            });
            serde_json::to_string_pretty(&document)?
        }
        (ExportTarget::All, ExportFormat::Text) => [
            ("network", diagnostics.network().export_text()),
            ("console", diagnostics.console().export_text()),
            ("performance", diagnostics.performance().export_text()),
        ]
        .into_iter()
        .map(|(section, body)| format!("== {} ==\n{}", section, body))
        .collect::<Vec<_>>()
        .join("\n\n"),
    };
    Ok(rendered)
}

/// Resolves the export directory: `base_dir` with `~` expanded, else the
/// platform data dir, else the working directory.
pub fn export_dir(base_dir: Option<&str>) -> PathBuf {
    if let Some(custom_dir) = base_dir {
        PathBuf::from(shellexpand::tilde(custom_dir).to_string())
    } else {
        directories::ProjectDirs::from("com", "devlens", "devlens")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Writes a timestamped export file and returns its path.
pub fn export_to_file(
    diagnostics: &Diagnostics,
    target: ExportTarget,
    format: ExportFormat,
    base_dir: Option<&str>,
) -> Result<PathBuf> {
    let dir = export_dir(base_dir);
    std::fs::create_dir_all(&dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("{}_{}.{}", target, timestamp, format.extension());
    let filepath = dir.join(&filename);

    let contents = render(diagnostics, target, format)?;
    std::fs::write(&filepath, contents)?;

    tracing::info!(path = %filepath.display(), "export written");
    Ok(filepath)
}
