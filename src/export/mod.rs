//! Downloadable artifacts for a generated response: PDF, JSON or plain text.

pub mod pdf;

use crate::rubric::{render_html_table, RubricRow};
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported export format: '{0}'")]
    UnknownFormat(String),

    #[error("Failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Export filename '{0}' must not contain a path")]
    UnsafeFilename(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Json,
    Txt,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
            ExportFormat::Txt => "text/plain",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            "txt" | "text" => Ok(ExportFormat::Txt),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// A named blob ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Bytes,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    feature: &'a str,
    content: &'a str,
    timestamp: String,
    exported_by: &'a str,
}

/// Lowercases and turns every whitespace run into one underscore.
pub fn slugify(label: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&label.to_lowercase(), "_")
        .into_owned()
}

/// Encodes `content` for download, stamped with `exported_by`.
///
/// The filename date is the UTC calendar date of `now`; the generated-on line
/// uses `now` in its own zone. PDFs use the built-in Helvetica font, so any
/// character outside Latin-1 is printed as `?`.
pub fn export_response<Tz>(
    content: &str,
    feature_label: &str,
    format: ExportFormat,
    exported_by: &str,
    now: &DateTime<Tz>,
) -> Result<ExportArtifact, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = now.with_timezone(&Utc);
    let filename = format!(
        "{}_{}.{}",
        slugify(feature_label),
        utc.format("%Y-%m-%d"),
        format.extension()
    );
    let generated_on = format!("Generated on: {}", now.format("%-m/%-d/%Y, %-I:%M:%S %p"));

    let bytes = match format {
        ExportFormat::Txt => {
            Bytes::from(format!("{}\n{}\n\n{}", feature_label, generated_on, content))
        }
        ExportFormat::Json => {
            let document = JsonExport {
                feature: feature_label,
                content,
                timestamp: utc.to_rfc3339_opts(SecondsFormat::Millis, true),
                exported_by,
            };
            Bytes::from(serde_json::to_vec_pretty(&document)?)
        }
        ExportFormat::Pdf => Bytes::from(pdf::render_pdf(feature_label, &generated_on, content)),
    };

    info!(%filename, bytes = bytes.len(), "Export prepared");
    Ok(ExportArtifact {
        filename,
        mime_type: format.mime_type(),
        bytes,
    })
}

/// The rubric table as a standalone HTML page.
pub fn export_rubric_html<Tz>(
    rows: &[RubricRow],
    product_name: &str,
    now: &DateTime<Tz>,
) -> ExportArtifact
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = now.with_timezone(&Utc).format("%Y-%m-%d");
    ExportArtifact {
        filename: format!("professional_rubric_{}.html", date),
        mime_type: "text/html",
        bytes: Bytes::from(render_html_table(rows, product_name, now)),
    }
}

/// Writes the artifact under `dir`, returning the full path.
///
/// Filenames carrying directory components (`/`, `..`) are refused.
pub fn write_to_dir(artifact: &ExportArtifact, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    let name = Path::new(&artifact.filename);
    if name.file_name() != Some(name.as_os_str()) || artifact.filename.contains('\\') {
        return Err(ExportError::UnsafeFilename(artifact.filename.clone()));
    }
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(&artifact.filename);
    std::fs::write(&path, &artifact.bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Export written");
    Ok(path)
}

#[cfg(test)]
mod tests;
