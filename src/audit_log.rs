use crate::detection::AnalysisResult;
use crate::statistics::CheckKind;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Message bodies are cut to this many characters before they are logged.
pub const MAX_LOGGED_MESSAGE_CHARS: usize = 500;

/// Plain-text, one-file-per-day record of every analysis.
pub struct AnalysisLogger {
    directory: PathBuf,
}

impl AnalysisLogger {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Append one entry and return the file it was written to.
    pub fn record(
        &self,
        user: &str,
        kind: CheckKind,
        content: &str,
        result: &AnalysisResult,
    ) -> Result<PathBuf> {
        self.record_at(Local::now(), user, kind, content, result)
    }

    pub fn record_at(
        &self,
        now: DateTime<Local>,
        user: &str,
        kind: CheckKind,
        content: &str,
        result: &AnalysisResult,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.directory).with_context(|| {
            format!(
                "Failed to create analysis log directory: {}",
                self.directory.display()
            )
        })?;

        let log_file = self.log_file_for(now);
        let entry = format_entry(now, user, kind, content, result);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open analysis log: {}", log_file.display()))?;
        file.write_all(entry.as_bytes())
            .with_context(|| format!("Failed to write analysis log: {}", log_file.display()))?;

        log::debug!("Analysis recorded in {}", log_file.display());
        Ok(log_file)
    }

    pub fn log_file_for(&self, now: DateTime<Local>) -> PathBuf {
        self.directory
            .join(format!("analysis_results_{}.log", now.format("%Y-%m-%d")))
    }
}

fn format_entry(
    now: DateTime<Local>,
    user: &str,
    kind: CheckKind,
    content: &str,
    result: &AnalysisResult,
) -> String {
    let content: String = match kind {
        CheckKind::Message => content.chars().take(MAX_LOGGED_MESSAGE_CHARS).collect(),
        CheckKind::Url => content.to_string(),
    };

    format!(
        "[{}] | User: {} | Type: {} | Risk: {}\nContent: {}\nFlags: {}\n{}\n",
        now.format("%Y-%m-%d %H:%M:%S"),
        user,
        kind.audit_tag(),
        result.level,
        content,
        result.summary(),
        "-".repeat(80)
    )
}
