//! Human readable merge summary

use std::fmt;

use crate::pdf::{FileFailure, MergeResult};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// How a report line should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warning,
    Error,
}

/// One line of the final summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub tone: Tone,
    pub text: String,
}

impl ReportLine {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self { tone, text: text.into() }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Format a byte count with binary units, e.g. `1536` → `"1.5 KB"`
///
/// At most two decimals are shown and trailing zeros are dropped.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Lines describing files that could not be imported
pub fn failure_lines(failures: &[FileFailure]) -> Vec<ReportLine> {
    failures
        .iter()
        .map(|f| {
            ReportLine::new(
                Tone::Error,
                format!("Error processing file {}: {}", f.path.display(), f.reason),
            )
        })
        .collect()
}

/// Build the full summary for a finished merge
pub fn summarize(result: &MergeResult) -> Vec<ReportLine> {
    let mut lines: Vec<ReportLine> = result
        .warnings
        .iter()
        .map(|w| ReportLine::new(Tone::Warning, w.to_string()))
        .collect();

    lines.push(ReportLine::new(
        Tone::Success,
        format!(
            "Successfully merged {} files into {}",
            result.merged_count,
            result.output_name()
        ),
    ));
    lines.push(ReportLine::new(
        Tone::Info,
        format!("Total size of merged files: {}", format_bytes(result.total_bytes)),
    ));
    lines.extend(failure_lines(&result.failures));

    lines
}
