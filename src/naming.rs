//! Output file naming
//!
//! A blank name becomes a timestamped default such as
//! `MergedPDF_20250114_093005.pdf`; anything else gets the `.pdf` extension.

use chrono::{Local, NaiveDateTime};
use crate::error::{Error, Result};

/// Extension appended to every output name
pub const PDF_EXTENSION: &str = ".pdf";

/// Default output name for a given moment
pub fn default_output_name(now: NaiveDateTime) -> String {
    format!("MergedPDF_{}{}", now.format("%Y%m%d_%H%M%S"), PDF_EXTENSION)
}

/// Turn what the user typed into an output file name
///
/// Resolving an already resolved name returns it unchanged.
pub fn resolve_output_name(raw: &str, now: NaiveDateTime) -> Result<String> {
    let name = raw.trim();

    if name.is_empty() {
        return Ok(default_output_name(now));
    }

    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidOutputName(name.to_string()));
    }

    if name.to_ascii_lowercase().ends_with(PDF_EXTENSION) && name.len() > PDF_EXTENSION.len() {
        Ok(name.to_string())
    } else {
        Ok(format!("{}{}", name, PDF_EXTENSION))
    }
}

/// Resolve an output name against the local clock
pub fn output_file_name(raw: &str) -> Result<String> {
    resolve_output_name(raw, Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn moment() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 14)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_blank_name_uses_timestamp() {
        assert_eq!(resolve_output_name("", moment()).unwrap(), "MergedPDF_20250114_093005.pdf");
        assert_eq!(resolve_output_name("   ", moment()).unwrap(), "MergedPDF_20250114_093005.pdf");
    }

    #[test]
    fn test_plain_name_gets_extension() {
        assert_eq!(resolve_output_name("report", moment()).unwrap(), "report.pdf");
        assert_eq!(resolve_output_name("  week 3 ", moment()).unwrap(), "week 3.pdf");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let once = resolve_output_name("report", moment()).unwrap();
        assert_eq!(resolve_output_name(&once, moment()).unwrap(), once);
        assert_eq!(resolve_output_name("Scan.PDF", moment()).unwrap(), "Scan.PDF");
    }

    #[test]
    fn test_bare_extension_is_a_base_name() {
        assert_eq!(resolve_output_name(".pdf", moment()).unwrap(), ".pdf.pdf");
    }

    #[test]
    fn test_path_like_names_are_rejected() {
        for bad in ["../escape", "sub/out", "sub\\out", ".", ".."] {
            assert!(
                matches!(resolve_output_name(bad, moment()), Err(Error::InvalidOutputName(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_local_clock_name_matches_pattern() {
        let name = output_file_name("").unwrap();
        let stamp = name
            .strip_prefix("MergedPDF_")
            .and_then(|s| s.strip_suffix(".pdf"))
            .expect("timestamp name");
        let (date, time) = stamp.split_once('_').expect("date_time");
        assert_eq!(date.len(), 8);
        assert_eq!(time.len(), 6);
        assert!(date.chars().chain(time.chars()).all(|c| c.is_ascii_digit()));
    }
}
