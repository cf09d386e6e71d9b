//! Local filename for a downloaded payload.
//!
//! Prefers the filename the server put in `Content-Disposition`, then the
//! display name the user picked, then the stored name. The result is
//! sanitized so it cannot leave the download directory.

mod content_disposition;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use sanitize::sanitize_filename;

/// Used when every candidate sanitizes to nothing.
const DEFAULT_FILENAME: &str = "download.bin";

/// Picks and sanitizes the local name for a download.
///
/// - `save_name(Some("report.pdf"), "x", "1_report_17.pdf")` → `"report.pdf"`
/// - `save_name(None, "../../etc/passwd", "s")` → `"etc_passwd"`
pub fn save_name(server_filename: Option<&str>, display_name: &str, stored_name: &str) -> String {
    [server_filename, Some(display_name), Some(stored_name)]
        .into_iter()
        .flatten()
        .map(sanitize_filename)
        .find(|s| !s.is_empty() && s != "." && s != "..")
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_filename_wins() {
        assert_eq!(
            save_name(Some("report.pdf"), "other.pdf", "1_report_1700000000.pdf"),
            "report.pdf"
        );
    }

    #[test]
    fn falls_back_to_display_then_stored() {
        assert_eq!(save_name(None, "notes.txt", "2_notes_17.txt"), "notes.txt");
        assert_eq!(save_name(Some(""), "", "2_notes_17.txt"), "2_notes_17.txt");
        assert_eq!(save_name(Some("..."), "  ", "//"), DEFAULT_FILENAME);
    }

    #[test]
    fn traversal_is_neutralised() {
        assert_eq!(save_name(None, "../../etc/passwd", "s"), "etc_passwd");
        assert_eq!(save_name(Some("..\\..\\boot.ini"), "d", "s"), "boot.ini");
    }
}
