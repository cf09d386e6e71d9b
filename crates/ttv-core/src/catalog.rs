//! The combined list of files the current user can download.
//!
//! Own uploads come first, then files shared with the user, each in server
//! order. Every entry carries a label that says where the file came from.

use serde::Serialize;

use crate::api::{FileRecord, SharedFileEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadEntry {
    pub stored_filename: String,
    pub original_filename: String,
    /// `[My file] name` or `[Shared by sender] name`.
    pub display_name: String,
    /// Server digest recorded at upload time.
    pub sha256: String,
}

pub fn build_catalog(my_files: &[FileRecord], shared: &[SharedFileEntry]) -> Vec<DownloadEntry> {
    let own = my_files.iter().map(|f| DownloadEntry {
        stored_filename: f.stored_filename.clone(),
        original_filename: f.filename.clone(),
        display_name: format!("[My file] {}", f.filename),
        sha256: f.sha256.clone(),
    });
    let received = shared.iter().map(|s| DownloadEntry {
        stored_filename: s.file_info.stored_filename.clone(),
        original_filename: s.file_info.filename.clone(),
        display_name: format!("[Shared by {}] {}", s.sender_username, s.file_info.filename),
        sha256: s.file_info.sha256.clone(),
    });
    own.chain(received).collect()
}

/// Finds an entry by stored name.
pub fn find_entry<'a>(catalog: &'a [DownloadEntry], stored_name: &str) -> Option<&'a DownloadEntry> {
    catalog.iter().find(|e| e.stored_filename == stored_name)
}

/// Strips a leading `[...]` tag from a catalog label.
///
/// `"[Shared by bob] notes.txt"` → `"notes.txt"`. A label without a tag is
/// returned trimmed.
pub fn original_name_from_label(label: &str) -> &str {
    let trimmed = label.trim();
    if let Some(rest) = trimmed.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return rest[end + 1..].trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, uploader: &str) -> FileRecord {
        FileRecord {
            id,
            filename: name.to_string(),
            stored_filename: format!("{id}_{name}_1700000000"),
            sha256: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".into(),
            uploader_id: id,
            uploader_username: uploader.to_string(),
            upload_timestamp: 1_700_000_000,
        }
    }

    fn shared(file: FileRecord, sender: &str) -> SharedFileEntry {
        SharedFileEntry {
            id: 1,
            file_id: file.id,
            sender_id: file.uploader_id,
            sender_username: sender.to_string(),
            receiver_id: 99,
            receiver_username: "me".to_string(),
            share_timestamp: 1_700_000_100,
            file_info: file,
        }
    }

    #[test]
    fn own_files_first_then_shared() {
        let mine = vec![record(1, "a.txt", "me"), record(2, "b.pdf", "me")];
        let theirs = vec![shared(record(7, "c.zip", "bob"), "bob")];
        let cat = build_catalog(&mine, &theirs);
        let labels: Vec<&str> = cat.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(
            labels,
            ["[My file] a.txt", "[My file] b.pdf", "[Shared by bob] c.zip"]
        );
        assert_eq!(cat[2].stored_filename, "7_c.zip_1700000000");
        assert_eq!(cat[2].original_filename, "c.zip");
    }

    #[test]
    fn empty_lists_give_empty_catalog() {
        assert!(build_catalog(&[], &[]).is_empty());
    }

    #[test]
    fn find_by_stored_name() {
        let cat = build_catalog(&[record(3, "x.txt", "me")], &[]);
        assert_eq!(
            find_entry(&cat, "3_x.txt_1700000000").map(|e| e.original_filename.as_str()),
            Some("x.txt")
        );
        assert!(find_entry(&cat, "nope").is_none());
    }

    #[test]
    fn label_stripping() {
        assert_eq!(original_name_from_label("[My file] MyDocument.pdf"), "MyDocument.pdf");
        assert_eq!(
            original_name_from_label("[Shared by user1]   AnotherDoc.docx"),
            "AnotherDoc.docx"
        );
        assert_eq!(original_name_from_label("plain.txt"), "plain.txt");
        assert_eq!(original_name_from_label("[unclosed tag.txt"), "[unclosed tag.txt");
    }
}
