use crate::constants::BACKUP_FILE_PATTERN;
use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Finds every call-log or SMS export under `dir`.
///
/// Walks the tree recursively and keeps files whose *name* matches
/// `^(calls|sms).+\.xml(\.(xz|gz))?$`, case-insensitively. Unreadable entries are
/// skipped. The result is de-duplicated and sorted so the parse stage sees the same
/// order on every run.
///
/// # Errors
///
/// Returns an error if `dir` does not exist or is not a directory.
pub fn find_backup_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::IoError(format!(
            "Directory does not exist: {}",
            dir.display()
        )));
    }

    let pattern = Regex::new(BACKUP_FILE_PATTERN)
        .map_err(|e| AppError::InvalidInput(format!("Invalid file pattern: {e}")))?;

    let mut found = BTreeSet::new();
    for entry in walkdir::WalkDir::new(dir).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| pattern.is_match(name))
            .unwrap_or(false);
        if matches {
            found.insert(entry.into_path());
        }
    }

    Ok(found.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<smses/>").unwrap();
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_finds_calls_and_sms_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        touch(&base.join("sms-20190112.xml"));
        touch(&base.join("phone/calls-20190112.xml"));
        touch(&base.join("phone/old/sms-2018.xml.xz"));
        touch(&base.join("phone/old/calls-2018.xml.gz"));

        let files = find_backup_files(base).unwrap();
        assert_eq!(files.len(), 4);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        touch(&base.join("SMS-1.XML"));
        touch(&base.join("Calls-2.Xml.XZ"));

        let files = find_backup_files(base).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_ignores_non_matching_names() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        touch(&base.join("sms.xml")); // nothing between prefix and extension
        touch(&base.join("mms-1.xml"));
        touch(&base.join("sms-1.json"));
        touch(&base.join("sms-1.xml.zip"));
        touch(&base.join("backup-sms-1.xml"));
        fs::create_dir_all(base.join("sms-dir.xml")).unwrap();

        let files = find_backup_files(base).unwrap();
        assert!(files.is_empty(), "unexpected matches: {files:?}");
    }

    #[test]
    fn test_results_are_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        touch(&base.join("sms-c.xml"));
        touch(&base.join("calls-b.xml"));
        touch(&base.join("sms-a.xml"));

        let files = find_backup_files(base).unwrap();
        assert_eq!(names(&files), vec!["calls-b.xml", "sms-a.xml", "sms-c.xml"]);
    }

    #[test]
    fn test_missing_directory_errors() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_backup_files(&temp_dir.path().join("absent")).is_err());
    }
}
