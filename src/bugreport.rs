//! Nested bug report archive location and access
//!
//! AndroidQF dumps may embed a device-generated bug report as a
//! `bugreport.zip` entry. This module finds that entry in a bundle's
//! listing and opens it as a ZIP archive in its own right, regardless of
//! whether the outer bundle is a directory tree or a ZIP file.

use std::fs::File;
use std::io::{Cursor, Read};
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::bundle::EvidenceBundle;
use crate::error::{CheckError, CheckResult};

/// Reserved filename suffix of the embedded bug report, matched
/// case-sensitively against listing entries
pub const BUG_REPORT_SUFFIX: &str = "bugreport.zip";

/// Backing storage for an opened bug report
#[derive(Debug)]
enum BugReportSource {
    /// Directory bundle: the bug report is a ZIP file on disk
    Disk(ZipArchive<File>),
    /// Archive bundle: the bug report was read through the outer archive
    /// into memory
    Buffered(ZipArchive<Cursor<Vec<u8>>>),
}

/// An opened nested bug report archive
#[derive(Debug)]
pub struct BugReport {
    entry_path: String,
    source: BugReportSource,
    files: Vec<String>,
}

impl BugReport {
    /// Path of the bug report entry inside the outer bundle
    pub fn entry_path(&self) -> &str {
        &self.entry_path
    }

    /// Entry names of the bug report archive, in listing order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Open an entry of the bug report archive by name
    pub fn open(&mut self, name: &str) -> CheckResult<Box<dyn Read + '_>> {
        let entry_path = &self.entry_path;
        let map_err = |e: zip::result::ZipError| match e {
            zip::result::ZipError::FileNotFound => CheckError::EntryNotFound {
                bundle: entry_path.clone().into(),
                entry: name.to_string(),
            },
            other => CheckError::Zip(other),
        };
        match &mut self.source {
            BugReportSource::Disk(archive) => {
                Ok(Box::new(archive.by_name(name).map_err(map_err)?))
            }
            BugReportSource::Buffered(archive) => {
                Ok(Box::new(archive.by_name(name).map_err(map_err)?))
            }
        }
    }
}

/// Locate and open the bug report embedded in a bundle
///
/// The first listing entry ending with [`BUG_REPORT_SUFFIX`] wins; later
/// matches are ignored (known limitation, selection among multiple bug
/// reports is not supported). Returns `Ok(None)` with a logged warning when
/// no entry matches; absence is expected for some dumps. A matching entry
/// that does not parse as a ZIP fails with
/// [`CheckError::CorruptBugReport`].
pub fn locate_bugreport(bundle: &mut EvidenceBundle) -> CheckResult<Option<BugReport>> {
    let entry_path = match bundle.files().iter().find(|f| f.ends_with(BUG_REPORT_SUFFIX)) {
        Some(path) => path.clone(),
        None => {
            warn!(
                target_path = %bundle.target().display(),
                "No bugreport.zip found in the AndroidQF dump"
            );
            return Ok(None);
        }
    };

    // Taken by value so the listing borrow ends before `bundle.open` below
    let parent = bundle.parent_dir().map(|p| p.to_path_buf());

    let (source, files) = match parent {
        // Directory bundle: open the bug report straight from disk
        Some(parent) => {
            let full = parent.join(&entry_path);
            let file = File::open(&full).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CheckError::FileNotFound {
                        bundle: bundle.target().to_path_buf(),
                        path: entry_path.clone(),
                    }
                } else {
                    CheckError::Io(e)
                }
            })?;
            let mut archive = ZipArchive::new(file).map_err(|e| {
                CheckError::CorruptBugReport {
                    entry: entry_path.clone(),
                    source: e,
                }
            })?;
            let files = entry_names(&mut archive, &entry_path)?;
            (BugReportSource::Disk(archive), files)
        }
        // Archive bundle: read the entry through the outer handle into
        // memory, then parse the buffer as a ZIP
        None => {
            let mut data = Vec::new();
            bundle.open(&entry_path)?.read_to_end(&mut data)?;
            let cursor = Cursor::new(data);
            let mut archive = ZipArchive::new(cursor).map_err(|e| {
                CheckError::CorruptBugReport {
                    entry: entry_path.clone(),
                    source: e,
                }
            })?;
            let files = entry_names(&mut archive, &entry_path)?;
            (BugReportSource::Buffered(archive), files)
        }
    };

    debug!(
        entry = %entry_path,
        file_count = files.len(),
        "Opened nested bug report"
    );

    Ok(Some(BugReport {
        entry_path,
        source,
        files,
    }))
}

fn entry_names<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    entry_path: &str,
) -> CheckResult<Vec<String>> {
    let mut files = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| CheckError::CorruptBugReport {
            entry: entry_path.to_string(),
            source: e,
        })?;
        files.push(entry.name().to_string());
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::Path;

    fn bugreport_bytes() -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let opts = zip::write::SimpleFileOptions::default();
        writer.start_file("trace.txt", opts).unwrap();
        writer.write_all(b"trace data").unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn dir_bundle_with_bugreport(root: &Path) -> EvidenceBundle {
        let dump = root.join("dump");
        fs::create_dir_all(&dump).unwrap();
        fs::write(dump.join("device.json"), b"{}").unwrap();
        fs::write(dump.join("bugreport.zip"), bugreport_bytes()).unwrap();
        EvidenceBundle::detect(&dump).unwrap()
    }

    fn zip_bundle_with_bugreport(root: &Path) -> EvidenceBundle {
        let zip_path = root.join("dump.zip");
        let file = File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let opts = zip::write::SimpleFileOptions::default();
        writer.start_file("dump/device.json", opts).unwrap();
        writer.write_all(b"{}").unwrap();
        writer.start_file("dump/bugreport.zip", opts).unwrap();
        writer.write_all(&bugreport_bytes()).unwrap();
        writer.finish().unwrap();
        EvidenceBundle::detect(&zip_path).unwrap()
    }

    #[test]
    fn test_locate_in_directory_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let mut bundle = dir_bundle_with_bugreport(tmp.path());

        let mut report = locate_bugreport(&mut bundle).unwrap().unwrap();
        assert_eq!(report.entry_path(), "dump/bugreport.zip");
        assert_eq!(report.files(), &["trace.txt"]);

        let mut content = String::new();
        report
            .open("trace.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "trace data");
    }

    #[test]
    fn test_locate_in_archive_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let mut bundle = zip_bundle_with_bugreport(tmp.path());

        let mut report = locate_bugreport(&mut bundle).unwrap().unwrap();
        assert_eq!(report.entry_path(), "dump/bugreport.zip");
        assert_eq!(report.files(), &["trace.txt"]);

        let mut content = String::new();
        report
            .open("trace.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "trace data");
    }

    #[test]
    fn test_absent_bugreport_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dump = tmp.path().join("dump");
        fs::create_dir_all(&dump).unwrap();
        fs::write(dump.join("device.json"), b"{}").unwrap();

        let mut bundle = EvidenceBundle::detect(&dump).unwrap();
        assert!(locate_bugreport(&mut bundle).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_bugreport_in_directory_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let dump = tmp.path().join("dump");
        fs::create_dir_all(&dump).unwrap();
        fs::write(dump.join("bugreport.zip"), b"definitely not a zip").unwrap();

        let mut bundle = EvidenceBundle::detect(&dump).unwrap();
        let err = locate_bugreport(&mut bundle).unwrap_err();
        assert!(matches!(err, CheckError::CorruptBugReport { .. }));
    }

    #[test]
    fn test_corrupt_bugreport_in_archive_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("dump.zip");
        let file = File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let opts = zip::write::SimpleFileOptions::default();
        writer.start_file("dump/bugreport.zip", opts).unwrap();
        writer.write_all(b"definitely not a zip").unwrap();
        writer.finish().unwrap();

        let mut bundle = EvidenceBundle::detect(&zip_path).unwrap();
        let err = locate_bugreport(&mut bundle).unwrap_err();
        assert!(matches!(err, CheckError::CorruptBugReport { .. }));
    }

    #[test]
    fn test_first_match_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("dump.zip");
        let file = File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let opts = zip::write::SimpleFileOptions::default();
        writer.start_file("dump/a/bugreport.zip", opts).unwrap();
        writer.write_all(&bugreport_bytes()).unwrap();
        writer.start_file("dump/b/bugreport.zip", opts).unwrap();
        writer.write_all(&bugreport_bytes()).unwrap();
        writer.finish().unwrap();

        let mut bundle = EvidenceBundle::detect(&zip_path).unwrap();
        let report = locate_bugreport(&mut bundle).unwrap().unwrap();
        assert_eq!(report.entry_path(), "dump/a/bugreport.zip");
    }
}
