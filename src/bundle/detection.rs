//! Bundle format detection and file listing
//!
//! Detects whether a target path is an extracted AndroidQF directory or a
//! ZIP archive, and builds the canonical file listing for either form.

use std::fs::{self, File};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::bugreport::BUG_REPORT_SUFFIX;
use crate::error::{CheckError, CheckResult};

use super::types::{BundleSource, BundleSummary, EvidenceBundle};

impl EvidenceBundle {
    /// Detect the bundle form at `target` and build its file listing
    ///
    /// A directory target is walked recursively; every regular file is
    /// recorded relative to the directory's parent, with components joined
    /// by `/` so the paths match archive entry naming. A regular-file target
    /// is opened as a ZIP archive and its entry list recorded verbatim.
    /// Anything else fails with [`CheckError::InvalidTarget`].
    ///
    /// File names that are not valid UTF-8 are recorded lossily; such
    /// entries may not resolve through `open` afterwards.
    pub fn detect(target: &Path) -> CheckResult<Self> {
        if target.is_dir() {
            let target_abs = fs::canonicalize(target).map_err(|e| CheckError::ListDir {
                path: target.to_path_buf(),
                source: e,
            })?;
            let parent = target_abs
                .parent()
                .ok_or_else(|| CheckError::InvalidTarget(target.to_path_buf()))?
                .to_path_buf();

            let mut files = Vec::new();
            walk_files(&target_abs, &parent, &mut files)?;

            debug!(
                target = %target.display(),
                file_count = files.len(),
                "Opened directory bundle"
            );

            Ok(EvidenceBundle {
                target: target_abs,
                source: BundleSource::Directory { parent },
                files,
            })
        } else if target.is_file() {
            let not_an_archive = |e: zip::result::ZipError| CheckError::NotAnArchive {
                path: target.to_path_buf(),
                source: e,
            };
            let file = File::open(target)
                .map_err(|e| not_an_archive(zip::result::ZipError::Io(e)))?;
            let mut archive = ZipArchive::new(file).map_err(not_an_archive)?;

            // Entry names come back in central directory order, verbatim
            let mut files = Vec::with_capacity(archive.len());
            for i in 0..archive.len() {
                files.push(archive.by_index(i).map_err(not_an_archive)?.name().to_string());
            }

            debug!(
                target = %target.display(),
                file_count = files.len(),
                "Opened archive bundle"
            );

            Ok(EvidenceBundle {
                target: target.to_path_buf(),
                source: BundleSource::Archive { archive },
                files,
            })
        } else {
            Err(CheckError::InvalidTarget(target.to_path_buf()))
        }
    }

    /// Build a serializable summary of this bundle
    pub fn summary(&self) -> BundleSummary {
        BundleSummary {
            target: self.target.display().to_string(),
            format: self.format(),
            file_count: self.files.len(),
            bugreport_entry: self
                .files
                .iter()
                .find(|f| f.ends_with(BUG_REPORT_SUFFIX))
                .cloned(),
        }
    }
}

/// Recursively record every regular file under `path`, relative to `parent`
///
/// The listing is mandatory, so I/O failures here propagate instead of being
/// skipped.
fn walk_files(path: &Path, parent: &Path, files: &mut Vec<String>) -> CheckResult<()> {
    let list_err = |e: std::io::Error| CheckError::ListDir {
        path: path.to_path_buf(),
        source: e,
    };
    for entry in fs::read_dir(path).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let entry_path = entry.path();
        let file_type = entry.file_type().map_err(list_err)?;

        if file_type.is_dir() {
            walk_files(&entry_path, parent, files)?;
        } else if file_type.is_file() {
            files.push(relative_name(&entry_path, parent));
        }
    }
    Ok(())
}

/// Express `path` relative to `parent` with `/`-joined components
fn relative_name(path: &Path, parent: &Path) -> String {
    let rel = path.strip_prefix(parent).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleFormat;
    use std::io::Write;

    fn make_dump(root: &Path) {
        let dump = root.join("dump");
        fs::create_dir_all(dump.join("logs")).unwrap();
        fs::write(dump.join("device.json"), b"{}").unwrap();
        fs::write(dump.join("logs/logcat.txt"), b"log line").unwrap();
    }

    #[test]
    fn test_detect_directory_lists_relative_to_parent() {
        let tmp = tempfile::tempdir().unwrap();
        make_dump(tmp.path());

        let bundle = EvidenceBundle::detect(&tmp.path().join("dump")).unwrap();
        assert_eq!(bundle.format(), BundleFormat::Directory);

        let mut files = bundle.files().to_vec();
        files.sort();
        assert_eq!(files, vec!["dump/device.json", "dump/logs/logcat.txt"]);
    }

    #[test]
    fn test_detect_directory_no_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        make_dump(tmp.path());

        let bundle = EvidenceBundle::detect(&tmp.path().join("dump")).unwrap();
        let mut files = bundle.files().to_vec();
        let before = files.len();
        files.sort();
        files.dedup();
        assert_eq!(files.len(), before);
    }

    #[test]
    fn test_detect_archive_preserves_entry_order() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("dump.zip");

        let file = File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let opts = zip::write::SimpleFileOptions::default();
        writer.start_file("dump/b.txt", opts).unwrap();
        writer.write_all(b"b").unwrap();
        writer.start_file("dump/a.txt", opts).unwrap();
        writer.write_all(b"a").unwrap();
        writer.finish().unwrap();

        let bundle = EvidenceBundle::detect(&zip_path).unwrap();
        assert_eq!(bundle.format(), BundleFormat::Archive);
        assert_eq!(bundle.files(), &["dump/b.txt", "dump/a.txt"]);
    }

    #[test]
    fn test_detect_missing_target_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let err = EvidenceBundle::detect(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CheckError::InvalidTarget(_)));
    }

    #[test]
    fn test_detect_non_zip_file_names_the_target() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("random.bin");
        fs::write(&path, b"sixteen bytes!!!").unwrap();

        let err = EvidenceBundle::detect(&path).unwrap_err();
        assert!(matches!(err, CheckError::NotAnArchive { .. }));
        assert!(err.to_string().contains("random.bin"));
    }

    #[test]
    fn test_summary_reports_bugreport_entry() {
        let tmp = tempfile::tempdir().unwrap();
        make_dump(tmp.path());
        fs::write(tmp.path().join("dump/bugreport.zip"), b"not a zip").unwrap();

        let bundle = EvidenceBundle::detect(&tmp.path().join("dump")).unwrap();
        let summary = bundle.summary();
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.bugreport_entry.as_deref(), Some("dump/bugreport.zip"));
    }
}
