//! Type definitions for evidence bundles
//!
//! An AndroidQF dump arrives either as an extracted directory tree or as a
//! single ZIP archive. Both forms are wrapped behind one type so downstream
//! code never branches on the physical storage form.

use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Physical form of an evidence bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BundleFormat {
    /// Extracted directory tree on disk
    Directory,
    /// Single ZIP archive file
    Archive,
}

impl std::fmt::Display for BundleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleFormat::Directory => write!(f, "directory"),
            BundleFormat::Archive => write!(f, "archive"),
        }
    }
}

/// Backing storage for a bundle
#[derive(Debug)]
pub(crate) enum BundleSource {
    /// Directory form: paths resolve against the parent of the target directory
    Directory { parent: PathBuf },
    /// Archive form: entries come from the open ZIP handle
    Archive { archive: ZipArchive<File> },
}

/// An opened evidence bundle with its canonical file listing
///
/// The file listing is built exactly once by [`EvidenceBundle::detect`] and
/// never mutated afterwards; there is no way to re-run detection on an
/// existing bundle. For directory bundles the listing order follows the
/// directory traversal, which is platform-dependent; for archive bundles it
/// follows the central directory. Neither order should be relied upon.
#[derive(Debug)]
pub struct EvidenceBundle {
    pub(crate) target: PathBuf,
    pub(crate) source: BundleSource,
    pub(crate) files: Vec<String>,
}

impl EvidenceBundle {
    /// The path the bundle was opened from
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Physical form of the bundle
    pub fn format(&self) -> BundleFormat {
        match self.source {
            BundleSource::Directory { .. } => BundleFormat::Directory,
            BundleSource::Archive { .. } => BundleFormat::Archive,
        }
    }

    /// Relative paths of every file in the bundle, in listing order
    ///
    /// Directory-form paths are expressed relative to the parent of the
    /// target directory (`<bundle-name>/<relative-path>`), matching how
    /// entries are named inside archive-form bundles.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Parent directory that relative paths resolve against
    ///
    /// `None` for archive-form bundles.
    pub fn parent_dir(&self) -> Option<&Path> {
        match &self.source {
            BundleSource::Directory { parent } => Some(parent),
            BundleSource::Archive { .. } => None,
        }
    }

    /// Whether the listing contains the given relative path
    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }
}

/// Serializable summary of an opened bundle
#[derive(Debug, Clone, Serialize)]
pub struct BundleSummary {
    pub target: String,
    pub format: BundleFormat,
    pub file_count: usize,
    /// Entry path of the embedded bug report, if the listing contains one
    pub bugreport_entry: Option<String>,
}
