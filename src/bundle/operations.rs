//! Uniform read access to bundle contents
//!
//! `open` resolves a relative path from the canonical listing against
//! whichever backing form the bundle has, so callers never branch on
//! directory vs. archive.

use std::fs::File;
use std::io::{self, Read};
use tracing::trace;

use crate::error::{CheckError, CheckResult};

use super::types::{BundleSource, EvidenceBundle};

impl EvidenceBundle {
    /// Open a file from the bundle by its listed relative path
    ///
    /// Directory form resolves the path against the bundle's parent
    /// directory; archive form opens the named entry. Missing paths fail
    /// with [`CheckError::FileNotFound`] or [`CheckError::EntryNotFound`]
    /// respectively.
    pub fn open(&mut self, name: &str) -> CheckResult<Box<dyn Read + '_>> {
        trace!(name = %name, format = %self.format(), "Opening bundle file");
        match &mut self.source {
            BundleSource::Directory { parent } => {
                let full = parent.join(name);
                let file = File::open(&full).map_err(|e| {
                    if e.kind() == io::ErrorKind::NotFound {
                        CheckError::FileNotFound {
                            bundle: self.target.clone(),
                            path: name.to_string(),
                        }
                    } else {
                        CheckError::Io(e)
                    }
                })?;
                Ok(Box::new(file))
            }
            BundleSource::Archive { archive } => {
                let entry = archive.by_name(name).map_err(|e| match e {
                    zip::result::ZipError::FileNotFound => CheckError::EntryNotFound {
                        bundle: self.target.clone(),
                        entry: name.to_string(),
                    },
                    other => CheckError::Zip(other),
                })?;
                Ok(Box::new(entry))
            }
        }
    }
}
