//! Evidence bundle abstraction
//!
//! This module wraps the two physical forms an AndroidQF dump can take
//! (extracted directory tree, ZIP archive) behind one contract: a canonical
//! file listing plus uniform read access by relative path.

mod detection;
mod operations;
mod types;

pub use types::{BundleFormat, BundleSummary, EvidenceBundle};
