//! AndroidQF evidence bundle ingestion
//!
//! Opens a device collection dump in either of its two physical forms (an
//! extracted directory tree or a ZIP archive) behind one listing/open
//! contract, locates the nested bug report archive when a module asks for
//! it, and dispatches analysis modules by declared capability.

pub mod bugreport;
pub mod bundle;
pub mod error;
pub mod logging;
pub mod runner;

pub use bugreport::{locate_bugreport, BugReport, BUG_REPORT_SUFFIX};
pub use bundle::{BundleFormat, BundleSummary, EvidenceBundle};
pub use error::{CheckError, CheckResult};
pub use runner::{AnalysisModule, CheckRunner, ModuleOutcome, NestedArchiveIngest, NestedStatus};
