//! Module dispatch over an opened evidence bundle
//!
//! Each analysis module declares its capabilities through traits: every
//! module implements standard ingestion, and modules that consume the nested
//! bug report additionally expose [`NestedArchiveIngest`]. The runner queries
//! the capability, never the concrete type, and keeps per-module failures
//! isolated from the rest of the run.

use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info};

use crate::bugreport::{locate_bugreport, BugReport};
use crate::bundle::{BundleSummary, EvidenceBundle};
use crate::error::CheckResult;

/// An analysis module consuming bundle contents
///
/// Standard ingestion receives the bundle itself; its listing and `open`
/// already hide the physical storage form.
pub trait AnalysisModule {
    /// Module name used for logging and run filtering
    fn name(&self) -> &str;

    /// Ingest the outer bundle's standard view
    fn ingest_standard(&mut self, bundle: &mut EvidenceBundle) -> CheckResult<()>;

    /// Capability query: modules that consume the nested bug report return
    /// their nested-ingest interface here
    fn nested(&mut self) -> Option<&mut dyn NestedArchiveIngest> {
        None
    }
}

/// Capability of consuming the nested bug report archive
pub trait NestedArchiveIngest {
    /// Ingest an opened bug report; ownership passes to the module
    fn ingest_bugreport(&mut self, report: BugReport) -> CheckResult<()>;
}

/// How nested ingestion went for one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NestedStatus {
    /// Module does not declare the nested capability
    NotRequested,
    /// No bug report entry in the bundle; module ran without nested data
    Absent,
    /// Bug report located and handed to the module
    Ingested,
    /// Locating or ingesting the bug report failed; standard ingestion
    /// still ran
    Failed(String),
}

/// Per-module result of one dispatcher run
#[derive(Debug, Clone, Serialize)]
pub struct ModuleOutcome {
    pub module: String,
    pub nested: NestedStatus,
    /// Error from standard ingestion, if it failed
    pub error: Option<String>,
}

impl ModuleOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && !matches!(self.nested, NestedStatus::Failed(_))
    }
}

/// Drives one check run: detects the bundle once, then initializes each
/// configured module with the resources its capabilities call for
pub struct CheckRunner {
    bundle: EvidenceBundle,
}

impl CheckRunner {
    /// Detect the bundle at `target` and prepare a run
    ///
    /// Detection happens exactly once; the bundle's listing is fixed for
    /// the lifetime of the runner.
    pub fn new(target: &Path) -> CheckResult<Self> {
        let bundle = EvidenceBundle::detect(target)?;
        info!(
            target_path = %bundle.target().display(),
            format = %bundle.format(),
            file_count = bundle.files().len(),
            "Evidence bundle opened"
        );
        Ok(CheckRunner { bundle })
    }

    /// The opened bundle
    pub fn bundle(&self) -> &EvidenceBundle {
        &self.bundle
    }

    /// Serializable summary of the opened bundle
    pub fn summary(&self) -> BundleSummary {
        self.bundle.summary()
    }

    /// Initialize one module
    ///
    /// If the module declares the nested capability, the bug report is
    /// located and handed over first; absence or failure there never stops
    /// standard ingestion, which always runs.
    pub fn init_module(&mut self, module: &mut dyn AnalysisModule) -> ModuleOutcome {
        let name = module.name().to_string();

        let nested = match module.nested() {
            None => NestedStatus::NotRequested,
            Some(ingest) => match locate_bugreport(&mut self.bundle) {
                Ok(None) => NestedStatus::Absent,
                Ok(Some(report)) => {
                    debug!(module = %name, entry = %report.entry_path(), "Handing bug report to module");
                    match ingest.ingest_bugreport(report) {
                        Ok(()) => NestedStatus::Ingested,
                        Err(e) => {
                            error!(module = %name, error = %e, "Nested ingestion failed");
                            NestedStatus::Failed(e.to_string())
                        }
                    }
                }
                Err(e) => {
                    error!(module = %name, error = %e, "Failed to open bug report");
                    NestedStatus::Failed(e.to_string())
                }
            },
        };

        // Standard ingestion always runs, regardless of the nested outcome
        let error = match module.ingest_standard(&mut self.bundle) {
            Ok(()) => None,
            Err(e) => {
                error!(module = %name, error = %e, "Standard ingestion failed");
                Some(e.to_string())
            }
        };

        ModuleOutcome {
            module: name,
            nested,
            error,
        }
    }

    /// Run every module in configured order, isolating per-module failures
    pub fn run(&mut self, modules: &mut [Box<dyn AnalysisModule>]) -> Vec<ModuleOutcome> {
        self.run_filtered(modules, None)
    }

    /// Run the configured modules, optionally restricted to one by name
    pub fn run_filtered(
        &mut self,
        modules: &mut [Box<dyn AnalysisModule>],
        only: Option<&str>,
    ) -> Vec<ModuleOutcome> {
        let mut outcomes = Vec::new();
        for module in modules.iter_mut() {
            if let Some(wanted) = only {
                if module.name() != wanted {
                    continue;
                }
            }
            debug!(module = %module.name(), "Initializing module");
            outcomes.push(self.init_module(module.as_mut()));
        }
        outcomes
    }
}
