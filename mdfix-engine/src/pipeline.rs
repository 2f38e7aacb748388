//! Walk, process, report: the whole run as one call.

use camino::Utf8PathBuf;

use mdfix_rules::{DEFAULT_MAX_PASSES, RuleSet, StyleConfig};

use crate::processor::{FileOutcome, FileProcessor, ProcessOptions};
use crate::report::RunReport;
use crate::walker::{CorpusWalker, DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS};

/// Everything a run needs beyond its root paths.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub style: StyleConfig,
    pub max_passes: usize,
    pub dry_run: bool,
    pub emit_diff: bool,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            max_passes: DEFAULT_MAX_PASSES,
            dry_run: false,
            emit_diff: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Run the full pipeline over `roots`.
///
/// Unresolvable roots become failed outcomes; everything else is processed in
/// sorted path order. The report is already sealed when returned.
pub fn run_pipeline(roots: &[Utf8PathBuf], options: &RunOptions) -> RunReport {
    let walker = CorpusWalker::new(options.extensions.clone(), options.exclude.clone());
    let collected = walker.collect(roots);
    tracing::info!(
        files = collected.files.len(),
        dry_run = options.dry_run,
        "corpus collected"
    );

    let processor = FileProcessor::new(
        RuleSet::new(options.style.clone(), options.max_passes),
        ProcessOptions {
            dry_run: options.dry_run,
            emit_diff: options.emit_diff,
        },
    );

    let mut report = RunReport::new(options.dry_run);
    for err in collected.errors {
        report.push(FileOutcome::failed(err));
    }
    for file in &collected.files {
        report.push(processor.process(file));
    }
    report.finish();
    report
}
