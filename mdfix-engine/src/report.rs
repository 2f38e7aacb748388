//! Run-level reporting and exit-code policy.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::processor::{FileOutcome, FileStatus};

/// Aggregate counts over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub scanned: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Files where the pass bound was hit before the text stabilized.
    pub unconverged: usize,
}

/// Everything one run did, in deterministic order.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started: DateTime<Utc>,
    pub ended: Option<DateTime<Utc>>,
    pub dry_run: bool,
    outcomes: Vec<FileOutcome>,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started: Utc::now(),
            ended: None,
            dry_run,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    /// Seal the report: stamp the end time and order outcomes by path.
    pub fn finish(&mut self) {
        self.outcomes.sort_by(|a, b| a.path.cmp(&b.path));
        self.ended = Some(Utc::now());
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            scanned: self.outcomes.len(),
            changed: 0,
            unchanged: 0,
            failed: 0,
            unconverged: 0,
        };
        for outcome in &self.outcomes {
            match outcome.status {
                FileStatus::Changed => summary.changed += 1,
                FileStatus::Unchanged => summary.unchanged += 1,
                FileStatus::Failed => summary.failed += 1,
            }
            if outcome.status != FileStatus::Failed && !outcome.converged {
                summary.unconverged += 1;
            }
        }
        summary
    }

    /// Total hits per rule across all files.
    pub fn rule_hits(&self) -> BTreeMap<String, u64> {
        let mut totals: BTreeMap<String, u64> = BTreeMap::new();
        for outcome in &self.outcomes {
            for (id, count) in &outcome.rule_hits {
                *totals.entry(id.clone()).or_insert(0) += count;
            }
        }
        totals
    }

    /// 0 for a clean run, 1 when any file failed or refused to converge. Usage
    /// errors (exit code 2) are decided by the CLI before a run starts.
    pub fn exit_code(&self) -> u8 {
        let summary = self.summary();
        u8::from(summary.failed > 0 || summary.unconverged > 0)
    }

    /// Human-readable rendering, one line per non-clean file plus a summary.
    pub fn render_text(&self, verbose: bool) -> String {
        let mut out = String::new();
        let verb = if self.dry_run { "would change" } else { "changed" };
        for outcome in &self.outcomes {
            match outcome.status {
                FileStatus::Changed => {
                    let _ = writeln!(out, "{verb:>12}  {}", outcome.path);
                    if let Some(diff) = &outcome.diff {
                        out.push_str(diff);
                    }
                }
                FileStatus::Unchanged if verbose => {
                    let _ = writeln!(out, "{:>12}  {}", "unchanged", outcome.path);
                }
                FileStatus::Unchanged => {}
                FileStatus::Failed => {
                    let message = outcome.message.as_deref().unwrap_or("unknown error");
                    let _ = writeln!(out, "{:>12}  {message}", "failed");
                }
            }
            if outcome.status != FileStatus::Failed && !outcome.converged {
                let _ = writeln!(
                    out,
                    "{:>12}  {} (still changing after {} passes)",
                    "unconverged", outcome.path, outcome.passes
                );
            }
        }

        let s = self.summary();
        let _ = writeln!(
            out,
            "{} files scanned: {} {verb}, {} unchanged, {} failed, {} unconverged",
            s.scanned, s.changed, s.unchanged, s.failed, s.unconverged
        );
        out
    }

    /// Machine-readable rendering of the whole report.
    pub fn render_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct View<'a> {
            started: DateTime<Utc>,
            ended: Option<DateTime<Utc>>,
            dry_run: bool,
            summary: Summary,
            rule_hits: BTreeMap<String, u64>,
            files: &'a [FileOutcome],
        }
        serde_json::to_string_pretty(&View {
            started: self.started,
            ended: self.ended,
            dry_run: self.dry_run,
            summary: self.summary(),
            rule_hits: self.rule_hits(),
            files: &self.outcomes,
        })
    }
}
