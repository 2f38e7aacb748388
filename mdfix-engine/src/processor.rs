//! Per-file normalization: read, run the rule set, write back atomically.

use std::collections::BTreeMap;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tempfile::NamedTempFile;

use mdfix_rules::RuleSet;

use crate::error::{ProcessError, ProcessResult};

/// How one file came out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// The normalized text differs from what was on disk. In dry-run mode the file
    /// was not touched; otherwise it was rewritten.
    Changed,
    /// Already canonical.
    Unchanged,
    /// Could not be read, decoded, or written back.
    Failed,
}

/// Record of one file's trip through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: Utf8PathBuf,
    pub status: FileStatus,
    /// False when the pass bound was hit before the text stabilized.
    pub converged: bool,
    pub passes: usize,
    /// Failure description, present only for [`FileStatus::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-rule count of passes in which the rule changed this file.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rule_hits: BTreeMap<String, u64>,
    /// Unified diff of the change, when diff emission was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileOutcome {
    pub(crate) fn failed(err: ProcessError) -> Self {
        Self {
            path: err.path().to_owned(),
            status: FileStatus::Failed,
            converged: false,
            passes: 0,
            message: Some(err.to_string()),
            rule_hits: BTreeMap::new(),
            diff: None,
        }
    }
}

/// Processing knobs that do not affect what canonical text looks like.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Report changes without writing anything.
    pub dry_run: bool,
    /// Attach a unified diff to changed outcomes.
    pub emit_diff: bool,
}

/// Applies a [`RuleSet`] to files on disk.
///
/// Line endings are preserved: a majority-CRLF file is normalized to LF for the
/// rules and written back with CRLF. Writes go through a sibling temp file and an
/// atomic rename, so a crash never leaves a half-written document. Failures are
/// captured in the returned [`FileOutcome`] instead of aborting the run.
pub struct FileProcessor {
    rules: RuleSet,
    options: ProcessOptions,
}

impl FileProcessor {
    pub fn new(rules: RuleSet, options: ProcessOptions) -> Self {
        Self { rules, options }
    }

    pub fn process(&self, path: &Utf8Path) -> FileOutcome {
        match self.try_process(path) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(%err, "file failed");
                FileOutcome::failed(err)
            }
        }
    }

    fn try_process(&self, path: &Utf8Path) -> ProcessResult<FileOutcome> {
        let bytes = fs_err::read(path.as_std_path()).map_err(|e| ProcessError::Read {
            path: path.to_owned(),
            source: e.into(),
        })?;
        let original = String::from_utf8(bytes).map_err(|_| ProcessError::NotUtf8 {
            path: path.to_owned(),
        })?;

        let uses_crlf = {
            let crlf = original.matches("\r\n").count();
            let lf = original.matches('\n').count();
            crlf * 2 > lf && lf > 0
        };
        let input = if uses_crlf {
            original.replace("\r\n", "\n")
        } else {
            original.clone()
        };

        let outcome = self.rules.run(&input);
        let rendered = if uses_crlf {
            outcome.text.replace('\n', "\r\n")
        } else {
            outcome.text.clone()
        };

        if rendered == original {
            tracing::debug!(%path, passes = outcome.passes, "unchanged");
            return Ok(FileOutcome {
                path: path.to_owned(),
                status: FileStatus::Unchanged,
                converged: outcome.converged,
                passes: outcome.passes,
                message: None,
                rule_hits: outcome.rule_hits,
                diff: None,
            });
        }

        let diff = self
            .options
            .emit_diff
            .then(|| diffy::create_patch(&input, &outcome.text).to_string());

        if !self.options.dry_run {
            write_atomic(path, rendered.as_bytes())?;
        }
        tracing::debug!(%path, passes = outcome.passes, dry_run = self.options.dry_run, "changed");

        Ok(FileOutcome {
            path: path.to_owned(),
            status: FileStatus::Changed,
            converged: outcome.converged,
            passes: outcome.passes,
            message: None,
            rule_hits: outcome.rule_hits,
            diff,
        })
    }
}

/// Write via a temp file in the target's directory plus an atomic rename, keeping
/// the original file's permissions. The path is resolved first so writing through a
/// symlink replaces the real file, not the link.
fn write_atomic(path: &Utf8Path, bytes: &[u8]) -> ProcessResult<()> {
    let wrap = |source: anyhow::Error| ProcessError::Write {
        path: path.to_owned(),
        source,
    };
    let target = fs_err::canonicalize(path.as_std_path()).map_err(|e| wrap(e.into()))?;
    let parent = target.parent().unwrap_or(std::path::Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| wrap(e.into()))?;
    tmp.write_all(bytes).map_err(|e| wrap(e.into()))?;
    if let Ok(meta) = fs_err::metadata(&target) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| wrap(e.into()))?;
    }
    tmp.persist(&target).map_err(|e| wrap(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdfix_rules::StyleConfig;
    use pretty_assertions::assert_eq;

    fn processor(options: ProcessOptions) -> FileProcessor {
        FileProcessor::new(RuleSet::new(StyleConfig::default(), 3), options)
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        fs_err::write(path.as_std_path(), contents).unwrap();
        path
    }

    #[test]
    fn rewrites_a_messy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.md", b"#Title\ntext \n");
        let outcome = processor(ProcessOptions::default()).process(&path);
        assert_eq!(outcome.status, FileStatus::Changed);
        assert!(outcome.converged);
        assert_eq!(
            fs_err::read_to_string(path.as_std_path()).unwrap(),
            "# Title\n\ntext\n"
        );
    }

    #[test]
    fn clean_file_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.md", b"# Title\n\ntext\n");
        let outcome = processor(ProcessOptions::default()).process(&path);
        assert_eq!(outcome.status, FileStatus::Unchanged);
        assert!(outcome.rule_hits.is_empty());
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.md", b"#Title\n");
        let options = ProcessOptions {
            dry_run: true,
            emit_diff: true,
        };
        let outcome = processor(options).process(&path);
        assert_eq!(outcome.status, FileStatus::Changed);
        assert!(outcome.diff.as_deref().unwrap().contains("+# Title"));
        assert_eq!(fs_err::read(path.as_std_path()).unwrap(), b"#Title\n");
    }

    #[test]
    fn crlf_files_stay_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.md", b"#Title\r\ntext\r\n");
        let outcome = processor(ProcessOptions::default()).process(&path);
        assert_eq!(outcome.status, FileStatus::Changed);
        assert_eq!(
            fs_err::read(path.as_std_path()).unwrap(),
            b"# Title\r\n\r\ntext\r\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn writing_through_a_symlink_updates_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let real = write_file(&dir, "real.md", b"#Title\n");
        let link = Utf8PathBuf::from_path_buf(dir.path().join("link.md")).unwrap();
        std::os::unix::fs::symlink(real.as_std_path(), link.as_std_path()).unwrap();

        let outcome = processor(ProcessOptions::default()).process(&link);
        assert_eq!(outcome.status, FileStatus::Changed);
        assert_eq!(
            fs_err::read_to_string(real.as_std_path()).unwrap(),
            "# Title\n"
        );
        let meta = fs_err::symlink_metadata(link.as_std_path()).unwrap();
        assert!(meta.file_type().is_symlink());
    }

    #[test]
    fn invalid_utf8_is_a_recorded_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.md", b"# ok\n\xff\xfe\n");
        let outcome = processor(ProcessOptions::default()).process(&path);
        assert_eq!(outcome.status, FileStatus::Failed);
        assert!(outcome.message.unwrap().contains("not valid UTF-8"));
        assert_eq!(fs_err::read(path.as_std_path()).unwrap(), b"# ok\n\xff\xfe\n");
    }

    #[test]
    fn missing_file_is_a_recorded_failure() {
        let outcome =
            processor(ProcessOptions::default()).process(Utf8Path::new("no/such/file.md"));
        assert_eq!(outcome.status, FileStatus::Failed);
        assert!(outcome.message.unwrap().contains("failed to read"));
    }
}
