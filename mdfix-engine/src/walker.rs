//! Deterministic corpus traversal.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ProcessError;

/// Directory names skipped during traversal when no explicit exclude list is given.
pub const DEFAULT_EXCLUDES: [&str; 4] = [".git", "node_modules", "target", "vendor"];

/// Default set of file extensions treated as Markdown.
pub const DEFAULT_EXTENSIONS: [&str; 1] = ["md"];

/// Roots resolved to a corpus, plus the roots that could not be resolved.
#[derive(Debug, Default)]
pub struct Collected {
    /// Sorted, deduplicated file paths.
    pub files: Vec<Utf8PathBuf>,
    pub errors: Vec<ProcessError>,
}

/// Walks directories to the set of files a run covers.
///
/// Traversal is deterministic: entries are visited in byte order of their names and
/// the final list is sorted and deduplicated, so two runs over the same tree always
/// process the same files in the same order. Symlinks found during traversal are
/// skipped (cycle safety); an explicitly named root is followed, symlink or not, so
/// every user-supplied path ends up in the report. A root that names a file directly
/// bypasses the extension filter; a root that cannot be stat'ed becomes a recorded
/// error. Unreadable subdirectories are logged and skipped rather than failing the
/// run.
#[derive(Debug, Clone)]
pub struct CorpusWalker {
    extensions: Vec<String>,
    exclude: Vec<String>,
}

impl Default for CorpusWalker {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CorpusWalker {
    pub fn new(extensions: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            extensions,
            exclude,
        }
    }

    pub fn collect(&self, roots: &[Utf8PathBuf]) -> Collected {
        let mut collected = Collected::default();
        for root in roots {
            match fs_err::metadata(root.as_std_path()) {
                Err(e) => collected.errors.push(ProcessError::Read {
                    path: root.clone(),
                    source: e.into(),
                }),
                Ok(meta) if meta.is_dir() => self.walk_dir(root, &mut collected.files),
                Ok(_) => collected.files.push(root.clone()),
            }
        }
        collected.files.sort();
        collected.files.dedup();
        collected
    }

    fn walk_dir(&self, dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) {
        let entries = match fs_err::read_dir(dir.as_std_path()) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir, error = %e, "skipping unreadable directory");
                return;
            }
        };

        let mut children: Vec<(Utf8PathBuf, std::fs::FileType)> = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.path()) else {
                tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
                continue;
            };
            children.push((path, file_type));
        }
        children.sort_by(|a, b| a.0.cmp(&b.0));

        for (path, file_type) in children {
            if file_type.is_symlink() {
                tracing::debug!(%path, "skipping symlink");
            } else if file_type.is_dir() {
                let excluded = path
                    .file_name()
                    .is_some_and(|name| self.exclude.iter().any(|ex| ex == name));
                if !excluded {
                    self.walk_dir(&path, files);
                }
            } else if self.matches_extension(&path) {
                files.push(path);
            }
        }
    }

    fn matches_extension(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}
