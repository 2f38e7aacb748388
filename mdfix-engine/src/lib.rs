//! Corpus traversal, per-file processing, and run reporting for mdfix.
//!
//! The layering is deliberate: `mdfix-rules` decides what canonical text looks
//! like, this crate moves that text safely between disk and the rules, and the CLI
//! only parses arguments and picks an output format. Embedders can call
//! [`run_pipeline`] directly and get the same behavior as the binary.

pub mod error;
pub mod pipeline;
pub mod processor;
pub mod report;
pub mod walker;

pub use error::{ProcessError, ProcessResult};
pub use pipeline::{RunOptions, run_pipeline};
pub use processor::{FileOutcome, FileProcessor, FileStatus, ProcessOptions};
pub use report::{RunReport, Summary};
pub use walker::{Collected, CorpusWalker, DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS};
