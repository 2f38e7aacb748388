//! Style configuration threaded through every rule.
//!
//! An explicit value object rather than ambient globals, so the rule set can be driven
//! from a config file, CLI flags, or embedding code alike.

use serde::{Deserialize, Serialize};

/// Canonical bullet marker for unordered lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BulletMarker {
    #[default]
    Dash,
    Asterisk,
    Plus,
}

impl BulletMarker {
    pub fn as_char(self) -> char {
        match self {
            BulletMarker::Dash => '-',
            BulletMarker::Asterisk => '*',
            BulletMarker::Plus => '+',
        }
    }
}

/// Canonical emphasis delimiter style.
///
/// Configurable because the upstream scripts disagreed with their own prior choice;
/// there is no single correct answer to hard-code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisStyle {
    #[default]
    Asterisk,
    Underscore,
}

impl EmphasisStyle {
    pub fn as_char(self) -> char {
        match self {
            EmphasisStyle::Asterisk => '*',
            EmphasisStyle::Underscore => '_',
        }
    }
}

/// All style knobs the rule catalogue consults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Canonical unordered-list marker.
    pub bullet: BulletMarker,

    /// Canonical strong/italic delimiter.
    pub emphasis: EmphasisStyle,

    /// Spaces per nesting level for list indentation.
    pub indent_step: usize,

    /// Language tag inserted on fenced code blocks that have none.
    pub fence_language: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            bullet: BulletMarker::Dash,
            emphasis: EmphasisStyle::Asterisk,
            indent_step: 2,
            fence_language: "text".to_string(),
        }
    }
}
