//! Rule catalogue and converging rule set for Markdown normalization.
//!
//! This crate owns *what* a canonical document looks like. It is pure text-to-text:
//! no I/O, no per-document state. The `mdfix-engine` crate owns reading, writing, and
//! corpus traversal.
//!
//! # Contract
//!
//! Every [`Rule`] is total (never panics on UTF-8 input), preserves the rendered
//! meaning of the document, and leaves any construct it cannot classify safely
//! untouched. A [`RuleSet`] applies the rules in a fixed order and re-runs whole
//! passes until the text stabilizes or the pass bound is reached, so the composed
//! pipeline is idempotent: running it over its own output is a no-op.

pub mod lines;
mod rules;
mod style;

pub use rules::builtin_rules;
pub use style::{BulletMarker, EmphasisStyle, StyleConfig};

use std::collections::BTreeMap;

/// Identity of a rule, unique within a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    /// Dotted identifier, e.g. `list.marker`.
    pub id: &'static str,
    pub description: &'static str,
}

/// One normalization concern as a pure function from text to text.
pub trait Rule {
    fn meta(&self) -> RuleMeta;

    /// Transform the full document text. Must be safe to apply repeatedly.
    fn apply(&self, text: &str, style: &StyleConfig) -> String;
}

/// Result of running a [`RuleSet`] over one document's text.
#[derive(Debug, Clone)]
pub struct RuleSetOutcome {
    pub text: String,
    /// True iff the final text differs from the input.
    pub changed: bool,
    /// True when a full pass produced no change within the pass bound.
    pub converged: bool,
    /// Passes executed, including the clean final pass when converged.
    pub passes: usize,
    /// Per-rule count of passes in which the rule changed the text.
    pub rule_hits: BTreeMap<String, u64>,
}

/// Default bound on full passes before a document is flagged as non-converging.
pub const DEFAULT_MAX_PASSES: usize = 3;

/// An ordered, converging composition of rules.
///
/// Order matters: structural rules (markers, indentation, heading shape) run before
/// the spacing rules that classify adjacent lines, and ordered-list renumbering runs
/// after indentation has been canonicalized.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
    style: StyleConfig,
    max_passes: usize,
}

impl RuleSet {
    /// The built-in catalogue with the given style and pass bound.
    pub fn new(style: StyleConfig, max_passes: usize) -> Self {
        Self::with_rules(builtin_rules(), style, max_passes)
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>, style: StyleConfig, max_passes: usize) -> Self {
        Self {
            rules,
            style,
            max_passes: max_passes.max(1),
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn rule_metas(&self) -> Vec<RuleMeta> {
        self.rules.iter().map(|r| r.meta()).collect()
    }

    /// Apply every rule in order, once per pass, until a pass changes nothing or the
    /// pass bound is hit. The returned text is the best effort either way.
    pub fn run(&self, text: &str) -> RuleSetOutcome {
        let mut current = text.to_string();
        let mut rule_hits: BTreeMap<String, u64> = BTreeMap::new();
        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_passes {
            passes += 1;
            let mut pass_changed = false;
            for rule in &self.rules {
                let next = rule.apply(&current, &self.style);
                if next != current {
                    *rule_hits.entry(rule.meta().id.to_string()).or_insert(0) += 1;
                    current = next;
                    pass_changed = true;
                }
            }
            if !pass_changed {
                converged = true;
                break;
            }
        }

        RuleSetOutcome {
            changed: current != text,
            text: current,
            converged,
            passes,
            rule_hits,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(StyleConfig::default(), DEFAULT_MAX_PASSES)
    }
}
