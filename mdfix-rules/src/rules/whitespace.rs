//! Whitespace rules: blank-line collapsing, trailing whitespace, final newline.

use crate::lines::{Doc, LineContext, classify_lines, is_blank};
use crate::{Rule, RuleMeta, StyleConfig};

/// Collapse runs of three or more blank lines (outside fences) to exactly one.
pub struct BlankCollapse;

impl Rule for BlankCollapse {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "whitespace.blank_collapse",
            description: "Collapse 3+ consecutive blank lines to one",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        let doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut out: Vec<String> = Vec::with_capacity(doc.lines.len());
        let mut i = 0;

        while i < doc.lines.len() {
            let blank_here = ctx[i] == LineContext::Text && is_blank(&doc.lines[i]);
            if !blank_here {
                out.push(doc.lines[i].clone());
                i += 1;
                continue;
            }
            let mut j = i;
            while j < doc.lines.len() && ctx[j] == LineContext::Text && is_blank(&doc.lines[j]) {
                j += 1;
            }
            let run = j - i;
            if run >= 3 {
                out.push(String::new());
            } else {
                out.extend(doc.lines[i..j].iter().cloned());
            }
            i = j;
        }

        Doc {
            lines: out,
            trailing_newline: doc.trailing_newline,
        }
        .render()
    }
}

/// Strip trailing whitespace. A run of two or more trailing spaces outside fences is
/// a Markdown hard line break and is normalized to exactly two rather than removed.
pub struct Trailing;

impl Rule for Trailing {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "whitespace.trailing",
            description: "Strip trailing whitespace, preserving hard line breaks",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        let mut doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut changed = false;

        for (i, line) in doc.lines.iter_mut().enumerate() {
            let stripped = line.trim_end_matches([' ', '\t']);
            if stripped.len() == line.len() {
                continue;
            }
            let keep_break = ctx[i] == LineContext::Text
                && !stripped.is_empty()
                && line.ends_with("  ")
                && !line.ends_with('\t');
            let fixed = if keep_break {
                format!("{stripped}  ")
            } else {
                stripped.to_string()
            };
            if fixed != *line {
                *line = fixed;
                changed = true;
            }
        }

        if changed { doc.render() } else { text.to_string() }
    }
}

/// Exactly one newline at end of file; trailing blank lines are dropped. An empty
/// document stays empty.
pub struct FinalNewline;

impl Rule for FinalNewline {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "whitespace.final_newline",
            description: "Exactly one trailing newline at end of file",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        while doc
            .lines
            .last()
            .is_some_and(|l| is_blank(l) && ctx[doc.lines.len() - 1] == LineContext::Text)
        {
            doc.lines.pop();
        }
        if doc.lines.is_empty() {
            return String::new();
        }
        doc.trailing_newline = true;
        doc.render()
    }
}
