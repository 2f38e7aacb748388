//! Fenced code block rules: default language tag and surrounding blank lines.

use crate::lines::{Doc, LineContext, classify_lines, indent_width, is_blank};
use crate::{Rule, RuleMeta, StyleConfig};

/// Tag opening fences that carry no info string with the configured default language.
pub struct FenceLanguage;

impl Rule for FenceLanguage {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "code.fence_language",
            description: "Insert the default language tag on untagged code fences",
        }
    }

    fn apply(&self, text: &str, style: &StyleConfig) -> String {
        let mut doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut changed = false;
        for (i, line) in doc.lines.iter_mut().enumerate() {
            if ctx[i] != LineContext::FenceOpen {
                continue;
            }
            let trimmed = line.trim_end().to_string();
            let info = trimmed.trim_start().trim_start_matches(['`', '~']);
            if info.is_empty() {
                *line = format!("{}{}", trimmed, style.fence_language);
                changed = true;
            }
        }
        if changed { doc.render() } else { text.to_string() }
    }
}

/// A blank line before an opening fence and after a closing fence.
///
/// Only column-zero fences are handled; an indented fence may belong to a list item,
/// where an inserted blank would change the structure.
pub struct FenceBlankLines;

impl Rule for FenceBlankLines {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "code.fence_blank_lines",
            description: "Blank line before and after fenced code blocks",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        let doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut out: Vec<String> = Vec::with_capacity(doc.lines.len());
        let mut after_close = false;

        for (i, line) in doc.lines.iter().enumerate() {
            let col_zero = indent_width(line) == 0;
            let opens = ctx[i] == LineContext::FenceOpen && col_zero;
            let needs_blank = (opens || after_close)
                && !is_blank(line)
                && out.last().is_some_and(|prev| !is_blank(prev));
            if needs_blank {
                out.push(String::new());
            }
            out.push(line.clone());
            after_close = ctx[i] == LineContext::FenceClose && col_zero;
        }

        Doc {
            lines: out,
            trailing_newline: doc.trailing_newline,
        }
        .render()
    }
}
