//! List formatting rules: marker style, marker spacing, nesting indentation, and
//! blank lines around list blocks.

use crate::lines::{
    Doc, LineContext, atx_heading, bullet_item, classify_lines, indent_width, is_blank,
    is_list_item, is_thematic_break, ordered_item,
};
use crate::{Rule, RuleMeta, StyleConfig};

/// Normalize `-`/`+`/`*` bullets to the configured canonical marker.
pub struct CanonicalMarker;

impl Rule for CanonicalMarker {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "list.marker",
            description: "Normalize bullet markers to the canonical character",
        }
    }

    fn apply(&self, text: &str, style: &StyleConfig) -> String {
        let canonical = style.bullet.as_char();
        map_text_lines(text, |line| {
            let item = bullet_item(line)?;
            if item.marker == canonical {
                return None;
            }
            Some(format!(
                "{}{}{}{}",
                " ".repeat(item.indent),
                canonical,
                " ".repeat(item.gap),
                item.content
            ))
        })
    }
}

/// Exactly one space between a list marker and its content.
pub struct MarkerSpace;

impl Rule for MarkerSpace {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "list.marker_space",
            description: "Exactly one space after bullet and ordered-list markers",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        map_text_lines(text, |line| {
            if let Some(item) = bullet_item(line) {
                if item.gap == 1 || item.content.is_empty() {
                    return None;
                }
                return Some(format!(
                    "{}{} {}",
                    " ".repeat(item.indent),
                    item.marker,
                    item.content
                ));
            }
            if let Some(item) = ordered_item(line) {
                if item.gap == 1 || item.content.is_empty() {
                    return None;
                }
                return Some(format!(
                    "{}{}{} {}",
                    " ".repeat(item.indent),
                    item.number,
                    item.delimiter,
                    item.content
                ));
            }
            None
        })
    }
}

/// Canonicalize nested-list indentation to a fixed step per level.
///
/// Within a run of item lines, the distinct observed indent widths map in order onto
/// `0, step, 2*step, ...`. Blank lines between items belong to the same run (a loose
/// list is still one list); continuation lines are not touched; any other non-item
/// line ends the run.
pub struct IndentStep;

impl IndentStep {
    fn normalize_run(lines: &mut [String], run: &[usize], step: usize) {
        if run.is_empty() {
            return;
        }
        let mut widths: Vec<usize> = run.iter().map(|&i| indent_width(&lines[i])).collect();
        widths.sort_unstable();
        widths.dedup();

        for &i in run {
            let width = indent_width(&lines[i]);
            let level = widths.iter().position(|&w| w == width).unwrap_or(0);
            let target = level * step;
            if width != target {
                let rest = lines[i][width..].to_string();
                lines[i] = format!("{}{}", " ".repeat(target), rest);
            }
        }
    }
}

impl Rule for IndentStep {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "list.indent",
            description: "Normalize nested list indentation to a fixed step per level",
        }
    }

    fn apply(&self, text: &str, style: &StyleConfig) -> String {
        let mut doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut run: Vec<usize> = Vec::new();
        let mut runs: Vec<Vec<usize>> = Vec::new();

        for i in 0..doc.lines.len() {
            let text_line = ctx[i] == LineContext::Text;
            if text_line && is_list_item(&doc.lines[i]) {
                run.push(i);
            } else if text_line && is_blank(&doc.lines[i]) {
                // A blank separates loose items without ending the list, so the
                // nesting levels on either side must stay in one run.
            } else if !run.is_empty() {
                runs.push(std::mem::take(&mut run));
            }
        }
        if !run.is_empty() {
            runs.push(run);
        }

        if runs.is_empty() {
            return text.to_string();
        }
        for run in &runs {
            Self::normalize_run(&mut doc.lines, run, style.indent_step.max(1));
        }
        doc.render()
    }
}

/// A blank line before and after a contiguous list block.
///
/// A non-blank line directly after an item is a lazy continuation and stays attached;
/// the blank-after fix only fires ahead of unambiguous block starters (heading,
/// thematic break, fence) where no continuation reading exists.
pub struct BlankLines;

impl Rule for BlankLines {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "list.blank_lines",
            description: "Blank line before and after each contiguous list block",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        let doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut out: Vec<String> = Vec::with_capacity(doc.lines.len());
        let mut in_list = false;

        for (i, line) in doc.lines.iter().enumerate() {
            let text_line = ctx[i] == LineContext::Text;
            let item = text_line && is_list_item(line);

            if item && !in_list && out.last().is_some_and(|prev| !is_blank(prev)) {
                out.push(String::new());
            }

            let block_starter = (ctx[i] == LineContext::FenceOpen && indent_width(line) == 0)
                || (text_line
                    && !item
                    && (atx_heading(line).is_some() || is_thematic_break(line)));
            if in_list && block_starter && out.last().is_some_and(|prev| !is_blank(prev)) {
                out.push(String::new());
            }

            out.push(line.clone());
            in_list = item || (in_list && !is_blank(line) && !block_starter);
        }

        Doc {
            lines: out,
            trailing_newline: doc.trailing_newline,
        }
        .render()
    }
}

fn map_text_lines(text: &str, fix: impl Fn(&str) -> Option<String>) -> String {
    let mut doc = Doc::parse(text);
    let ctx = classify_lines(&doc.lines);
    let mut changed = false;
    for (i, line) in doc.lines.iter_mut().enumerate() {
        if ctx[i] == LineContext::Text
            && let Some(fixed) = fix(line)
        {
            *line = fixed;
            changed = true;
        }
    }
    if changed { doc.render() } else { text.to_string() }
}
