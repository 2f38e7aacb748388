//! ATX heading rules: marker spacing, trailing punctuation, surrounding blank lines.

use crate::lines::{Doc, LineContext, atx_heading, classify_lines, is_blank};
use crate::{Rule, RuleMeta, StyleConfig};

/// Exactly one space between the `#` run and the heading text.
///
/// Also repairs the malformed `#Heading` shape, which is what most corpora actually
/// contain; lines with seven or more hashes are left alone.
pub struct AtxSpace;

impl AtxSpace {
    fn fix_line(line: &str) -> Option<String> {
        if !line.starts_with('#') {
            return None;
        }
        let level = line.chars().take_while(|&c| c == '#').count();
        if level > 6 {
            return None;
        }
        let content = line[level..].trim_start();
        if content.is_empty() {
            return None;
        }
        let fixed = format!("{} {}", "#".repeat(level), content);
        (fixed != line).then_some(fixed)
    }
}

impl Rule for AtxSpace {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "heading.atx_space",
            description: "Exactly one space after the leading # run of a heading",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        map_text_lines(text, Self::fix_line)
    }
}

/// Strip trailing `.,;:!` from heading text. `?` is meaningful and kept, closed ATX
/// headings (trailing `#`) are left alone.
pub struct TrailingPunctuation;

impl TrailingPunctuation {
    const PUNCTUATION: &'static [char] = &['.', ',', ';', ':', '!'];

    fn fix_line(line: &str) -> Option<String> {
        let heading = atx_heading(line)?;
        let text = heading.rest.trim_end();
        if text.is_empty() || text.ends_with('#') {
            return None;
        }
        let stripped = text.trim_end_matches(Self::PUNCTUATION);
        if stripped == text || stripped.trim().is_empty() {
            return None;
        }
        Some(format!("{}{}", "#".repeat(heading.level), stripped))
    }
}

impl Rule for TrailingPunctuation {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "heading.trailing_punctuation",
            description: "Strip trailing punctuation from heading text",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        map_text_lines(text, Self::fix_line)
    }
}

/// A blank line before and after every heading (except at the start of the file).
pub struct BlankLines;

impl Rule for BlankLines {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "heading.blank_lines",
            description: "Blank line before and after each heading",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        let doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut out: Vec<String> = Vec::with_capacity(doc.lines.len());
        let mut after_heading = false;

        for (i, line) in doc.lines.iter().enumerate() {
            let is_heading = ctx[i] == LineContext::Text && atx_heading(line).is_some();
            let needs_blank = (is_heading || after_heading)
                && !is_blank(line)
                && out.last().is_some_and(|prev| !is_blank(prev));
            if needs_blank {
                out.push(String::new());
            }
            out.push(line.clone());
            after_heading = is_heading;
        }

        Doc {
            lines: out,
            trailing_newline: doc.trailing_newline,
        }
        .render()
    }
}

/// Apply a per-line fixer to lines outside fenced code blocks.
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
