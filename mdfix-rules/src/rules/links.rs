//! Bare URL wrapping.

use crate::lines::{Doc, LineContext, classify_lines, code_span_mask};
use crate::{Rule, RuleMeta, StyleConfig};

/// Wrap bare `http(s)://` URLs in angle brackets.
///
/// A URL only counts as bare when it starts the line or follows whitespace, so link
/// destinations (`](...)`), autolinks (`<...>`), and HTML attributes are never
/// rewritten. Trailing sentence punctuation and an unbalanced closing paren stay
/// outside the brackets.
pub struct BareUrls;

impl BareUrls {
    const SCHEMES: [&'static str; 2] = ["https://", "http://"];

    fn wrap_line(line: &str) -> String {
        let mask = code_span_mask(line);
        let mut out = String::with_capacity(line.len());
        let mut i = 0;

        while i < line.len() {
            let scheme = (!mask[i])
                .then(|| Self::SCHEMES.iter().find(|s| line[i..].starts_with(**s)))
                .flatten();
            let at_boundary = line[..i]
                .chars()
                .next_back()
                .is_none_or(|c| c.is_whitespace());

            if let Some(scheme) = scheme
                && at_boundary
            {
                let end = line[i..]
                    .find(|c: char| c.is_whitespace() || c == '<' || c == '>')
                    .map(|o| i + o)
                    .unwrap_or(line.len());
                let url_end = Self::trim_url_end(line, i, end);
                if url_end > i + scheme.len() {
                    out.push('<');
                    out.push_str(&line[i..url_end]);
                    out.push('>');
                    i = url_end;
                    continue;
                }
            }

            let Some(c) = line[i..].chars().next() else {
                break;
            };
            out.push(c);
            i += c.len_utf8();
        }

        out
    }

    /// Pull sentence punctuation (and an unbalanced `)`) back out of the URL.
    fn trim_url_end(line: &str, start: usize, mut end: usize) -> usize {
        loop {
            let Some(last) = line[start..end].chars().next_back() else {
                return end;
            };
            match last {
                '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\'' => end -= last.len_utf8(),
                ')' if !line[start..end].contains('(') => end -= 1,
                _ => return end,
            }
        }
    }
}

impl Rule for BareUrls {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "link.bare_url",
            description: "Wrap bare URLs in angle brackets",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        let mut doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut changed = false;
        for (i, line) in doc.lines.iter_mut().enumerate() {
            if ctx[i] != LineContext::Text || !line.contains("http") {
                continue;
            }
            let fixed = Self::wrap_line(line);
            if fixed != *line {
                *line = fixed;
                changed = true;
            }
        }
        if changed { doc.render() } else { text.to_string() }
    }
}
