//! Line-level parsing shared by the rule catalogue.
//!
//! Everything here is deliberately line-oriented and conservative: a construct that
//! cannot be classified with confidence is classified as plain text, and the rules
//! leave plain text alone. Fenced code blocks are tracked so no rule rewrites code.

/// What a line is, relative to fenced code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineContext {
    /// Ordinary Markdown outside any fence.
    Text,
    /// Opening fence delimiter (may carry an info string).
    FenceOpen,
    /// A line inside a fenced code block.
    FenceBody,
    /// Closing fence delimiter.
    FenceClose,
}

impl LineContext {
    pub fn in_fence(self) -> bool {
        !matches!(self, LineContext::Text)
    }
}

/// A document split into lines, remembering whether the text ended with a newline.
///
/// `parse` followed by `render` is the identity for any input; rules mutate `lines`
/// in between.
#[derive(Debug, Clone)]
pub struct Doc {
    pub lines: Vec<String>,
    pub trailing_newline: bool,
}

impl Doc {
    pub fn parse(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let trailing_newline = text.ends_with('\n');
        if trailing_newline {
            lines.pop();
        }
        Doc {
            lines,
            trailing_newline,
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

/// Classify every line of a document with respect to fenced code blocks.
pub fn classify_lines(lines: &[String]) -> Vec<LineContext> {
    let mut out = Vec::with_capacity(lines.len());
    let mut open: Option<(char, usize)> = None;
    for line in lines {
        match open {
            None => {
                if let Some((c, n)) = fence_delimiter(line) {
                    open = Some((c, n));
                    out.push(LineContext::FenceOpen);
                } else {
                    out.push(LineContext::Text);
                }
            }
            Some((c, n)) => {
                if closes_fence(line, c, n) {
                    open = None;
                    out.push(LineContext::FenceClose);
                } else {
                    out.push(LineContext::FenceBody);
                }
            }
        }
    }
    out
}

/// Parse a fence delimiter: up to three spaces of indent, then a run of three or more
/// backticks or tildes. Backtick fences may not carry backticks in the info string.
pub fn fence_delimiter(line: &str) -> Option<(char, usize)> {
    let indent = indent_width(line);
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let c = rest.chars().next()?;
    if c != '`' && c != '~' {
        return None;
    }
    let n = rest.chars().take_while(|&x| x == c).count();
    if n < 3 {
        return None;
    }
    if c == '`' && rest[n..].contains('`') {
        return None;
    }
    Some((c, n))
}

fn closes_fence(line: &str, open_char: char, open_len: usize) -> bool {
    match fence_delimiter(line) {
        Some((c, n)) if c == open_char && n >= open_len => {
            let indent = indent_width(line);
            line[indent..].trim_start_matches(c).trim().is_empty()
        }
        _ => false,
    }
}

/// True when the line holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Leading space count. Tab-indented lines report only the spaces before the first
/// tab; the list rules refuse to touch those.
pub fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Thematic break: three or more of the same `-`/`_`/`*`, optionally space-separated.
pub fn is_thematic_break(line: &str) -> bool {
    let mut marker = None;
    let mut count = 0usize;
    for c in line.trim().chars() {
        if c == ' ' {
            continue;
        }
        match marker {
            None if matches!(c, '-' | '_' | '*') => {
                marker = Some(c);
                count = 1;
            }
            Some(m) if c == m => count += 1,
            _ => return false,
        }
    }
    count >= 3
}

/// An unordered list item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletItem<'a> {
    pub indent: usize,
    pub marker: char,
    /// Spaces between the marker and the content.
    pub gap: usize,
    pub content: &'a str,
}

pub fn bullet_item(line: &str) -> Option<BulletItem<'_>> {
    let indent = indent_width(line);
    let rest = &line[indent..];
    let marker = rest.chars().next()?;
    if !matches!(marker, '-' | '+' | '*') {
        return None;
    }
    let after = &rest[1..];
    if !after.starts_with(' ') || is_thematic_break(line) {
        return None;
    }
    let gap = after.len() - after.trim_start_matches(' ').len();
    Some(BulletItem {
        indent,
        marker,
        gap,
        content: &after[gap..],
    })
}

/// An ordered list item line (`1. text` or `1) text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedItem<'a> {
    pub indent: usize,
    pub number: u64,
    pub delimiter: char,
    pub gap: usize,
    pub content: &'a str,
}

pub fn ordered_item(line: &str) -> Option<OrderedItem<'_>> {
    let indent = indent_width(line);
    let rest = &line[indent..];
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let number: u64 = rest[..digits].parse().ok()?;
    let delimiter = rest[digits..].chars().next()?;
    if delimiter != '.' && delimiter != ')' {
        return None;
    }
    let after = &rest[digits + 1..];
    if !after.starts_with(' ') {
        return None;
    }
    let gap = after.len() - after.trim_start_matches(' ').len();
    Some(OrderedItem {
        indent,
        number,
        delimiter,
        gap,
        content: &after[gap..],
    })
}

/// True when the line is either kind of list item.
pub fn is_list_item(line: &str) -> bool {
    bullet_item(line).is_some() || ordered_item(line).is_some()
}

/// An ATX heading in its well-formed shape: leading `#` run at column zero followed by
/// whitespace (or nothing). The spacing rule separately recognizes the malformed
/// `#Heading` shape it exists to repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'a> {
    pub level: usize,
    /// Everything after the `#` run, leading whitespace included.
    pub rest: &'a str,
}

pub fn atx_heading(line: &str) -> Option<Heading<'_>> {
    if !line.starts_with('#') {
        return None;
    }
    let level = line.chars().take_while(|&c| c == '#').count();
    if level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some(Heading { level, rest })
}

/// Per-byte mask of inline code spans (delimiters included). Scanners skip masked
/// bytes. An unclosed backtick run is literal text and stays unmasked.
pub fn code_span_mask(line: &str) -> Vec<bool> {
    let mut mask = vec![false; line.len()];
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].1 != '`' {
            i += 1;
            continue;
        }
        let mut open_len = 1;
        while i + open_len < chars.len() && chars[i + open_len].1 == '`' {
            open_len += 1;
        }
        // Find a closing run of exactly the same length.
        let mut j = i + open_len;
        let mut close: Option<usize> = None;
        while j < chars.len() {
            if chars[j].1 == '`' {
                let mut n = 1;
                while j + n < chars.len() && chars[j + n].1 == '`' {
                    n += 1;
                }
                if n == open_len {
                    close = Some(j);
                    break;
                }
                j += n;
            } else {
                j += 1;
            }
        }
        match close {
            Some(j) => {
                let start = chars[i].0;
                let end = chars
                    .get(j + open_len)
                    .map(|&(b, _)| b)
                    .unwrap_or(line.len());
                for b in start..end {
                    mask[b] = true;
                }
                i = j + open_len;
            }
            None => i += open_len,
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_round_trips() {
        for text in ["", "a", "a\n", "a\n\nb\n", "a\r\nb", "\n\n\n"] {
            assert_eq!(Doc::parse(text).render(), text);
        }
    }

    #[test]
    fn classify_tracks_fences() {
        let lines: Vec<String> = ["para", "```rust", "- not a list", "```", "after"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ctx = classify_lines(&lines);
        assert_eq!(
            ctx,
            vec![
                LineContext::Text,
                LineContext::FenceOpen,
                LineContext::FenceBody,
                LineContext::FenceClose,
                LineContext::Text,
            ]
        );
    }

    #[test]
    fn unclosed_fence_swallows_rest() {
        let lines: Vec<String> = ["```", "body", "body"].iter().map(|s| s.to_string()).collect();
        let ctx = classify_lines(&lines);
        assert_eq!(ctx[1], LineContext::FenceBody);
        assert_eq!(ctx[2], LineContext::FenceBody);
    }

    #[test]
    fn tilde_fence_closes_with_longer_run() {
        let lines: Vec<String> = ["~~~", "x", "~~~~"].iter().map(|s| s.to_string()).collect();
        assert_eq!(classify_lines(&lines)[2], LineContext::FenceClose);
    }

    #[test]
    fn bullet_item_parses_and_rejects() {
        let item = bullet_item("  * two  spaces").unwrap();
        assert_eq!(item.indent, 2);
        assert_eq!(item.marker, '*');
        assert_eq!(item.gap, 1);
        assert_eq!(item.content, "two  spaces");

        assert!(bullet_item("-no space").is_none());
        assert!(bullet_item("---").is_none());
        assert!(bullet_item("* * *").is_none());
        assert!(bullet_item("**bold**").is_none());
    }

    #[test]
    fn ordered_item_parses_both_delimiters() {
        let a = ordered_item("3. a").unwrap();
        assert_eq!((a.number, a.delimiter, a.content), (3, '.', "a"));
        let b = ordered_item("  12) b").unwrap();
        assert_eq!((b.indent, b.number, b.delimiter), (2, 12, ')'));
        assert!(ordered_item("3.no space").is_none());
        assert!(ordered_item("v1.2 notes").is_none());
    }

    #[test]
    fn heading_requires_space_or_end() {
        assert_eq!(atx_heading("## Title").unwrap().level, 2);
        assert_eq!(atx_heading("##").unwrap().rest, "");
        assert!(atx_heading("#Heading").is_none());
        assert!(atx_heading("#######").is_none());
        assert!(atx_heading("para").is_none());
    }

    #[test]
    fn thematic_breaks() {
        assert!(is_thematic_break("---"));
        assert!(is_thematic_break("* * *"));
        assert!(is_thematic_break("  ___  "));
        assert!(!is_thematic_break("--"));
        assert!(!is_thematic_break("- a"));
    }

    #[test]
    fn code_span_mask_covers_span_and_delimiters() {
        let line = "a `b` c";
        let mask = code_span_mask(line);
        assert!(!mask[0]);
        assert!(mask[2] && mask[3] && mask[4]);
        assert!(!mask[6]);
    }

    #[test]
    fn unbalanced_backtick_is_unmasked() {
        let mask = code_span_mask("a ` b");
        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn double_backtick_span() {
        let line = "``a ` b`` x";
        let mask = code_span_mask(line);
        assert!(mask[..9].iter().all(|&m| m));
        assert!(!mask[10]);
    }
}
