//! Emphasis delimiter normalization.

use crate::lines::{Doc, LineContext, classify_lines, code_span_mask};
use crate::{EmphasisStyle, Rule, RuleMeta, StyleConfig};

/// Normalize strong/italic delimiters to the canonical style.
///
/// Conversion is deliberately conservative: a delimiter run converts only when it sits
/// on a word boundary, its closing run has the exact same length, and the enclosed
/// text contains no further delimiter of the same kind. Mid-word emphasis and
/// ambiguous nesting are left untouched; snake_case identifiers never match because
/// the opening underscore has a word character before it.
pub struct CanonicalDelimiters;

impl CanonicalDelimiters {
    fn convert_line(line: &str, from: char, to: char) -> String {
        let mask = code_span_mask(line);
        let chars: Vec<(usize, char)> = line.char_indices().collect();
        let mut out = String::with_capacity(line.len());
        let mut i = 0;

        while i < chars.len() {
            let (byte, c) = chars[i];
            if c != from || mask[byte] {
                out.push(c);
                i += 1;
                continue;
            }

            let mut run = 1;
            while i + run < chars.len() && chars[i + run].1 == from && !mask[chars[i + run].0] {
                run += 1;
            }
            if run > 2 {
                out.extend(std::iter::repeat_n(from, run));
                i += run;
                continue;
            }

            let open_boundary = i == 0 || !chars[i - 1].1.is_alphanumeric();
            let close = Self::find_close(&chars, &mask, i + run, from, run);

            if open_boundary
                && let Some(j) = close
            {
                let inner = &chars[i + run..j];
                let inner_ok = !inner.is_empty()
                    && inner.first().is_some_and(|&(_, ch)| !ch.is_whitespace())
                    && inner.last().is_some_and(|&(_, ch)| !ch.is_whitespace())
                    && inner.iter().all(|&(_, ch)| ch != from);
                let close_boundary =
                    j + run >= chars.len() || !chars[j + run].1.is_alphanumeric();
                if inner_ok && close_boundary {
                    out.extend(std::iter::repeat_n(to, run));
                    out.extend(inner.iter().map(|&(_, ch)| ch));
                    out.extend(std::iter::repeat_n(to, run));
                    i = j + run;
                    continue;
                }
            }

            out.extend(std::iter::repeat_n(from, run));
            i += run;
        }

        out
    }

    /// Next unmasked run of `from`; `Some` only when its length matches exactly.
    fn find_close(
        chars: &[(usize, char)],
        mask: &[bool],
        start: usize,
        from: char,
        run: usize,
    ) -> Option<usize> {
        let mut k = start;
        while k < chars.len() {
            if chars[k].1 == from && !mask[chars[k].0] {
                let mut n = 1;
                while k + n < chars.len() && chars[k + n].1 == from && !mask[chars[k + n].0] {
                    n += 1;
                }
                return (n == run).then_some(k);
            }
            k += 1;
        }
        None
    }
}

impl Rule for CanonicalDelimiters {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "emphasis.style",
            description: "Normalize emphasis delimiters to the canonical style",
        }
    }

    fn apply(&self, text: &str, style: &StyleConfig) -> String {
        let to = style.emphasis.as_char();
        let from = match style.emphasis {
            EmphasisStyle::Asterisk => '_',
            EmphasisStyle::Underscore => '*',
        };
        let mut doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        let mut changed = false;
        for (i, line) in doc.lines.iter_mut().enumerate() {
            if ctx[i] != LineContext::Text || !line.contains(from) {
                continue;
            }
            let fixed = Self::convert_line(line, from, to);
            if fixed != *line {
                *line = fixed;
                changed = true;
            }
        }
        if changed { doc.render() } else { text.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn asterisk(text: &str) -> String {
        CanonicalDelimiters.apply(text, &StyleConfig::default())
    }

    fn underscore(text: &str) -> String {
        let style = StyleConfig {
            emphasis: EmphasisStyle::Underscore,
            ..StyleConfig::default()
        };
        CanonicalDelimiters.apply(text, &style)
    }

    #[test]
    fn underscores_become_asterisks() {
        assert_eq!(asterisk("__bold__ and _italic_\n"), "**bold** and *italic*\n");
    }

    #[test]
    fn asterisks_become_underscores() {
        assert_eq!(underscore("**bold** and *italic*\n"), "__bold__ and _italic_\n");
    }

    #[test]
    fn snake_case_untouched() {
        assert_eq!(asterisk("use snake_case_names here\n"), "use snake_case_names here\n");
    }

    #[test]
    fn mid_word_emphasis_untouched() {
        assert_eq!(
            underscore("un*frigging*believable\n"),
            "un*frigging*believable\n"
        );
    }

    #[test]
    fn bullet_marker_untouched() {
        assert_eq!(underscore("* item one\n"), "* item one\n");
    }

    #[test]
    fn math_like_asterisks_untouched() {
        assert_eq!(underscore("a * b * c\n"), "a * b * c\n");
    }

    #[test]
    fn code_spans_untouched() {
        assert_eq!(asterisk("`_private` stays\n"), "`_private` stays\n");
        assert_eq!(underscore("see `a * b`\n"), "see `a * b`\n");
    }

    #[test]
    fn mismatched_runs_left_alone() {
        assert_eq!(asterisk("__odd_\n"), "__odd_\n");
    }

    #[test]
    fn nested_converges_within_passes() {
        let once = asterisk("__bold _it_ bold__\n");
        assert_eq!(once, "__bold *it* bold__\n");
        let twice = asterisk(&once);
        assert_eq!(twice, "**bold *it* bold**\n");
        assert_eq!(asterisk(&twice), twice);
    }

    #[test]
    fn fence_content_untouched() {
        let text = "```\n__init__\n```\n";
        assert_eq!(asterisk(text), text);
    }
}
