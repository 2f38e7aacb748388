//! Ordered-list renumbering.

use crate::lines::{
    Doc, LineContext, atx_heading, bullet_item, classify_lines, is_blank, ordered_item,
};
use crate::{Rule, RuleMeta, StyleConfig};

/// Renumber each contiguous ordered run from 1, with an independent counter per
/// indentation level. A blank line, heading, or fence resets every counter; a bullet
/// item resets the counters at its own indent and deeper. Plain continuation text
/// leaves the counters alone so loose item bodies do not restart the numbering.
pub struct Renumber;

impl Rule for Renumber {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "list.renumber",
            description: "Renumber contiguous ordered-list runs from 1 per indent level",
        }
    }

    fn apply(&self, text: &str, _style: &StyleConfig) -> String {
        let mut doc = Doc::parse(text);
        let ctx = classify_lines(&doc.lines);
        // (indent, next number) stack, outermost first.
        let mut counters: Vec<(usize, u64)> = Vec::new();
        let mut changed = false;

        for i in 0..doc.lines.len() {
            if ctx[i] != LineContext::Text {
                counters.clear();
                continue;
            }
            let line = &doc.lines[i];

            if let Some(item) = ordered_item(line) {
                while counters.last().is_some_and(|&(ind, _)| ind > item.indent) {
                    counters.pop();
                }
                let number = match counters.last_mut() {
                    Some((ind, next)) if *ind == item.indent => {
                        let n = *next;
                        *next += 1;
                        n
                    }
                    _ => {
                        counters.push((item.indent, 2));
                        1
                    }
                };
                if number != item.number {
                    doc.lines[i] = format!(
                        "{}{}{}{}{}",
                        " ".repeat(item.indent),
                        number,
                        item.delimiter,
                        " ".repeat(item.gap),
                        item.content
                    );
                    changed = true;
                }
            } else if let Some(item) = bullet_item(line) {
                while counters.last().is_some_and(|&(ind, _)| ind >= item.indent) {
                    counters.pop();
                }
            } else if is_blank(line) || atx_heading(line).is_some() {
                counters.clear();
            }
            // Anything else is continuation text inside the run.
        }

        if changed { doc.render() } else { text.to_string() }
    }
}
