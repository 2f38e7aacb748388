use crate::Rule;

mod code;
mod emphasis;
mod headings;
mod links;
mod lists;
mod ordered;
mod whitespace;

/// The built-in catalogue in execution order.
///
/// Structural rules (heading shape, markers, indentation) come first so the spacing
/// rules see final block boundaries; renumbering follows indentation normalization
/// because it groups items by indent level; whitespace cleanup runs last.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(headings::AtxSpace),
        Box::new(headings::TrailingPunctuation),
        Box::new(lists::CanonicalMarker),
        Box::new(lists::MarkerSpace),
        Box::new(lists::IndentStep),
        Box::new(ordered::Renumber),
        Box::new(code::FenceLanguage),
        Box::new(emphasis::CanonicalDelimiters),
        Box::new(links::BareUrls),
        Box::new(headings::BlankLines),
        Box::new(lists::BlankLines),
        Box::new(code::FenceBlankLines),
        Box::new(whitespace::BlankCollapse),
        Box::new(whitespace::Trailing),
        Box::new(whitespace::FinalNewline),
    ]
}
