use crate::parsing::grammar::{DelimiterGrammar, DelimiterRule};
use crate::style::{Color, FontError, FontResolver, FontSpec, PassthroughFonts, StyleDescriptor};
use crate::text::StyledText;

/// The literal appended when a rendered result is cut short.
pub const ELLIPSIS: &str = "...";

/// One-shot render of delimiter markup into styled text.
///
/// Delimiters are stripped from the output; the enclosed spans carry the
/// merged styles. With `max_visible_chars > 0`, a result longer than the
/// budget is cut to exactly that many characters (runs preserved) and a
/// base-styled [`ELLIPSIS`] is appended; the returned flag reports whether
/// that happened. A `max_visible_chars` of zero means no limit.
///
/// Unterminated delimiters never match and are left verbatim; that is the
/// defined behavior for unbalanced markup, not an error. The only failure
/// is font resolution, which propagates rather than silently dropping a
/// requested trait.
pub fn render(
    markdown: &str,
    font: &FontSpec,
    color: Option<Color>,
    max_visible_chars: usize,
) -> Result<(StyledText, bool), FontError> {
    render_with(markdown, font, color, max_visible_chars, &PassthroughFonts)
}

/// [`render`] against a host font resolver.
pub fn render_with(
    markdown: &str,
    font: &FontSpec,
    color: Option<Color>,
    max_visible_chars: usize,
    fonts: &dyn FontResolver,
) -> Result<(StyledText, bool), FontError> {
    let base = StyleDescriptor::base(font.clone(), color);
    let mut out = StyledText::new(markdown, base.clone());

    for rule in DelimiterGrammar::standard().rules() {
        apply_rule(&mut out, rule, font, color, fonts)?;
    }

    let mut was_truncated = false;
    if max_visible_chars > 0 && out.char_len() > max_visible_chars {
        let mut cut = out.truncated(max_visible_chars);
        cut.append(ELLIPSIS, &base);
        out = cut;
        was_truncated = true;
    }
    Ok((out, was_truncated))
}

/// One full pass of a single rule over the progressively rewritten buffer.
///
/// Per match: drop the closing delimiter, merge the rule's style over the
/// content (whose range is untouched by that deletion), drop the opening
/// delimiter, then advance the cursor to the original match end minus the
/// characters removed for this match. The cursor strictly advances, so a
/// pass never re-matches consumed characters and back-to-back markup on one
/// line is each processed once.
fn apply_rule(
    out: &mut StyledText,
    rule: &DelimiterRule,
    font: &FontSpec,
    color: Option<Color>,
    fonts: &dyn FontResolver,
) -> Result<(), FontError> {
    let style = rule.style(font, color);
    let mut cursor = 0usize;

    loop {
        let hay_start = out.byte_offset(cursor);
        let Some(m) = rule.first_match(&out.text()[hay_start..], cursor) else {
            break;
        };

        // The close delimiter sits after the content, so deleting it first
        // leaves the content and open ranges valid.
        out.delete_range(m.close.clone());
        out.add_attributes(m.content.clone(), &style, fonts)?;
        out.delete_range(m.open.clone());

        cursor = m.full.end - m.open.len() - m.close.len();
    }
    Ok(())
}
