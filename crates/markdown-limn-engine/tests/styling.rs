use markdown_limn_engine::{
    FontSpec, MarkdownHighlighter, StyleDescriptor, StyledBuffer, TextStore, render,
};
use pretty_assertions::assert_eq;

fn body() -> FontSpec {
    FontSpec::new("Helvetica", 14.0)
}

fn highlighter() -> MarkdownHighlighter<StyledBuffer> {
    let store = StyledBuffer::new(StyleDescriptor::base(body(), None));
    MarkdownHighlighter::new(store, body())
}

fn style_at(h: &MarkdownHighlighter<StyledBuffer>, pos: usize) -> StyleDescriptor {
    h.store()
        .attributes_at(pos)
        .map(|(style, _)| style)
        .expect("position inside buffer")
}

#[test]
fn incremental_highlight_keeps_delimiters_one_shot_strips_them() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "say **x** now");
    h.process_pending_edit();

    // Raw markup stays visible and editable in the buffer...
    assert_eq!(h.store().text(), "say **x** now");
    assert_eq!(h.store().text().matches('*').count(), 4);
    // ...and the full match, delimiters included, is styled.
    for pos in 4..9 {
        assert!(style_at(&h, pos).is_bold(), "char {pos} should be bold");
    }
    assert!(!style_at(&h, 3).is_bold());

    // The one-shot path strips the same markup.
    let (out, _) = render("say **x** now", &body(), None, 0).unwrap();
    assert_eq!(out.text(), "say x now");
}

#[test]
fn character_after_match_does_not_inherit_style() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "**a**b");
    h.process_pending_edit();
    assert!(style_at(&h, 4).is_bold());
    assert!(!style_at(&h, 5).is_bold());
}

#[test]
fn overlapping_styles_merge_in_place() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "**a __b__ c**");
    h.process_pending_edit();
    // The italic span sits inside the bold span; both traits survive.
    let inner = style_at(&h, 6);
    assert!(inner.is_bold() && inner.is_italic());
    let outer = style_at(&h, 2);
    assert!(outer.is_bold() && !outer.is_italic());
}

#[test]
fn raw_sentinel_suspends_styling_but_still_resets() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "keep **this** bold");
    h.process_pending_edit();
    assert!(style_at(&h, 7).is_bold());

    // Prefix the buffer with the sentinel: next pass resets the scan range
    // and applies zero delimiter styling, markup notwithstanding.
    h.on_text_replaced(0..0, "@@");
    h.process_pending_edit();
    let len = h.store().char_len();
    for pos in 0..len {
        assert!(!style_at(&h, pos).is_bold(), "char {pos} still bold");
    }

    // The sentinel is content, not a sticky flag: removing it re-enables
    // styling on the next edit.
    h.on_text_replaced(0..2, "");
    h.process_pending_edit();
    assert!(style_at(&h, 7).is_bold());
}

#[test]
fn edits_restyle_only_touched_lines() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "**a**\nplain\n~~b~~");
    h.process_pending_edit();
    let len = h.store().char_len();
    let before: Vec<StyleDescriptor> = (0..len).map(|p| style_at(&h, p)).collect();
    assert!(before[1].is_bold());
    assert!(before[13].strikethrough);

    // Touch only the middle line.
    h.on_text_replaced(8..9, "X");
    h.process_pending_edit();

    // First and last lines keep byte-identical styling.
    for pos in 0..6 {
        assert_eq!(style_at(&h, pos), before[pos], "first line char {pos}");
    }
    for pos in 12..len {
        assert_eq!(style_at(&h, pos), before[pos], "last line char {pos}");
    }
}

#[test]
fn pair_opened_before_an_end_of_line_edit_is_rematched() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "intro\n**bold pair");
    h.process_pending_edit();
    assert!(!style_at(&h, 8).is_bold());

    let end = h.store().char_len();
    h.on_text_replaced(end..end, "** tail");
    h.process_pending_edit();
    assert!(style_at(&h, 8).is_bold());
    assert!(!style_at(&h, 0).is_bold());
}

#[test]
fn scan_extends_to_the_start_of_the_edited_range_line() {
    // The edit starts mid-line-one and ends on line two. Only the
    // start-side line extension reaches back to the `**` opener at 0; an
    // end-side-only extension would leave the pair unmatched.
    let mut h = highlighter();
    h.on_text_replaced(0..0, "**bold text\nmore");
    h.process_pending_edit();
    assert!(!style_at(&h, 2).is_bold());

    h.on_text_replaced(9..16, "y**\nz");
    h.process_pending_edit();
    assert_eq!(h.store().text(), "**bold tey**\nz");
    assert!(style_at(&h, 2).is_bold());
    assert!(!style_at(&h, 13).is_bold());
}

#[test]
fn attribute_only_edits_are_reprocessed() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "no markup here");
    h.process_pending_edit();

    let marked = StyleDescriptor {
        underline: true,
        ..Default::default()
    };
    h.on_attributes_set(3..9, &marked);
    // Host-set styling is visible immediately...
    assert!(style_at(&h, 4).underline);
    // ...and the next pass resets it back to base, since nothing in the
    // line carries underline markup.
    h.process_pending_edit();
    assert!(!style_at(&h, 4).underline);
}

#[test]
fn set_default_font_notifies_without_restyling() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "**a**");
    h.process_pending_edit();
    h.store_mut().take_changes();

    let bigger = FontSpec::new("Helvetica", 22.0);
    h.set_default_font(bigger.clone());

    // Whole-buffer attribute notification, no text change, no restyle yet.
    let changes = h.store_mut().take_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].range, 0..5);
    assert_eq!(changes[0].length_delta, 0);
    assert_ne!(
        style_at(&h, 0).font.as_ref().map(|f| f.point_size),
        Some(22.0)
    );

    // The new base lands on the next edit-processing pass.
    h.on_text_replaced(5..5, "!");
    h.process_pending_edit();
    assert_eq!(
        style_at(&h, 5).font.as_ref().map(|f| f.point_size),
        Some(22.0)
    );
}

#[test]
fn each_edit_cycle_is_one_batched_change() {
    let mut h = highlighter();
    h.on_text_replaced(0..0, "some **bold** and ~~struck~~ text");
    h.process_pending_edit();
    // One change for the splice, one for the entire restyling pass,
    // regardless of how many runs the pass touched.
    let changes = h.store_mut().take_changes();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].length_delta, 33);
    assert_eq!(changes[1].length_delta, 0);
}

#[test]
fn processing_without_a_pending_edit_is_a_no_op() {
    let mut h = highlighter();
    h.process_pending_edit();
    assert_eq!(h.store().text(), "");
    assert!(h.store_mut().take_changes().is_empty());
}
