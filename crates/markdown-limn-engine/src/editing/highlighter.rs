use std::ops::Range;

use tracing::warn;

use crate::parsing::grammar::DelimiterGrammar;
use crate::style::{FontSpec, StyleDescriptor};
use crate::text::{ChangeNotification, TextStore};

/// A buffer whose text starts with this sentinel is raw: it gets the base
/// style reset but no delimiter styling. Re-evaluated from the literal
/// buffer content on every pass, so removing the prefix re-enables styling
/// on the next edit.
pub const RAW_SENTINEL: &str = "@@";

/// Incremental re-highlighter over a host-owned styled-text buffer.
///
/// Unlike the one-shot rewriter, this never removes delimiter characters:
/// the raw markup stays visible and editable, and each edit restyles only a
/// line-aligned superset of the touched range. The host forwards edits via
/// [`on_text_replaced`]/[`on_attributes_set`] and drives restyling through
/// [`process_pending_edit`] in its own edit cycle.
///
/// [`on_text_replaced`]: MarkdownHighlighter::on_text_replaced
/// [`on_attributes_set`]: MarkdownHighlighter::on_attributes_set
/// [`process_pending_edit`]: MarkdownHighlighter::process_pending_edit
pub struct MarkdownHighlighter<S: TextStore> {
    store: S,
    default_font: FontSpec,
    pending: Option<ChangeNotification>,
}

impl<S: TextStore> MarkdownHighlighter<S> {
    pub fn new(store: S, default_font: FontSpec) -> Self {
        Self {
            store,
            default_font,
            pending: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn default_font(&self) -> &FontSpec {
        &self.default_font
    }

    /// Splices `text` over `range` and records the change for the next
    /// [`process_pending_edit`](Self::process_pending_edit) pass.
    pub fn on_text_replaced(&mut self, range: Range<usize>, text: &str) {
        self.store.begin_editing();
        self.store.replace_characters(range.clone(), text);
        self.store.end_editing();
        let inserted = text.chars().count();
        self.pending = Some(ChangeNotification {
            range: range.start..range.start + inserted,
            length_delta: inserted as isize - (range.end - range.start) as isize,
        });
    }

    /// Directly overwrites attributes for `range` without any parsing, for
    /// the host's non-markdown styling needs. Zero length delta.
    pub fn on_attributes_set(&mut self, range: Range<usize>, style: &StyleDescriptor) {
        self.store.begin_editing();
        self.store.set_attributes(range.clone(), style);
        self.store.end_editing();
        self.pending = Some(ChangeNotification {
            range,
            length_delta: 0,
        });
    }

    /// Replaces the base font and notifies the host that every attribute in
    /// the buffer is stale. Does not restyle; that happens lazily on the
    /// next edit-processing pass.
    pub fn set_default_font(&mut self, font: FontSpec) {
        self.default_font = font;
        let len = self.store.char_len();
        self.store.note_attributes_changed(0..len);
    }

    /// Consumes the most recent change and recomputes styling for a
    /// line-aligned superset of it.
    ///
    /// The scan range is the union of the changed range with the full line
    /// containing its start and the full line containing its end, so a
    /// delimiter pair split across the edit boundary is still matched in
    /// full, and untouched lines are never restyled. The range is reset to
    /// the base style first; unless the buffer is raw (see
    /// [`RAW_SENTINEL`]), each grammar rule is then re-applied within the
    /// scan range only, styling full matches *including* their delimiters.
    /// One character immediately after each match is reset to base to keep
    /// trailing attributes from bleeding into what follows.
    ///
    /// All mutations happen inside one `begin_editing`/`end_editing` batch.
    pub fn process_pending_edit(&mut self) {
        let Some(change) = self.pending.take() else {
            return;
        };
        let text = self.store.text().to_string();
        let chars: Vec<char> = text.chars().collect();
        let scan = scan_range(&chars, &change.range);

        self.store.begin_editing();
        self.reset_to_base(scan.clone());
        if !text.starts_with(RAW_SENTINEL) {
            self.apply_rules(&text, &scan);
        }
        self.store.end_editing();
    }

    fn apply_rules(&mut self, text: &str, scan: &Range<usize>) {
        let end_b = byte_offset(text, scan.end);

        for rule in DelimiterGrammar::standard().rules() {
            let style = rule.style(&self.default_font, None);
            let mut pos = scan.start;
            while pos < scan.end {
                let start_b = byte_offset(text, pos);
                let Some(m) = rule.first_match(&text[start_b..end_b], pos) else {
                    break;
                };
                if let Err(err) = self.store.add_attributes(m.full.clone(), &style) {
                    // One rule's failure must not block the others.
                    warn!(kind = ?rule.kind, %err, "styling failed, rule skipped for this pass");
                    break;
                }
                if m.full.end < self.store.char_len() {
                    self.reset_to_base(m.full.end..m.full.end + 1);
                }
                pos = m.full.end;
            }
        }
    }

    /// Resets `range` to the base style: default font, strikethrough and
    /// underline off. Other attributes (foreground color) are preserved,
    /// matching set-over-effective-run semantics.
    fn reset_to_base(&mut self, range: Range<usize>) {
        let mut pos = range.start;
        while pos < range.end {
            let Some((style, effective)) = self.store.attributes_at(pos) else {
                break;
            };
            let end = effective.end.min(range.end);
            let reset = StyleDescriptor {
                font: Some(self.default_font.clone()),
                strikethrough: false,
                underline: false,
                foreground: style.foreground,
            };
            self.store.set_attributes(pos..end, &reset);
            pos = end;
        }
    }
}

/// Line-aligned superset of the changed range: the union of the range with
/// the full line containing its start and the full line containing its end.
/// A line runs from just past the previous `\n` through its own trailing
/// `\n` (inclusive), or to the end of the buffer.
fn scan_range(chars: &[char], changed: &Range<usize>) -> Range<usize> {
    let start = changed.start.min(chars.len());
    let end = changed.end.min(chars.len());
    let start_line = line_range(chars, start);
    let end_line = line_range(chars, end);
    start_line.start.min(start)..end_line.end.max(end)
}

fn line_range(chars: &[char], pos: usize) -> Range<usize> {
    let pos = pos.min(chars.len());
    let mut start = pos;
    while start > 0 && chars[start - 1] != '\n' {
        start -= 1;
    }
    let mut end = pos;
    while end < chars.len() {
        end += 1;
        if chars[end - 1] == '\n' {
            break;
        }
    }
    start..end
}

fn byte_offset(text: &str, pos: usize) -> usize {
    text.char_indices()
        .nth(pos)
        .map_or(text.len(), |(b, _)| b)
}
