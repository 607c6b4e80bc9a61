use std::ops::Range;

use crate::style::{FontError, FontResolver, PassthroughFonts, StyleDescriptor};
use crate::text::styled::StyledText;

/// What changed in a styled-text store: the affected character range in the
/// post-edit buffer and how much the buffer grew or shrank. Attribute-only
/// changes carry a zero delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    pub range: Range<usize>,
    pub length_delta: isize,
}

/// The capability set the styling engine needs from an externally owned
/// styled-text buffer. Implemented by the host's text-view/document layer;
/// [`StyledBuffer`] is the in-memory reference implementation.
///
/// Mutations between `begin_editing` and `end_editing` must be observable
/// only as a single batched change once the outermost scope closes.
pub trait TextStore {
    /// Style at `location` plus its maximal effective range.
    fn attributes_at(&self, location: usize) -> Option<(StyleDescriptor, Range<usize>)>;

    /// Splices `text` over `range` and emits a length-delta-aware change.
    fn replace_characters(&mut self, range: Range<usize>, text: &str);

    /// Overwrites attributes for `range` (sets, does not merge).
    fn set_attributes(&mut self, range: Range<usize>, style: &StyleDescriptor);

    /// Merges attributes onto `range` with style-combination semantics.
    fn add_attributes(
        &mut self,
        range: Range<usize>,
        style: &StyleDescriptor,
    ) -> Result<(), FontError>;

    fn begin_editing(&mut self);

    fn end_editing(&mut self);

    /// Records an attribute-only change without touching text or styles,
    /// e.g. when the default font changes and the host must re-render.
    fn note_attributes_changed(&mut self, range: Range<usize>);

    fn text(&self) -> &str;

    fn char_len(&self) -> usize {
        self.text().chars().count()
    }
}

/// In-memory [`TextStore`] backed by a [`StyledText`], with nested edit
/// batching and a change log the host can drain after each edit cycle.
pub struct StyledBuffer {
    content: StyledText,
    fonts: Box<dyn FontResolver>,
    edit_depth: usize,
    batched: Option<ChangeNotification>,
    changes: Vec<ChangeNotification>,
}

impl StyledBuffer {
    pub fn new(base: StyleDescriptor) -> Self {
        Self::with_resolver(base, Box::new(PassthroughFonts))
    }

    pub fn with_resolver(base: StyleDescriptor, fonts: Box<dyn FontResolver>) -> Self {
        Self {
            content: StyledText::new("", base),
            fonts,
            edit_depth: 0,
            batched: None,
            changes: Vec::new(),
        }
    }

    pub fn content(&self) -> &StyledText {
        &self.content
    }

    /// Drains the change log accumulated since the last call.
    pub fn take_changes(&mut self) -> Vec<ChangeNotification> {
        std::mem::take(&mut self.changes)
    }

    fn record(&mut self, range: Range<usize>, length_delta: isize) {
        if self.edit_depth == 0 {
            self.changes.push(ChangeNotification {
                range,
                length_delta,
            });
            return;
        }
        let merged = match self.batched.take() {
            Some(prior) => ChangeNotification {
                range: prior.range.start.min(range.start)..prior.range.end.max(range.end),
                length_delta: prior.length_delta + length_delta,
            },
            None => ChangeNotification {
                range,
                length_delta,
            },
        };
        self.batched = Some(merged);
    }
}

impl TextStore for StyledBuffer {
    fn attributes_at(&self, location: usize) -> Option<(StyleDescriptor, Range<usize>)> {
        self.content
            .attributes_at(location)
            .map(|(style, range)| (style.clone(), range))
    }

    fn replace_characters(&mut self, range: Range<usize>, text: &str) {
        let inserted = text.chars().count();
        let len = self.content.char_len();
        let removed = range.end.min(len) - range.start.min(len);
        self.content.replace_range(range.clone(), text);
        self.record(
            range.start..range.start + inserted,
            inserted as isize - removed as isize,
        );
    }

    fn set_attributes(&mut self, range: Range<usize>, style: &StyleDescriptor) {
        self.content.set_attributes(range.clone(), style);
        self.record(range, 0);
    }

    fn add_attributes(
        &mut self,
        range: Range<usize>,
        style: &StyleDescriptor,
    ) -> Result<(), FontError> {
        self.content
            .add_attributes(range.clone(), style, self.fonts.as_ref())?;
        self.record(range, 0);
        Ok(())
    }

    fn begin_editing(&mut self) {
        self.edit_depth += 1;
    }

    fn end_editing(&mut self) {
        debug_assert!(self.edit_depth > 0, "end_editing without begin_editing");
        self.edit_depth = self.edit_depth.saturating_sub(1);
        if self.edit_depth == 0
            && let Some(batched) = self.batched.take()
        {
            self.changes.push(batched);
        }
    }

    fn note_attributes_changed(&mut self, range: Range<usize>) {
        self.record(range, 0);
    }

    fn text(&self) -> &str {
        self.content.text()
    }

    fn char_len(&self) -> usize {
        self.content.char_len()
    }
}
