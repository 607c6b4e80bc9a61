use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::style::{FontError, FontResolver, StyleDescriptor, combine};

/// A maximal range of characters sharing one effective style.
///
/// Ranges are half-open `[start, end)` and counted in characters (Unicode
/// scalar values), not bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub range: Range<usize>,
    pub style: StyleDescriptor,
}

/// A string plus an ordered run list.
///
/// Invariant: the runs are sorted, non-empty, adjacent-distinct and exactly
/// partition `0..char_len`, so every character has exactly one effective
/// style. All mutating operations restore this invariant before returning;
/// attribute writes follow paint-over semantics (last applied wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledText {
    text: String,
    char_len: usize,
    runs: Vec<Run>,
}

impl StyledText {
    pub fn new(text: &str, base: StyleDescriptor) -> Self {
        let char_len = text.chars().count();
        let runs = if char_len > 0 {
            vec![Run {
                range: 0..char_len,
                style: base,
            }]
        } else {
            Vec::new()
        };
        Self {
            text: text.to_string(),
            char_len,
            runs,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Byte offset of the character at `pos` (or the end of the string).
    pub(crate) fn byte_offset(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map_or(self.text.len(), |(b, _)| b)
    }

    /// Style at `pos` together with its maximal effective range.
    pub fn attributes_at(&self, pos: usize) -> Option<(&StyleDescriptor, Range<usize>)> {
        self.runs
            .iter()
            .find(|run| run.range.contains(&pos))
            .map(|run| (&run.style, run.range.clone()))
    }

    /// Overwrites the style of every character in `range`.
    pub fn set_attributes(&mut self, range: Range<usize>, style: &StyleDescriptor) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        self.split_at(range.start);
        self.split_at(range.end);
        for run in &mut self.runs {
            if run.range.start >= range.start && run.range.end <= range.end {
                run.style = style.clone();
            }
        }
        self.coalesce();
    }

    /// Merges `incoming` onto every run overlapping `range` via
    /// [`combine`]. A resolver failure aborts the merge mid-range and
    /// propagates.
    pub fn add_attributes(
        &mut self,
        range: Range<usize>,
        incoming: &StyleDescriptor,
        fonts: &dyn FontResolver,
    ) -> Result<(), FontError> {
        let range = self.clamp(range);
        if range.is_empty() {
            return Ok(());
        }
        self.split_at(range.start);
        self.split_at(range.end);
        for run in &mut self.runs {
            if run.range.start >= range.start && run.range.end <= range.end {
                run.style = combine(&run.style, incoming, fonts)?;
            }
        }
        self.coalesce();
        Ok(())
    }

    /// Removes the characters in `range`, shifting later runs left.
    pub fn delete_range(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let start_b = self.byte_offset(range.start);
        let end_b = self.byte_offset(range.end);
        self.text.replace_range(start_b..end_b, "");
        let removed = range.end - range.start;
        self.char_len -= removed;

        let shift = |pos: usize| {
            if pos <= range.start {
                pos
            } else if pos >= range.end {
                pos - removed
            } else {
                range.start
            }
        };
        for run in &mut self.runs {
            run.range = shift(run.range.start)..shift(run.range.end);
        }
        self.coalesce();
    }

    /// Inserts `text` at `pos` with the given style.
    pub fn insert(&mut self, pos: usize, text: &str, style: &StyleDescriptor) {
        if text.is_empty() {
            return;
        }
        let pos = pos.min(self.char_len);
        self.split_at(pos);
        let inserted = text.chars().count();
        let at = self.byte_offset(pos);
        self.text.insert_str(at, text);
        self.char_len += inserted;

        let mut index = self.runs.len();
        for (i, run) in self.runs.iter_mut().enumerate() {
            if run.range.start >= pos {
                index = index.min(i);
                run.range.start += inserted;
                run.range.end += inserted;
            }
        }
        self.runs.insert(
            index,
            Run {
                range: pos..pos + inserted,
                style: style.clone(),
            },
        );
        self.coalesce();
    }

    /// Splices `text` over `range`. The inserted characters inherit the
    /// style in effect at the splice point (the first replaced character,
    /// or the one before it at the end of the buffer).
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let range = self.clamp(range);
        let inherited = self.style_for_insert(range.start);
        self.delete_range(range.clone());
        self.insert(range.start, text, &inherited);
    }

    pub fn append(&mut self, text: &str, style: &StyleDescriptor) {
        self.insert(self.char_len, text, style);
    }

    /// The first `max` characters with their runs intact.
    #[must_use]
    pub fn truncated(&self, max: usize) -> StyledText {
        if max >= self.char_len {
            return self.clone();
        }
        let cut = self.byte_offset(max);
        let runs = self
            .runs
            .iter()
            .take_while(|run| run.range.start < max)
            .map(|run| Run {
                range: run.range.start..run.range.end.min(max),
                style: run.style.clone(),
            })
            .collect();
        StyledText {
            text: self.text[..cut].to_string(),
            char_len: max,
            runs,
        }
    }

    fn style_for_insert(&self, pos: usize) -> StyleDescriptor {
        self.attributes_at(pos)
            .or_else(|| pos.checked_sub(1).and_then(|p| self.attributes_at(p)))
            .map(|(style, _)| style.clone())
            .unwrap_or_default()
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let start = range.start.min(self.char_len);
        start..range.end.clamp(start, self.char_len)
    }

    /// Ensures a run boundary at `pos` (no-op at existing boundaries).
    fn split_at(&mut self, pos: usize) {
        if pos == 0 || pos >= self.char_len {
            return;
        }
        let Some(i) = self
            .runs
            .iter()
            .position(|run| run.range.start < pos && pos < run.range.end)
        else {
            return;
        };
        let tail = Run {
            range: pos..self.runs[i].range.end,
            style: self.runs[i].style.clone(),
        };
        self.runs[i].range.end = pos;
        self.runs.insert(i + 1, tail);
    }

    /// Drops empty runs and merges adjacent runs with equal styles.
    fn coalesce(&mut self) {
        self.runs.retain(|run| !run.range.is_empty());
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(last) if last.style == run.style && last.range.end == run.range.start => {
                    last.range.end = run.range.end;
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}
