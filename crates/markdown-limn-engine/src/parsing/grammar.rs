use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::error;

use crate::style::{Color, FontSpec, StyleDescriptor};

pub const BOLD_TOKEN: &str = "**";
pub const ITALIC_TOKEN: &str = "__";
pub const STRIKETHROUGH_TOKEN: &str = "~~";
pub const UNDERLINE_TOKEN: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    Bold,
    Italic,
    Strikethrough,
    Underline,
}

/// One recognized delimiter pair: a literal token that both opens and
/// closes, and the style it applies to the enclosed content.
///
/// The pattern is `(token)((?s:.+?))(token)`: non-greedy content of at
/// least one character, free to cross line breaks. `(?s:…)` keeps the
/// shortest-match scan from stopping at a newline, and the one-or-more
/// content requirement means two adjacent tokens (`****`) never match, so
/// the matching loop cannot produce zero-length matches.
#[derive(Debug)]
pub struct DelimiterRule {
    pub kind: DelimiterKind,
    pub token: &'static str,
    regex: Option<Regex>,
}

impl DelimiterRule {
    fn new(kind: DelimiterKind, token: &'static str) -> Self {
        let literal = regex::escape(token);
        let pattern = format!("({literal})((?s:.+?))({literal})");
        let regex = match Regex::new(&pattern) {
            Ok(regex) => Some(regex),
            Err(err) => {
                // The grammar is fixed and known-valid, so this is a
                // startup-only defect. The rule contributes no styling;
                // the remaining rules are unaffected.
                error!(%pattern, %err, "delimiter pattern failed to compile, rule disabled");
                None
            }
        };
        Self { kind, token, regex }
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// First occurrence of this rule in `hay`, with ranges reported in
    /// characters and offset by `base` (the character position of `hay`
    /// within the surrounding buffer). `None` when the rule is disabled or
    /// nothing matches.
    pub fn first_match(&self, hay: &str, base: usize) -> Option<DelimiterMatch> {
        let caps = self.regex.as_ref()?.captures(hay)?;
        let (full, open, content, close) =
            (caps.get(0)?, caps.get(1)?, caps.get(2)?, caps.get(3)?);
        let to_chars = |byte: usize| base + hay[..byte].chars().count();
        Some(DelimiterMatch {
            full: to_chars(full.start())..to_chars(full.end()),
            open: to_chars(open.start())..to_chars(open.end()),
            content: to_chars(content.start())..to_chars(content.end()),
            close: to_chars(close.start())..to_chars(close.end()),
        })
    }

    /// The style this rule applies, derived from the base font.
    ///
    /// `base_color` feeds the strikethrough rule only, and only in the
    /// one-shot rendering path; the incremental path passes `None`.
    pub fn style(&self, base_font: &FontSpec, base_color: Option<Color>) -> StyleDescriptor {
        match self.kind {
            DelimiterKind::Bold => StyleDescriptor {
                font: Some(base_font.with_traits(true, false)),
                ..Default::default()
            },
            DelimiterKind::Italic => StyleDescriptor {
                font: Some(base_font.with_traits(false, true)),
                ..Default::default()
            },
            DelimiterKind::Strikethrough => StyleDescriptor {
                strikethrough: true,
                foreground: base_color,
                ..Default::default()
            },
            DelimiterKind::Underline => StyleDescriptor {
                underline: true,
                ..Default::default()
            },
        }
    }
}

/// A located occurrence of a rule: the full extent plus the delimiter and
/// content sub-ranges, all in absolute character positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterMatch {
    pub full: Range<usize>,
    pub open: Range<usize>,
    pub content: Range<usize>,
    pub close: Range<usize>,
}

/// The fixed four-rule grammar. Declaration order is application order:
/// later rules merge onto ranges already styled by earlier ones.
#[derive(Debug)]
pub struct DelimiterGrammar {
    rules: [DelimiterRule; 4],
}

impl DelimiterGrammar {
    pub fn standard() -> &'static DelimiterGrammar {
        static GRAMMAR: OnceLock<DelimiterGrammar> = OnceLock::new();
        GRAMMAR.get_or_init(|| DelimiterGrammar {
            rules: [
                DelimiterRule::new(DelimiterKind::Bold, BOLD_TOKEN),
                DelimiterRule::new(DelimiterKind::Italic, ITALIC_TOKEN),
                DelimiterRule::new(DelimiterKind::Strikethrough, STRIKETHROUGH_TOKEN),
                DelimiterRule::new(DelimiterKind::Underline, UNDERLINE_TOKEN),
            ],
        })
    }

    pub fn rules(&self) -> &[DelimiterRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_standard_rules_compile() {
        for rule in DelimiterGrammar::standard().rules() {
            assert!(rule.regex().is_some(), "rule {:?} failed", rule.kind);
        }
    }

    #[test]
    fn content_is_non_greedy() {
        let rule = &DelimiterGrammar::standard().rules()[0];
        let m = rule.regex().unwrap().find("**a** and **b**").unwrap();
        assert_eq!(m.as_str(), "**a**");
    }

    #[test]
    fn content_may_cross_lines() {
        let rule = &DelimiterGrammar::standard().rules()[0];
        let m = rule.regex().unwrap().find("**a\nb**").unwrap();
        assert_eq!(m.as_str(), "**a\nb**");
    }

    #[test]
    fn first_match_reports_char_ranges() {
        let rule = &DelimiterGrammar::standard().rules()[0];
        let m = rule.first_match("é **ü** x", 10).unwrap();
        assert_eq!(m.full, 12..17);
        assert_eq!(m.open, 12..14);
        assert_eq!(m.content, 14..15);
        assert_eq!(m.close, 15..17);
    }

    #[test]
    fn empty_content_never_matches() {
        let rule = &DelimiterGrammar::standard().rules()[0];
        assert!(rule.regex().unwrap().find("****").is_none());
    }

    #[test]
    fn rule_order_is_bold_italic_strike_underline() {
        let kinds: Vec<_> = DelimiterGrammar::standard()
            .rules()
            .iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                DelimiterKind::Bold,
                DelimiterKind::Italic,
                DelimiterKind::Strikethrough,
                DelimiterKind::Underline,
            ]
        );
    }
}
