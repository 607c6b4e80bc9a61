pub mod grammar;
pub mod rewrite;

pub use grammar::{
    BOLD_TOKEN, DelimiterGrammar, DelimiterKind, DelimiterMatch, DelimiterRule, ITALIC_TOKEN,
    STRIKETHROUGH_TOKEN, UNDERLINE_TOKEN,
};
pub use rewrite::{ELLIPSIS, render, render_with};
