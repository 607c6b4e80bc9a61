pub mod editing;
pub mod parsing;
pub mod style;
pub mod text;

// Re-export key types for easier usage
pub use editing::{MarkdownHighlighter, RAW_SENTINEL};
pub use parsing::{DelimiterGrammar, ELLIPSIS, render, render_with};
pub use style::{
    Color, FontError, FontResolver, FontSpec, PassthroughFonts, StyleDescriptor, combine,
    derive_font,
};
pub use text::{ChangeNotification, Run, StyledBuffer, StyledText, TextStore};
