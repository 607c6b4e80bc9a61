pub mod highlighter;

pub use highlighter::{MarkdownHighlighter, RAW_SENTINEL};
