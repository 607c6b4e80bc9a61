pub mod combine;
pub mod resolver;

pub use combine::{combine, derive_font};
pub use resolver::{FontError, FontResolver, PassthroughFonts};

use serde::{Deserialize, Serialize};

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A concrete font variant: family and size plus the two symbolic traits
/// the delimiter grammar can toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub point_size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, point_size: f32) -> Self {
        Self {
            family: family.into(),
            point_size,
            bold: false,
            italic: false,
        }
    }

    #[must_use]
    pub fn with_traits(&self, bold: bool, italic: bool) -> Self {
        Self {
            family: self.family.clone(),
            point_size: self.point_size,
            bold,
            italic,
        }
    }
}

/// The full set of attributes a run of text can carry.
///
/// `font: None` marks a style add-on (strikethrough/underline only) that
/// merges onto existing text without disturbing its font. This replaces the
/// open-ended attribute dictionary of classic styled-text storages with a
/// closed product type; every effective style is one of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub font: Option<FontSpec>,
    pub strikethrough: bool,
    pub underline: bool,
    pub foreground: Option<Color>,
}

impl StyleDescriptor {
    /// Base style for a document: a font plus an optional foreground color.
    pub fn base(font: FontSpec, foreground: Option<Color>) -> Self {
        Self {
            font: Some(font),
            foreground,
            ..Self::default()
        }
    }

    pub fn is_bold(&self) -> bool {
        self.font.as_ref().is_some_and(|f| f.bold)
    }

    pub fn is_italic(&self) -> bool {
        self.font.as_ref().is_some_and(|f| f.italic)
    }
}
