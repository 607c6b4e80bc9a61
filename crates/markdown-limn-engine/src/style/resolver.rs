use super::FontSpec;

/// The requested family has no face for the requested trait combination.
///
/// Silently dropping a bold/italic request would corrupt the visual
/// contract, so resolution failures always surface as this error rather
/// than falling back to the plain face.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("font family `{family}` has no face with bold={bold}, italic={italic}")]
pub struct FontError {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

/// Seam to the host font system.
///
/// The engine never materializes real font objects; it asks the host to
/// confirm that a (family, size, traits) combination exists and to hand back
/// the [`FontSpec`] it will render with.
pub trait FontResolver {
    fn resolve(
        &self,
        family: &str,
        point_size: f32,
        bold: bool,
        italic: bool,
    ) -> Result<FontSpec, FontError>;
}

/// Resolver for hosts without a font registry: every combination resolves
/// to itself. Also the default for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFonts;

impl FontResolver for PassthroughFonts {
    fn resolve(
        &self,
        family: &str,
        point_size: f32,
        bold: bool,
        italic: bool,
    ) -> Result<FontSpec, FontError> {
        Ok(FontSpec {
            family: family.to_string(),
            point_size,
            bold,
            italic,
        })
    }
}
