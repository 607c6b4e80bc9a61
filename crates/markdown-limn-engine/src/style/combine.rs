use super::{FontError, FontResolver, FontSpec, StyleDescriptor};

/// Resolves a concrete font variant from combined trait flags.
///
/// Family and size come from the more specific (incoming) side of a merge;
/// the trait flags are the OR of both sides. Pure given a resolvable family;
/// a [`FontError`] from the resolver propagates untouched.
pub fn derive_font(
    bold: bool,
    italic: bool,
    family: &str,
    point_size: f32,
    fonts: &dyn FontResolver,
) -> Result<FontSpec, FontError> {
    fonts.resolve(family, point_size, bold, italic)
}

/// Merges `incoming` attributes onto `existing`.
///
/// When both sides carry a font, bold/italic are OR'd and family/size are
/// taken from `incoming`. When `incoming` has no font it is a style add-on
/// and must not erase the existing font; its flags OR in and its color (if
/// any) wins. Commutative in the trait flags and idempotent.
pub fn combine(
    existing: &StyleDescriptor,
    incoming: &StyleDescriptor,
    fonts: &dyn FontResolver,
) -> Result<StyleDescriptor, FontError> {
    let font = match (&existing.font, &incoming.font) {
        (Some(current), Some(applied)) => Some(derive_font(
            current.bold || applied.bold,
            current.italic || applied.italic,
            &applied.family,
            applied.point_size,
            fonts,
        )?),
        (None, Some(applied)) => Some(applied.clone()),
        (current, None) => current.clone(),
    };

    Ok(StyleDescriptor {
        font,
        strikethrough: existing.strikethrough || incoming.strikethrough,
        underline: existing.underline || incoming.underline,
        foreground: incoming.foreground.or(existing.foreground),
    })
}
