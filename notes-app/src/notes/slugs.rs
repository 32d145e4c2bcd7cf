//! Slug assignment for notes.

pub const SLUG_MAX_LENGTH: usize = 100;

/// Used when a title has nothing that survives transliteration.
pub const FALLBACK_SLUG: &str = "untitled";

/// Transliterates the title to ASCII and joins its words with hyphens,
/// e.g. `Заголовок заметки` becomes `zagolovok-zametki`.
pub fn slugify(title: &str) -> String {
    let slug = ::slug::slugify(title);
    let truncated: String = slug.chars().take(SLUG_MAX_LENGTH).collect();
    let truncated = truncated.trim_end_matches('-');

    if truncated.is_empty() {
        return FALLBACK_SLUG.into();
    }
    truncated.into()
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= SLUG_MAX_LENGTH
        && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// The explicit slug when one was given, otherwise one derived from the title.
pub fn assign_slug(title: &str, slug: Option<&str>) -> String {
    match non_blank(slug) {
        Some(slug) => slug.to_owned(),
        None => slugify(title),
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
