/// Derives a URL-safe slug from a human-readable title.
///
/// The title is lower-cased, every maximal run of characters outside
/// `[a-z0-9]` becomes a single `-`, and leading/trailing hyphens are dropped.
///
/// ```
/// assert_eq!(sportdesk::model::slugify("5v5 Football Night!"), "5v5-football-night");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Returns `true` if `slug` is already in the shape [`slugify`] produces.
pub fn is_slug(slug: &str) -> bool {
    slugify(slug) == slug
}
