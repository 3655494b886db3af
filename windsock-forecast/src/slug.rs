/// Reserved slug for the page holding the forecast's current conditions.
pub const CURRENT_SLUG: &str = "current";

/// Lower-case `name` and collapse every run of characters other than letters
/// and ASCII digits into a single hyphen, trimming hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_alphabetic() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
