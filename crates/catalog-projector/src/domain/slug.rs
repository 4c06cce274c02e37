/// Lowercase the name, collapse runs of non-`[a-z0-9]` into a single `-`,
/// and trim leading/trailing dashes. Matches the `slug` column's
/// `[a-z0-9-]+` invariant; an all-punctuation name falls back to `untitled`
/// rather than producing an empty, invariant-violating string.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = false;

    for ch in name.chars().flat_map(|c| c.to_lowercase()) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_dash = false;
        } else if !last_was_dash && !slug.is_empty() {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}
