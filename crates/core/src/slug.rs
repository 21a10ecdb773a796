//! URL-safe slug derivation.

use std::collections::HashSet;

/// Derives a URL-safe slug from a display name.
///
/// Lowercases, strips everything that is not an ASCII word character, a
/// whitespace character, or a hyphen, then collapses whitespace, underscore,
/// and hyphen runs into a single hyphen. Leading and trailing hyphens are
/// dropped. Total: never fails, empty input yields an empty slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_separator = true;
        }
        // Everything else (punctuation, non-ASCII) is stripped.
    }

    slug
}

/// Derives a slug from `name` that collides with none of `existing`.
///
/// Starts from [`slugify`] and appends `-1`, `-2`, ... until the candidate
/// is free; the first non-colliding suffix wins.
pub fn unique_slug<'a>(name: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    let base = slugify(name);

    if !taken.contains(base.as_str()) {
        return base;
    }

    let mut counter = 1u32;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_handles_punctuation_and_underscores() {
        assert_eq!(slugify("Hello, World!  foo_bar"), "hello-world-foo-bar");
    }

    #[test]
    fn slugify_trims_and_collapses_separators() {
        assert_eq!(slugify("  --The   Battle -- of_  Hastings--  "), "the-battle-of-hastings");
    }

    #[test]
    fn slugify_is_total_on_empty_and_symbol_only_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_is_idempotent() {
        for input in ["Hello, World!  foo_bar", "A  B--C", "already-a-slug", ""] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn unique_slug_returns_base_when_free() {
        assert_eq!(unique_slug("Test", ["other", "more"]), "test");
    }

    #[test]
    fn unique_slug_appends_first_free_suffix() {
        assert_eq!(unique_slug("Test", ["test", "test-1"]), "test-2");
    }

    #[test]
    fn unique_slug_skips_holes_in_order() {
        // Suffixes are tried in increasing order starting at 1.
        assert_eq!(unique_slug("Test", ["test", "test-2"]), "test-1");
    }
}
