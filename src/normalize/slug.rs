/// Turn arbitrary text into a URL slug (`[a-z0-9-]`, no edge or repeated
/// hyphens). Idempotent.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_hyphen = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        }
        // anything else is dropped without breaking the current word
    }
    slug
}

/// Slug for a create/update payload: an explicit slug wins over the
/// fallback text (usually the entity name). `None` when nothing usable
/// remains.
pub fn resolve_slug(explicit: Option<&str>, fallback: &str) -> Option<String> {
    let candidate = explicit
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(fallback));
    (!candidate.is_empty()).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_mixed_text() {
        assert_eq!(slugify("Hello, World!  Foo_Bar"), "hello-world-foo-bar");
        assert_eq!(slugify("  Central Lab  "), "central-lab");
        assert_eq!(slugify("--a---b--"), "a-b");
        assert_eq!(slugify("X-Ray & MRI Unit"), "x-ray-mri-unit");
        assert_eq!(slugify("Lab 2024"), "lab-2024");
    }

    #[test]
    fn non_ascii_only_is_empty() {
        assert_eq!(slugify("مختبر"), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn is_idempotent() {
        for input in [
            "Hello, World!  Foo_Bar",
            "  already-a-slug ",
            "Ünïcödé Text",
            "a__b  c--d",
            "___",
            "Lab مختبر 3",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn resolves_explicit_then_fallback() {
        assert_eq!(resolve_slug(Some("Custom Slug"), "Name"), Some("custom-slug".into()));
        assert_eq!(resolve_slug(Some("مختبر"), "Name Here"), Some("name-here".into()));
        assert_eq!(resolve_slug(None, "Name Here"), Some("name-here".into()));
        assert_eq!(resolve_slug(None, "مختبر"), None);
    }
}
