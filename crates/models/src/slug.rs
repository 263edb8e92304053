/// Lowercase ASCII slug: alphanumerics kept, runs of anything else become a
/// single `-`, no leading/trailing dashes. Truncated to 50 characters.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' && !out.is_empty() {
            if pending_dash {
                out.push('-');
                pending_dash = false;
            }
            out.push('_');
        } else {
            pending_dash = true;
        }
    }
    out.truncate(50);
    out.trim_end_matches('-').to_string()
}

/// A slug is non-empty and made of `[a-z0-9_-]` only.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 50
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Web Development"), "web-development");
        assert_eq!(slugify("  Social   Media -- Management! "), "social-media-management");
        assert_eq!(slugify("App_Dev 2"), "app_dev-2");
    }

    #[test]
    fn slugify_truncates() {
        let long = "a".repeat(80);
        assert_eq!(slugify(&long).len(), 50);
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("digital-marketing"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Has Space"));
    }
}
