//! Field validation shared by the entity crates.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Maximum length (in characters) of names.
pub const NAME_MAX_CHARS: usize = 2000;

/// Maximum length (in characters) of descriptions.
pub const DESCRIPTION_MAX_CHARS: usize = 10_000;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email regex is valid")
});

/// Non-empty name of at most [`NAME_MAX_CHARS`] characters.
pub fn name(field: &str, value: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    max_chars(field, value, NAME_MAX_CHARS)
}

/// Free text of at most [`DESCRIPTION_MAX_CHARS`] characters (may be empty).
pub fn description(field: &str, value: &str) -> DomainResult<()> {
    max_chars(field, value, DESCRIPTION_MAX_CHARS)
}

pub fn max_chars(field: &str, value: &str, max: usize) -> DomainResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> DomainResult<()> {
    if EMAIL_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(DomainError::validation(format!("{field} is not a valid email address")))
    }
}

/// Absolute http(s) URL with a host. Returns the normalized form.
pub fn http_url(field: &str, value: &str) -> DomainResult<String> {
    let parsed = Url::parse(value.trim())
        .map_err(|e| DomainError::validation(format!("{field} is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(DomainError::validation(format!(
            "{field} must be an http(s) URL with a host"
        )));
    }
    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_boundaries() {
        assert!(name("name", &"a".repeat(NAME_MAX_CHARS)).is_ok());
        assert!(name("name", &"a".repeat(NAME_MAX_CHARS + 1)).is_err());
        assert!(name("name", "").is_err());
        assert!(name("name", "   ").is_ok());
        // Characters, not bytes.
        assert!(name("name", &"é".repeat(NAME_MAX_CHARS)).is_ok());
    }

    #[test]
    fn description_may_be_empty_but_bounded() {
        assert!(description("description", "").is_ok());
        assert!(description("description", &"x".repeat(DESCRIPTION_MAX_CHARS)).is_ok());
        assert!(description("description", &"x".repeat(DESCRIPTION_MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn email_shapes() {
        let cases = [
            ("sales@acme.com", true),
            ("first.last+tag@mail.acme.co", true),
            ("acme.com", false),
            ("sales@acme", false),
            ("sales@@acme.com", false),
            ("", false),
        ];
        for (input, ok) in cases {
            assert_eq!(email("contact", input).is_ok(), ok, "{input}");
        }
    }

    #[test]
    fn url_must_be_http_with_host() {
        assert_eq!(
            http_url("url", "https://cdn.example.com/a.png").unwrap(),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(http_url("url", "HTTP://Example.com").unwrap(), "http://example.com/");
        assert!(http_url("url", "not a url").is_err());
        assert!(http_url("url", "ftp://example.com/a.png").is_err());
        assert!(http_url("url", "mailto:someone@example.com").is_err());
    }
}
