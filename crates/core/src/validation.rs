//! Field validators shared by the service inputs.

use std::borrow::Cow;

use validator::ValidationError;

/// Longest accepted post or comment body, in characters.
pub const MAX_CONTENT_CHARS: usize = 280;

/// Longest accepted GIF URL.
pub const MAX_GIF_URL_LEN: usize = 2048;

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Line breaks and tabs are the only control characters allowed in body text.
fn is_disallowed_control(c: char) -> bool {
    c.is_control() && !matches!(c, '\n' | '\r' | '\t')
}

/// Body text must contain something other than whitespace, be at most
/// [`MAX_CONTENT_CHARS`] characters and hold no control characters other
/// than line breaks and tabs.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(error("required", "Content is required"));
    }
    if content.chars().any(is_disallowed_control) {
        return Err(error("chars", "Content contains invalid characters"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(error(
            "length",
            format!("Content must be at most {MAX_CONTENT_CHARS} characters"),
        ));
    }
    Ok(())
}

/// GIF URLs must be absolute `http` or `https` URLs.
///
/// The URL is stored as sent, so control characters the URL parser would
/// strip or escape are rejected up front.
pub fn validate_gif_url(gif_url: &str) -> Result<(), ValidationError> {
    if gif_url.len() > MAX_GIF_URL_LEN {
        return Err(error(
            "length",
            format!("GIF URL must be at most {MAX_GIF_URL_LEN} characters"),
        ));
    }
    if gif_url.chars().any(char::is_control) {
        return Err(error("url", "GIF URL must be an http or https URL"));
    }
    match url::Url::parse(gif_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(error("url", "GIF URL must be an http or https URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_boundaries() {
        assert!(validate_content("hello").is_ok());
        assert!(validate_content(&"a".repeat(280)).is_ok());
        assert!(validate_content(&"a".repeat(281)).is_err());
        assert!(validate_content("").is_err());
        assert!(validate_content(" \n\t ").is_err());
    }

    #[test]
    fn test_content_control_characters() {
        assert!(validate_content("a\u{0}b").is_err());
        assert!(validate_content("bell\u{7}").is_err());
        assert!(validate_content("line one\nline two\r\n\tindented").is_ok());
    }

    #[test]
    fn test_content_counts_characters_not_bytes() {
        assert!(validate_content(&"é".repeat(280)).is_ok());
    }

    #[test]
    fn test_gif_url() {
        assert!(validate_gif_url("https://media.example.com/a.gif").is_ok());
        assert!(validate_gif_url("http://media.example.com/a.gif").is_ok());
        assert!(validate_gif_url("javascript:alert(1)").is_err());
        assert!(validate_gif_url("not a url").is_err());
        assert!(validate_gif_url("https://media.example.com/a\u{0}.gif").is_err());
        assert!(validate_gif_url("https://media.example.com/\ta.gif").is_err());
        let long = format!("https://example.com/{}", "a".repeat(MAX_GIF_URL_LEN));
        assert!(validate_gif_url(&long).is_err());
    }
}
