use subtle::ConstantTimeEq;

/// Header Telegram uses to echo back the `secret_token` given to `setWebhook`.
pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Check an inbound secret header against the configured secret.
///
/// Absent or empty headers never match. The byte comparison runs in constant
/// time for equal-length inputs; a length mismatch returns early, which only
/// reveals the secret's length.
pub fn validate(header_value: Option<&str>, configured_secret: &str) -> bool {
    let provided = match header_value {
        Some(v) if !v.is_empty() => v,
        _ => return false,
    };
    if configured_secret.is_empty() {
        return false;
    }

    provided
        .as_bytes()
        .ct_eq(configured_secret.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_secret() {
        assert!(validate(Some("s3cret"), "s3cret"));
        let long = "a_".repeat(128);
        assert!(validate(Some(&long), &long));
    }

    #[test]
    fn test_absent_or_empty_header() {
        assert!(!validate(None, "s3cret"));
        assert!(!validate(Some(""), "s3cret"));
    }

    #[test]
    fn test_empty_configured_secret_never_matches() {
        assert!(!validate(Some(""), ""));
        assert!(!validate(Some("x"), ""));
    }

    #[test]
    fn test_any_differing_byte_fails() {
        let secret = "abcdef";
        for i in 0..secret.len() {
            let mut bytes = secret.as_bytes().to_vec();
            bytes[i] = b'Z';
            let altered = String::from_utf8(bytes).unwrap();
            assert!(!validate(Some(&altered), secret), "byte {i}");
        }
    }

    #[test]
    fn test_length_mismatch_fails() {
        assert!(!validate(Some("abc"), "abcd"));
        assert!(!validate(Some("abcd"), "abc"));
        assert!(!validate(Some("wrong_secret"), "s3cret"));
    }
}
