//! Secret preview masking.
//!
//! Integration secrets are never returned by the API. List and detail
//! responses carry a masked preview instead, produced here so every
//! surface renders the same shape.

/// Preview shown when a stored secret cannot be decrypted.
///
/// Deliberately indistinguishable from a masked 8-character secret: a
/// corrupt row should not advertise itself to API consumers.
pub const DECODE_FAILURE_PREVIEW: &str = "********";

/// Number of leading characters left visible in a preview.
const VISIBLE_PREFIX: usize = 4;

/// Number of trailing characters left visible in a preview.
const VISIBLE_SUFFIX: usize = 4;

/// Mask a plaintext secret for display.
///
/// Secrets longer than eight characters keep their first and last four
/// characters with the middle replaced by `*`; anything of eight
/// characters or fewer is fully masked. Counting is per character, not
/// per byte.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= VISIBLE_PREFIX + VISIBLE_SUFFIX {
        return "*".repeat(len);
    }

    let prefix: String = secret.chars().take(VISIBLE_PREFIX).collect();
    let suffix: String = secret
        .chars()
        .skip(len - VISIBLE_SUFFIX)
        .collect();
    let masked = "*".repeat(len - VISIBLE_PREFIX - VISIBLE_SUFFIX);

    format!("{prefix}{masked}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_secret_keeps_edges() {
        assert_eq!(mask_secret("sk-1234567890abcd"), "sk-1*********abcd");
    }

    #[test]
    fn test_short_secret_fully_masked() {
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret("12345678"), "********");
    }

    #[test]
    fn test_nine_chars_is_the_first_partial_mask() {
        assert_eq!(mask_secret("123456789"), "1234*6789");
    }

    #[test]
    fn test_empty_secret() {
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 9 characters, some multi-byte
        assert_eq!(mask_secret("ключ-1234"), "ключ*1234");
    }

    #[test]
    fn test_decode_failure_preview_is_eight_stars() {
        assert_eq!(DECODE_FAILURE_PREVIEW, "********");
    }
}
