//! Forcing commit messages into valid UTF-8

use encoding_rs::{Encoding, UTF_8};

/// Decodes raw message bytes into a `String`, never failing
///
/// A declared non-UTF-8 encoding (the commit's `encoding` header) is
/// transcoded. Anything else is read as UTF-8 with invalid sequences replaced
/// by U+FFFD.
pub fn force_utf8(bytes: &[u8], declared: Option<&str>) -> String {
    if let Some(encoding) = declared.and_then(|label| Encoding::for_label(label.trim().as_bytes())) {
        if encoding != UTF_8 {
            let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
            if had_errors {
                log::debug!("Replaced undecodable {} sequences in commit message", encoding.name());
            }
            return text.into_owned();
        }
    }
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8_untouched() {
        assert_eq!(force_utf8("zażółć".as_bytes(), None), "zażółć");
    }

    #[test]
    fn test_declared_latin1_transcoded() {
        // "café" in ISO-8859-1
        let bytes = b"caf\xe9";
        assert_eq!(force_utf8(bytes, Some("ISO-8859-1")), "café");
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let text = force_utf8(b"fix \xff\xfe bug", None);
        assert!(text.starts_with("fix "));
        assert!(text.ends_with(" bug"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        assert_eq!(force_utf8(b"plain", Some("no-such-encoding")), "plain");
    }
}
