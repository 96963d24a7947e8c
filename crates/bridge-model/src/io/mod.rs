pub mod auction_string;
pub mod deal_string;
pub mod hand_string;
pub mod json;
pub mod play_string;

use crate::error::{BridgeError, Result};

/// Reads the text between `chars[open]` and the matching `close` character.
///
/// Returns the text and the index just past the closing character. Nesting
/// is not supported; the first `close` ends the text.
pub(crate) fn read_bracketed(
    input: &str,
    chars: &[char],
    open: usize,
    close: char,
) -> Result<(String, usize)> {
    let start = open + 1;
    let end = chars[start.min(chars.len())..]
        .iter()
        .position(|&c| c == close)
        .map(|offset| start + offset)
        .ok_or_else(|| {
            BridgeError::parse(
                input,
                format!("{} opened at position {} is never closed", chars[open], open + 1),
            )
        })?;
    Ok((chars[start..end].iter().collect(), end + 1))
}

/// Explanations and annotations are written back between brackets, so
/// they cannot hold the closing bracket themselves.
pub(crate) fn check_bracketed(text: Option<&str>, close: char) -> Result<()> {
    match text {
        Some(text) if text.contains(close) => Err(BridgeError::parse(
            text,
            format!("text written between brackets cannot contain {close:?}"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bracketed() {
        let input = "1c(strong){alert}";
        let chars: Vec<char> = input.chars().collect();
        assert_eq!(
            read_bracketed(input, &chars, 2, ')'),
            Ok(("strong".to_string(), 10))
        );
        assert_eq!(
            read_bracketed(input, &chars, 10, '}'),
            Ok(("alert".to_string(), 17))
        );
    }

    #[test]
    fn test_check_bracketed() {
        assert_eq!(check_bracketed(None, ')'), Ok(()));
        assert_eq!(check_bracketed(Some("weak (6-10"), ')'), Ok(()));
        assert!(matches!(
            check_bracketed(Some("weak (6-10)"), ')'),
            Err(BridgeError::StringParse { .. })
        ));
        assert!(check_bracketed(Some("see {note}"), '}').is_err());
    }

    #[test]
    fn test_unterminated() {
        let input = "sa{test";
        let chars: Vec<char> = input.chars().collect();
        assert!(matches!(
            read_bracketed(input, &chars, 2, '}'),
            Err(BridgeError::StringParse { .. })
        ));
        let input = "p(";
        let chars: Vec<char> = input.chars().collect();
        assert!(read_bracketed(input, &chars, 1, ')').is_err());
    }
}
