/// Parses a path id. Valid ids are positive decimal integers without sign or
/// leading zeros, i.e. they match `^[1-9][0-9]*$`.
pub fn parse_id(raw: &str) -> Option<i64> {
    let mut chars = raw.chars();
    match chars.next() {
        Some('1'..='9') => {}
        _ => return None,
    }
    if !chars.all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert_eq!(parse_id("1"), Some(1));
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("9223372036854775807"), Some(i64::MAX));
    }

    #[test]
    fn test_invalid_ids() {
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("007"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("+1"), None);
        assert_eq!(parse_id("1a"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(" 1"), None);
        // Too large for i64
        assert_eq!(parse_id("9223372036854775808"), None);
    }
}
