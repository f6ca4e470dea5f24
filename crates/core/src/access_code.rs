//! Four-digit event access codes typed into the check-in scanner.

use rand::Rng;

pub const ACCESS_CODE_LEN: usize = 4;

/// A random code such as `"0427"`. Leading zeros are kept.
pub fn generate() -> String {
    let n: u16 = rand::rng().random_range(0..10_000);
    format!("{n:04}")
}

/// Exactly four ASCII digits.
pub fn is_valid(code: &str) -> bool {
    code.len() == ACCESS_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Trim scanner input and check it.
pub fn normalize(raw: &str) -> Option<&str> {
    let code = raw.trim();
    is_valid(code).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_valid() {
        for _ in 0..200 {
            let code = generate();
            assert!(is_valid(&code), "{code}");
        }
    }

    #[test]
    fn validation() {
        assert!(is_valid("0000"));
        assert!(is_valid("9071"));
        assert!(!is_valid("123"));
        assert!(!is_valid("12345"));
        assert!(!is_valid("12a4"));
        assert!(!is_valid("١٢٣٤"));
        assert_eq!(normalize(" 4821\n"), Some("4821"));
        assert_eq!(normalize("48 21"), None);
    }
}
