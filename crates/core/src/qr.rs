//! Participant QR tokens.
//!
//! Each participant carries a random token; the QR code encodes
//! `{base_url}/verify-qr/{token}`. Scanners may hand back either that URL or
//! the bare token.

use rand::distr::Alphanumeric;
use rand::Rng;

pub const TOKEN_LEN: usize = 32;

const VERIFY_SEGMENT: &str = "/verify-qr/";

pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// URL encoded in the participant's QR code.
pub fn qr_url(base_url: &str, token: &str) -> String {
    format!("{}{VERIFY_SEGMENT}{token}", base_url.trim_end_matches('/'))
}

/// Pull a token out of scanner input. Query strings and fragments after the
/// token are ignored.
pub fn extract_token(scanned: &str) -> Option<&str> {
    let scanned = scanned.trim();
    let candidate = match scanned.rfind(VERIFY_SEGMENT) {
        Some(i) => {
            let rest = &scanned[i + VERIFY_SEGMENT.len()..];
            let end = rest.find(['?', '#', '/']).unwrap_or(rest.len());
            &rest[..end]
        }
        None => scanned,
    };
    is_valid_token(candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_well_formed_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert!(is_valid_token(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn url_round_trip() {
        let token = generate_token();
        let url = qr_url("https://app.example.com/", &token);
        assert_eq!(url, format!("https://app.example.com/verify-qr/{token}"));
        assert_eq!(extract_token(&url), Some(token.as_str()));
    }

    #[test]
    fn extraction_variants() {
        let token = "abcdefghijABCDEFGHIJ0123456789xy";
        assert_eq!(extract_token(token), Some(token));
        assert_eq!(extract_token(&format!("  {token}\n")), Some(token));
        assert_eq!(
            extract_token(&format!("http://x/api/verify-qr/{token}?src=scan")),
            Some(token)
        );
        assert_eq!(extract_token("http://x/verify-qr/short"), None);
        assert_eq!(extract_token("not a token"), None);
    }
}
