//! Session token generation
//!
//! Tokens are 32 bytes from the OS random source encoded as URL-safe Base64
//! without padding (43 characters).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;

/// Length of the random part of the token in bytes
pub const TOKEN_RANDOM_BYTES: usize = 32;

/// Generate a new opaque session token
pub fn generate_token() -> String {
    let mut random_bytes = [0u8; TOKEN_RANDOM_BYTES];
    OsRng.fill_bytes(&mut random_bytes);
    URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_unique() {
        let token1 = generate_token();
        let token2 = generate_token();
        assert_ne!(token1, token2, "Generated tokens should be unique");
    }

    #[test]
    fn test_generate_token_length() {
        let token = generate_token();
        // base64(32 bytes) without padding = 43 chars
        assert_eq!(token.len(), 43);

        let decoded = URL_SAFE_NO_PAD.decode(&token).unwrap();
        assert_eq!(decoded.len(), TOKEN_RANDOM_BYTES);
    }

    #[test]
    fn test_generate_token_is_url_safe() {
        for _ in 0..100 {
            let token = generate_token();
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "Token contains non URL-safe characters: {}",
                token
            );
        }
    }
}
