use rand::{rngs::OsRng, RngCore};

/// Key length in characters (20 random bytes, hex encoded).
pub const TOKEN_KEY_LEN: usize = 40;

/// Fresh opaque token key: 40 lowercase hex characters from the OS RNG.
pub fn generate_key() -> String {
    let mut bytes = [0u8; TOKEN_KEY_LEN / 2];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Cheap shape check before touching storage.
pub fn looks_like_key(candidate: &str) -> bool {
    candidate.len() == TOKEN_KEY_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_hex_and_distinct() {
        let a = generate_key();
        let b = generate_key();
        assert_eq!(a.len(), TOKEN_KEY_LEN);
        assert!(looks_like_key(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(!looks_like_key("short"));
        assert!(!looks_like_key(&"z".repeat(TOKEN_KEY_LEN)));
    }
}
