use sha2::{Digest, Sha256};

/// Short, stable identifier for a token in log lines. The token itself is a
/// bearer credential and never gets logged.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_short_stable_and_distinct() {
        let a = fingerprint("header.payload.signature");
        assert_eq!(a.len(), 12);
        assert_eq!(a, fingerprint("header.payload.signature"));
        assert_ne!(a, fingerprint("header.payload.signaturf"));
        assert!(!a.contains("payload"));
    }
}
