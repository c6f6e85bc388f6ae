use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// Compare a presented token with the configured one in constant time.
/// Both sides are hashed first so unequal lengths compare like any mismatch.
pub fn tokens_match(presented: &str, expected: &str) -> bool {
    digest(presented)[..].ct_eq(&digest(expected)[..]).into()
}

/// Short hex fingerprint of the configured token, safe to log.
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(&digest(token)[..4])
}
