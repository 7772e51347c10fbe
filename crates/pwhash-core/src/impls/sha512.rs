//! SHA-512 digest, standard base64 encoded.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha512};

use crate::ports::{DigestError, Digester};

/// Default digester: `base64(sha512(utf8 bytes))`, 88 characters with padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512Base64;

impl Digester for Sha512Base64 {
    fn digest(&self, input: &str) -> Result<String, DigestError> {
        let hash = Sha512::digest(input.as_bytes());
        Ok(BASE64.encode(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        let digest = Sha512Base64.digest("angryMonkey").unwrap();
        assert_eq!(
            digest,
            "ZEHhWB65gUlzdVwtDQArEyx+KVLzp/aTaRaPlBzYRIFj6vjFdqEb0Q5B8zVKCZ0vKbZPZklJz0Fd7su2A+gf7Q=="
        );
    }

    #[test]
    fn output_length_is_fixed() {
        for input in ["", "a", "pass0", &"x".repeat(1000)] {
            assert_eq!(Sha512Base64.digest(input).unwrap().len(), 88);
        }
    }

    #[test]
    fn deterministic() {
        let a = Sha512Base64.digest("secret").unwrap();
        let b = Sha512Base64.digest("secret").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Sha512Base64.digest("Secret").unwrap());
    }
}
