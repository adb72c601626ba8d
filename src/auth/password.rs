use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Tag prefix for digests produced by the degraded-mode fallback, so `verify`
/// can dispatch on the digest itself instead of guessing the scheme.
const SHA256_PREFIX: &str = "$sha256$";

/// One-way hashing of passwords and reset codes.
///
/// Primary scheme is Argon2id with the parameters fixed at construction; the
/// PHC output string embeds them, so verification needs no external config.
/// If Argon2 ever errors, `hash` degrades to a tagged unsalted SHA-256 digest
/// rather than failing the operation.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Argon2id, 19 MiB memory, 2 iterations, parallelism 1.
    pub fn new() -> Self {
        let params = Params::new(19 * 1024, 2, 1, None).unwrap_or_default();
        Self { params }
    }

    /// Hash a secret. Never fails: on Argon2 error the digest degrades to the
    /// tagged SHA-256 fallback and a warning is logged.
    pub fn hash(&self, secret: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        match argon2.hash_password(secret.as_bytes(), &salt) {
            Ok(digest) => digest.to_string(),
            Err(e) => {
                tracing::warn!("Argon2 hashing failed, falling back to SHA-256 digest: {e}");
                sha256_digest(secret)
            }
        }
    }

    /// Verify a secret against a stored digest. Returns false for a mismatch
    /// or for any malformed/unrecognized digest; never errors.
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        if let Some(hex_digest) = digest.strip_prefix(SHA256_PREFIX) {
            return sha256_eq(secret, hex_digest);
        }

        // Digests written by the old fallback carry no tag, just bare hex.
        if digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return sha256_eq(secret, digest);
        }

        match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn sha256_digest(secret: &str) -> String {
    format!("{SHA256_PREFIX}{}", hex::encode(Sha256::digest(secret.as_bytes())))
}

fn sha256_eq(secret: &str, hex_digest: &str) -> bool {
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };
    let actual = Sha256::digest(secret.as_bytes());
    actual.as_slice().ct_eq(&expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hasher = CredentialHasher::new();
        let digest = hasher.hash("correct horse battery staple");
        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse battery staple", &digest));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let hasher = CredentialHasher::new();
        let digest = hasher.hash("hunter2");
        assert!(!hasher.verify("hunter3", &digest));
        assert!(!hasher.verify("Hunter2", &digest));
        assert!(!hasher.verify("", &digest));
    }

    #[test]
    fn no_length_cap_on_secrets() {
        // bcrypt truncates at 72 bytes; Argon2 must not.
        let hasher = CredentialHasher::new();
        let long = "x".repeat(100);
        let digest = hasher.hash(&long);
        assert!(hasher.verify(&long, &digest));
        assert!(!hasher.verify(&"x".repeat(72), &digest));
    }

    #[test]
    fn salts_differ_between_calls() {
        let hasher = CredentialHasher::new();
        assert_ne!(hasher.hash("same"), hasher.hash("same"));
    }

    #[test]
    fn verify_recognizes_tagged_sha256_fallback() {
        let hasher = CredentialHasher::new();
        let digest = sha256_digest("482913");
        assert!(digest.starts_with(SHA256_PREFIX));
        assert!(hasher.verify("482913", &digest));
        assert!(!hasher.verify("482914", &digest));
    }

    #[test]
    fn verify_recognizes_legacy_bare_hex_digest() {
        let hasher = CredentialHasher::new();
        let bare = hex::encode(Sha256::digest(b"legacy-secret"));
        assert_eq!(bare.len(), 64);
        assert!(hasher.verify("legacy-secret", &bare));
        assert!(!hasher.verify("other", &bare));
    }

    #[test]
    fn verify_returns_false_on_malformed_digest() {
        let hasher = CredentialHasher::new();
        assert!(!hasher.verify("secret", ""));
        assert!(!hasher.verify("secret", "not a digest"));
        assert!(!hasher.verify("secret", "$argon2id$garbage"));
        assert!(!hasher.verify("secret", "$sha256$zznothex"));
        assert!(!hasher.verify("secret", "$unknown$abcdef"));
    }
}
