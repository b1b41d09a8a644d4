//! Derive, sign, recover, and agree on secrets with P-256 keys.
//!
//! This crate replaces the secp256k1 signing key of a wallet SDK with one over P-256 (secp256r1,
//! NIST prime256v1). It accepts raw key material from a keystore (or any other source) and hands
//! back [Signature]s and `0x`-prefixed hex public keys that the rest of the SDK consumes unchanged.
//!
//! Signatures are generated deterministically as specified in [RFC 6979](https://datatracker.ietf.org/doc/html/rfc6979)
//! and are always returned in canonical form (the `s` value is in the lower half of the curve order, as described
//! in [BIP 62](https://github.com/bitcoin/bips/blob/master/bip-0062.mediawiki#low-s-values-in-signatures)). The
//! recovery parameter needed to reconstruct the public key from `(digest, r, s)` accompanies every signature.
//!
//! No hashing is performed: digests are produced by the caller. A digest shorter than 32 bytes is
//! read as a big-endian integer (left-padded with zeros) and a longer one is truncated to its
//! leftmost 32 bytes.
//!
//! # Key Encodings
//!
//! | length | form |
//! |--------|------|
//! | 32 | private key (scalar) |
//! | 33 | compressed public key (`0x02`/`0x03` \|\| X) |
//! | 65 | uncompressed public key (`0x04` \|\| X \|\| Y) |
//!
//! No other length is accepted.
//!
//! # Example
//! ```rust
//! use newchain_signing_key::{compute_public_key, recover_public_key, SigningKey};
//!
//! // Load a private key
//! let signer = SigningKey::new(&[0x01; 32]).unwrap();
//!
//! // Sign a digest
//! let digest = [0x42; 32];
//! let signature = signer.sign_digest(&digest).unwrap();
//!
//! // Recover the signer
//! let recovered = recover_public_key(&digest, signature).unwrap();
//! assert_eq!(recovered, signer.public_key());
//! assert_eq!(recovered, compute_public_key(&[0x01; 32], false).unwrap());
//! ```
//!
//! # Status
//!
//! `newchain-signing-key` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

use thiserror::Error;

mod public_key;
pub use public_key::{
    compute_public_key, compute_public_key_bytes, recover_public_key, verify_digest,
};
mod signature;
pub use signature::{split_signature, Signature, SignatureLike};
mod signing_key;
pub use signing_key::SigningKey;

/// Name of the curve all keys are defined over.
pub const CURVE: &str = "p256";

/// Length of a private key (scalar).
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Length of a compressed public key (`Y-Parity || X`).
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;

/// Length of an uncompressed public key (`0x04 || X || Y`).
pub const PUBLIC_KEY_LENGTH: usize = 65;

/// Length a digest is normalized to before signing, recovery, or verification.
pub const DIGEST_LENGTH: usize = 32;

/// Length of a shared secret (the X coordinate of the ECDH point).
pub const SHARED_SECRET_LENGTH: usize = 32;

/// Length of a joined signature (`R || S || V`).
pub const SIGNATURE_LENGTH: usize = 65;

/// Length of a compact signature (`R || Y-Parity-And-S`).
pub const COMPACT_SIGNATURE_LENGTH: usize = 64;

/// Errors that can occur when working with P-256 keys and signatures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid private key")]
    InvalidKey,
    #[error("invalid public or private key")]
    InvalidKeyLength(usize),
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("invalid signature: {0}")]
    InvalidSignature(&'static str),
    #[error("invalid hex")]
    InvalidHex,
    #[error("point at infinity")]
    PointAtInfinity,
    #[error("signing failed")]
    SigningFailed,
    #[error("signature recovery failed")]
    SignatureRecovery,
}

/// Normalize a digest of any length to the width of the curve order.
///
/// Shorter digests are left-padded with zeros, longer digests keep their leftmost bytes.
fn normalize_digest(digest: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut normalized = [0u8; DIGEST_LENGTH];
    if digest.len() < DIGEST_LENGTH {
        normalized[DIGEST_LENGTH - digest.len()..].copy_from_slice(digest);
    } else {
        normalized.copy_from_slice(&digest[..DIGEST_LENGTH]);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use newchain_utils::{from_hex_formatted, hexlify};
    use rand::{rngs::OsRng, Rng};
    use sha2::{Digest, Sha256};

    fn digest(message: &[u8]) -> [u8; DIGEST_LENGTH] {
        Sha256::digest(message).into()
    }

    #[test]
    fn test_compression_round_trip() {
        for seed in 0..16 {
            let signer = SigningKey::from_seed(seed);
            let private_key = signer.to_bytes();
            let compressed = compute_public_key(private_key.as_slice(), true).unwrap();
            let compressed = from_hex_formatted(&compressed).unwrap();
            assert_eq!(
                compute_public_key(&compressed, false).unwrap(),
                compute_public_key(private_key.as_slice(), false).unwrap()
            );
        }
    }

    #[test]
    fn test_sign_and_recover() {
        let mut rng = OsRng;
        for _ in 0..16 {
            let signer = SigningKey::random(&mut rng);
            let mut digest = [0u8; DIGEST_LENGTH];
            rng.fill(&mut digest);

            // Signing is deterministic
            let signature = signer.sign_digest(&digest).unwrap();
            assert_eq!(signature, signer.sign_digest(&digest).unwrap());
            assert!(signature.is_canonical());

            // Recovery yields the uncompressed public key
            let recovered = recover_public_key(&digest, signature).unwrap();
            assert_eq!(
                recovered,
                compute_public_key(signer.to_bytes().as_slice(), false).unwrap()
            );
            assert!(verify_digest(
                &digest,
                &signature,
                &signer.compressed_public_key_bytes()
            ));
        }
    }

    #[test]
    fn test_recover_from_joined_signature() {
        let signer = SigningKey::from_seed(7);
        let digest = digest(b"hello world");
        let signature = signer.sign_digest(&digest).unwrap();

        // Joined form (r || s || v)
        let joined = signature.to_bytes().to_vec();
        assert_eq!(
            recover_public_key(&digest, joined).unwrap(),
            signer.public_key()
        );

        // Compact form (r || yParityAndS)
        let compact = signature.compact().to_vec();
        assert_eq!(
            recover_public_key(&digest, compact).unwrap(),
            signer.public_key()
        );
    }

    #[test]
    fn test_shared_secret_symmetry() {
        let alice = SigningKey::from_seed(1);
        let bob = SigningKey::from_seed(2);

        // Uncompressed, compressed, and private peer keys agree
        let expected = alice
            .compute_shared_secret(&bob.public_key_bytes())
            .unwrap();
        assert_eq!(
            expected,
            bob.compute_shared_secret(&alice.compressed_public_key_bytes())
                .unwrap()
        );
        assert_eq!(
            expected,
            alice
                .compute_shared_secret(bob.to_bytes().as_slice())
                .unwrap()
        );
        assert_eq!(
            hexlify(&expected),
            bob.shared_secret_hex(&alice.public_key_bytes()).unwrap()
        );
    }

    #[test]
    fn test_digest_lengths() {
        let signer = SigningKey::from_seed(0);
        for len in [0, 1, 20, 31, 33, 48, 64] {
            let digest = vec![0x11; len];
            let signature = signer.sign_digest(&digest).unwrap();
            assert!(signature.is_canonical());
            assert_eq!(
                recover_public_key(&digest, signature).unwrap(),
                signer.public_key()
            );
            assert!(verify_digest(&digest, &signature, &signer.public_key_bytes()));

            // Same signature as the normalized 32-byte digest
            let normalized = normalize_digest(&digest);
            assert_eq!(signature, signer.sign_digest(&normalized).unwrap());
        }
    }

    #[test]
    fn test_normalize_digest() {
        // Short digests are left-padded
        let mut expected = [0u8; DIGEST_LENGTH];
        expected[12..].copy_from_slice(&[0xab; 20]);
        assert_eq!(normalize_digest(&[0xab; 20]), expected);
        assert_eq!(normalize_digest(&[]), [0u8; DIGEST_LENGTH]);

        // Long digests keep their leftmost bytes
        let mut digest = vec![0x01; DIGEST_LENGTH];
        digest.extend_from_slice(&[0x02; DIGEST_LENGTH]);
        assert_eq!(normalize_digest(&digest), [0x01; DIGEST_LENGTH]);

        // A 64-byte digest signs like its first half
        let signer = SigningKey::from_seed(3);
        assert_eq!(
            signer.sign_digest(&digest).unwrap(),
            signer.sign_digest(&[0x01; DIGEST_LENGTH]).unwrap()
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidKeyLength(31).to_string(),
            "invalid public or private key"
        );
        assert_eq!(Error::InvalidKey.to_string(), "invalid private key");
        assert_eq!(
            Error::SignatureRecovery.to_string(),
            "signature recovery failed"
        );
    }
}
