//! A P-256 private key and the public keys derived from it.

use crate::{
    compute_public_key_bytes, normalize_digest, public_key::parse_public_key, Error, Signature,
    COMPRESSED_PUBLIC_KEY_LENGTH, CURVE, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH,
    SHARED_SECRET_LENGTH,
};
use newchain_utils::{from_hex_formatted, hexlify};
use p256::{
    ecdh::diffie_hellman,
    ecdsa::SigningKey as EcdsaSigningKey,
    elliptic_curve::sec1::ToEncodedPoint,
    ProjectivePoint, PublicKey,
};
use rand::{CryptoRng, Rng, SeedableRng};
use std::{
    any::Any,
    fmt::{Debug, Formatter},
    str::FromStr,
};
use zeroize::Zeroizing;

/// A P-256 key pair.
///
/// The public key is derived once, at construction, and never changes. Both public encodings
/// (uncompressed and compressed) describe the same point.
#[derive(Clone)]
pub struct SigningKey {
    key: EcdsaSigningKey,
    public_key: [u8; PUBLIC_KEY_LENGTH],
    compressed_public_key: [u8; COMPRESSED_PUBLIC_KEY_LENGTH],
}

impl SigningKey {
    /// Create a [SigningKey] from a 32-byte big-endian scalar.
    ///
    /// Returns [Error::InvalidKey] if the input is not 32 bytes or is not in `[1, n)`.
    pub fn new(private_key: &[u8]) -> Result<Self, Error> {
        let private_key: &[u8; PRIVATE_KEY_LENGTH] =
            private_key.try_into().map_err(|_| Error::InvalidKey)?;
        let key = EcdsaSigningKey::from_bytes(private_key.into()).map_err(|_| Error::InvalidKey)?;
        Ok(Self::from_key(key))
    }

    /// Create a fresh [SigningKey] using the supplied RNG.
    pub fn random<R: CryptoRng + Rng>(rng: &mut R) -> Self {
        Self::from_key(EcdsaSigningKey::random(rng))
    }

    /// Create a [SigningKey] from a seed.
    ///
    /// # Warning
    ///
    /// This function is insecure and should only be used for examples
    /// and testing.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::random(&mut rng)
    }

    fn from_key(key: EcdsaSigningKey) -> Self {
        let verifier = key.verifying_key();

        let mut public_key = [0u8; PUBLIC_KEY_LENGTH];
        public_key.copy_from_slice(verifier.to_encoded_point(false).as_bytes());
        let mut compressed_public_key = [0u8; COMPRESSED_PUBLIC_KEY_LENGTH];
        compressed_public_key.copy_from_slice(verifier.to_encoded_point(true).as_bytes());

        Self {
            key,
            public_key,
            compressed_public_key,
        }
    }

    /// Returns true if `value` is a [SigningKey].
    pub fn is_signing_key(value: &dyn Any) -> bool {
        value.is::<SigningKey>()
    }

    /// Name of the curve this key is defined over.
    pub fn curve(&self) -> &'static str {
        CURVE
    }

    /// Returns the private key as a `0x`-prefixed hex string.
    pub fn private_key(&self) -> Zeroizing<String> {
        Zeroizing::new(hexlify(self.to_bytes().as_slice()))
    }

    /// Returns the raw private key.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LENGTH]> {
        Zeroizing::new(self.key.to_bytes().into())
    }

    /// Returns the uncompressed public key as a `0x`-prefixed hex string.
    pub fn public_key(&self) -> String {
        hexlify(&self.public_key)
    }

    /// Returns the compressed public key as a `0x`-prefixed hex string.
    pub fn compressed_public_key(&self) -> String {
        hexlify(&self.compressed_public_key)
    }

    /// Returns the uncompressed public key (`0x04 || X || Y`).
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.public_key
    }

    /// Returns the compressed public key (`Y-Parity || X`).
    pub fn compressed_public_key_bytes(&self) -> [u8; COMPRESSED_PUBLIC_KEY_LENGTH] {
        self.compressed_public_key
    }

    /// Sign a digest.
    ///
    /// The digest is not hashed again. Digests that are not 32 bytes are left-padded or truncated
    /// to their leftmost 32 bytes. The nonce is derived deterministically (RFC 6979), so signing
    /// the same digest twice yields the same [Signature]. If the raw signature has a high `s`, it is
    /// replaced by `n - s` and the recovery parameter is flipped.
    pub fn sign_digest(&self, digest: &[u8]) -> Result<Signature, Error> {
        let digest = normalize_digest(digest);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .map_err(|_| Error::SigningFailed)?;
        let (signature, flipped) = match signature.normalize_s() {
            Some(normalized) => (normalized, true),
            None => (signature, false),
        };
        let recovery_param = (recovery_id.is_y_odd() ^ flipped) as u8;
        let (r, s) = signature.split_bytes();
        let signature = Signature::new(r.into(), s.into(), recovery_param)?;
        if !signature.is_canonical() {
            return Err(Error::SigningFailed);
        }
        Ok(signature)
    }

    /// Compute the ECDH shared secret with another party.
    ///
    /// `other` may be a private key (expanded to its public key), a compressed public key, or an
    /// uncompressed public key. The result is the X coordinate of the shared point. No key
    /// derivation function is applied.
    pub fn compute_shared_secret(&self, other: &[u8]) -> Result<[u8; SHARED_SECRET_LENGTH], Error> {
        let other = compute_public_key_bytes(other, false)?;
        let other = parse_public_key(&other)?;
        let shared = diffie_hellman(self.key.as_nonzero_scalar(), other.as_affine());
        Ok((*shared.raw_secret_bytes()).into())
    }

    /// Compute the ECDH shared secret with another party as a `0x`-prefixed hex string.
    pub fn shared_secret_hex(&self, other: &[u8]) -> Result<String, Error> {
        self.compute_shared_secret(other).map(|secret| hexlify(&secret))
    }

    /// Add another public key to this key's public key, returning the compressed sum.
    ///
    /// Fails with [Error::PointAtInfinity] if `other` is the negation of this key's public key.
    pub fn add_point(&self, other: &[u8]) -> Result<[u8; COMPRESSED_PUBLIC_KEY_LENGTH], Error> {
        let other = parse_public_key(other)?;
        let sum = ProjectivePoint::from(*self.key.verifying_key().as_affine())
            + other.to_projective();
        let sum = PublicKey::from_affine(sum.to_affine()).map_err(|_| Error::PointAtInfinity)?;

        let mut compressed = [0u8; COMPRESSED_PUBLIC_KEY_LENGTH];
        compressed.copy_from_slice(sum.to_encoded_point(true).as_bytes());
        Ok(compressed)
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for SigningKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = Zeroizing::new(from_hex_formatted(s).ok_or(Error::InvalidHex)?);
        Self::new(&bytes)
    }
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for SigningKey {}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("curve", &CURVE)
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key())
            .finish()
    }
}
