//! Normalize, recover, and verify with public keys without holding a private key.

use crate::{
    normalize_digest, split_signature, Error, Signature, SignatureLike, SigningKey,
    COMPRESSED_PUBLIC_KEY_LENGTH, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH,
};
use newchain_utils::hexlify;
use p256::{
    ecdsa::{signature::hazmat::PrehashVerifier, Signature as EcdsaSignature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    FieldBytes, PublicKey,
};

/// Parse a compressed or uncompressed SEC 1 public key.
///
/// Only the `0x02`/`0x03` (33 bytes) and `0x04` (65 bytes) tags are accepted.
pub(crate) fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, Error> {
    let tagged = match bytes.len() {
        COMPRESSED_PUBLIC_KEY_LENGTH => matches!(bytes[0], 0x02 | 0x03),
        PUBLIC_KEY_LENGTH => bytes[0] == 0x04,
        len => return Err(Error::InvalidKeyLength(len)),
    };
    if !tagged {
        return Err(Error::InvalidPublicKey);
    }
    PublicKey::from_sec1_bytes(bytes).map_err(|_| Error::InvalidPublicKey)
}

fn to_ecdsa_signature(signature: &Signature) -> Option<EcdsaSignature> {
    EcdsaSignature::from_scalars(
        FieldBytes::from(*signature.r()),
        FieldBytes::from(*signature.s()),
    )
    .ok()
}

/// Compute a public key in the requested encoding from a private key (32 bytes), a compressed
/// public key (33 bytes), or an uncompressed public key (65 bytes).
///
/// A public key that is already in the requested encoding is returned as-is (it is not checked
/// to be on the curve).
pub fn compute_public_key_bytes(key: &[u8], compressed: bool) -> Result<Vec<u8>, Error> {
    match key.len() {
        PRIVATE_KEY_LENGTH => {
            let signer = SigningKey::new(key)?;
            if compressed {
                return Ok(signer.compressed_public_key_bytes().to_vec());
            }
            Ok(signer.public_key_bytes().to_vec())
        }
        COMPRESSED_PUBLIC_KEY_LENGTH if compressed => Ok(key.to_vec()),
        PUBLIC_KEY_LENGTH if !compressed => Ok(key.to_vec()),
        COMPRESSED_PUBLIC_KEY_LENGTH | PUBLIC_KEY_LENGTH => {
            let public_key = parse_public_key(key)?;
            Ok(public_key.to_encoded_point(compressed).as_bytes().to_vec())
        }
        len => Err(Error::InvalidKeyLength(len)),
    }
}

/// Compute a public key in the requested encoding as a `0x`-prefixed hex string.
///
/// See [compute_public_key_bytes].
pub fn compute_public_key(key: &[u8], compressed: bool) -> Result<String, Error> {
    compute_public_key_bytes(key, compressed).map(|public_key| hexlify(&public_key))
}

/// Recover the uncompressed public key that produced `signature` over `digest`.
///
/// The digest is normalized exactly as in [SigningKey::sign_digest]. Signatures with a high `s`
/// are accepted. Fails with [Error::SignatureRecovery] if `r` or `s`
/// are zero or not below the curve order, or if no point is consistent with the signature.
pub fn recover_public_key(
    digest: &[u8],
    signature: impl Into<SignatureLike>,
) -> Result<String, Error> {
    let digest = normalize_digest(digest);
    let signature = split_signature(signature)?;
    let recovery_param = signature.recovery_param();
    let signature = to_ecdsa_signature(&signature).ok_or(Error::SignatureRecovery)?;
    let public_key = VerifyingKey::recover_from_prehash(
        &digest,
        &signature,
        recovery_param
            .try_into()
            .map_err(|_| Error::SignatureRecovery)?,
    )
    .map_err(|_| Error::SignatureRecovery)?;
    Ok(hexlify(public_key.to_encoded_point(false).as_bytes()))
}

/// Verify `signature` over `digest` against a compressed or uncompressed public key.
///
/// Returns false for any malformed input and for signatures with a high `s`.
pub fn verify_digest(digest: &[u8], signature: &Signature, public_key: &[u8]) -> bool {
    let digest = normalize_digest(digest);
    if !signature.is_canonical() {
        // Reject any signatures with a `s` value in the upper half of the curve order.
        return false;
    }
    let Ok(public_key) = parse_public_key(public_key) else {
        return false;
    };
    let Some(signature) = to_ecdsa_signature(signature) else {
        return false;
    };
    VerifyingKey::from(public_key)
        .verify_prehash(&digest, &signature)
        .is_ok()
}
