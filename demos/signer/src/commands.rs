//! Operations backing each subcommand.

use newchain_signing_key::{
    compute_public_key, recover_public_key, split_signature, verify_digest, SigningKey,
};
use newchain_utils::{from_hex_formatted, hexlify};
use thiserror::Error;
use zeroize::Zeroizing;

/// Errors that can occur while running a subcommand.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} is not valid hex")]
    Hex(&'static str),
    #[error(transparent)]
    Key(#[from] newchain_signing_key::Error),
}

/// Decode a hex argument, tolerating whitespace and a `0x` prefix.
pub fn decode(name: &'static str, value: &str) -> Result<Vec<u8>, Error> {
    from_hex_formatted(value).ok_or(Error::Hex(name))
}

/// Decode a private key argument into zeroizing storage.
pub fn decode_key(value: &str) -> Result<Zeroizing<Vec<u8>>, Error> {
    decode("key", value).map(Zeroizing::new)
}

/// Fields printed by `sign`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed {
    pub public_key: String,
    pub r: String,
    pub s: String,
    pub v: u8,
    pub recovery_param: u8,
    pub signature: String,
}

pub fn public_key(key: &[u8], compressed: bool) -> Result<String, Error> {
    Ok(compute_public_key(key, compressed)?)
}

pub fn sign(key: &[u8], digest: &[u8]) -> Result<Signed, Error> {
    let signer = SigningKey::new(key)?;
    let signature = signer.sign_digest(digest)?;
    Ok(Signed {
        public_key: signer.public_key(),
        r: hexlify(signature.r()),
        s: hexlify(signature.s()),
        v: signature.v(),
        recovery_param: signature.recovery_param(),
        signature: signature.to_string(),
    })
}

pub fn recover(digest: &[u8], signature: &[u8]) -> Result<String, Error> {
    Ok(recover_public_key(digest, signature)?)
}

pub fn shared_secret(key: &[u8], peer: &[u8]) -> Result<String, Error> {
    let signer = SigningKey::new(key)?;
    Ok(signer.shared_secret_hex(peer)?)
}

pub fn verify(digest: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool, Error> {
    let signature = split_signature(signature)?;
    Ok(verify_digest(digest, &signature, public_key))
}
