//! ECDSA signatures with a recovery parameter, and the forms they are accepted in.

use crate::{Error, COMPACT_SIGNATURE_LENGTH, SIGNATURE_LENGTH};
use newchain_utils::{hex, hexlify};
use p256::{
    elliptic_curve::{ff::PrimeField, scalar::IsHigh},
    FieldBytes, Scalar,
};
use std::fmt::{Debug, Display, Formatter};

const SCALAR_LENGTH: usize = 32;

/// Offset added to the recovery parameter to form `v`.
const V_OFFSET: u8 = 27;

/// An ECDSA signature over P-256 with the parity bit needed to recover the signer.
///
/// `r` and `s` are big-endian and zero-padded to 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    r: [u8; SCALAR_LENGTH],
    s: [u8; SCALAR_LENGTH],
    recovery_param: u8,
}

impl Signature {
    /// Create a [Signature] from its components.
    ///
    /// The scalars are not checked against the curve order here; recovery and verification reject
    /// out-of-range values.
    pub fn new(
        r: [u8; SCALAR_LENGTH],
        s: [u8; SCALAR_LENGTH],
        recovery_param: u8,
    ) -> Result<Self, Error> {
        if recovery_param > 1 {
            return Err(Error::InvalidSignature("invalid recovery param"));
        }
        Ok(Self {
            r,
            s,
            recovery_param,
        })
    }

    pub fn r(&self) -> &[u8; SCALAR_LENGTH] {
        &self.r
    }

    pub fn s(&self) -> &[u8; SCALAR_LENGTH] {
        &self.s
    }

    /// Parity of the `y` coordinate of the nonce point (0 or 1).
    pub fn recovery_param(&self) -> u8 {
        self.recovery_param
    }

    /// The recovery parameter offset by 27.
    pub fn v(&self) -> u8 {
        V_OFFSET + self.recovery_param
    }

    /// `s` with the recovery parameter packed into its top bit (EIP-2098).
    pub fn y_parity_and_s(&self) -> [u8; SCALAR_LENGTH] {
        let mut vs = self.s;
        if self.recovery_param == 1 {
            vs[0] |= 0x80;
        }
        vs
    }

    /// `r || yParityAndS`.
    pub fn compact(&self) -> [u8; COMPACT_SIGNATURE_LENGTH] {
        let mut compact = [0u8; COMPACT_SIGNATURE_LENGTH];
        compact[..SCALAR_LENGTH].copy_from_slice(&self.r);
        compact[SCALAR_LENGTH..].copy_from_slice(&self.y_parity_and_s());
        compact
    }

    /// `r || s || v`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..SCALAR_LENGTH].copy_from_slice(&self.r);
        bytes[SCALAR_LENGTH..2 * SCALAR_LENGTH].copy_from_slice(&self.s);
        bytes[2 * SCALAR_LENGTH] = self.v();
        bytes
    }

    /// Returns true if `s` is a valid scalar in the lower half of the curve order.
    pub fn is_canonical(&self) -> bool {
        let s: Option<Scalar> = Scalar::from_repr(FieldBytes::from(self.s)).into();
        match s {
            Some(s) => !bool::from(s.is_high()),
            None => false,
        }
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signature")
            .field("r", &hex(&self.r))
            .field("s", &hex(&self.s))
            .field("recovery_param", &self.recovery_param)
            .finish()
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hexlify(&self.to_bytes()))
    }
}

/// Any of the forms a [Signature] may be supplied in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureLike {
    /// An already split signature.
    Signature(Signature),
    /// Individual components. At least one of `v` and `recovery_param` must be present and, if
    /// both are, they must agree. `v` may be 0/1, 27/28, or an EIP-155 value.
    Components {
        r: [u8; SCALAR_LENGTH],
        s: [u8; SCALAR_LENGTH],
        v: Option<u64>,
        recovery_param: Option<u8>,
    },
    /// A 65-byte `r || s || v` or 64-byte `r || yParityAndS` encoding.
    Bytes(Vec<u8>),
}

impl From<Signature> for SignatureLike {
    fn from(value: Signature) -> Self {
        Self::Signature(value)
    }
}

impl From<&Signature> for SignatureLike {
    fn from(value: &Signature) -> Self {
        Self::Signature(*value)
    }
}

impl From<Vec<u8>> for SignatureLike {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for SignatureLike {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<[u8; SIGNATURE_LENGTH]> for SignatureLike {
    fn from(value: [u8; SIGNATURE_LENGTH]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<[u8; COMPACT_SIGNATURE_LENGTH]> for SignatureLike {
    fn from(value: [u8; COMPACT_SIGNATURE_LENGTH]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// Normalize any [SignatureLike] into a [Signature].
pub fn split_signature(signature: impl Into<SignatureLike>) -> Result<Signature, Error> {
    match signature.into() {
        SignatureLike::Signature(signature) => Ok(signature),
        SignatureLike::Bytes(bytes) => split_bytes(&bytes),
        SignatureLike::Components {
            r,
            s,
            v,
            recovery_param,
        } => {
            if s[0] & 0x80 != 0 {
                return Err(Error::InvalidSignature("s out of range"));
            }
            let recovery_param = match (v, recovery_param) {
                (None, None) => {
                    return Err(Error::InvalidSignature("missing v and recovery param"))
                }
                (Some(v), None) => recovery_param_from_v(v),
                (None, Some(recovery_param)) => recovery_param,
                (Some(v), Some(recovery_param)) => {
                    if recovery_param_from_v(v) != recovery_param {
                        return Err(Error::InvalidSignature("recovery param mismatch v"));
                    }
                    recovery_param
                }
            };
            Signature::new(r, s, recovery_param)
        }
    }
}

fn split_bytes(bytes: &[u8]) -> Result<Signature, Error> {
    let mut r = [0u8; SCALAR_LENGTH];
    let mut s = [0u8; SCALAR_LENGTH];
    match bytes.len() {
        SIGNATURE_LENGTH => {
            r.copy_from_slice(&bytes[..SCALAR_LENGTH]);
            s.copy_from_slice(&bytes[SCALAR_LENGTH..2 * SCALAR_LENGTH]);
            let v = bytes[2 * SCALAR_LENGTH];
            if (2..V_OFFSET).contains(&v) {
                return Err(Error::InvalidSignature("invalid v"));
            }
            let recovery_param = recovery_param_from_v(v.into());
            Signature::new(r, s, recovery_param)
        }
        COMPACT_SIGNATURE_LENGTH => {
            r.copy_from_slice(&bytes[..SCALAR_LENGTH]);
            s.copy_from_slice(&bytes[SCALAR_LENGTH..]);
            let recovery_param = s[0] >> 7;
            s[0] &= 0x7f;
            Signature::new(r, s, recovery_param)
        }
        _ => Err(Error::InvalidSignature("invalid signature length")),
    }
}

/// Derive the recovery parameter from `v` (0/1, 27/28, or `chain_id * 2 + 35/36`).
///
/// Any other `v` is mapped by its parity.
fn recovery_param_from_v(v: u64) -> u8 {
    match v {
        0 | 1 => v as u8,
        v => 1 - (v % 2) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newchain_utils::from_hex_formatted;

    fn sample() -> Signature {
        let r = from_hex_formatted(
            "813ca5480d4c0d85e76be2521404f4e74d93b74051c71217bf243a0f5e3b8add",
        )
        .unwrap();
        let s = from_hex_formatted(
            "7b3dd8e231aada1b4145bed079d009c6b5db5f6440b0ca7f98c58a95208df1d5",
        )
        .unwrap();
        Signature::new(r.try_into().unwrap(), s.try_into().unwrap(), 1).unwrap()
    }

    #[test]
    fn test_encodings() {
        let signature = sample();
        assert_eq!(signature.v(), 28);
        assert_eq!(
            hex(&signature.y_parity_and_s()),
            "fb3dd8e231aada1b4145bed079d009c6b5db5f6440b0ca7f98c58a95208df1d5"
        );

        let joined = signature.to_bytes();
        assert_eq!(&joined[..32], signature.r());
        assert_eq!(&joined[32..64], signature.s());
        assert_eq!(joined[64], 28);
        assert_eq!(signature.to_string(), hexlify(&joined));
        assert_eq!(signature.to_string().len(), 132);

        let compact = signature.compact();
        assert_eq!(&compact[..32], signature.r());
        assert_eq!(compact[32], 0xfb);
    }

    #[test]
    fn test_split_bytes() {
        let signature = sample();
        assert_eq!(split_signature(signature.to_bytes()).unwrap(), signature);
        assert_eq!(split_signature(signature.compact()).unwrap(), signature);
        assert_eq!(split_signature(&signature).unwrap(), signature);

        // v = 0/1 is lifted
        let mut joined = signature.to_bytes();
        joined[64] = 1;
        assert_eq!(split_signature(joined).unwrap(), signature);
        joined[64] = 0;
        assert_eq!(split_signature(joined).unwrap().recovery_param(), 0);

        // v between 2 and 26 is meaningless
        for v in [2, 26] {
            joined[64] = v;
            assert_eq!(
                split_signature(joined),
                Err(Error::InvalidSignature("invalid v"))
            );
        }
    }

    #[test]
    fn test_split_bad_length() {
        for len in [0, 63, 66] {
            assert_eq!(
                split_signature(vec![0u8; len]),
                Err(Error::InvalidSignature("invalid signature length"))
            );
        }
    }

    #[test]
    fn test_split_components() {
        let signature = sample();
        let components = |v, recovery_param| SignatureLike::Components {
            r: *signature.r(),
            s: *signature.s(),
            v,
            recovery_param,
        };

        assert_eq!(split_signature(components(Some(28), None)).unwrap(), signature);
        assert_eq!(split_signature(components(None, Some(1))).unwrap(), signature);
        assert_eq!(
            split_signature(components(Some(28), Some(1))).unwrap(),
            signature
        );
        assert_eq!(split_signature(components(Some(1), None)).unwrap(), signature);

        // EIP-155 (chain id 1): 37 => 0, 38 => 1
        assert_eq!(
            split_signature(components(Some(37), None))
                .unwrap()
                .recovery_param(),
            0
        );
        assert_eq!(split_signature(components(Some(38), None)).unwrap(), signature);

        // Any other v is read by its parity
        assert_eq!(split_signature(components(Some(2), None)).unwrap(), signature);
        assert_eq!(
            split_signature(components(Some(26), Some(1))).unwrap(),
            signature
        );
        assert_eq!(
            split_signature(components(Some(3), None))
                .unwrap()
                .recovery_param(),
            0
        );

        // Missing or conflicting parity
        assert_eq!(
            split_signature(components(None, None)),
            Err(Error::InvalidSignature("missing v and recovery param"))
        );
        assert_eq!(
            split_signature(components(Some(27), Some(1))),
            Err(Error::InvalidSignature("recovery param mismatch v"))
        );
        assert_eq!(
            split_signature(components(None, Some(2))),
            Err(Error::InvalidSignature("invalid recovery param"))
        );
    }

    #[test]
    fn test_split_components_high_s() {
        let signature = sample();
        let result = split_signature(SignatureLike::Components {
            r: *signature.r(),
            s: signature.y_parity_and_s(),
            v: Some(27),
            recovery_param: None,
        });
        assert_eq!(result, Err(Error::InvalidSignature("s out of range")));
    }

    #[test]
    fn test_is_canonical() {
        let signature = sample();
        assert!(signature.is_canonical());

        // n - s
        let order = from_hex_formatted(
            "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
        )
        .unwrap();
        let s = Scalar::from_repr(*FieldBytes::from_slice(signature.s())).unwrap();
        let high = Signature::new(*signature.r(), (-s).to_repr().into(), 0).unwrap();
        assert!(!high.is_canonical());

        // s >= n is not a scalar
        let invalid = Signature::new(*signature.r(), order.try_into().unwrap(), 0).unwrap();
        assert!(!invalid.is_canonical());
    }

    #[test]
    fn test_debug() {
        let debug = format!("{:?}", sample());
        assert!(debug.contains("813ca548"));
        assert!(debug.contains("recovery_param: 1"));
    }
}
