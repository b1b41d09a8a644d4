#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use newchain_signing_key::{
    recover_public_key, split_signature, SignatureLike, COMPACT_SIGNATURE_LENGTH, DIGEST_LENGTH,
};

#[derive(Debug, Arbitrary)]
pub enum Like {
    Bytes(Vec<u8>),
    Joined([u8; 65]),
    Compact([u8; COMPACT_SIGNATURE_LENGTH]),
    Components {
        r: [u8; 32],
        s: [u8; 32],
        v: Option<u64>,
        recovery_param: Option<u8>,
    },
}

#[derive(Debug, Arbitrary)]
pub struct FuzzInput {
    pub signature: Like,
    pub digest: [u8; DIGEST_LENGTH],
}

fn fuzz(input: FuzzInput) {
    let like = match input.signature {
        Like::Bytes(bytes) => SignatureLike::from(bytes),
        Like::Joined(bytes) => SignatureLike::from(bytes),
        Like::Compact(bytes) => SignatureLike::from(bytes),
        Like::Components {
            r,
            s,
            v,
            recovery_param,
        } => SignatureLike::Components {
            r,
            s,
            v,
            recovery_param,
        },
    };
    let Ok(signature) = split_signature(like) else {
        return;
    };
    assert!(signature.recovery_param() <= 1);
    assert_eq!(signature.v(), 27 + signature.recovery_param());

    // Both serializations describe the same signature
    assert_eq!(split_signature(signature.to_bytes()).unwrap(), signature);
    if signature.s()[0] & 0x80 == 0 {
        assert_eq!(split_signature(signature.compact()).unwrap(), signature);
    }

    // Recovery never panics
    let _ = recover_public_key(&input.digest, signature);
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
