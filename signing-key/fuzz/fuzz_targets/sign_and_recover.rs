#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use newchain_signing_key::{
    recover_public_key, verify_digest, SigningKey, DIGEST_LENGTH, PRIVATE_KEY_LENGTH,
};
use p256::ecdsa::{signature::hazmat::PrehashVerifier, Signature, VerifyingKey};

#[derive(Debug, Arbitrary)]
pub struct FuzzInput {
    pub private_key: [u8; PRIVATE_KEY_LENGTH],
    pub digest: [u8; DIGEST_LENGTH],
    pub trailing: Vec<u8>,
}

fn fuzz(input: FuzzInput) {
    let Ok(signer) = SigningKey::new(&input.private_key) else {
        return;
    };
    let signature = signer.sign_digest(&input.digest).unwrap();
    assert!(signature.is_canonical());
    assert!(signature.recovery_param() <= 1);
    assert_eq!(signature, signer.sign_digest(&input.digest).unwrap());

    // Recovery yields the signer
    let recovered = recover_public_key(&input.digest, signature).unwrap();
    assert_eq!(recovered, signer.public_key());
    assert!(verify_digest(
        &input.digest,
        &signature,
        &signer.compressed_public_key_bytes()
    ));

    // Bytes past the curve order width do not change the signature
    let mut long = input.digest.to_vec();
    long.extend_from_slice(&input.trailing);
    assert_eq!(signer.sign_digest(&long).unwrap(), signature);
    assert_eq!(recover_public_key(&long, signature).unwrap(), recovered);

    // Reference implementation accepts the signature
    let verifying_key = VerifyingKey::from_sec1_bytes(&signer.public_key_bytes()).unwrap();
    let reference = Signature::from_slice(&signature.to_bytes()[..64]).unwrap();
    verifying_key
        .verify_prehash(&input.digest, &reference)
        .unwrap();
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
