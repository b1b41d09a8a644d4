#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use newchain_signing_key::{compute_public_key_bytes, SigningKey, PRIVATE_KEY_LENGTH};

#[derive(Debug, Arbitrary)]
pub struct FuzzInput {
    pub key: Vec<u8>,
    pub other: Vec<u8>,
    pub private_key: [u8; PRIVATE_KEY_LENGTH],
    pub case_selector: u8,
}

// Arbitrary key material never panics and any conversion yields a valid point
fn fuzz_compute_public_key(key: &[u8]) {
    // Request the form the input is not already in
    let converted = compute_public_key_bytes(key, key.len() == 65);
    let Ok(converted) = converted else {
        return;
    };
    let uncompressed = compute_public_key_bytes(&converted, false).unwrap();
    let compressed = compute_public_key_bytes(&uncompressed, true).unwrap();
    assert_eq!(uncompressed.len(), 65);
    assert_eq!(compressed.len(), 33);
    assert_eq!(uncompressed[1..33], compressed[1..]);
}

// Compression round trips for every valid private key
fn fuzz_compression_round_trip(private_key: &[u8; PRIVATE_KEY_LENGTH]) {
    let Ok(signer) = SigningKey::new(private_key) else {
        return;
    };
    let compressed = compute_public_key_bytes(private_key, true).unwrap();
    assert_eq!(compressed, signer.compressed_public_key_bytes());
    let uncompressed = compute_public_key_bytes(&compressed, false).unwrap();
    assert_eq!(uncompressed, signer.public_key_bytes());
}

// Point addition and key agreement never panic on arbitrary peers
fn fuzz_peer_operations(private_key: &[u8; PRIVATE_KEY_LENGTH], other: &[u8]) {
    let Ok(signer) = SigningKey::new(private_key) else {
        return;
    };
    if let Ok(sum) = signer.add_point(other) {
        assert!(sum[0] == 0x02 || sum[0] == 0x03);
    }
    let Ok(secret) = signer.compute_shared_secret(other) else {
        return;
    };

    // Agreement is symmetric whenever the peer is a private key
    if let Ok(peer) = SigningKey::new(other) {
        let expected = peer
            .compute_shared_secret(&signer.public_key_bytes())
            .unwrap();
        assert_eq!(secret, expected);
    }
}

fn fuzz(input: FuzzInput) {
    match input.case_selector % 3 {
        0 => fuzz_compute_public_key(&input.key),
        1 => fuzz_compression_round_trip(&input.private_key),
        2 => fuzz_peer_operations(&input.private_key, &input.other),
        _ => unreachable!(),
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
