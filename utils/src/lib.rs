//! Convert between bytes and the hex strings exchanged with wallet and provider libraries.
//!
//! Byte sequences that cross the signing-key boundary are `0x`-prefixed lowercase hex with a
//! fixed length per field (32, 33 or 65 bytes become 66, 68 or 132 characters).

/// Prefix carried by every hex string at the signing-key boundary.
pub const HEX_PREFIX: &str = "0x";

/// Converts bytes to a hexadecimal string.
pub fn hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes.iter() {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Converts bytes to a `0x`-prefixed hexadecimal string.
pub fn hexlify(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(HEX_PREFIX.len() + bytes.len() * 2);
    hex.push_str(HEX_PREFIX);
    for byte in bytes.iter() {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Converts a hexadecimal string to bytes.
pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| match hex.get(i..i + 2) {
            Some(pair) => u8::from_str_radix(pair, 16).ok(),
            None => None,
        })
        .collect()
}

/// Converts a hexadecimal string to bytes, stripping whitespace and/or a `0x` prefix. Commonly used
/// in testing to encode external test vectors without modification.
pub fn from_hex_formatted(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.replace(['\t', '\n', '\r', ' '], "");
    let res = hex.strip_prefix(HEX_PREFIX).unwrap_or(&hex);
    from_hex(res)
}
