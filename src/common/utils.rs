use bitcoin_hashes::{hash160, sha256d, Hash};

/// HASH160, aka RIPEMD160(SHA256(data))
#[inline]
pub fn hash_160(data: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(data).to_byte_array()
}

/// Double SHA256
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256d::Hash::hash(data).to_byte_array()
}

#[inline]
pub fn arr_to_hex(data: &[u8]) -> String {
    let mut hex = String::with_capacity(data.len() * 2);
    for b in data {
        hex.push_str(&format!("{:02x}", b));
    }
    hex
}
