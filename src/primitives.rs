//! # Primitives (C1)
//!
//! Big-endian int/byte conversions and the hash/HMAC/KDF building blocks
//! shared by the mnemonic codec and the derivation tree.

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

type HmacSha512 = Hmac<Sha512>;

/// `SHA-256(data)`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `SHA-256(SHA-256(data))`, used for base58check and is otherwise
/// known as "double SHA-256" / "SHA256d" in Bitcoin.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// `RIPEMD160(SHA256(data))`, Bitcoin's "hash160".
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = sha256(data);
    let mut ripemd = Ripemd160::new();
    ripemd.update(sha);
    ripemd.finalize().into()
}

/// `HMAC-SHA512(key, data)`, returning the raw 64-byte MAC.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac =
        HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// `PBKDF2-HMAC-SHA512(password, salt, iterations, 64)`, used to derive
/// the BIP-32 seed from a BIP-39 mnemonic.
pub fn pbkdf2_hmac_sha512(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 64] {
    let mut out = [0u8; 64];
    pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut out);
    out
}

/// Big-endian serialization of a `u32`, as `ser32` in BIP-32.
pub fn ser32(i: u32) -> [u8; 4] {
    i.to_be_bytes()
}

/// Parse a big-endian `u32`.
pub fn parse32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_be_bytes(buf)
}
