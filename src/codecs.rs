//! # Base58check and external-collaborator stubs
//!
//! `base58check` wraps the plain `base58` crate with the Bitcoin
//! checksum convention (`payload || SHA256d(payload)[..4]`). Address
//! encoding and WIF encoding are deliberately left as stub traits:
//! this crate derives keys, it does not decide how a caller renders
//! them into chain-specific payment strings.

use base58::{FromBase58, ToBase58};

use crate::error::ExtendedKeyError;
use crate::primitives::sha256d;

/// Append a 4-byte SHA256d checksum to `payload` and base58-encode it.
pub fn base58check_encode(payload: &[u8]) -> String {
    let checksum = sha256d(payload);
    let mut data = payload.to_vec();
    data.extend_from_slice(&checksum[..4]);
    data.to_base58()
}

/// Decode a base58check string, verifying and stripping its checksum.
pub fn base58check_decode(s: &str) -> Result<Vec<u8>, ExtendedKeyError> {
    let data = s
        .from_base58()
        .map_err(|_| ExtendedKeyError::BadChecksum)?;
    if data.len() < 4 {
        return Err(ExtendedKeyError::BadChecksum);
    }
    let (payload, checksum) = data.split_at(data.len() - 4);
    let expected = sha256d(payload);
    if checksum != &expected[..4] {
        return Err(ExtendedKeyError::BadChecksum);
    }
    Ok(payload.to_vec())
}

/// A chain-specific payment-address encoder. This crate has no opinion
/// on address formats (P2PKH/P2SH/P2WPKH/...); callers supply one.
pub trait AddressEncoder {
    /// Encode a compressed SEC public key into a payment address.
    fn encode(&self, public_key_sec: &[u8; 33], network: crate::version::Network) -> String;
}

/// A WIF (Wallet Import Format) private-key encoder, likewise left to
/// the caller.
pub trait WifEncoder {
    fn encode(&self, private_key: &[u8; 32], network: crate::version::Network) -> String;
}

/// Placeholder implementation of both traits for callers that have not
/// wired in a real codec yet. Every method returns a value built from
/// [`crate::error::Error::NotImplemented`] rendered as a string, so the
/// gap is visible rather than silently producing a bogus address.
pub struct UnimplementedCodec;

impl AddressEncoder for UnimplementedCodec {
    fn encode(&self, _public_key_sec: &[u8; 33], _network: crate::version::Network) -> String {
        crate::error::Error::NotImplemented("address encoding".to_string()).to_string()
    }
}

impl WifEncoder for UnimplementedCodec {
    fn encode(&self, _private_key: &[u8; 32], _network: crate::version::Network) -> String {
        crate::error::Error::NotImplemented("WIF encoding".to_string()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base58check_roundtrips() {
        let payload = vec![1, 2, 3, 4, 5];
        let encoded = base58check_encode(&payload);
        let decoded = base58check_decode(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn base58check_rejects_tampered_checksum() {
        let payload = vec![9, 9, 9];
        let mut encoded = base58check_encode(&payload);
        encoded.push('1');
        assert!(base58check_decode(&encoded).is_err());
    }
}
