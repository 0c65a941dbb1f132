//! # Version registry (C4)
//!
//! The closed mapping between `(Network, Purpose, KeyKind)` and the
//! 4-byte version prefix that opens every serialized extended key, plus
//! its inverse lookup. Exactly twelve entries: two networks, three
//! purposes, two key kinds.

use crate::error::ExtendedKeyError;

/// Which chain a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

/// Which derivation scheme a node's path implies, carried alongside the
/// node so serialization picks `xprv` vs `yprv` vs `zprv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// BIP-32 / BIP-44, legacy P2PKH.
    Bip32,
    /// BIP-49, P2SH-wrapped P2WPKH.
    Bip49,
    /// BIP-84, native P2WPKH.
    Bip84,
}

/// Whether an extended key carries private key material or only a
/// public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Private,
    Public,
}

const TABLE: &[(Network, Purpose, KeyKind, u32)] = &[
    (Network::Mainnet, Purpose::Bip32, KeyKind::Private, 0x0488_ADE4), // xprv
    (Network::Mainnet, Purpose::Bip32, KeyKind::Public, 0x0488_B21E),  // xpub
    (Network::Mainnet, Purpose::Bip49, KeyKind::Private, 0x049D_7878), // yprv
    (Network::Mainnet, Purpose::Bip49, KeyKind::Public, 0x049D_7CB2),  // ypub
    (Network::Mainnet, Purpose::Bip84, KeyKind::Private, 0x04B2_430C), // zprv
    (Network::Mainnet, Purpose::Bip84, KeyKind::Public, 0x04B2_4746),  // zpub
    (Network::Testnet, Purpose::Bip32, KeyKind::Private, 0x0435_8394), // tprv
    (Network::Testnet, Purpose::Bip32, KeyKind::Public, 0x0435_87CF),  // tpub
    (Network::Testnet, Purpose::Bip49, KeyKind::Private, 0x044A_4E28), // uprv
    (Network::Testnet, Purpose::Bip49, KeyKind::Public, 0x044A_5262),  // upub
    (Network::Testnet, Purpose::Bip84, KeyKind::Private, 0x045F_18BC), // vprv
    (Network::Testnet, Purpose::Bip84, KeyKind::Public, 0x045F_1CF6),  // vpub
];

/// Look up the 4-byte version prefix for a `(network, purpose, kind)` triple.
pub fn encode(network: Network, purpose: Purpose, kind: KeyKind) -> u32 {
    TABLE
        .iter()
        .find(|(n, p, k, _)| *n == network && *p == purpose && *k == kind)
        .map(|(_, _, _, v)| *v)
        .expect("TABLE covers every (Network, Purpose, KeyKind) combination")
}

/// Reverse lookup: map a 4-byte version prefix back to its triple.
pub fn decode(version: u32) -> Result<(Network, Purpose, KeyKind), ExtendedKeyError> {
    TABLE
        .iter()
        .find(|(_, _, _, v)| *v == version)
        .map(|(n, p, k, _)| (*n, *p, *k))
        .ok_or(ExtendedKeyError::UnknownVersion(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_exactly_twelve_entries() {
        assert_eq!(TABLE.len(), 12);
    }

    #[test]
    fn mainnet_bip32_private_is_xprv() {
        assert_eq!(
            encode(Network::Mainnet, Purpose::Bip32, KeyKind::Private),
            0x0488_ADE4
        );
    }

    #[test]
    fn roundtrips_through_decode() {
        for &(network, purpose, kind, version) in TABLE {
            assert_eq!(encode(network, purpose, kind), version);
            assert_eq!(decode(version).unwrap(), (network, purpose, kind));
        }
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = decode(0xdead_beef).unwrap_err();
        assert_eq!(err, ExtendedKeyError::UnknownVersion(0xdead_beef));
    }
}
