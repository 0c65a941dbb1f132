//! # Node model & derivation engine (C6)
//!
//! A tagged-variant `Node` (private or public) replacing a class
//! hierarchy: both tags share an [`Envelope`] of the fields every
//! extended key carries, and branch only on the key material itself.
//! Per the project's own design notes, a node is a pure value with no
//! stored parent pointer -- `check_fingerprint` takes the candidate
//! parent explicitly instead of walking a cached back-edge, which
//! keeps the type acyclic and trivially `Clone`.

use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};

use crate::error::{ExtendedKeyError, NodeError};
use crate::primitives::{hash160, hmac_sha512, parse32, ser32};
use crate::version::{self, KeyKind, Network, Purpose};

/// Fields every extended key carries, regardless of whether it holds
/// private or public key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub network: Network,
    pub purpose: Purpose,
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub child_number: u32,
    pub chain_code: [u8; 32],
    /// The index sequence from the root to this node, when known. A
    /// node built by [`master_from_seed`] or derived via [`Node::ckd`]
    /// carries its full ancestry; a node recovered via [`Node::parse`]
    /// only knows its own `child_number`, since the 78-byte format
    /// does not encode ancestors beyond the immediate parent's
    /// fingerprint.
    pub path: Vec<u32>,
    /// Whether `path` is actually the full ancestry back to the root
    /// (true for [`master_from_seed`] and anything derived from it via
    /// [`Node::ckd`]) as opposed to the single truncated `child_number`
    /// a [`Node::parse`]d node carries. Serialization purpose inference
    /// (see [`Node::serialize`]) only trusts `path` when this is true --
    /// otherwise a re-serialized extended key would guess a purpose
    /// from an ancestor it never actually saw.
    pub path_known_from_root: bool,
}

/// The hardening bit, re-exported here for convenience (see
/// [`crate::path::HARDENED_BIT`]).
pub const HARDENED_BIT: u32 = crate::path::HARDENED_BIT;

/// A node in the derivation tree: either a private extended key
/// (can derive hardened and non-hardened children, and neuter to a
/// public node) or a public-only extended key (non-hardened children
/// only).
#[derive(Debug, Clone)]
pub enum Node {
    Private {
        envelope: Envelope,
        private_key: SecretKey,
    },
    Public {
        envelope: Envelope,
        public_key: PublicKey,
    },
}

impl Node {
    pub fn envelope(&self) -> &Envelope {
        match self {
            Node::Private { envelope, .. } => envelope,
            Node::Public { envelope, .. } => envelope,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Node::Private { .. })
    }

    pub fn is_master(&self) -> bool {
        self.envelope().depth == 0
    }

    pub fn is_hardened(&self) -> bool {
        self.envelope().child_number & HARDENED_BIT != 0
    }

    /// The compressed SEC public key, computing it from the private
    /// key if this is a private node.
    pub fn public_key_sec(&self) -> [u8; 33] {
        match self {
            Node::Private { private_key, .. } => {
                let secp = Secp256k1::new();
                private_key.public_key(&secp).serialize()
            }
            Node::Public { public_key, .. } => public_key.serialize(),
        }
    }

    /// `hash160(pubkey)[..4]`, this node's own fingerprint -- what a
    /// child of this node stores as its `parent_fingerprint`.
    pub fn fingerprint(&self) -> [u8; 4] {
        let mut out = [0u8; 4];
        out.copy_from_slice(&hash160(&self.public_key_sec())[..4]);
        out
    }

    /// Whether `self.envelope().parent_fingerprint` actually matches
    /// `candidate_parent`'s fingerprint. Takes the parent explicitly
    /// rather than reading a stored back-edge.
    pub fn parent_fingerprint_matches(&self, candidate_parent: &Node) -> bool {
        self.envelope().parent_fingerprint == candidate_parent.fingerprint()
    }

    /// Drop private key material, returning the corresponding public
    /// node. A no-op (clone) if already public.
    pub fn neuter(&self) -> Node {
        match self {
            Node::Private {
                envelope,
                private_key,
            } => {
                let secp = Secp256k1::new();
                Node::Public {
                    envelope: envelope.clone(),
                    public_key: private_key.public_key(&secp),
                }
            }
            Node::Public { .. } => self.clone(),
        }
    }

    /// Derive the child at `index` (hardened if `index & HARDENED_BIT
    /// != 0`). Private nodes can derive any child; public nodes can
    /// only derive non-hardened children.
    pub fn ckd(&self, index: u32) -> Result<Node, NodeError> {
        if self.envelope().depth == u8::MAX {
            return Err(NodeError::DepthOverflow);
        }
        match self {
            Node::Private {
                envelope,
                private_key,
            } => ckd_private(envelope, private_key, index),
            Node::Public { envelope, public_key } => {
                if index & HARDENED_BIT != 0 {
                    return Err(NodeError::HardenedFromPublic);
                }
                ckd_public(envelope, public_key, index)
            }
        }
    }

    /// Apply a sequence of child indices in order, stopping at the
    /// first error.
    pub fn derive_path(&self, indices: &[u32]) -> Result<Node, NodeError> {
        let mut current = self.clone();
        for &index in indices {
            current = current.ckd(index)?;
        }
        Ok(current)
    }

    /// Serialize to the 78-byte extended-key layout: version(4) ||
    /// depth(1) || parent_fingerprint(4) || child_number(4) ||
    /// chain_code(32) || key_material(33).
    ///
    /// The version prefix's purpose (BIP-32 vs BIP-49 vs BIP-84, i.e.
    /// xprv/yprv/zprv) is resolved in order: `purpose_override` if
    /// given; otherwise, if this node's full ancestry is known (see
    /// [`Envelope::path_known_from_root`]), the purpose implied by the
    /// path's first component (§4.7); otherwise the node's stored
    /// purpose (preserved from parsing, or the default set at
    /// [`master_from_seed`]).
    pub fn serialize(&self, purpose_override: Option<Purpose>) -> [u8; 78] {
        let envelope = self.envelope();
        let kind = if self.is_private() {
            KeyKind::Private
        } else {
            KeyKind::Public
        };
        let purpose = purpose_override.unwrap_or_else(|| resolved_purpose(envelope));
        let version = version::encode(envelope.network, purpose, kind);

        let mut out = [0u8; 78];
        out[0..4].copy_from_slice(&ser32(version));
        out[4] = envelope.depth;
        out[5..9].copy_from_slice(&envelope.parent_fingerprint);
        out[9..13].copy_from_slice(&ser32(envelope.child_number));
        out[13..45].copy_from_slice(&envelope.chain_code);
        match self {
            Node::Private { private_key, .. } => {
                out[45] = 0x00;
                out[46..78].copy_from_slice(&private_key.secret_bytes());
            }
            Node::Public { public_key, .. } => {
                out[45..78].copy_from_slice(&public_key.serialize());
            }
        }
        out
    }

    /// Parse a 78-byte extended-key payload (already base58check
    /// decoded). See [`Envelope::path`] for the ancestry caveat; the
    /// resulting node always has `path_known_from_root = false`, so
    /// re-serializing it preserves the version prefix it was parsed
    /// with rather than guessing a purpose from `child_number` alone.
    pub fn parse(data: &[u8]) -> Result<Node, ExtendedKeyError> {
        if data.len() != 78 {
            return Err(ExtendedKeyError::BadLength(data.len()));
        }
        let version = parse32(&data[0..4]);
        let (network, purpose, kind) = version::decode(version)?;
        let depth = data[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let child_number = parse32(&data[9..13]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);

        let is_master_shape = depth == 0 && parent_fingerprint == [0u8; 4] && child_number == 0;
        if depth == 0 && !is_master_shape {
            return Err(ExtendedKeyError::InconsistentMaster);
        }

        let path = if depth == 0 { Vec::new() } else { vec![child_number] };
        let envelope = Envelope {
            network,
            purpose,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            path,
            path_known_from_root: false,
        };

        match kind {
            KeyKind::Private => {
                if data[45] != 0x00 {
                    return Err(ExtendedKeyError::BadKeyPrefix);
                }
                let private_key = SecretKey::from_slice(&data[46..78])
                    .map_err(|e| ExtendedKeyError::InvalidKeyMaterial(e.to_string()))?;
                Ok(Node::Private {
                    envelope,
                    private_key,
                })
            }
            KeyKind::Public => {
                let public_key = PublicKey::from_slice(&data[45..78])
                    .map_err(|e| ExtendedKeyError::InvalidKeyMaterial(e.to_string()))?;
                Ok(Node::Public {
                    envelope,
                    public_key,
                })
            }
        }
    }

    /// Base58check-encode [`Node::serialize`]'s output.
    pub fn to_extended_key_string(&self, purpose_override: Option<Purpose>) -> String {
        crate::codecs::base58check_encode(&self.serialize(purpose_override))
    }

    /// Base58check-decode and [`Node::parse`].
    pub fn from_extended_key_string(s: &str) -> Result<Node, ExtendedKeyError> {
        let data = crate::codecs::base58check_decode(s)
            .map_err(|_| ExtendedKeyError::BadChecksum)?;
        Node::parse(&data)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let root = if self.is_private() { 'm' } else { 'M' };
        write!(
            f,
            "{}",
            crate::path::format_path(root == 'm', &self.envelope().path)
        )
    }
}

/// Resolve the purpose to serialize with when no explicit override is
/// given: infer from the path's first component when the full ancestry
/// back to the root is known, otherwise fall back to the node's stored
/// purpose (see [`Envelope::path_known_from_root`]).
fn resolved_purpose(envelope: &Envelope) -> Purpose {
    if envelope.path_known_from_root && !envelope.path.is_empty() {
        crate::path::purpose_from_path(&envelope.path)
    } else {
        envelope.purpose
    }
}

/// BIP-32 master key from a seed: `I = HMAC-SHA512(key = "Bitcoin
/// seed", data = seed)`; `IL` becomes the master private key, `IR`
/// the master chain code.
pub fn master_from_seed(
    seed: &[u8],
    network: Network,
    purpose: Purpose,
) -> Result<Node, NodeError> {
    if seed.len() < 16 || seed.len() > 64 {
        return Err(NodeError::BadSeedLength(seed.len()));
    }

    let i = hmac_sha512(b"Bitcoin seed", seed);
    let (il, ir) = i.split_at(32);

    let private_key =
        SecretKey::from_slice(il).map_err(|_| NodeError::InvalidMasterKey)?;
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(ir);

    Ok(Node::Private {
        envelope: Envelope {
            network,
            purpose,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
            chain_code,
            path: Vec::new(),
            path_known_from_root: true,
        },
        private_key,
    })
}

fn child_hmac_input(is_hardened: bool, secp: &Secp256k1<secp256k1::All>, private_key: Option<&SecretKey>, public_key: &PublicKey, index: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(37);
    if is_hardened {
        data.push(0x00);
        data.extend_from_slice(&private_key.expect("hardened derivation requires a private key").secret_bytes());
    } else {
        let _ = secp;
        data.extend_from_slice(&public_key.serialize());
    }
    data.extend_from_slice(&ser32(index));
    data
}

fn next_path(envelope: &Envelope, index: u32) -> Vec<u32> {
    let mut path = envelope.path.clone();
    path.push(index);
    path
}

fn ckd_private(envelope: &Envelope, private_key: &SecretKey, index: u32) -> Result<Node, NodeError> {
    let secp = Secp256k1::new();
    let is_hardened = index & HARDENED_BIT != 0;
    let parent_public = private_key.public_key(&secp);
    let parent_fingerprint = {
        let mut out = [0u8; 4];
        out.copy_from_slice(&hash160(&parent_public.serialize())[..4]);
        out
    };

    let data = child_hmac_input(is_hardened, &secp, Some(private_key), &parent_public, index);
    let i = hmac_sha512(&envelope.chain_code, &data);
    let (il, ir) = i.split_at(32);

    let il_scalar = Scalar::from_be_bytes(il.try_into().unwrap()).map_err(|_| NodeError::InvalidChild)?;
    let child_private = private_key
        .add_tweak(&il_scalar)
        .map_err(|_| NodeError::InvalidChild)?;

    let mut child_chain_code = [0u8; 32];
    child_chain_code.copy_from_slice(ir);

    Ok(Node::Private {
        envelope: Envelope {
            network: envelope.network,
            purpose: envelope.purpose,
            depth: envelope.depth + 1,
            parent_fingerprint,
            child_number: index,
            chain_code: child_chain_code,
            path: next_path(envelope, index),
            path_known_from_root: envelope.path_known_from_root,
        },
        private_key: child_private,
    })
}

fn ckd_public(envelope: &Envelope, public_key: &PublicKey, index: u32) -> Result<Node, NodeError> {
    let secp = Secp256k1::new();
    let parent_fingerprint = {
        let mut out = [0u8; 4];
        out.copy_from_slice(&hash160(&public_key.serialize())[..4]);
        out
    };

    let data = child_hmac_input(false, &secp, None, public_key, index);
    let i = hmac_sha512(&envelope.chain_code, &data);
    let (il, ir) = i.split_at(32);

    let il_scalar = Scalar::from_be_bytes(il.try_into().unwrap()).map_err(|_| NodeError::InvalidChild)?;
    let child_public = public_key
        .add_exp_tweak(&secp, &il_scalar)
        .map_err(|_| NodeError::InvalidChild)?;

    let mut child_chain_code = [0u8; 32];
    child_chain_code.copy_from_slice(ir);

    Ok(Node::Public {
        envelope: Envelope {
            network: envelope.network,
            purpose: envelope.purpose,
            depth: envelope.depth + 1,
            parent_fingerprint,
            child_number: index,
            chain_code: child_chain_code,
            path: next_path(envelope, index),
            path_known_from_root: envelope.path_known_from_root,
        },
        public_key: child_public,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_from_hex(hex_str: &str) -> Vec<u8> {
        hex::decode(hex_str).unwrap()
    }

    #[test]
    fn bip32_test_vector_1() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32).unwrap();
        assert_eq!(
            master.to_extended_key_string(None),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            master.neuter().to_extended_key_string(None),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );

        let child = master.ckd(0 | HARDENED_BIT).unwrap();
        assert_eq!(
            child.to_extended_key_string(None),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );
        assert_eq!(
            child.neuter().to_extended_key_string(None),
            "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw"
        );
    }

    #[test]
    fn ckd_pub_matches_ckd_priv_public_key() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32).unwrap();

        let via_private = master.derive_path(&[1, 2, 3]).unwrap();
        let master_pub = master.neuter();
        let via_public = master_pub.derive_path(&[1, 2, 3]).unwrap();

        assert_eq!(via_private.public_key_sec(), via_public.public_key_sec());
        assert_eq!(via_private.envelope().chain_code, via_public.envelope().chain_code);
    }

    #[test]
    fn hardened_child_rejected_from_public_node() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master_pub = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32)
            .unwrap()
            .neuter();
        let err = master_pub.ckd(0 | HARDENED_BIT).unwrap_err();
        assert_eq!(err, NodeError::HardenedFromPublic);
    }

    #[test]
    fn fingerprint_matches_parent_after_derivation() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32).unwrap();
        let child = master.ckd(0).unwrap();
        assert!(child.parent_fingerprint_matches(&master));
        assert!(!child.parent_fingerprint_matches(&child));
    }

    #[test]
    fn serialize_parse_roundtrips() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32).unwrap();
        let bytes = master.serialize(None);
        let parsed = Node::parse(&bytes).unwrap();
        assert_eq!(parsed.serialize(None), bytes);
    }

    #[test]
    fn rejects_seed_outside_length_bounds() {
        let err = master_from_seed(&[0u8; 8], Network::Mainnet, Purpose::Bip32).unwrap_err();
        assert_eq!(err, NodeError::BadSeedLength(8));
    }

    #[test]
    fn display_renders_path() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32).unwrap();
        let child = master.derive_path(&[44 | HARDENED_BIT, 0 | HARDENED_BIT]).unwrap();
        assert_eq!(child.to_string(), "m/44'/0'");
    }

    #[test]
    fn serialize_infers_purpose_from_known_path() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32).unwrap();

        let bip49_account = master
            .derive_path(&[49 | HARDENED_BIT, 0 | HARDENED_BIT, 0 | HARDENED_BIT])
            .unwrap();
        assert!(bip49_account.to_extended_key_string(None).starts_with("yprv"));
        assert!(bip49_account
            .neuter()
            .to_extended_key_string(None)
            .starts_with("ypub"));

        let bip84_account = master
            .derive_path(&[84 | HARDENED_BIT, 0 | HARDENED_BIT, 0 | HARDENED_BIT])
            .unwrap();
        assert!(bip84_account.to_extended_key_string(None).starts_with("zprv"));
        assert!(bip84_account
            .neuter()
            .to_extended_key_string(None)
            .starts_with("zpub"));
    }

    #[test]
    fn serialize_override_takes_priority_over_inferred_purpose() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32).unwrap();
        let bip49_account = master
            .derive_path(&[49 | HARDENED_BIT, 0 | HARDENED_BIT, 0 | HARDENED_BIT])
            .unwrap();
        assert!(bip49_account
            .to_extended_key_string(Some(Purpose::Bip32))
            .starts_with("xprv"));
    }

    #[test]
    fn reserialized_parsed_key_preserves_its_own_version_prefix() {
        let seed = seed_from_hex("000102030405060708090a0b0c0d0e0f");
        let master = master_from_seed(&seed, Network::Mainnet, Purpose::Bip32).unwrap();
        let bip84_account = master
            .derive_path(&[84 | HARDENED_BIT, 0 | HARDENED_BIT, 0 | HARDENED_BIT])
            .unwrap()
            .neuter();
        let zpub = bip84_account.to_extended_key_string(None);
        assert!(zpub.starts_with("zpub"));

        // Re-parsing only knows the account's own child_number (0'), not
        // the 84'/0' ancestors -- purpose must come from the decoded
        // version prefix, not a (wrong) path-based guess.
        let reparsed = Node::from_extended_key_string(&zpub).unwrap();
        assert!(!reparsed.envelope().path_known_from_root);
        assert_eq!(reparsed.to_extended_key_string(None), zpub);
    }
}
