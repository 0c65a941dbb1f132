//! # Error Types
//!
//! Error handling for the key-derivation core, factored by subsystem so
//! callers can match on the kind of failure rather than a single flat
//! variant. See [`Error`] for the crate-level union used at the public
//! API boundary (wallet facade, node parsing/derivation).

use thiserror::Error;

/// Errors from the BIP-39 mnemonic codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    /// Entropy length was not one of 16/20/24/28/32 bytes.
    #[error("entropy must be 16, 20, 24, 28, or 32 bytes, got {0}")]
    BadEntropyLength(usize),

    /// A word in the mnemonic is not present in the wordlist.
    #[error("word {0:?} is not in the wordlist")]
    UnknownWord(String),

    /// The mnemonic's sentence length does not correspond to any valid
    /// entropy length (must be 12/15/18/21/24 words).
    #[error("mnemonic has {0} words, expected 12, 15, 18, 21, or 24")]
    BadWordCount(usize),

    /// The trailing checksum bits did not match SHA-256(entropy).
    #[error("mnemonic checksum does not match its entropy")]
    BadChecksum,
}

/// Errors from master-key derivation and child-key derivation (CKD).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// Seed was outside the 16-64 byte range BIP-32 allows.
    #[error("seed must be 16-64 bytes, got {0}")]
    BadSeedLength(usize),

    /// Master scalar was zero or >= the curve order; caller should
    /// retry with different seed material per BIP-32.
    #[error("master key is invalid (zero or >= curve order)")]
    InvalidMasterKey,

    /// `IL >= curve order`, the resulting private scalar was zero, or
    /// the resulting public point was the point at infinity. Caller
    /// should retry at the next index per BIP-32.
    #[error("child key at this index is invalid, retry at index + 1")]
    InvalidChild,

    /// A hardened child (index >= 2^31) was requested from a
    /// public-only node.
    #[error("cannot derive a hardened child from a public key")]
    HardenedFromPublic,

    /// Derivation would push `depth` past 255.
    #[error("derivation path exceeds the maximum depth of 255")]
    DepthOverflow,
}

/// Errors from extended-key (xprv/xpub/...) parsing and serialization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtendedKeyError {
    /// Base58check checksum did not match.
    #[error("base58check checksum mismatch")]
    BadChecksum,

    /// Decoded payload was not exactly 78 bytes.
    #[error("extended key must decode to 78 bytes, got {0}")]
    BadLength(usize),

    /// A private extended key's key-material byte was not 0x00.
    #[error("private extended key must have a leading 0x00 byte")]
    BadKeyPrefix,

    /// The 4-byte version prefix is not in the registry.
    #[error("unknown extended key version 0x{0:08x}")]
    UnknownVersion(u32),

    /// Depth 0 did not carry a zero parent fingerprint and index, or a
    /// nonzero depth carried a zero parent fingerprint.
    #[error("master node has a nonzero index/parent fingerprint, or a non-master node has depth 0")]
    InconsistentMaster,

    /// The embedded key material was not a valid point/scalar.
    #[error("invalid key material in extended key: {0}")]
    InvalidKeyMaterial(String),
}

/// Errors from the textual derivation-path grammar (`m/44'/0'/0'/0/1`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path did not start with `m` or `M`.
    #[error("path must start with 'm' or 'M'")]
    BadRoot,

    /// A path component was not a decimal integer (with optional `'`/`h` suffix).
    #[error("invalid path component: {0:?}")]
    BadComponent(String),

    /// A component's raw index, including the hardening bit, overflowed u32.
    #[error("path component {0:?} is out of range")]
    OutOfRange(String),
}

/// Crate-level error, the union of all subsystem errors. Returned by
/// the wallet facade and any function that can fail in more than one
/// subsystem in a single call (e.g. `derive_path` which can hit both
/// `NodeError` and path decoding).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    ExtendedKey(#[from] ExtendedKeyError),

    #[error(transparent)]
    Path(#[from] PathError),

    /// An external collaborator (address encoder, WIF encoder) has no
    /// implementation wired in.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

pub type Result<T> = std::result::Result<T, Error>;
