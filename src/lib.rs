//! # hd-keytree
//!
//! A hierarchical-deterministic key-derivation core covering BIP-32
//! (master/child derivation and extended-key serialization), BIP-39
//! (mnemonic encoding and seed derivation), and the BIP-43/44/49/84
//! standard derivation paths and version-byte registry.
//!
//! This crate derives keys; it does not sign transactions, does not
//! talk to a network, and does not persist anything. Address
//! rendering and WIF encoding are left to the caller via the
//! [`codecs::AddressEncoder`]/[`codecs::WifEncoder`] traits, since
//! those are chain- and format-specific decisions this core has no
//! opinion on.
//!
//! ## Quick start
//!
//! ```rust
//! use hd_keytree::{Wallet, Network, Chain};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let words = hd_keytree::mnemonic::generate_mnemonic(hd_keytree::EntropyStrength::Bits128)?;
//! let wallet = Wallet::from_mnemonic(&words, "", Network::Mainnet)?;
//! let rows = wallet.bip84(0, Chain::External)?;
//! assert_eq!(rows.len(), 20);
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`primitives`]: hashing/HMAC/KDF building blocks.
//! - [`mnemonic`]: BIP-39 entropy <-> mnemonic <-> seed.
//! - [`version`]: the closed version-byte registry (xprv/xpub/...).
//! - [`path`]: the `m/44'/0'/0'/0/0` textual path grammar.
//! - [`node`]: master/child derivation and extended-key codec.
//! - [`wallet`]: the facade tying the above into address-row generation.
//! - [`codecs`]: base58check and address/WIF encoder stubs.
//! - [`error`]: the per-subsystem error taxonomy.

pub mod codecs;
pub mod error;
pub mod mnemonic;
pub mod node;
pub mod path;
pub mod primitives;
pub mod version;
pub mod wallet;

pub use error::{Error, ExtendedKeyError, MnemonicError, NodeError, PathError, Result};
pub use mnemonic::EntropyStrength;
pub use node::Node;
pub use version::{KeyKind, Network, Purpose};
pub use wallet::{AddressRow, Chain, Wallet};
