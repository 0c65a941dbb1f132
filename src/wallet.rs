//! # Wallet facade (C7)
//!
//! Ties the mnemonic codec, master/child derivation, and BIP-43 purpose
//! paths together into the handful of entry points a caller actually
//! wants: build from a mnemonic, raw entropy, a seed, or an already
//! parsed extended key, then walk BIP-44/49/84 address rows over a
//! caller-chosen index range.

use crate::error::{Error, NodeError};
use crate::mnemonic;
use crate::node::{Node, HARDENED_BIT};
use crate::version::{Network, Purpose};

/// External accounting/change chain, BIP-44 §"Change".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    External,
    Internal,
}

impl Chain {
    fn index(self) -> u32 {
        match self {
            Chain::External => 0,
            Chain::Internal => 1,
        }
    }
}

/// One row of a generated address chain: its full derivation path, the
/// derived node, and convenience accessors a caller renders into an
/// address/WIF via its own [`crate::codecs::AddressEncoder`]/
/// [`crate::codecs::WifEncoder`].
#[derive(Debug, Clone)]
pub struct AddressRow {
    pub path: Vec<u32>,
    pub node: Node,
}

impl AddressRow {
    pub fn public_key_sec(&self) -> [u8; 33] {
        self.node.public_key_sec()
    }

    /// The 32-byte private key, when this row's node carries one.
    pub fn private_key_bytes(&self) -> Option<[u8; 32]> {
        match &self.node {
            Node::Private { private_key, .. } => Some(private_key.secret_bytes()),
            Node::Public { .. } => None,
        }
    }

    /// Render `(path, address, public_sec_hex, wif_or_none)`, delegating
    /// address/WIF rendering to caller-supplied encoders. `wif_or_none`
    /// is `None` whenever this row has no private key material, even
    /// if a WIF encoder was supplied.
    pub fn to_tuple(
        &self,
        network: Network,
        address_encoder: &dyn crate::codecs::AddressEncoder,
        wif_encoder: &dyn crate::codecs::WifEncoder,
    ) -> (String, String, String, Option<String>) {
        let public_sec = self.public_key_sec();
        let path_string = crate::path::format_path(self.node.is_private(), &self.path);
        let address = address_encoder.encode(&public_sec, network);
        let public_sec_hex = hex::encode(public_sec);
        let wif = self
            .private_key_bytes()
            .map(|sk| wif_encoder.encode(&sk, network));
        (path_string, address, public_sec_hex, wif)
    }
}

/// A wallet built around a single root node (private or public-only)
/// per network, equivalent to a cold-storage wallet that can derive
/// either spending keys or watch-only address rows.
pub struct Wallet {
    network: Network,
    master: Node,
}

impl Wallet {
    /// Build from a BIP-39 mnemonic and optional passphrase.
    pub fn from_mnemonic(
        mnemonic_words: &[String],
        passphrase: &str,
        network: Network,
    ) -> Result<Wallet, Error> {
        mnemonic::validate_mnemonic(mnemonic_words)?;
        let seed = mnemonic::mnemonic_to_seed(mnemonic_words, passphrase);
        Self::from_seed(&seed, network)
    }

    /// Build from raw BIP-39 entropy (encoding it to a mnemonic first,
    /// then deriving the seed) rather than an already-generated
    /// mnemonic sentence.
    pub fn from_entropy(entropy: &[u8], passphrase: &str, network: Network) -> Result<Wallet, Error> {
        let words = mnemonic::entropy_to_mnemonic(entropy)?;
        Self::from_mnemonic(&words, passphrase, network)
    }

    /// Build directly from a BIP-32 seed (16-64 bytes), skipping the
    /// mnemonic layer entirely.
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Wallet, Error> {
        let master = crate::node::master_from_seed(seed, network, Purpose::Bip32)?;
        Ok(Wallet { network, master })
    }

    /// Build from an already-serialized extended key (xprv/xpub/.../
    /// zpub), private or public. The network is read from the key's
    /// own version prefix, not passed separately.
    pub fn from_extended_key(extended_key: &str) -> Result<Wallet, Error> {
        let master = Node::from_extended_key_string(extended_key)?;
        let network = master.envelope().network;
        Ok(Wallet { network, master })
    }

    /// True when this wallet holds only public key material -- it can
    /// derive non-hardened address rows but cannot sign or derive any
    /// hardened path (account-level BIP-44/49/84 paths included).
    pub fn watch_only(&self) -> bool {
        !self.master.is_private()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    fn coin_type(&self) -> u32 {
        match self.network {
            Network::Mainnet => 0,
            Network::Testnet => 1,
        }
    }

    /// Derive the BIP-44/49/84 account root for `purpose`/`account`,
    /// i.e. `m/purpose'/coin_type'/account'`. Requires private key
    /// material, since every component is hardened.
    fn account_root(&self, purpose: Purpose, account: u32) -> Result<Node, NodeError> {
        if self.watch_only() {
            return Err(NodeError::HardenedFromPublic);
        }
        let purpose_index = match purpose {
            Purpose::Bip32 => 44,
            Purpose::Bip49 => 49,
            Purpose::Bip84 => 84,
        };
        self.master.derive_path(&[
            purpose_index | HARDENED_BIT,
            self.coin_type() | HARDENED_BIT,
            account | HARDENED_BIT,
        ])
    }

    /// Derive every address row `m/purpose'/coin_type'/account'/chain/i`
    /// for `i` in `range`, for a single purpose.
    ///
    /// A watch-only wallet (built from a public extended key, see
    /// [`Wallet::from_extended_key`]) has no hardened key material to
    /// re-derive `m/purpose'/coin_type'/account'` from, so `self.master`
    /// is treated as already being that account root and `chain/i` are
    /// derived directly from it instead (`account` is then ignored, as
    /// there is no way to reach a different account from a public key).
    pub fn addresses(
        &self,
        purpose: Purpose,
        account: u32,
        chain: Chain,
        range: std::ops::Range<u32>,
    ) -> Result<Vec<AddressRow>, Error> {
        let account_root = if self.watch_only() {
            self.master.clone()
        } else {
            self.account_root(purpose, account)?
        };
        let chain_node = account_root.ckd(chain.index())?;

        let mut rows = Vec::with_capacity(range.len());
        for index in range {
            let node = chain_node.ckd(index)?;
            let mut path = account_root.envelope().path.clone();
            path.push(chain.index());
            path.push(index);
            rows.push(AddressRow { path, node });
        }
        Ok(rows)
    }

    /// The account-level extended public key for `purpose`/`account`,
    /// i.e. what a watch-only wallet is handed so it can derive
    /// [`Wallet::addresses`] without ever seeing the private key.
    pub fn account_xpub(&self, purpose: Purpose, account: u32) -> Result<Node, Error> {
        Ok(self.account_root(purpose, account)?.neuter())
    }

    /// BIP-44 (legacy P2PKH) rows over the default `0..20` range.
    pub fn bip44(&self, account: u32, chain: Chain) -> Result<Vec<AddressRow>, Error> {
        self.addresses(Purpose::Bip32, account, chain, 0..20)
    }

    /// BIP-49 (P2SH-wrapped P2WPKH) rows over the default `0..20` range.
    pub fn bip49(&self, account: u32, chain: Chain) -> Result<Vec<AddressRow>, Error> {
        self.addresses(Purpose::Bip49, account, chain, 0..20)
    }

    /// BIP-84 (native P2WPKH) rows over the default `0..20` range.
    pub fn bip84(&self, account: u32, chain: Chain) -> Result<Vec<AddressRow>, Error> {
        self.addresses(Purpose::Bip84, account, chain, 0..20)
    }

    /// All three standard purposes' external-chain rows for account 0,
    /// the combined view a cold-storage backup sheet would show.
    pub fn generate(&self) -> Result<GeneratedRows, Error> {
        Ok(GeneratedRows {
            bip44: self.bip44(0, Chain::External)?,
            bip49: self.bip49(0, Chain::External)?,
            bip84: self.bip84(0, Chain::External)?,
        })
    }
}

/// The combined output of [`Wallet::generate`].
pub struct GeneratedRows {
    pub bip44: Vec<AddressRow>,
    pub bip49: Vec<AddressRow>,
    pub bip84: Vec<AddressRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_mnemonic() -> Vec<String> {
        crate::mnemonic::entropy_to_mnemonic(&[0u8; 16]).unwrap()
    }

    #[test]
    fn wallet_from_mnemonic_is_not_watch_only() {
        let wallet = Wallet::from_mnemonic(&test_mnemonic(), "", Network::Mainnet).unwrap();
        assert!(!wallet.watch_only());
    }

    #[test]
    fn bip44_rows_have_expected_count_and_paths() {
        let wallet = Wallet::from_mnemonic(&test_mnemonic(), "", Network::Mainnet).unwrap();
        let rows = wallet.bip44(0, Chain::External).unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(
            rows[0].path,
            vec![44 | HARDENED_BIT, 0 | HARDENED_BIT, 0 | HARDENED_BIT, 0, 0]
        );
        assert_eq!(
            rows[5].path,
            vec![44 | HARDENED_BIT, 0 | HARDENED_BIT, 0 | HARDENED_BIT, 0, 5]
        );
    }

    #[test]
    fn to_tuple_reports_no_wif_for_public_only_rows() {
        use crate::codecs::UnimplementedCodec;

        let wallet = Wallet::from_mnemonic(&test_mnemonic(), "", Network::Mainnet).unwrap();
        let private_row = wallet.bip44(0, Chain::External).unwrap().remove(0);
        let (path, _, _, wif) =
            private_row.to_tuple(Network::Mainnet, &UnimplementedCodec, &UnimplementedCodec);
        assert_eq!(path, "m/44'/0'/0'/0/0");
        assert!(wif.is_some());

        let account_xpub = wallet.account_xpub(Purpose::Bip32, 0).unwrap();
        let watch_only = Wallet {
            network: wallet.network(),
            master: account_xpub,
        };
        let public_row = AddressRow {
            path: vec![44 | HARDENED_BIT, 0 | HARDENED_BIT, 0 | HARDENED_BIT, 0, 0],
            node: watch_only.master.derive_path(&[0, 0]).unwrap(),
        };
        let (_, _, _, wif) =
            public_row.to_tuple(Network::Mainnet, &UnimplementedCodec, &UnimplementedCodec);
        assert!(wif.is_none());
    }

    #[test]
    fn testnet_uses_coin_type_one() {
        let wallet = Wallet::from_mnemonic(&test_mnemonic(), "", Network::Testnet).unwrap();
        let rows = wallet.bip44(0, Chain::External).unwrap();
        assert_eq!(rows[0].path[1], 1 | HARDENED_BIT);
    }

    #[test]
    fn account_xpub_is_watch_only_and_matches_public_derivation() {
        let wallet = Wallet::from_mnemonic(&test_mnemonic(), "", Network::Mainnet).unwrap();
        let account_xpub = wallet.account_xpub(Purpose::Bip32, 0).unwrap();
        assert!(!account_xpub.is_private());

        let watch_only = Wallet {
            network: wallet.network(),
            master: account_xpub,
        };
        // The account xpub is already at depth 3 (m/44'/0'/0'); deriving
        // external-chain addresses from it needs only chain/index, both
        // non-hardened, which a public node can do.
        let node = watch_only.master.derive_path(&[0, 0]).unwrap();
        let direct = wallet.bip44(0, Chain::External).unwrap();
        assert_eq!(node.public_key_sec(), direct[0].public_key_sec());
    }

    #[test]
    fn generate_combines_all_three_purposes() {
        let wallet = Wallet::from_mnemonic(&test_mnemonic(), "", Network::Mainnet).unwrap();
        let rows = wallet.generate().unwrap();
        assert_eq!(rows.bip44.len(), 20);
        assert_eq!(rows.bip49.len(), 20);
        assert_eq!(rows.bip84.len(), 20);
    }

    #[test]
    fn watch_only_wallet_derives_addresses_from_its_account_xpub() {
        let wallet = Wallet::from_mnemonic(&test_mnemonic(), "", Network::Mainnet).unwrap();
        let account_xpub = wallet.account_xpub(Purpose::Bip32, 0).unwrap();
        let watch_only = Wallet {
            network: wallet.network(),
            master: account_xpub,
        };
        assert!(watch_only.watch_only());

        // The watch-only wallet has no hardened key material, so it can
        // only ever serve the account it was handed -- the `account`
        // argument is moot and every purpose/account combination reads
        // off the same public master.
        let rows = watch_only.bip44(1, Chain::External).unwrap();
        let direct = wallet.bip44(0, Chain::External).unwrap();
        assert_eq!(rows.len(), direct.len());
        assert_eq!(rows[0].public_key_sec(), direct[0].public_key_sec());
        assert!(rows[0].private_key_bytes().is_none());
    }
}
