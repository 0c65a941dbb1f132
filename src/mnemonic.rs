//! # Mnemonic codec (C3, BIP-39)
//!
//! Entropy <-> checksum-padded bit string <-> 11-bit word indices <-> the
//! mnemonic sentence, plus seed derivation. A bit cursor walks the
//! entropy bytes (plus one appended checksum byte) directly rather than
//! building an intermediate bit string.

use std::collections::HashMap;
use std::sync::OnceLock;

use rand::RngCore;
use unicode_normalization::UnicodeNormalization;

use crate::error::MnemonicError;
use crate::primitives::sha256;

/// The 2048-word BIP-39 English wordlist, one word per line, shipped as
/// a static asset rather than fetched at runtime (spec: wordlist
/// fetching is an external collaborator, not core).
const WORDLIST_TEXT: &str = include_str!("bip39_english.txt");

fn wordlist() -> &'static [&'static str] {
    static WORDS: OnceLock<Vec<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| WORDLIST_TEXT.lines().collect())
}

fn word_index() -> &'static HashMap<&'static str, u16> {
    static INDEX: OnceLock<HashMap<&'static str, u16>> = OnceLock::new();
    INDEX.get_or_init(|| {
        wordlist()
            .iter()
            .enumerate()
            .map(|(i, w)| (*w, i as u16))
            .collect()
    })
}

/// The supported BIP-39 entropy strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyStrength {
    Bits128,
    Bits160,
    Bits192,
    Bits224,
    Bits256,
}

impl EntropyStrength {
    pub fn bits(self) -> u32 {
        match self {
            EntropyStrength::Bits128 => 128,
            EntropyStrength::Bits160 => 160,
            EntropyStrength::Bits192 => 192,
            EntropyStrength::Bits224 => 224,
            EntropyStrength::Bits256 => 256,
        }
    }

    fn from_bits(bits: u32) -> Result<Self, MnemonicError> {
        match bits {
            128 => Ok(EntropyStrength::Bits128),
            160 => Ok(EntropyStrength::Bits160),
            192 => Ok(EntropyStrength::Bits192),
            224 => Ok(EntropyStrength::Bits224),
            256 => Ok(EntropyStrength::Bits256),
            other => Err(MnemonicError::BadEntropyLength((other / 8) as usize)),
        }
    }

    fn word_count(self) -> usize {
        mnemonic_sentence_length(self.bits())
    }
}

/// `checksum_length` from BIP-39: `ENT / 32`.
fn checksum_length(entropy_bits: u32) -> u32 {
    entropy_bits / 32
}

/// `(ENT + CS) / 11`, the number of words a mnemonic of this entropy has.
fn mnemonic_sentence_length(entropy_bits: u32) -> usize {
    ((entropy_bits + checksum_length(entropy_bits)) / 11) as usize
}

fn entropy_bits_for_word_count(word_count: usize) -> Option<u32> {
    [128u32, 160, 192, 224, 256]
        .into_iter()
        .find(|&bits| mnemonic_sentence_length(bits) == word_count)
}

/// `entropy_to_mnemonic`: reject lengths outside {16,20,24,28,32} bytes,
/// append `ENT/32` checksum bits from `SHA-256(entropy)`, and split the
/// result into 11-bit word indices.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Vec<String>, MnemonicError> {
    let entropy_bits = match entropy.len() {
        16 | 20 | 24 | 28 | 32 => entropy.len() as u32 * 8,
        other => return Err(MnemonicError::BadEntropyLength(other)),
    };
    let cs_bits = checksum_length(entropy_bits);

    let checksum_byte = sha256(entropy)[0];
    let mut data = entropy.to_vec();
    data.push(checksum_byte);

    let total_bits = (entropy_bits + cs_bits) as usize;
    let words = wordlist();
    let mut out = Vec::with_capacity(total_bits / 11);
    let mut acc: u32 = 0;
    let mut acc_bits = 0u32;
    for bit_pos in 0..total_bits {
        let byte = data[bit_pos / 8];
        let bit = (byte >> (7 - (bit_pos % 8))) & 1;
        acc = (acc << 1) | bit as u32;
        acc_bits += 1;
        if acc_bits == 11 {
            out.push(words[acc as usize].to_string());
            acc = 0;
            acc_bits = 0;
        }
    }
    Ok(out)
}

/// Alias for [`entropy_to_mnemonic`] under BIP-39's own naming.
pub fn mnemonic_from_entropy(entropy: &[u8]) -> Result<Vec<String>, MnemonicError> {
    entropy_to_mnemonic(entropy)
}

/// Reverse of [`entropy_to_mnemonic`]: recover the entropy bytes from a
/// mnemonic, validating every word is known and the checksum matches.
pub fn mnemonic_to_entropy(mnemonic: &[String]) -> Result<Vec<u8>, MnemonicError> {
    let entropy_bits = entropy_bits_for_word_count(mnemonic.len())
        .ok_or(MnemonicError::BadWordCount(mnemonic.len()))?;
    let cs_bits = checksum_length(entropy_bits);
    let index = word_index();

    let mut indices = Vec::with_capacity(mnemonic.len());
    for word in mnemonic {
        let idx = *index
            .get(word.as_str())
            .ok_or_else(|| MnemonicError::UnknownWord(word.clone()))?;
        indices.push(idx);
    }

    let total_bits = (entropy_bits + cs_bits) as usize;
    let mut bits = vec![false; total_bits];
    for (word_pos, idx) in indices.iter().enumerate() {
        for bit_pos in 0..11 {
            bits[word_pos * 11 + bit_pos] = (idx >> (10 - bit_pos)) & 1 == 1;
        }
    }

    let entropy_byte_len = (entropy_bits / 8) as usize;
    let mut entropy = vec![0u8; entropy_byte_len];
    for (i, byte) in entropy.iter_mut().enumerate() {
        let mut v = 0u8;
        for b in 0..8 {
            v = (v << 1) | bits[i * 8 + b] as u8;
        }
        *byte = v;
    }

    let checksum_byte = sha256(&entropy)[0];
    for b in 0..cs_bits as usize {
        let expected = (checksum_byte >> (7 - b)) & 1 == 1;
        if bits[entropy_byte_len * 8 + b] != expected {
            return Err(MnemonicError::BadChecksum);
        }
    }

    Ok(entropy)
}

/// `validate_mnemonic`: reverse the encoding and verify the checksum.
pub fn validate_mnemonic(mnemonic: &[String]) -> Result<(), MnemonicError> {
    mnemonic_to_entropy(mnemonic).map(|_| ())
}

/// `mnemonic_to_seed`: `PBKDF2-HMAC-SHA512(password = NFKD(mnemonic),
/// salt = "mnemonic" || NFKD(passphrase), iterations = 2048, dkLen = 64)`.
///
/// Note the mnemonic is the PBKDF2 password, the passphrase is folded
/// into the salt -- a detail easy to get backwards.
pub fn mnemonic_to_seed(mnemonic: &[String], passphrase: &str) -> [u8; 64] {
    let sentence: String = mnemonic.join(" ");
    let password: String = sentence.nfkd().collect();
    let passphrase_norm: String = passphrase.nfkd().collect();
    let mut salt = String::from("mnemonic");
    salt.push_str(&passphrase_norm);

    crate::primitives::pbkdf2_hmac_sha512(password.as_bytes(), salt.as_bytes(), 2048)
}

/// Draw `bits` of CSPRNG entropy and encode it as a mnemonic.
pub fn random_mnemonic(bits: u32) -> Result<Vec<String>, MnemonicError> {
    let strength = EntropyStrength::from_bits(bits)?;
    let mut entropy = vec![0u8; (strength.bits() / 8) as usize];
    rand::rngs::OsRng.fill_bytes(&mut entropy);
    entropy_to_mnemonic(&entropy)
}

/// Convenience wrapper taking a typed strength rather than a raw bit count.
pub fn generate_mnemonic(strength: EntropyStrength) -> Result<Vec<String>, MnemonicError> {
    let _ = strength.word_count(); // validates the strength is well-formed
    random_mnemonic(strength.bits())
}
