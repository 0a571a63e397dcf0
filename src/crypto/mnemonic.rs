// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Encrypted mnemonic transport and deterministic wallet derivation.
//!
//! Mnemonics arrive as base64 of `IV (16 bytes) || AES-256-CBC ciphertext`,
//! encrypted under a shared static key from configuration. After decryption
//! the phrase is validated against the BIP-39 wordlist and checksum, then
//! derived at the Ethereum default path (m/44'/60'/0'/0/0). Derivation is
//! deterministic: the same phrase always yields the same key pair.
//!
//! The plaintext phrase exists only inside this module's call frames. It is
//! never stored, logged, or echoed in error text.

use aes::Aes256;
use alloy::signers::local::{
    coins_bip39::{English, Mnemonic},
    MnemonicBuilder,
};
use base64ct::{Base64, Encoding};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};

use crate::config::ENCRYPTION_KEY_LEN;

type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// CBC initialization vector length (the cipher's block size).
pub const IV_LEN: usize = 16;

/// Errors produced by the codec.
///
/// Decryption failures deliberately carry no detail about which step broke:
/// padding oracles live in error messages.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Bad base64, truncated payload, wrong key length, or bad padding.
    #[error("failed to decrypt payload")]
    Decryption,

    /// The phrase failed BIP-39 wordlist/checksum validation.
    #[error("invalid mnemonic phrase")]
    InvalidMnemonic,

    /// HD derivation failed after a phrase passed validation.
    #[error("wallet derivation failed")]
    Derivation,
}

/// A key pair derived from a validated mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedWallet {
    /// EIP-55 checksummed address.
    pub address: String,
    /// 0x-prefixed hex private key.
    pub private_key: String,
}

/// Decrypts transport payloads and derives wallets from the plaintext.
#[derive(Clone)]
pub struct MnemonicCodec {
    key: [u8; ENCRYPTION_KEY_LEN],
}

impl MnemonicCodec {
    /// Create a codec over the configured AES-256 transport key.
    pub fn new(key: [u8; ENCRYPTION_KEY_LEN]) -> Self {
        Self { key }
    }

    /// Decrypt a base64 `IV || ciphertext` payload to UTF-8 text.
    ///
    /// Any malformation fails with [`CodecError::Decryption`] instead of
    /// producing garbage silently.
    pub fn decrypt(&self, payload_b64: &str) -> Result<String, CodecError> {
        let payload = Base64::decode_vec(payload_b64).map_err(|_| CodecError::Decryption)?;
        if payload.len() <= IV_LEN {
            return Err(CodecError::Decryption);
        }

        let (iv, ciphertext) = payload.split_at(IV_LEN);
        let decryptor =
            Aes256CbcDec::new_from_slices(&self.key, iv).map_err(|_| CodecError::Decryption)?;
        let plaintext = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CodecError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CodecError::Decryption)
    }

    /// Check a phrase against the BIP-39 wordlist and checksum bits.
    pub fn validate(&self, phrase: &str) -> bool {
        Mnemonic::<English>::new_from_phrase(phrase).is_ok()
    }

    /// Derive the wallet at m/44'/60'/0'/0/0 from a mnemonic phrase.
    ///
    /// Rejects invalid-checksum phrases before any derivation happens.
    pub fn derive(&self, phrase: &str) -> Result<DerivedWallet, CodecError> {
        if !self.validate(phrase) {
            return Err(CodecError::InvalidMnemonic);
        }

        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .index(0)
            .map_err(|_| CodecError::Derivation)?
            .build()
            .map_err(|_| CodecError::Derivation)?;

        Ok(DerivedWallet {
            address: signer.address().to_string(),
            private_key: format!("0x{}", alloy::hex::encode(signer.to_bytes())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbc::cipher::BlockEncryptMut;

    type Aes256CbcEnc = cbc::Encryptor<Aes256>;

    const TEST_KEY: [u8; 32] = [0x42; 32];

    /// Well-known development mnemonic (Hardhat account zero).
    const KNOWN_PHRASE: &str =
        "test test test test test test test test test test test junk";
    const KNOWN_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const KNOWN_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn encrypt(plaintext: &str, key: &[u8; 32]) -> String {
        let iv = [0x07u8; IV_LEN];
        let ciphertext = Aes256CbcEnc::new_from_slices(key, &iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut payload = iv.to_vec();
        payload.extend_from_slice(&ciphertext);
        Base64::encode_string(&payload)
    }

    #[test]
    fn decrypt_round_trips_arbitrary_plaintext() {
        let codec = MnemonicCodec::new(TEST_KEY);
        for plaintext in ["", "a", "exactly sixteen!", KNOWN_PHRASE, "üñïçødé text"] {
            let payload = encrypt(plaintext, &TEST_KEY);
            assert_eq!(codec.decrypt(&payload).unwrap(), plaintext);
        }
    }

    #[test]
    fn decrypt_rejects_bad_base64() {
        let codec = MnemonicCodec::new(TEST_KEY);
        assert!(matches!(
            codec.decrypt("not!!valid@@base64"),
            Err(CodecError::Decryption)
        ));
    }

    #[test]
    fn decrypt_rejects_truncated_payload() {
        let codec = MnemonicCodec::new(TEST_KEY);
        // Shorter than one IV.
        let short = Base64::encode_string(&[0u8; 8]);
        assert!(matches!(codec.decrypt(&short), Err(CodecError::Decryption)));
        // IV only, no ciphertext.
        let iv_only = Base64::encode_string(&[0u8; IV_LEN]);
        assert!(matches!(codec.decrypt(&iv_only), Err(CodecError::Decryption)));
    }

    #[test]
    fn decrypt_rejects_partial_block_ciphertext() {
        let codec = MnemonicCodec::new(TEST_KEY);
        // IV plus five bytes: not a whole 16-byte block, so CBC cannot
        // even begin to unpad it.
        let mut payload = vec![0u8; IV_LEN];
        payload.extend_from_slice(&[1, 2, 3, 4, 5]);
        let encoded = Base64::encode_string(&payload);
        assert!(matches!(codec.decrypt(&encoded), Err(CodecError::Decryption)));
    }

    #[test]
    fn decrypt_rejects_wrong_key() {
        let payload = encrypt(KNOWN_PHRASE, &TEST_KEY);
        let other = MnemonicCodec::new([0x13; 32]);
        // Wrong key shows up as a padding failure.
        assert!(matches!(other.decrypt(&payload), Err(CodecError::Decryption)));
    }

    #[test]
    fn validate_accepts_checksummed_phrases() {
        let codec = MnemonicCodec::new(TEST_KEY);
        assert!(codec.validate(KNOWN_PHRASE));
        assert!(codec.validate(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
        ));
    }

    #[test]
    fn validate_rejects_bad_checksum_and_unknown_words() {
        let codec = MnemonicCodec::new(TEST_KEY);
        // Twelve valid words, invalid checksum bits.
        assert!(!codec.validate(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
        ));
        assert!(!codec.validate("definitely not a mnemonic"));
        assert!(!codec.validate(""));
    }

    #[test]
    fn derive_is_deterministic_and_matches_known_vector() {
        let codec = MnemonicCodec::new(TEST_KEY);
        let first = codec.derive(KNOWN_PHRASE).unwrap();
        let second = codec.derive(KNOWN_PHRASE).unwrap();
        assert_eq!(first, second);

        assert!(first.address.eq_ignore_ascii_case(KNOWN_ADDRESS));
        assert_eq!(first.private_key, KNOWN_PRIVATE_KEY);
    }

    #[test]
    fn derive_rejects_invalid_phrase_before_derivation() {
        let codec = MnemonicCodec::new(TEST_KEY);
        let result = codec.derive(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon",
        );
        assert!(matches!(result, Err(CodecError::InvalidMnemonic)));
    }
}
