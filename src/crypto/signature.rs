// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM signature verification.
//!
//! The claimed identity is an address, so verification recovers the signing
//! address from the EIP-191 prefixed message hash and compares it with the
//! claim. Signature-format errors, wrong-curve errors, and plain
//! verification failures are all the same externally observable outcome:
//! `false`. Nothing here ever errors past this boundary.

use std::str::FromStr;

use alloy::primitives::{Address, Signature};

/// Check that `signature_hex` is a valid EIP-191 signature over `message`
/// produced by the key behind `claimed_address`.
///
/// Pure function of its inputs; no side effects.
pub fn verify_signature(message: &str, signature_hex: &str, claimed_address: &str) -> bool {
    let Ok(signature) = Signature::from_str(signature_hex) else {
        return false;
    };
    let Ok(claimed) = Address::from_str(claimed_address) else {
        return false;
    };

    match signature.recover_address_from_msg(message) {
        Ok(recovered) => recovered == claimed,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    fn sign(message: &str) -> (String, String) {
        let signer = PrivateKeySigner::random();
        let signature = signer
            .sign_message_sync(message.as_bytes())
            .expect("signing cannot fail");
        let signature_hex = format!("0x{}", alloy::hex::encode(signature.as_bytes()));
        (signature_hex, signer.address().to_string())
    }

    #[test]
    fn valid_signature_verifies() {
        let message = "a5c3f2...challenge";
        let (signature, address) = sign(message);
        assert!(verify_signature(message, &signature, &address));
    }

    #[test]
    fn different_message_fails() {
        let (signature, address) = sign("issued-challenge");
        assert!(!verify_signature("some-other-string", &signature, &address));
    }

    #[test]
    fn one_bit_signature_perturbation_fails() {
        let message = "challenge";
        let (signature, address) = sign(message);

        let mut bytes = alloy::hex::decode(&signature).unwrap();
        bytes[10] ^= 0x01;
        let perturbed = format!("0x{}", alloy::hex::encode(bytes));
        assert!(!verify_signature(message, &perturbed, &address));
    }

    #[test]
    fn wrong_address_fails() {
        let message = "challenge";
        let (signature, _) = sign(message);
        let other = PrivateKeySigner::random().address().to_string();
        assert!(!verify_signature(message, &signature, &other));
    }

    #[test]
    fn malformed_inputs_are_false_not_errors() {
        assert!(!verify_signature("m", "not-hex", "0x0000000000000000000000000000000000000001"));
        assert!(!verify_signature("m", "0xdeadbeef", "0x0000000000000000000000000000000000000001"));
        let (signature, _) = sign("m");
        assert!(!verify_signature("m", &signature, "not-an-address"));
        assert!(!verify_signature("m", "", ""));
    }
}
