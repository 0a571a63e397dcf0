// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-use challenge generation.
//!
//! Challenges are 32 bytes of OS entropy, hex-encoded. With 256 bits per
//! draw, concurrently open sessions cannot collide with non-negligible
//! probability. An entropy-source failure is fatal to the request, not
//! silently degraded.

use rand::{rngs::OsRng, RngCore};

/// Challenge length in raw bytes (256 bits of entropy).
pub const CHALLENGE_LEN: usize = 32;

/// Generate a fresh hex-encoded challenge value.
pub fn generate_challenge() -> Result<String, rand::Error> {
    let mut bytes = [0u8; CHALLENGE_LEN];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(alloy::hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn challenge_is_hex_of_expected_length() {
        let challenge = generate_challenge().unwrap();
        assert_eq!(challenge.len(), CHALLENGE_LEN * 2);
        assert!(challenge.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn challenges_do_not_collide() {
        let mut seen = HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(generate_challenge().unwrap()));
        }
    }
}
