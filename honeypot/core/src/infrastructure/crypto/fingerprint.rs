// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use sha2::{Digest, Sha256};

/// Salted one-way fingerprint of an identifier.
///
/// Computes lowercase hex `sha256("{salt}:{value}")`. An empty `value` maps to
/// an empty fingerprint so absent identifiers stay visibly absent.
pub fn fingerprint(value: &str, salt: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}
