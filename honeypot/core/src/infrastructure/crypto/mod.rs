// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod download_token;
pub mod fingerprint;

pub use download_token::DownloadTokenSigner;
pub use fingerprint::fingerprint;
