// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Pure types for the trap: invocation and outcome, download token payload,
//! telemetry events, the artifact store contract and configuration.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Types and contracts with no I/O

pub mod artifact;
pub mod config;
pub mod download_token;
pub mod events;
pub mod trap;
