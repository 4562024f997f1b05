// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`kubetrap-core`)
//!
//! HTTP surface that translates external requests into application service
//! calls. Decisions are made in `crate::application`.
//!
//! | Module | Route | Description |
//! |--------|-------|-------------|
//! | [`api`] | `/`, `/health` | Router, shared state, liveness |
//! | [`mcp`] | `POST /mcp` | JSON-RPC 2.0 tool protocol |
//! | [`download`] | `GET /download/kubeconfig` | Token redemption |
//! | [`error`] | | HTTP error mapping |

pub mod api;
pub mod download;
pub mod error;
pub mod mcp;

pub use api::{app, AppState};
