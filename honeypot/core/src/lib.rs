// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! kubetrap core
//!
//! A decoy Kubernetes tool server. Agents that call `kubeconfig_get` are
//! recorded (salted fingerprints only) and handed a short-lived link to a
//! decoy kubeconfig.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain, application services, adapters and HTTP surface

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
