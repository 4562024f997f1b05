// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod simulation;
pub mod tool_invocation_service;
pub mod trap_service;

pub use tool_invocation_service::{ToolError, ToolInvocationService, ToolMetadata};
pub use trap_service::{TrapError, TrapService};
