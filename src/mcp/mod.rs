// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Exposes interaction events and read-only views of a diagram as tools, so an agent can
//! brush, move coordinates and read the resulting masks.

mod server;
mod types;

pub use server::{describe, BrushlinkMcp};
pub use types::DiagramDescribeResponse;
