// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Brushlink: linked brushing over prior and posterior samples of a Bayesian model.
//!
//! An inference artifact is laid out as a grid of cells, one per model variable. Brushing a
//! range on one cell restricts every cell of the same sample space to the matching draws;
//! coordinate selectors are shared across cells by dimension name.

pub mod artifact;
pub mod cell;
pub mod diagram;
pub mod grid;
pub mod interaction;
pub mod logging;
pub mod mcp;
pub mod model;
