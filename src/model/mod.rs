// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Immutable model values loaded from an inference artifact.
//!
//! Variables, dimensions and sample arrays never change after load; the only per-cell
//! mutable value here is the [`CoordinateSlice`].

pub mod coords;
pub mod dimension;
pub mod ids;
pub mod samples;
pub mod space;
pub mod variable;

pub use coords::{AxisPositions, CoordinateSlice};
pub use dimension::{CoordValue, Dimension, DimensionSplit};
pub use ids::{CellId, DimName, IdError, Name, VarName};
pub use samples::{padded_range, LayoutError, SampleArray};
pub use space::{ParseSpaceError, Space};
pub use variable::{DistributionKind, Variable, VariableKind};
