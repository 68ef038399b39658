// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{CoordinateSlice, Space};

/// Closed numeric range `[min, max]` drawn on a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XRange {
    min: f64,
    max: f64,
}

impl XRange {
    /// Reversed bounds are swapped; NaN bounds are rejected.
    pub fn new(a: f64, b: f64) -> Option<Self> {
        if a.is_nan() || b.is_nan() {
            return None;
        }
        Some(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One active selection of a variable in a space.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub range: XRange,
    /// The cell's coordinates when the box was drawn.
    pub coordinates: CoordinateSlice,
    /// Space the box was drawn in; other spaces received it by propagation.
    pub origin: Space,
}
