// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::dimension::{CoordValue, Dimension, DimensionSplit};
use super::ids::DimName;

/// Axis positions selecting one slice of a sample array (draw axis excluded).
pub type AxisPositions = SmallVec<[usize; 4]>;

/// The coordinate value currently chosen for each selector of a cell.
///
/// Keys are selector names: the dimension name for simple dimensions, the outer and inner
/// names for composite `A_idx_B` dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateSlice {
    values: BTreeMap<DimName, CoordValue>,
}

impl CoordinateSlice {
    /// Every selector at its first option; composite inner selectors at `"0"`.
    pub fn first_options(dims: &[Dimension]) -> Self {
        let mut values = BTreeMap::new();
        for dim in dims {
            let Some(first) = dim.outer_options().into_iter().next() else {
                continue;
            };
            match dim.split() {
                DimensionSplit::Simple(name) => {
                    values.insert(name, first);
                }
                DimensionSplit::Composite { outer, inner } => {
                    values.insert(outer, first);
                    values.insert(inner, CoordValue::ordinal(0));
                }
            }
        }
        Self { values }
    }

    pub fn get(&self, selector: &str) -> Option<&CoordValue> {
        self.values.get(selector)
    }

    pub fn set(&mut self, selector: DimName, value: CoordValue) -> Option<CoordValue> {
        self.values.insert(selector, value)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.values.contains_key(selector)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DimName, &CoordValue)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves the slice to axis positions over `dims`, in order. `None` when a selector is
    /// missing or names a value the dimension does not carry.
    pub fn positions(&self, dims: &[Dimension]) -> Option<AxisPositions> {
        dims.iter()
            .map(|dim| match dim.split() {
                DimensionSplit::Simple(name) => dim.position_of(self.values.get(&name)?),
                DimensionSplit::Composite { outer, inner } => dim.composite_position(
                    self.values.get(&outer)?,
                    self.values.get(&inner)?,
                ),
            })
            .collect()
    }

    /// Restriction of this slice to the given selectors.
    pub fn restricted_to<'a>(&self, selectors: impl IntoIterator<Item = &'a DimName>) -> Self {
        let values = selectors
            .into_iter()
            .filter_map(|name| Some((name.clone(), self.values.get(name)?.clone())))
            .collect();
        Self { values }
    }
}
