// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::CoordinateError;
use crate::interaction::lock;
use crate::model::{
    AxisPositions, CoordValue, CoordinateSlice, DimName, Dimension, DimensionSplit, Space,
};

/// One coordinate selector as a cell shows it in a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateWidget {
    pub name: DimName,
    pub label: String,
    pub options: Vec<CoordValue>,
    pub value: CoordValue,
}

/// Selector state shared by coordinate-aware cells.
///
/// The slice is per cell; widgets are per space and mirror the slice.
#[derive(Debug)]
pub struct CoordinateState {
    dims: Vec<Dimension>,
    slice: Mutex<CoordinateSlice>,
    widgets: Mutex<BTreeMap<Space, Vec<CoordinateWidget>>>,
}

impl CoordinateState {
    pub fn new(dims: Vec<Dimension>, spaces: &[Space]) -> Self {
        let slice = CoordinateSlice::first_options(&dims);
        let mut initial = Vec::new();
        for dim in &dims {
            let outer = dim.outer_options();
            match dim.split() {
                DimensionSplit::Simple(name) => {
                    if let Some(value) = slice.get(name.as_str()).cloned() {
                        initial.push(CoordinateWidget {
                            label: dim.label().to_owned(),
                            name,
                            options: outer,
                            value,
                        });
                    }
                }
                DimensionSplit::Composite { outer: outer_name, inner } => {
                    let (Some(outer_value), Some(inner_value)) = (
                        slice.get(outer_name.as_str()).cloned(),
                        slice.get(inner.as_str()).cloned(),
                    ) else {
                        continue;
                    };
                    let inner_options = dim.inner_options(&outer_value);
                    initial.push(CoordinateWidget {
                        label: outer_name.to_string(),
                        name: outer_name,
                        options: outer,
                        value: outer_value,
                    });
                    initial.push(CoordinateWidget {
                        label: inner.to_string(),
                        name: inner,
                        options: inner_options,
                        value: inner_value,
                    });
                }
            }
        }
        let widgets = spaces
            .iter()
            .map(|space| (*space, initial.clone()))
            .collect();
        Self {
            dims,
            slice: Mutex::new(slice),
            widgets: Mutex::new(widgets),
        }
    }

    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn slice(&self) -> CoordinateSlice {
        lock(&self.slice).clone()
    }

    pub fn widgets(&self, space: Space) -> Vec<CoordinateWidget> {
        lock(&self.widgets).get(&space).cloned().unwrap_or_default()
    }

    /// Positions of `dims` (a subset of this state's dimensions) under the current slice.
    pub fn positions(&self, dims: &[Dimension]) -> Option<AxisPositions> {
        lock(&self.slice).positions(dims)
    }

    pub fn apply(
        &self,
        space: Space,
        selector: &DimName,
        options: Vec<CoordValue>,
        value: CoordValue,
    ) -> Result<bool, CoordinateError> {
        if options.is_empty() {
            return Err(CoordinateError::EmptyOptions {
                selector: selector.to_string(),
            });
        }
        if !options.contains(&value) {
            return Err(CoordinateError::ValueNotInOptions {
                selector: selector.to_string(),
                value,
            });
        }
        let legal = legal_values(&self.dims, &lock(&self.slice), selector.as_str());
        if let Some(legal) = legal {
            if let Some(stray) = std::iter::once(&value)
                .chain(&options)
                .find(|candidate| !legal.contains(candidate))
            {
                return Err(CoordinateError::NotADimensionValue {
                    selector: selector.to_string(),
                    value: stray.clone(),
                });
            }
        }
        let changed = {
            let mut widgets = lock(&self.widgets);
            let widget = widgets
                .get_mut(&space)
                .and_then(|widgets| widgets.iter_mut().find(|widget| &widget.name == selector))
                .ok_or_else(|| CoordinateError::UnknownSelector {
                    selector: selector.to_string(),
                })?;
            let changed = widget.value != value || widget.options != options;
            widget.options = options;
            widget.value = value.clone();
            changed
        };
        let previous = lock(&self.slice).set(selector.clone(), value.clone());
        Ok(changed || previous.as_ref() != Some(&value))
    }
}

/// Values `selector` may take under `slice`; `None` when no dimension in `dims` provides it.
///
/// An inner selector of a composite dimension is bounded by the outer value `slice` holds.
pub fn legal_values(
    dims: &[Dimension],
    slice: &CoordinateSlice,
    selector: &str,
) -> Option<Vec<CoordValue>> {
    dims.iter().find_map(|dim| match dim.split() {
        DimensionSplit::Simple(name) if name.as_str() == selector => Some(dim.outer_options()),
        DimensionSplit::Composite { outer, .. } if outer.as_str() == selector => {
            Some(dim.outer_options())
        }
        DimensionSplit::Composite { outer, inner } if inner.as_str() == selector => slice
            .get(outer.as_str())
            .map(|outer_value| dim.inner_options(outer_value)),
        _ => None,
    })
}
