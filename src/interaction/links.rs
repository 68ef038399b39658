// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::model::{CellId, CoordValue, DimName, Space};

/// One coordinate selector exposed by a cell in a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetLink {
    pub space: Space,
    pub cell: CellId,
}

/// Which cells expose which coordinate selectors.
///
/// Registrations keep their order; the first one for a selector is its authority and every
/// later one follows the authority's value.
#[derive(Debug, Clone, Default)]
pub struct DimensionLinks {
    widgets: BTreeMap<DimName, Vec<WidgetLink>>,
    composites: BTreeMap<Space, CompositeLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CompositeLinks {
    inner_of: BTreeMap<DimName, Vec<DimName>>,
    outer_of: BTreeMap<DimName, Vec<DimName>>,
    inner_values: BTreeMap<DimName, BTreeMap<CoordValue, Vec<CoordValue>>>,
}

impl DimensionLinks {
    /// Returns `false` when the pair was already registered.
    pub fn register(&mut self, selector: DimName, space: Space, cell: CellId) -> bool {
        let links = self.widgets.entry(selector).or_default();
        let link = WidgetLink { space, cell };
        if links.contains(&link) {
            return false;
        }
        links.push(link);
        true
    }

    /// Records that `inner` is indexed by the current `outer` value in `space`, with the
    /// inner option list legal for each outer value.
    pub fn register_composite(
        &mut self,
        space: Space,
        outer: DimName,
        inner: DimName,
        inner_values: BTreeMap<CoordValue, Vec<CoordValue>>,
    ) {
        let composite = self.composites.entry(space).or_default();
        let inners = composite.inner_of.entry(outer.clone()).or_default();
        if !inners.contains(&inner) {
            inners.push(inner.clone());
        }
        let outers = composite.outer_of.entry(inner.clone()).or_default();
        if !outers.contains(&outer) {
            outers.push(outer);
        }
        composite.inner_values.entry(inner).or_insert(inner_values);
    }

    pub fn authority(&self, selector: &str) -> Option<WidgetLink> {
        self.widgets.get(selector).and_then(|links| links.first().copied())
    }

    pub fn linked(&self, selector: &str) -> &[WidgetLink] {
        self.widgets
            .get(selector)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn linked_in(&self, selector: &str, space: Space) -> impl Iterator<Item = CellId> + '_ {
        self.linked(selector)
            .iter()
            .filter(move |link| link.space == space)
            .map(|link| link.cell)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.widgets.contains_key(selector)
    }

    pub fn selectors(&self) -> impl Iterator<Item = &DimName> + '_ {
        self.widgets.keys()
    }

    /// Inner selectors that depend on `outer` in `space`.
    pub fn inner_of(&self, space: Space, outer: &str) -> &[DimName] {
        self.composites
            .get(&space)
            .and_then(|composite| composite.inner_of.get(outer))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn outer_of(&self, space: Space, inner: &str) -> &[DimName] {
        self.composites
            .get(&space)
            .and_then(|composite| composite.outer_of.get(inner))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Options legal for `inner` while its outer selector shows `outer_value`.
    pub fn inner_options(
        &self,
        space: Space,
        inner: &str,
        outer_value: &CoordValue,
    ) -> Option<&[CoordValue]> {
        self.composites
            .get(&space)?
            .inner_values
            .get(inner)?
            .get(outer_value)
            .map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
        self.composites.clear();
    }
}
