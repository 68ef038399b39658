// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use smol_str::SmolStr;

use super::ids::DimName;

const COMPOSITE_SEPARATOR: &[u8] = b"_idx_";

/// One coordinate label along a dimension (a year, a county, a school id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum CoordValue {
    Int(i64),
    Text(SmolStr),
}

impl CoordValue {
    pub fn text(value: impl AsRef<str>) -> Self {
        Self::Text(SmolStr::new(value.as_ref()))
    }

    /// Label used by composite inner selectors (`"0"`, `"1"`, ...).
    pub fn ordinal(position: usize) -> Self {
        let mut buffer = itoa::Buffer::new();
        Self::Text(SmolStr::new(buffer.format(position)))
    }

    fn as_ordinal(&self) -> Option<usize> {
        match self {
            Self::Int(value) => usize::try_from(*value).ok(),
            Self::Text(value) => value.parse().ok(),
        }
    }
}

impl fmt::Display for CoordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*value))
            }
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for CoordValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for CoordValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for CoordValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl TryFrom<&serde_json::Value> for CoordValue {
    type Error = String;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(text) => Ok(Self::text(text)),
            serde_json::Value::Bool(flag) => Ok(Self::text(if *flag { "true" } else { "false" })),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(Self::Int(int));
                }
                match number.as_f64() {
                    Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
                        Ok(Self::Int(float as i64))
                    }
                    _ => Ok(Self::text(number.to_string())),
                }
            }
            other => Err(format!("unsupported coordinate value {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for CoordValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        CoordValue::try_from(&raw).map_err(serde::de::Error::custom)
    }
}

/// How a dimension maps onto coordinate selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionSplit {
    /// One selector named after the dimension.
    Simple(DimName),
    /// `A_idx_B`: an outer selector `A` and an inner selector `B` that picks the n-th entry
    /// among the positions whose label equals the current `A` value.
    Composite { outer: DimName, inner: DimName },
}

impl DimensionSplit {
    pub fn selectors(&self) -> Vec<&DimName> {
        match self {
            Self::Simple(name) => vec![name],
            Self::Composite { outer, inner } => vec![outer, inner],
        }
    }
}

/// An indexing axis descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    name: DimName,
    values: Vec<CoordValue>,
    label: Option<String>,
    unit: Option<String>,
}

impl Dimension {
    pub fn new(name: DimName, values: Vec<CoordValue>) -> Self {
        Self {
            name,
            values,
            label: None,
            unit: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn name(&self) -> &DimName {
        &self.name
    }

    pub fn values(&self) -> &[CoordValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Falls back to the dimension name when no label was given.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.name.as_str())
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn split(&self) -> DimensionSplit {
        let raw = self.name.as_str();
        if let Some(at) = memchr::memmem::find(raw.as_bytes(), COMPOSITE_SEPARATOR) {
            let outer = DimName::new(&raw[..at]);
            let inner = DimName::new(&raw[at + COMPOSITE_SEPARATOR.len()..]);
            if let (Ok(outer), Ok(inner)) = (outer, inner) {
                return DimensionSplit::Composite { outer, inner };
            }
        }
        DimensionSplit::Simple(self.name.clone())
    }

    /// Options of the outer (or only) selector. Composite dimensions list each distinct
    /// label once, sorted.
    pub fn outer_options(&self) -> Vec<CoordValue> {
        match self.split() {
            DimensionSplit::Simple(_) => self.values.clone(),
            DimensionSplit::Composite { .. } => {
                let mut options = self.values.clone();
                options.sort();
                options.dedup();
                options
            }
        }
    }

    /// Options of the inner selector for a given outer value: `"0".."k-1"` where `k` is the
    /// number of positions carrying that label.
    pub fn inner_options(&self, outer: &CoordValue) -> Vec<CoordValue> {
        let count = self.values.iter().filter(|value| *value == outer).count();
        (0..count).map(CoordValue::ordinal).collect()
    }

    /// `outer value -> inner options` for every outer value of a composite dimension.
    pub fn inner_value_map(&self) -> BTreeMap<CoordValue, Vec<CoordValue>> {
        self.outer_options()
            .into_iter()
            .map(|outer| {
                let inner = self.inner_options(&outer);
                (outer, inner)
            })
            .collect()
    }

    /// Axis position of a simple selection.
    pub fn position_of(&self, value: &CoordValue) -> Option<usize> {
        self.values.iter().position(|candidate| candidate == value)
    }

    /// Axis position of a composite selection: the `inner`-th position labelled `outer`.
    pub fn composite_position(&self, outer: &CoordValue, inner: &CoordValue) -> Option<usize> {
        let nth = inner.as_ordinal()?;
        self.values
            .iter()
            .enumerate()
            .filter(|(_, value)| *value == outer)
            .map(|(position, _)| position)
            .nth(nth)
    }
}
