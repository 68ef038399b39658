// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! On-disk JSON shape of an inference artifact.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::{CoordValue, DistributionKind, VariableKind};

#[derive(Debug, Deserialize)]
pub(super) struct RawArtifact {
    #[serde(rename = "header.json")]
    pub(super) header: Option<serde_json::Value>,
    #[serde(default)]
    pub(super) arrays: BTreeMap<String, RawArray>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawArray {
    pub(super) shape: Vec<usize>,
    /// `null` entries stand for NaN, which JSON cannot spell.
    pub(super) data: Vec<Option<f64>>,
}

impl RawArray {
    pub(super) fn values(self) -> Vec<f64> {
        self.data
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RawHeader {
    pub(super) inference_data: Option<BTreeMap<String, RawSpace>>,
    pub(super) graph: Option<BTreeMap<String, RawNode>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawSpace {
    #[serde(default)]
    pub(super) array_names: BTreeMap<String, String>,
    #[serde(default)]
    pub(super) vars: BTreeMap<String, RawSpaceVar>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawSpaceVar {
    #[serde(default)]
    pub(super) dims: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawNode {
    #[serde(rename = "type")]
    pub(super) kind: VariableKind,
    #[serde(default)]
    pub(super) distribution: RawDistribution,
    #[serde(default)]
    pub(super) parents: Vec<String>,
    #[serde(default)]
    pub(super) dims: Vec<String>,
    #[serde(default)]
    pub(super) coords: BTreeMap<String, Vec<CoordValue>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawDistribution {
    #[serde(default)]
    pub(super) dist: Option<String>,
    #[serde(rename = "type", default)]
    pub(super) kind: DistributionKind,
}

/// The header is stored as embedded JSON text; an inline object is accepted too.
pub(super) fn parse_header(value: serde_json::Value) -> Result<RawHeader, serde_json::Error> {
    match value {
        serde_json::Value::String(text) => serde_json::from_str(&text),
        other => serde_json::from_value(other),
    }
}
