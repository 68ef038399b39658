// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cell::{RenderMode, Statistic};
use crate::model::{DistributionKind, Space};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpCellSummary {
    pub cell_id: u64,
    pub label: String,
    /// `variable`, `predictive_check` or `scatter`.
    pub kind: String,
    pub spaces: Vec<Space>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpControlWidget {
    pub space: Space,
    pub selector: String,
    pub label: String,
    pub options: Vec<serde_json::Value>,
    pub value: serde_json::Value,
    pub authority_cell_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpMaskSummary {
    pub space: Space,
    pub revision: u64,
    pub unrestricted: bool,
    pub selected: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpStats {
    pub widget_interactions: u64,
    pub selection_interactions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramDescribeResponse {
    pub mode: RenderMode,
    pub spaces: Vec<Space>,
    pub graph_rows: Vec<Vec<McpCellSummary>>,
    pub predictive_rows: Vec<Vec<McpCellSummary>>,
    pub scatter: Vec<McpCellSummary>,
    pub controls: Vec<McpControlWidget>,
    pub reset_label: String,
    pub masks: Vec<McpMaskSummary>,
    pub selected_space: Option<Space>,
    pub stats: McpStats,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectionSetParams {
    pub variable: String,
    /// Space the range was drawn in.
    pub space: Space,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectionClearParams {
    pub variable: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CoordinateSetParams {
    pub dimension: String,
    pub options: Vec<serde_json::Value>,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CoordinateChangeParams {
    pub dimension: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpSettlement {
    pub space: Space,
    pub revision: u64,
    pub selected: Option<u64>,
    pub contributors: u64,
    pub workers: u64,
    pub failed_workers: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EventResponse {
    /// `settled` or `unchanged`.
    pub outcome: String,
    pub settlements: Vec<McpSettlement>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MaskReadParams {
    pub space: Space,
    /// Include the selected draw indices (default true).
    pub include_indices: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MaskReadResponse {
    pub space: Space,
    pub revision: u64,
    pub draws: u64,
    pub unrestricted: bool,
    pub selected: Option<u64>,
    pub indices: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CellReadParams {
    pub cell_id: u64,
    pub space: Space,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpHighlight {
    /// `unfiltered`, `subset` or `empty`.
    pub state: String,
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum McpFrameBody {
    NoData,
    Distribution {
        distribution: DistributionKind,
        x_range: McpRange,
        samples: u64,
        highlight: McpHighlight,
        selection: Option<McpRange>,
        coordinates: BTreeMap<String, serde_json::Value>,
    },
    Scatter {
        x_range: McpRange,
        y_range: McpRange,
        points: u64,
        selected: Option<u64>,
        coordinates: BTreeMap<String, serde_json::Value>,
    },
    PredictiveCheck {
        statistic: Statistic,
        observed: Option<f64>,
        p_value: Option<f64>,
        draws: u64,
        highlight: McpHighlight,
        subset_p_value: Option<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CellReadResponse {
    pub cell_id: u64,
    pub label: String,
    pub space: Space,
    pub mask_revision: u64,
    pub body: McpFrameBody,
}
