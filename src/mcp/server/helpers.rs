// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// diagram description, frame and outcome mapping, and coordinate parsing.
pub fn describe(diagram: &Diagram) -> DiagramDescribeResponse {
    let grid = diagram.grid();
    let summarize = |ids: &[CellId], kind: &str| -> Vec<McpCellSummary> {
        ids.iter()
            .filter_map(|id| grid.cell(*id))
            .map(|cell| McpCellSummary {
                cell_id: cell.id().0 as u64,
                label: cell.label(),
                kind: kind.to_owned(),
                spaces: cell.spaces().to_vec(),
            })
            .collect()
    };

    let panel = diagram.control_panel();
    let controls = panel
        .widgets
        .iter()
        .map(|entry| McpControlWidget {
            space: entry.space,
            selector: entry.widget.name.to_string(),
            label: entry.widget.label.clone(),
            options: entry.widget.options.iter().map(coord_json).collect(),
            value: coord_json(&entry.widget.value),
            authority_cell_id: entry.authority.0 as u64,
        })
        .collect();
    let masks = diagram
        .spaces()
        .iter()
        .map(|space| {
            let published = diagram.mask(*space);
            McpMaskSummary {
                space: *space,
                revision: published.revision,
                unrestricted: published.mask.is_unrestricted(),
                selected: published.mask.selected().map(|count| count as u64),
            }
        })
        .collect();
    let stats = diagram.stats();

    DiagramDescribeResponse {
        mode: diagram.mode(),
        spaces: diagram.spaces().to_vec(),
        graph_rows: grid
            .graph_rows()
            .iter()
            .map(|row| summarize(row, "variable"))
            .collect(),
        predictive_rows: grid
            .predictive_rows()
            .iter()
            .map(|row| summarize(row, "predictive_check"))
            .collect(),
        scatter: summarize(grid.scatter(), "scatter"),
        controls,
        reset_label: panel.reset_label.to_owned(),
        masks,
        selected_space: diagram.selected_space(),
        stats: McpStats {
            widget_interactions: stats.widget_interactions,
            selection_interactions: stats.selection_interactions,
        },
    }
}

fn coord_json(value: &CoordValue) -> serde_json::Value {
    match value {
        CoordValue::Int(value) => serde_json::Value::from(*value),
        CoordValue::Text(text) => serde_json::Value::from(text.as_str()),
    }
}

fn coordinates_json(slice: &CoordinateSlice) -> BTreeMap<String, serde_json::Value> {
    slice
        .iter()
        .map(|(name, value)| (name.to_string(), coord_json(value)))
        .collect()
}

fn parse_coord(field: &str, value: &serde_json::Value) -> Result<CoordValue, ErrorData> {
    CoordValue::try_from(value).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid {field}: {err}"),
            Some(serde_json::json!({ "field": field, "value": value })),
        )
    })
}

fn range_json((min, max): (f64, f64)) -> McpRange {
    McpRange { min, max }
}

fn selection_json(range: XRange) -> McpRange {
    McpRange {
        min: range.min(),
        max: range.max(),
    }
}

fn highlight_json(highlight: &Highlight) -> McpHighlight {
    let state = match highlight {
        Highlight::Unfiltered => "unfiltered",
        Highlight::Subset(_) => "subset",
        Highlight::Empty => "empty",
    };
    McpHighlight {
        state: state.to_owned(),
        count: highlight.len().map(|count| count as u64),
    }
}

fn cell_read_response(frame: CellFrame) -> CellReadResponse {
    let body = match frame.body {
        FrameBody::NoData => McpFrameBody::NoData,
        FrameBody::Distribution {
            kind,
            x_range,
            samples,
            highlight,
            selection,
            coordinates,
        } => McpFrameBody::Distribution {
            distribution: kind,
            x_range: range_json(x_range),
            samples: samples as u64,
            highlight: highlight_json(&highlight),
            selection: selection.map(selection_json),
            coordinates: coordinates_json(&coordinates),
        },
        FrameBody::Scatter {
            x_range,
            y_range,
            points,
            selected,
            coordinates,
        } => McpFrameBody::Scatter {
            x_range: range_json(x_range),
            y_range: range_json(y_range),
            points: points as u64,
            selected: selected.map(|count| count as u64),
            coordinates: coordinates_json(&coordinates),
        },
        FrameBody::PredictiveCheck {
            statistic,
            observed,
            p_value,
            draws,
            highlight,
            subset_p_value,
        } => McpFrameBody::PredictiveCheck {
            statistic,
            observed,
            p_value,
            draws: draws as u64,
            highlight: highlight_json(&highlight),
            subset_p_value,
        },
    };
    CellReadResponse {
        cell_id: frame.cell.0 as u64,
        label: frame.label,
        space: frame.space,
        mask_revision: frame.mask_revision,
        body,
    }
}

fn settlement_json(settlement: &SpaceSettlement) -> McpSettlement {
    McpSettlement {
        space: settlement.space,
        revision: settlement.revision,
        selected: settlement.selected.map(|count| count as u64),
        contributors: settlement.contributors as u64,
        workers: settlement.workers as u64,
        failed_workers: settlement.failed_workers as u64,
    }
}

fn event_response(outcome: EventOutcome) -> Result<EventResponse, ErrorData> {
    match outcome {
        EventOutcome::Settled(settlements) => Ok(EventResponse {
            outcome: "settled".to_owned(),
            settlements: settlements.iter().map(settlement_json).collect(),
        }),
        EventOutcome::Unchanged => Ok(EventResponse {
            outcome: "unchanged".to_owned(),
            settlements: Vec::new(),
        }),
        EventOutcome::Ignored(reason) => Err(map_ignore_reason(reason)),
    }
}

fn map_ignore_reason(reason: IgnoreReason) -> ErrorData {
    let message = reason.to_string();
    match reason {
        IgnoreReason::UnknownVariable { name, suggestion } => ErrorData::resource_not_found(
            message,
            Some(serde_json::json!({ "variable": name, "suggestion": suggestion })),
        ),
        IgnoreReason::UnknownDimension { name, suggestion } => ErrorData::resource_not_found(
            message,
            Some(serde_json::json!({ "dimension": name, "suggestion": suggestion })),
        ),
        IgnoreReason::SpaceNotShown { variable, space } => ErrorData::invalid_params(
            message,
            Some(serde_json::json!({ "variable": variable, "space": space })),
        ),
        IgnoreReason::InvalidRange | IgnoreReason::InvalidCoordinate(_) => {
            ErrorData::invalid_params(message, None)
        }
        IgnoreReason::StaticMode => ErrorData::invalid_request(message, None),
    }
}
