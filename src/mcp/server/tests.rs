// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;
use crate::artifact::fixtures::{self, DRAWS, MU_HITS};
use crate::cell::RenderMode;
use crate::model::Space;

fn server_with(mode: RenderMode) -> BrushlinkMcp {
    let diagram = Diagram::from_artifact(Arc::new(fixtures::artifact()), mode, &["y".to_owned()])
        .expect("diagram");
    BrushlinkMcp::new(Arc::new(diagram))
}

fn server() -> BrushlinkMcp {
    server_with(RenderMode::Interactive)
}

fn select_params(variable: &str, min: f64, max: f64) -> Parameters<SelectionSetParams> {
    Parameters(SelectionSetParams {
        variable: variable.to_owned(),
        space: Space::Posterior,
        min,
        max,
    })
}

fn mask_params(space: Space) -> Parameters<MaskReadParams> {
    Parameters(MaskReadParams {
        space,
        include_indices: None,
    })
}

#[tokio::test]
async fn describe_lists_rows_controls_and_unrestricted_masks() {
    let server = server();
    let Json(described) = server.diagram_describe().await.expect("describe");

    assert_eq!(described.mode, RenderMode::Interactive);
    assert_eq!(described.spaces, vec![Space::Prior, Space::Posterior]);
    let labels: Vec<Vec<&str>> = described
        .graph_rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.label.as_str()).collect())
        .collect();
    assert_eq!(
        labels,
        vec![vec!["gamma", "mu", "tau"], vec!["alpha", "beta"], vec!["y"]]
    );
    assert_eq!(described.predictive_rows.len(), 1);
    assert_eq!(described.predictive_rows[0].len(), 4);
    assert!(described.scatter.is_empty());
    assert_eq!(described.reset_label, "Reset Diagram");

    let year = described
        .controls
        .iter()
        .find(|control| control.selector == "year" && control.space == Space::Posterior)
        .expect("year control");
    assert_eq!(year.value, serde_json::json!(2000));
    assert_eq!(year.options.len(), 3);

    assert!(described.masks.iter().all(|mask| mask.unrestricted && mask.revision == 0));
    assert_eq!(described.selected_space, None);
    assert_eq!(described.stats.selection_interactions, 0);
}

#[tokio::test]
async fn selection_set_publishes_mask_in_every_space() {
    let server = server();
    let Json(response) = server
        .selection_set(select_params("mu", 0.2, 0.8))
        .await
        .expect("selection.set");
    assert_eq!(response.outcome, "settled");
    assert_eq!(response.settlements.len(), 2);
    assert!(response
        .settlements
        .iter()
        .all(|settlement| settlement.selected == Some(MU_HITS.len() as u64)
            && settlement.failed_workers == 0));

    for space in [Space::Prior, Space::Posterior] {
        let Json(mask) = server.mask_read(mask_params(space)).await.expect("mask.read");
        assert!(!mask.unrestricted);
        assert_eq!(mask.draws, DRAWS as u64);
        assert_eq!(
            mask.indices,
            Some(MU_HITS.iter().map(|draw| *draw as u64).collect())
        );
    }
}

#[tokio::test]
async fn mask_read_can_omit_indices() {
    let server = server();
    server
        .selection_set(select_params("mu", 0.2, 0.8))
        .await
        .expect("selection.set");
    let Json(mask) = server
        .mask_read(Parameters(MaskReadParams {
            space: Space::Posterior,
            include_indices: Some(false),
        }))
        .await
        .expect("mask.read");
    assert_eq!(mask.selected, Some(3));
    assert_eq!(mask.indices, None);
}

#[tokio::test]
async fn selection_clear_and_reset_report_unchanged_when_idle() {
    let server = server();
    let Json(cleared) = server
        .selection_clear(Parameters(SelectionClearParams {
            variable: "mu".to_owned(),
        }))
        .await
        .expect("selection.clear");
    assert_eq!(cleared.outcome, "unchanged");
    assert!(cleared.settlements.is_empty());

    server
        .selection_set(select_params("mu", 0.2, 0.8))
        .await
        .expect("selection.set");
    let Json(reset) = server.diagram_reset().await.expect("diagram.reset");
    assert_eq!(reset.outcome, "settled");
    let Json(mask) = server.mask_read(mask_params(Space::Prior)).await.expect("mask.read");
    assert!(mask.unrestricted);
    assert_eq!(mask.indices, None);
}

#[tokio::test]
async fn unknown_variable_is_not_found_with_suggestion() {
    let server = server();
    let err = server
        .selection_set(select_params("muu", 0.2, 0.8))
        .await
        .err()
        .expect("unknown variable");
    assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);
    let data = err.data.expect("error data");
    assert_eq!(data["suggestion"], serde_json::json!("mu"));
}

#[tokio::test]
async fn non_finite_range_is_invalid_params() {
    let server = server();
    let err = server
        .selection_set(select_params("mu", f64::NAN, 0.8))
        .await
        .err()
        .expect("nan range");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn static_mode_rejects_selection_as_invalid_request() {
    let server = server_with(RenderMode::Static);
    let err = server
        .selection_set(select_params("mu", 0.2, 0.8))
        .await
        .err()
        .expect("static mode");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_REQUEST);
}

#[tokio::test]
async fn coordinate_change_moves_every_linked_cell() {
    let server = server();
    let Json(response) = server
        .coordinate_change(Parameters(CoordinateChangeParams {
            dimension: "year".to_owned(),
            value: serde_json::json!(2001),
        }))
        .await
        .expect("coordinate.change");
    assert_eq!(response.outcome, "settled");

    let Json(described) = server.diagram_describe().await.expect("describe");
    assert!(described
        .controls
        .iter()
        .filter(|control| control.selector == "year")
        .all(|control| control.value == serde_json::json!(2001)));
    assert_eq!(described.stats.widget_interactions, 1);

    let beta = server
        .diagram()
        .grid()
        .variable_cell("beta")
        .expect("beta")
        .id();
    let Json(cell) = server
        .cell_read(Parameters(CellReadParams {
            cell_id: beta.0 as u64,
            space: Space::Posterior,
        }))
        .await
        .expect("cell.read");
    match cell.body {
        McpFrameBody::Distribution {
            x_range,
            coordinates,
            ..
        } => {
            assert!(x_range.min > 9.0 && x_range.max < 11.0);
            assert_eq!(coordinates.get("year"), Some(&serde_json::json!(2001)));
        }
        other => panic!("expected a distribution, got {other:?}"),
    }
}

#[tokio::test]
async fn coordinate_set_rejects_structured_values() {
    let server = server();
    let err = server
        .coordinate_set(Parameters(CoordinateSetParams {
            dimension: "year".to_owned(),
            options: vec![serde_json::json!({ "year": 2000 })],
            value: serde_json::json!(2000),
        }))
        .await
        .err()
        .expect("object option");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

    let err = server
        .coordinate_set(Parameters(CoordinateSetParams {
            dimension: "yaer".to_owned(),
            options: vec![serde_json::json!(2000)],
            value: serde_json::json!(2000),
        }))
        .await
        .err()
        .expect("unknown dimension");
    assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);
}

#[tokio::test]
async fn cell_read_reports_predictive_subset_after_selection() {
    let server = server();
    server
        .selection_set(select_params("mu", 0.2, 0.8))
        .await
        .expect("selection.set");
    let mean = server.diagram().grid().predictive_rows()[0][2];
    let Json(cell) = server
        .cell_read(Parameters(CellReadParams {
            cell_id: mean.0 as u64,
            space: Space::Posterior,
        }))
        .await
        .expect("cell.read");
    assert_eq!(cell.label, "y mean");
    match cell.body {
        McpFrameBody::PredictiveCheck { highlight, .. } => {
            assert_eq!(highlight.state, "subset");
            assert_eq!(highlight.count, Some(MU_HITS.len() as u64));
        }
        other => panic!("expected a predictive check, got {other:?}"),
    }
}

#[tokio::test]
async fn cell_read_unknown_cell_is_not_found() {
    let server = server();
    let err = server
        .cell_read(Parameters(CellReadParams {
            cell_id: 999,
            space: Space::Posterior,
        }))
        .await
        .err()
        .expect("missing cell");
    assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);
}
