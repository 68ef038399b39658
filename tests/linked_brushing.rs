// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use brushlink::cell::{FrameBody, RenderMode};
use brushlink::diagram::{Diagram, DiagramError, EventOutcome};
use brushlink::interaction::Membership;
use brushlink::mcp::describe;
use brushlink::model::{CoordValue, Space};

// `theta` is the draw index; `eta[school]` is `100 * school + draw` over schools "a", "b".
fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("schools.json")
}

fn open(mode: RenderMode) -> Diagram {
    Diagram::open(fixture_path(), mode, &["y".to_owned()])
        .unwrap_or_else(|err| panic!("failed to open fixture: {err}"))
}

fn selected(diagram: &Diagram, space: Space) -> Option<Vec<usize>> {
    diagram
        .mask(space)
        .mask
        .membership()
        .map(Membership::indices)
}

#[test]
fn brushing_one_variable_restricts_every_space_it_shows() {
    let diagram = open(RenderMode::Interactive);
    assert_eq!(diagram.spaces(), &[Space::Prior, Space::Posterior]);
    assert_eq!(selected(&diagram, Space::Posterior), None);

    let outcome = diagram.select("theta", Space::Posterior, 5.0, 9.0);
    assert!(outcome.is_settled());
    for space in [Space::Prior, Space::Posterior] {
        assert_eq!(selected(&diagram, space), Some(vec![5, 6, 7, 8, 9]));
    }
    assert_eq!(diagram.selected_space(), Some(Space::Posterior));
}

#[test]
fn selections_intersect_and_coordinate_changes_invalidate_them() {
    let diagram = open(RenderMode::Interactive);
    diagram.select("theta", Space::Posterior, 5.0, 9.0);
    // Shows school "a" by default.
    diagram.select("eta", Space::Posterior, 7.0, 12.0);
    assert_eq!(selected(&diagram, Space::Posterior), Some(vec![7, 8, 9]));

    let outcome = diagram.change_coordinate("school", CoordValue::text("b"));
    let settlement = outcome.settlement(Space::Posterior).expect("posterior settled");
    assert_eq!(settlement.selected, Some(5));
    assert_eq!(settlement.contributors, 1);
    assert!(diagram.selection("eta", Space::Posterior).is_none());
    assert_eq!(selected(&diagram, Space::Posterior), Some(vec![5, 6, 7, 8, 9]));

    let eta = diagram.grid().variable_cell("eta").expect("eta cell").id();
    match diagram.frame(eta, Space::Posterior).expect("eta frame").body {
        FrameBody::Distribution { x_range, .. } => assert!(x_range.0 > 95.0 && x_range.1 < 125.0),
        other => panic!("unexpected body: {other:?}"),
    }
}

#[test]
fn concurrent_brushes_settle_to_their_intersection() {
    let diagram = Arc::new(open(RenderMode::Interactive));
    let handles: Vec<_> = [("theta", 2.0, 15.0), ("eta", 10.0, 19.0)]
        .into_iter()
        .map(|(variable, min, max)| {
            let diagram = Arc::clone(&diagram);
            thread::spawn(move || diagram.select(variable, Space::Posterior, min, max))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("select thread").is_settled());
    }
    assert_eq!(
        selected(&diagram, Space::Posterior),
        Some((10..=15).collect::<Vec<_>>())
    );
    assert_eq!(diagram.stats().selection_interactions, 2);
    assert_eq!(diagram.context().active_rounds(), 0);
}

#[test]
fn reset_returns_to_unrestricted_and_keeps_coordinates() {
    let diagram = open(RenderMode::Interactive);
    diagram.change_coordinate("school", CoordValue::text("b"));
    diagram.select("eta", Space::Prior, 100.0, 103.0);
    assert_eq!(selected(&diagram, Space::Prior), Some(vec![0, 1, 2, 3]));

    assert!(diagram.reset().is_settled());
    for space in [Space::Prior, Space::Posterior] {
        let published = diagram.mask(space);
        assert!(published.mask.is_unrestricted());
        assert_eq!(published.mask.selected(), None);
    }
    assert_eq!(diagram.selected_space(), None);

    let described = describe(&diagram);
    assert!(described
        .controls
        .iter()
        .filter(|control| control.selector == "school")
        .all(|control| control.value == serde_json::json!("b")));
}

#[test]
fn static_mode_ignores_brushes() {
    let diagram = open(RenderMode::Static);
    assert!(matches!(
        diagram.select("theta", Space::Posterior, 5.0, 9.0),
        EventOutcome::Ignored(_)
    ));
    assert!(diagram.mask(Space::Posterior).mask.is_unrestricted());
    assert!(diagram
        .change_coordinate("school", CoordValue::text("b"))
        .is_settled());
}

#[test]
fn missing_artifact_reports_the_path() {
    let missing = fixture_path().with_file_name("does-not-exist.json");
    let err = Diagram::open(&missing, RenderMode::Interactive, &[]).unwrap_err();
    assert!(matches!(err, DiagramError::Artifact(_)));
    assert!(err.to_string().contains("does-not-exist.json"));
}
