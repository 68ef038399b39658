// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::sync::Arc;

use serde_json::{json, Value};

use brushlink::artifact::InferenceArtifact;
use brushlink::cell::RenderMode;
use brushlink::diagram::Diagram;

pub const GROUPS: usize = 8;

/// Draw counts per case; case IDs are derived from these and must stay stable.
pub const SIZES: [(&str, usize); 3] = [("small", 1_000), ("medium", 20_000), ("large", 100_000)];

/// Values in `[0, 1)` spread over the draws by a multiplicative hash.
pub fn spread(draw: usize, salt: usize) -> f64 {
    let mixed = draw.wrapping_mul(2_654_435_761).wrapping_add(salt.wrapping_mul(40_503)) % 10_007;
    mixed as f64 / 10_007.0
}

pub fn column(draws: usize, salt: usize) -> Vec<f64> {
    (0..draws).map(|draw| spread(draw, salt)).collect()
}

fn stored(draws: usize, positions: usize, salt: usize) -> Value {
    let mut data = Vec::with_capacity(draws * positions.max(1));
    for draw in 0..draws {
        if positions == 0 {
            data.push(spread(draw, salt));
        } else {
            for position in 0..positions {
                data.push(position as f64 + spread(draw, salt + position));
            }
        }
    }
    let shape = if positions == 0 {
        json!([1, draws])
    } else {
        json!([1, draws, positions])
    };
    json!({ "shape": shape, "data": data })
}

/// Roots `a`, `b`; `c[group]` depends on both.
pub fn artifact_json(draws: usize) -> Value {
    let groups: Vec<String> = (0..GROUPS).map(|group| format!("g{group}")).collect();
    let space = |prefix: &str| {
        json!({
            "array_names": {
                "a": format!("{prefix}/a"),
                "b": format!("{prefix}/b"),
                "c": format!("{prefix}/c"),
            },
            "vars": {
                "a": { "dims": ["chain", "draw"] },
                "b": { "dims": ["chain", "draw"] },
                "c": { "dims": ["chain", "draw", "group"] },
            }
        })
    };
    let header = json!({
        "inference_data": {
            "prior": space("prior"),
            "posterior": space("posterior"),
        },
        "graph": {
            "a": { "name": "a", "type": "free", "distribution": { "dist": "Normal", "type": "Continuous" } },
            "b": { "name": "b", "type": "free", "distribution": { "dist": "Normal", "type": "Continuous" } },
            "c": {
                "name": "c", "type": "free", "parents": ["a", "b"],
                "distribution": { "dist": "Normal", "type": "Continuous" },
                "dims": ["group"], "coords": { "group": groups }
            }
        }
    });

    let mut arrays = serde_json::Map::new();
    for (prefix, salt) in [("prior", 0), ("posterior", 100)] {
        arrays.insert(format!("{prefix}/a"), stored(draws, 0, salt + 1));
        arrays.insert(format!("{prefix}/b"), stored(draws, 0, salt + 2));
        arrays.insert(format!("{prefix}/c"), stored(draws, GROUPS, salt + 3));
    }
    json!({ "header.json": header.to_string(), "arrays": arrays })
}

pub fn artifact(draws: usize) -> Arc<InferenceArtifact> {
    Arc::new(InferenceArtifact::from_value(artifact_json(draws)).expect("bench artifact"))
}

pub fn diagram(draws: usize) -> Diagram {
    Diagram::from_artifact(artifact(draws), RenderMode::Interactive, &[]).expect("bench diagram")
}
