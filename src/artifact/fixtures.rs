// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Value};

use super::InferenceArtifact;

pub(crate) const DRAWS: usize = 100;
pub(crate) const MU_HITS: [usize; 3] = [3, 7, 42];
pub(crate) const TAU_HITS: [usize; 3] = [7, 42, 90];
pub(crate) const YEARS: [i64; 3] = [2000, 2001, 2002];
pub(crate) const OBSERVED: [f64; 4] = [0.5, 1.5, 2.5, 3.5];

/// `mu` is 0.5 exactly on `MU_HITS` and below -1 elsewhere.
pub(crate) fn mu(draw: usize) -> f64 {
    if MU_HITS.contains(&draw) {
        0.5
    } else {
        -1.0 - draw as f64 * 0.01
    }
}

/// `tau` is 1.5 exactly on `TAU_HITS` and above 3 elsewhere.
pub(crate) fn tau(draw: usize) -> f64 {
    if TAU_HITS.contains(&draw) {
        1.5
    } else {
        3.0 + draw as f64 * 0.01
    }
}

pub(crate) fn alpha(year: usize, draw: usize) -> f64 {
    year as f64 + draw as f64 * 0.001
}

pub(crate) fn beta(year: usize, draw: usize) -> f64 {
    10.0 * year as f64 + draw as f64 * 0.001
}

pub(crate) fn gamma(house: usize, draw: usize) -> f64 {
    100.0 * house as f64 + draw as f64 * 0.001
}

pub(crate) fn y_predictive(obs: usize, draw: usize) -> f64 {
    obs as f64 + draw as f64 * 0.01
}

/// Storage order `[chain = 1, draw, position]`.
fn stored(positions: usize, value: impl Fn(usize, usize) -> f64) -> Value {
    let mut data = Vec::with_capacity(DRAWS * positions.max(1));
    for draw in 0..DRAWS {
        if positions == 0 {
            data.push(value(0, draw));
        } else {
            for position in 0..positions {
                data.push(value(position, draw));
            }
        }
    }
    let shape = if positions == 0 {
        json!([1, DRAWS])
    } else {
        json!([1, DRAWS, positions])
    };
    json!({ "shape": shape, "data": data })
}

fn space_header(vars: &[(&str, &[&str])]) -> Value {
    let mut array_names = serde_json::Map::new();
    let mut entries = serde_json::Map::new();
    for (var, dims) in vars {
        array_names.insert((*var).to_owned(), json!(format!("{{space}}/{var}")));
        entries.insert((*var).to_owned(), json!({ "dims": dims }));
    }
    json!({ "array_names": array_names, "vars": entries })
}

fn with_space_prefix(mut header: Value, space: &str) -> Value {
    if let Some(names) = header
        .get_mut("array_names")
        .and_then(Value::as_object_mut)
    {
        for value in names.values_mut() {
            if let Some(text) = value.as_str() {
                *value = json!(text.replace("{space}", space));
            }
        }
    }
    header
}

/// Header and arrays of the reference model:
///
/// ```text
/// mu, tau, gamma[county_idx_house]  (roots)
/// alpha[year] <- mu, beta[year] <- tau
/// y[obs] (observed) <- alpha, beta
/// ```
pub(crate) fn artifact_json() -> Value {
    let sample_vars: &[(&str, &[&str])] = &[
        ("mu", &["chain", "draw"]),
        ("tau", &["chain", "draw"]),
        ("alpha", &["chain", "draw", "year"]),
        ("beta", &["chain", "draw", "year"]),
        ("gamma", &["chain", "draw", "county_idx_house"]),
    ];
    let predictive_vars: &[(&str, &[&str])] = &[("y", &["chain", "draw", "obs"])];

    let header = json!({
        "inference_data": {
            "prior": with_space_prefix(space_header(sample_vars), "prior"),
            "posterior": with_space_prefix(space_header(sample_vars), "posterior"),
            "prior_predictive": with_space_prefix(space_header(predictive_vars), "prior_predictive"),
            "posterior_predictive": with_space_prefix(space_header(predictive_vars), "posterior_predictive"),
            "observed_data": {
                "array_names": { "y": "observed_data/y" },
                "vars": { "y": { "dims": ["obs"] } }
            },
            "warmup_posterior": { "array_names": {} }
        },
        "graph": {
            "mu": { "name": "mu", "type": "free", "distribution": { "dist": "Normal", "type": "Continuous" } },
            "tau": { "name": "tau", "type": "free", "distribution": { "dist": "HalfNormal", "type": "Continuous" } },
            "gamma": {
                "name": "gamma", "type": "free",
                "distribution": { "dist": "Normal", "type": "Continuous" },
                "dims": ["county_idx_house"],
                "coords": { "county_idx_house": ["b", "a", "b"] }
            },
            "alpha": {
                "name": "alpha", "type": "deterministic", "parents": ["mu"],
                "dims": ["year"], "coords": { "year": YEARS }
            },
            "beta": {
                "name": "beta", "type": "free", "parents": ["tau"],
                "distribution": { "dist": "Normal", "type": "Continuous" },
                "dims": ["year"], "coords": { "year": YEARS }
            },
            "y": {
                "name": "y", "type": "observed", "parents": ["alpha", "beta"],
                "distribution": { "dist": "Poisson", "type": "Discrete" },
                "dims": ["obs"]
            }
        }
    });

    let mut arrays = serde_json::Map::new();
    for space in ["prior", "posterior"] {
        arrays.insert(format!("{space}/mu"), stored(0, |_, draw| mu(draw)));
        arrays.insert(format!("{space}/tau"), stored(0, |_, draw| tau(draw)));
        arrays.insert(format!("{space}/alpha"), stored(YEARS.len(), alpha));
        arrays.insert(format!("{space}/beta"), stored(YEARS.len(), beta));
        arrays.insert(format!("{space}/gamma"), stored(3, gamma));
    }
    for space in ["prior_predictive", "posterior_predictive"] {
        arrays.insert(format!("{space}/y"), stored(OBSERVED.len(), y_predictive));
    }
    arrays.insert(
        "observed_data/y".to_owned(),
        json!({ "shape": [OBSERVED.len()], "data": OBSERVED }),
    );

    json!({
        "header.json": header.to_string(),
        "arrays": arrays,
    })
}

pub(crate) fn artifact() -> InferenceArtifact {
    InferenceArtifact::from_value(artifact_json()).expect("fixture artifact")
}

/// The reference model with a zero-length draw axis in `prior` and `prior_predictive`.
pub(crate) fn drawless_prior_artifact() -> InferenceArtifact {
    let mut value = artifact_json();
    let arrays = value["arrays"].as_object_mut().expect("arrays");
    for (name, array) in arrays.iter_mut() {
        // Covers both "prior/" and "prior_predictive/".
        if name.starts_with("prior") {
            array["shape"][1] = json!(0);
            array["data"] = json!([]);
        }
    }
    InferenceArtifact::from_value(value).expect("drawless fixture artifact")
}
