// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only access to a loaded inference artifact.
//!
//! [`ArtifactAccess`] is the only contract cells and grids rely on. [`InferenceArtifact`]
//! implements it over the single-file JSON format: a `header.json` text entry describing the
//! spaces and the variable graph, plus one numeric array per stored (space, variable) pair.
//! Loading validates everything up front, so a diagram never holds a half-loaded artifact.

mod error;
mod format;
#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

pub use error::ArtifactError;

use crate::model::{
    CoordValue, DimName, Dimension, DistributionKind, SampleArray, Space, VarName, Variable,
    VariableKind,
};
use format::{parse_header, RawArtifact, RawHeader, RawNode};

const CHAIN_AXIS: &str = "chain";
const DRAW_AXIS: &str = "draw";
const SUGGESTION_THRESHOLD: f64 = 0.5;

pub trait ArtifactAccess: Send + Sync + fmt::Debug {
    /// Every variable of the dependency graph, sorted by name.
    fn variables(&self) -> Vec<&Variable>;

    fn variable(&self, name: &str) -> Result<&Variable, ArtifactError>;

    fn kind(&self, name: &str) -> Result<VariableKind, ArtifactError> {
        Ok(self.variable(name)?.kind())
    }

    fn distribution_kind(&self, name: &str) -> Result<DistributionKind, ArtifactError> {
        Ok(self.variable(name)?.distribution_kind())
    }

    fn parents(&self, name: &str) -> Result<&[VarName], ArtifactError> {
        Ok(self.variable(name)?.parents())
    }

    /// Index dimensions of a variable, in array axis order.
    fn dims(&self, name: &str) -> Result<Vec<Dimension>, ArtifactError>;

    /// Samples indexed `[dim0, ..., draw]`.
    fn samples(&self, name: &str, space: Space) -> Result<&SampleArray, ArtifactError>;

    fn spaces(&self) -> &BTreeSet<Space>;

    /// Number of draws per variable in `space`; zero when the space is absent.
    fn draw_count(&self, space: Space) -> usize;
}

#[derive(Debug, Clone, Default)]
pub struct InferenceArtifact {
    variables: BTreeMap<VarName, Variable>,
    dimensions: BTreeMap<DimName, Dimension>,
    samples: BTreeMap<Space, BTreeMap<VarName, SampleArray>>,
    spaces: BTreeSet<Space>,
    draws: BTreeMap<Space, usize>,
}

impl InferenceArtifact {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            variables = artifact.variables.len(),
            spaces = artifact.spaces.len(),
            "loaded inference artifact"
        );
        Ok(artifact)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(text).map_err(|source| ArtifactError::Json {
            what: "artifact",
            source,
        })?;
        Self::from_raw(raw)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ArtifactError> {
        let raw: RawArtifact =
            serde_json::from_value(value).map_err(|source| ArtifactError::Json {
                what: "artifact",
                source,
            })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawArtifact) -> Result<Self, ArtifactError> {
        let RawArtifact { header, mut arrays } = raw;
        let header = header.ok_or(ArtifactError::MissingHeaderKey { key: "header.json" })?;
        let RawHeader {
            inference_data,
            graph,
        } = parse_header(header).map_err(|source| ArtifactError::Json {
            what: "artifact header",
            source,
        })?;
        let inference_data =
            inference_data.ok_or(ArtifactError::MissingHeaderKey { key: "inference_data" })?;
        let graph = graph.ok_or(ArtifactError::MissingHeaderKey { key: "graph" })?;

        let mut artifact = Self::default();
        for (name, node) in graph {
            artifact.insert_node(name, node)?;
        }

        let mut axis_lengths: BTreeMap<String, usize> = BTreeMap::new();
        let mut first_axes: BTreeMap<VarName, Vec<String>> = BTreeMap::new();
        for (space_key, raw_space) in inference_data {
            let Ok(space) = space_key.parse::<Space>() else {
                tracing::debug!(space = %space_key, "ignoring unknown artifact space");
                continue;
            };
            artifact.spaces.insert(space);
            let mut by_var = BTreeMap::new();
            let mut space_draws: Option<usize> = None;
            for (var, array_name) in raw_space.array_names {
                let name = match artifact.variables.get_key_value(var.as_str()) {
                    Some((name, _)) => name.clone(),
                    None => return Err(artifact.unknown_variable(&var)),
                };
                let array = arrays
                    .remove(&array_name)
                    .ok_or_else(|| ArtifactError::MissingArray {
                        space,
                        variable: var.clone(),
                        array: array_name.clone(),
                    })?;
                let axes = raw_space
                    .vars
                    .get(&var)
                    .map(|entry| entry.dims.clone())
                    .unwrap_or_default();
                for (axis, len) in axes.iter().zip(&array.shape) {
                    if axis != CHAIN_AXIS && axis != DRAW_AXIS {
                        axis_lengths.entry(axis.clone()).or_insert(*len);
                    }
                }
                let has_draw_axis = axes.iter().any(|axis| axis == DRAW_AXIS);
                let shape = array.shape.clone();
                let samples = SampleArray::from_stored(&axes, &shape, array.values()).map_err(
                    |source| ArtifactError::Layout {
                        space,
                        variable: var.clone(),
                        source,
                    },
                )?;
                if has_draw_axis {
                    match space_draws {
                        Some(expected) if expected != samples.draws() => {
                            return Err(ArtifactError::DrawCountMismatch {
                                space,
                                variable: var,
                                expected,
                                actual: samples.draws(),
                            });
                        }
                        Some(_) => {}
                        None => space_draws = Some(samples.draws()),
                    }
                }
                first_axes.entry(name.clone()).or_insert_with(|| {
                    axes.iter()
                        .filter(|axis| *axis != CHAIN_AXIS && *axis != DRAW_AXIS)
                        .cloned()
                        .collect()
                });
                by_var.insert(name, samples);
            }
            let draws = space_draws
                .unwrap_or_else(|| by_var.values().map(SampleArray::draws).max().unwrap_or(0));
            artifact.draws.insert(space, draws);
            artifact.samples.insert(space, by_var);
        }

        artifact.check_predictive_draws()?;
        artifact.fill_missing_dims(&first_axes, &axis_lengths)?;
        Ok(artifact)
    }

    /// Observed variables are drawn from the predictive space but masked against the base
    /// space, so both must hold the same number of draws.
    fn check_predictive_draws(&self) -> Result<(), ArtifactError> {
        for base in &self.spaces {
            let Some(predictive) = base.predictive() else {
                continue;
            };
            let Some(by_var) = self.samples.get(&predictive) else {
                continue;
            };
            let expected = self.draw_count(*base);
            for (name, samples) in by_var {
                let observed = self
                    .variables
                    .get(name)
                    .is_some_and(Variable::is_observed);
                if observed && samples.draws() != expected {
                    return Err(ArtifactError::PredictiveDrawMismatch {
                        variable: name.to_string(),
                        space: *base,
                        predictive,
                        expected,
                        actual: samples.draws(),
                    });
                }
            }
        }
        Ok(())
    }

    fn insert_node(&mut self, name: String, node: RawNode) -> Result<(), ArtifactError> {
        let var = VarName::new(name.clone()).map_err(|source| ArtifactError::InvalidName {
            field: "variable",
            value: name,
            source,
        })?;
        let parents = node
            .parents
            .into_iter()
            .map(|parent| {
                VarName::new(parent.clone()).map_err(|source| ArtifactError::InvalidName {
                    field: "parent",
                    value: parent,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dims = node
            .dims
            .into_iter()
            .map(|dim| {
                DimName::new(dim.clone()).map_err(|source| ArtifactError::InvalidName {
                    field: "dimension",
                    value: dim,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for dim in &dims {
            if let Some(values) = node.coords.get(dim.as_str()) {
                self.dimensions
                    .entry(dim.clone())
                    .or_insert_with(|| Dimension::new(dim.clone(), values.clone()));
            }
        }
        let variable = Variable::new(var.clone(), node.kind)
            .with_distribution(node.distribution.kind, node.distribution.dist)
            .with_parents(parents)
            .with_dims(dims);
        self.variables.insert(var, variable);
        Ok(())
    }

    /// Variables without graph dims take the coordinate axes of their first stored array;
    /// dimensions without coords get integer coordinates `0..len`.
    fn fill_missing_dims(
        &mut self,
        first_axes: &BTreeMap<VarName, Vec<String>>,
        axis_lengths: &BTreeMap<String, usize>,
    ) -> Result<(), ArtifactError> {
        for (name, variable) in self.variables.iter_mut() {
            if !variable.dims().is_empty() {
                continue;
            }
            let Some(axes) = first_axes.get(name).filter(|axes| !axes.is_empty()) else {
                continue;
            };
            let dims = axes
                .iter()
                .map(|axis| {
                    DimName::new(axis.clone()).map_err(|source| ArtifactError::InvalidName {
                        field: "dimension",
                        value: axis.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            *variable = variable.clone().with_dims(dims);
        }

        let needed: BTreeSet<DimName> = self
            .variables
            .values()
            .flat_map(|variable| variable.dims().iter().cloned())
            .collect();
        for dim in needed {
            if self.dimensions.contains_key(&dim) {
                continue;
            }
            let len = axis_lengths.get(dim.as_str()).copied().unwrap_or(0);
            let values = (0..len)
                .map(|position| CoordValue::Int(i64::try_from(position).unwrap_or(i64::MAX)))
                .collect();
            self.dimensions.insert(dim.clone(), Dimension::new(dim, values));
        }
        Ok(())
    }

    fn unknown_variable(&self, name: &str) -> ArtifactError {
        ArtifactError::UnknownVariable {
            name: name.to_owned(),
            suggestion: closest_name(name, self.variables.keys().map(VarName::as_str)),
        }
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.get(name)
    }

    /// Variables grouped by dependency depth: roots first, names sorted inside a level.
    pub fn variables_by_level(&self) -> Vec<Vec<&Variable>> {
        let mut depth: BTreeMap<&VarName, usize> = BTreeMap::new();
        for name in self.variables.keys() {
            let mut visiting = BTreeSet::new();
            self.depth_of(name, &mut depth, &mut visiting);
        }
        let mut levels: Vec<Vec<&Variable>> = Vec::new();
        for (name, level) in depth {
            if levels.len() <= level {
                levels.resize_with(level + 1, Vec::new);
            }
            if let Some(variable) = self.variables.get(name) {
                levels[level].push(variable);
            }
        }
        levels.retain(|level| !level.is_empty());
        levels
    }

    fn depth_of<'a>(
        &'a self,
        name: &'a VarName,
        memo: &mut BTreeMap<&'a VarName, usize>,
        visiting: &mut BTreeSet<&'a VarName>,
    ) -> usize {
        if let Some(depth) = memo.get(name) {
            return *depth;
        }
        if !visiting.insert(name) {
            // Cyclic graph: break the loop at the revisited node.
            return 0;
        }
        let depth = self
            .variables
            .get(name)
            .map(|variable| {
                variable
                    .parents()
                    .iter()
                    .filter(|parent| self.variables.contains_key(*parent))
                    .map(|parent| self.depth_of(parent, memo, visiting) + 1)
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        visiting.remove(name);
        memo.insert(name, depth);
        depth
    }

    /// Observed values of a variable, from the `observed_data` space.
    pub fn observations(&self, name: &str) -> Result<&SampleArray, ArtifactError> {
        self.stored(name, Space::ObservedData)
    }

    fn stored(&self, name: &str, space: Space) -> Result<&SampleArray, ArtifactError> {
        let by_var = self
            .samples
            .get(&space)
            .ok_or(ArtifactError::SpaceAbsent { space })?;
        by_var
            .get(name)
            .ok_or_else(|| ArtifactError::VariableNotInSpace {
                name: name.to_owned(),
                space,
            })
    }
}

impl ArtifactAccess for InferenceArtifact {
    fn variables(&self) -> Vec<&Variable> {
        self.variables.values().collect()
    }

    fn variable(&self, name: &str) -> Result<&Variable, ArtifactError> {
        self.variables
            .get(name)
            .ok_or_else(|| self.unknown_variable(name))
    }

    fn dims(&self, name: &str) -> Result<Vec<Dimension>, ArtifactError> {
        let variable = self.variable(name)?;
        Ok(variable
            .dims()
            .iter()
            .filter_map(|dim| self.dimensions.get(dim).cloned())
            .collect())
    }

    fn samples(&self, name: &str, space: Space) -> Result<&SampleArray, ArtifactError> {
        let variable = self.variable(name)?;
        let source = match space.predictive() {
            Some(predictive) if variable.is_observed() && self.spaces.contains(&predictive) => {
                predictive
            }
            _ => space,
        };
        if !self.spaces.contains(&space) && source == space {
            return Err(ArtifactError::SpaceAbsent { space });
        }
        self.stored(name, source)
    }

    fn spaces(&self) -> &BTreeSet<Space> {
        &self.spaces
    }

    fn draw_count(&self, space: Space) -> usize {
        self.draws.get(&space).copied().unwrap_or(0)
    }
}

/// Best fuzzy match for `needle` among `candidates`, if any is close enough.
pub fn closest_name<'a>(needle: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|candidate| (rapidfuzz::fuzz::ratio(needle.chars(), candidate.chars()), candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_owned())
}
