// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::{DimName, VarName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Free,
    Observed,
    Deterministic,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum DistributionKind {
    #[default]
    #[serde(alias = "continuous")]
    Continuous,
    #[serde(alias = "discrete")]
    Discrete,
}

/// A model variable as declared by the artifact's dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: VarName,
    kind: VariableKind,
    distribution_kind: DistributionKind,
    distribution: Option<String>,
    parents: Vec<VarName>,
    dims: Vec<DimName>,
}

impl Variable {
    pub fn new(name: VarName, kind: VariableKind) -> Self {
        Self {
            name,
            kind,
            distribution_kind: DistributionKind::default(),
            distribution: None,
            parents: Vec::new(),
            dims: Vec::new(),
        }
    }

    pub fn with_distribution(
        mut self,
        kind: DistributionKind,
        distribution: Option<String>,
    ) -> Self {
        self.distribution_kind = kind;
        self.distribution = distribution;
        self
    }

    pub fn with_parents(mut self, parents: Vec<VarName>) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_dims(mut self, dims: Vec<DimName>) -> Self {
        self.dims = dims;
        self
    }

    pub fn name(&self) -> &VarName {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn distribution_kind(&self) -> DistributionKind {
        self.distribution_kind
    }

    /// Distribution family name as recorded by the sampler (`Normal`, `Poisson`, ...).
    pub fn distribution(&self) -> Option<&str> {
        self.distribution.as_deref()
    }

    pub fn parents(&self) -> &[VarName] {
        &self.parents
    }

    pub fn dims(&self) -> &[DimName] {
        &self.dims
    }

    pub fn is_observed(&self) -> bool {
        self.kind == VariableKind::Observed
    }
}
