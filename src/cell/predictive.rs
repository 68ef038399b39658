// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Cell, CellFrame, FrameBody, Highlight};
use crate::artifact::{ArtifactAccess, InferenceArtifact};
use crate::interaction::{lock, InteractionContext, PublishedMask};
use crate::model::{CellId, Space, VarName};

/// Summary statistic reduced over every observation of one draw.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Min,
    Max,
    Mean,
    Std,
}

impl Statistic {
    pub const ALL: [Statistic; 4] = [Self::Min, Self::Max, Self::Mean, Self::Std];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Std => "std",
        }
    }

    /// Applies the statistic to the finite values of `values`; `None` when none are finite.
    pub fn apply(self, values: impl IntoIterator<Item = f64>) -> Option<f64> {
        let mut count = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            sum += value;
            sum_sq += value * value;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        let mean = sum / n;
        Some(match self {
            Self::Min => min,
            Self::Max => max,
            Self::Mean => mean,
            Self::Std => (sum_sq / n - mean * mean).max(0.0).sqrt(),
        })
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|statistic| statistic.as_str() == s)
            .ok_or_else(|| format!("unknown statistic {s:?}"))
    }
}

/// Fraction of draws whose statistic reaches the observed one.
fn p_value(per_draw: &[f64], observed: f64) -> Option<f64> {
    if per_draw.is_empty() {
        return None;
    }
    let hits = per_draw.iter().filter(|value| **value >= observed).count();
    Some(hits as f64 / per_draw.len() as f64)
}

/// Posterior (or prior) predictive check of one observed variable.
pub struct PredictiveCheckCell {
    id: CellId,
    variable: VarName,
    statistic: Statistic,
    observed: Option<f64>,
    spaces: Vec<Space>,
    views: BTreeMap<Space, Mutex<PredictiveView>>,
}

#[derive(Debug, Default)]
struct PredictiveView {
    /// Per draw statistic; `NaN` where a draw had no finite value.
    per_draw: Vec<f64>,
    p_value: Option<f64>,
    highlight: Highlight,
    subset_p_value: Option<f64>,
    mask_revision: u64,
}

impl PredictiveCheckCell {
    pub fn new(
        id: CellId,
        variable: VarName,
        statistic: Statistic,
        artifact: &InferenceArtifact,
        spaces: &[Space],
    ) -> Self {
        let observed = artifact
            .observations(variable.as_str())
            .ok()
            .and_then(|observations| statistic.apply(observations.values().iter().copied()));
        let mut views = BTreeMap::new();
        let mut shown = Vec::new();
        for space in spaces {
            let Ok(samples) = artifact.samples(variable.as_str(), *space) else {
                continue;
            };
            let per_draw: Vec<f64> = (0..samples.draws())
                .into_par_iter()
                .map(|draw| statistic.apply(samples.draw_values(draw)).unwrap_or(f64::NAN))
                .collect();
            let p_value = observed.and_then(|observed| p_value(&finite(&per_draw), observed));
            views.insert(
                *space,
                Mutex::new(PredictiveView {
                    per_draw,
                    p_value,
                    ..PredictiveView::default()
                }),
            );
            shown.push(*space);
        }
        Self {
            id,
            variable,
            statistic,
            observed,
            spaces: shown,
            views,
        }
    }

    pub fn variable(&self) -> &VarName {
        &self.variable
    }

    pub fn statistic(&self) -> Statistic {
        self.statistic
    }
}

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|value| value.is_finite()).collect()
}

impl fmt::Debug for PredictiveCheckCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictiveCheckCell")
            .field("id", &self.id)
            .field("variable", &self.variable)
            .field("statistic", &self.statistic)
            .field("spaces", &self.spaces)
            .finish_non_exhaustive()
    }
}

impl Cell for PredictiveCheckCell {
    fn id(&self) -> CellId {
        self.id
    }

    fn label(&self) -> String {
        format!("{} {}", self.variable, self.statistic)
    }

    fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    fn refresh(&self, space: Space, mask: &PublishedMask, _ctx: &InteractionContext) {
        let Some(view) = self.views.get(&space) else {
            return;
        };
        let mut view = lock(view);
        let (highlight, subset_p_value) = if mask.mask.is_unrestricted() {
            (Highlight::Unfiltered, None)
        } else {
            let subset = finite(&mask.mask.filter(&view.per_draw));
            let subset_p = self
                .observed
                .and_then(|observed| p_value(&subset, observed));
            (Highlight::from_values(subset), subset_p)
        };
        view.highlight = highlight;
        view.subset_p_value = subset_p_value;
        view.mask_revision = mask.revision;
    }

    fn frame(&self, space: Space) -> Option<CellFrame> {
        let view = lock(self.views.get(&space)?);
        let draws = view.per_draw.iter().filter(|value| value.is_finite()).count();
        let body = if draws == 0 {
            FrameBody::NoData
        } else {
            FrameBody::PredictiveCheck {
                statistic: self.statistic,
                observed: self.observed,
                p_value: view.p_value,
                draws,
                highlight: view.highlight.clone(),
                subset_p_value: view.subset_p_value,
            }
        };
        Some(CellFrame {
            cell: self.id,
            label: self.label(),
            space,
            mask_revision: view.mask_revision,
            body,
        })
    }
}
