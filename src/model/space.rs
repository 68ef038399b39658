// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One sample collection context of an inference artifact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    Prior,
    Posterior,
    PriorPredictive,
    PosteriorPredictive,
    ObservedData,
    ConstantData,
    SampleStats,
    LogLikelihood,
    Predictions,
    PredictionsConstantData,
}

impl Space {
    pub const ALL: [Space; 10] = [
        Space::Prior,
        Space::Posterior,
        Space::PriorPredictive,
        Space::PosteriorPredictive,
        Space::ObservedData,
        Space::ConstantData,
        Space::SampleStats,
        Space::LogLikelihood,
        Space::Predictions,
        Space::PredictionsConstantData,
    ];

    /// Spaces a diagram draws cells for.
    pub const SAMPLE_SPACES: [Space; 2] = [Space::Prior, Space::Posterior];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prior => "prior",
            Self::Posterior => "posterior",
            Self::PriorPredictive => "prior_predictive",
            Self::PosteriorPredictive => "posterior_predictive",
            Self::ObservedData => "observed_data",
            Self::ConstantData => "constant_data",
            Self::SampleStats => "sample_stats",
            Self::LogLikelihood => "log_likelihood",
            Self::Predictions => "predictions",
            Self::PredictionsConstantData => "predictions_constant_data",
        }
    }

    pub fn is_sample_space(self) -> bool {
        matches!(self, Self::Prior | Self::Posterior)
    }

    /// Predictive counterpart used by observed variables (`prior` -> `prior_predictive`).
    pub fn predictive(self) -> Option<Space> {
        match self {
            Self::Prior => Some(Self::PriorPredictive),
            Self::Posterior => Some(Self::PosteriorPredictive),
            _ => None,
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSpaceError {
    value: String,
}

impl ParseSpaceError {
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseSpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown space '{}'", self.value)
    }
}

impl std::error::Error for ParseSpaceError {}

impl FromStr for Space {
    type Err = ParseSpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Space::ALL
            .into_iter()
            .find(|space| space.as_str() == s)
            .ok_or_else(|| ParseSpaceError { value: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::Space;

    #[test]
    fn parses_every_known_space_from_its_label() {
        for space in Space::ALL {
            assert_eq!(space.as_str().parse::<Space>(), Ok(space));
        }
        let err = "warmup_posterior".parse::<Space>().unwrap_err();
        assert_eq!(err.value(), "warmup_posterior");
    }

    #[test]
    fn only_prior_and_posterior_have_predictive_counterparts() {
        assert_eq!(Space::Prior.predictive(), Some(Space::PriorPredictive));
        assert_eq!(Space::Posterior.predictive(), Some(Space::PosteriorPredictive));
        assert_eq!(Space::ObservedData.predictive(), None);
        assert!(Space::Posterior.is_sample_space());
        assert!(!Space::PosteriorPredictive.is_sample_space());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Space::PosteriorPredictive).expect("serialize");
        assert_eq!(json, "\"posterior_predictive\"");
    }
}
