// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::artifact::ArtifactError;

/// Construction failures. A diagram is never partially built.
#[derive(Debug)]
pub enum DiagramError {
    Artifact(ArtifactError),
    NotObserved {
        name: String,
        suggestion: Option<String>,
    },
    TooFewScatterVariables {
        given: usize,
    },
}

impl fmt::Display for DiagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artifact(err) => write!(f, "artifact error: {err}"),
            Self::NotObserved { name, suggestion } => {
                write!(f, "predictive checks need an observed variable; {name:?} is not observed")?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean {suggestion:?}?)")?;
                }
                Ok(())
            }
            Self::TooFewScatterVariables { given } => write!(
                f,
                "a scatter grid needs at least two distinct variables (got {given})"
            ),
        }
    }
}

impl std::error::Error for DiagramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Artifact(err) => Some(err),
            Self::NotObserved { .. } | Self::TooFewScatterVariables { .. } => None,
        }
    }
}

impl From<ArtifactError> for DiagramError {
    fn from(err: ArtifactError) -> Self {
        Self::Artifact(err)
    }
}
