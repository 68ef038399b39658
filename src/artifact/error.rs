// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::{IdError, LayoutError, Space};

#[derive(Debug)]
pub enum ArtifactError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        what: &'static str,
        source: serde_json::Error,
    },
    MissingHeaderKey {
        key: &'static str,
    },
    InvalidName {
        field: &'static str,
        value: String,
        source: IdError,
    },
    UnknownVariable {
        name: String,
        suggestion: Option<String>,
    },
    SpaceAbsent {
        space: Space,
    },
    VariableNotInSpace {
        name: String,
        space: Space,
    },
    MissingArray {
        space: Space,
        variable: String,
        array: String,
    },
    Layout {
        space: Space,
        variable: String,
        source: LayoutError,
    },
    DrawCountMismatch {
        space: Space,
        variable: String,
        expected: usize,
        actual: usize,
    },
    PredictiveDrawMismatch {
        variable: String,
        space: Space,
        predictive: Space,
        expected: usize,
        actual: usize,
    },
}

impl ArtifactError {
    /// Lookup failures a cell renders as "no data"; everything else is a load failure.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::UnknownVariable { .. } | Self::SpaceAbsent { .. } | Self::VariableNotInSpace { .. }
        )
    }
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read artifact {path:?}: {source}"),
            Self::Json { what, source } => write!(f, "malformed {what}: {source}"),
            Self::MissingHeaderKey { key } => write!(f, "artifact header is missing {key:?}"),
            Self::InvalidName {
                field,
                value,
                source,
            } => write!(f, "invalid {field} name {value:?}: {source}"),
            Self::UnknownVariable { name, suggestion } => match suggestion {
                Some(suggestion) => {
                    write!(f, "unknown variable {name:?} (did you mean {suggestion:?}?)")
                }
                None => write!(f, "unknown variable {name:?}"),
            },
            Self::SpaceAbsent { space } => write!(f, "space {space} is not in the artifact"),
            Self::VariableNotInSpace { name, space } => {
                write!(f, "variable {name:?} has no samples in space {space}")
            }
            Self::MissingArray {
                space,
                variable,
                array,
            } => write!(
                f,
                "array {array:?} for variable {variable:?} in space {space} is missing"
            ),
            Self::Layout {
                space,
                variable,
                source,
            } => write!(
                f,
                "bad sample layout for variable {variable:?} in space {space}: {source}"
            ),
            Self::DrawCountMismatch {
                space,
                variable,
                expected,
                actual,
            } => write!(
                f,
                "variable {variable:?} has {actual} draws in space {space}, expected {expected}"
            ),
            Self::PredictiveDrawMismatch {
                variable,
                space,
                predictive,
                expected,
                actual,
            } => write!(
                f,
                "observed variable {variable:?} has {actual} draws in space {predictive} but space {space} has {expected}"
            ),
        }
    }
}

impl std::error::Error for ArtifactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidName { source, .. } => Some(source),
            Self::Layout { source, .. } => Some(source),
            _ => None,
        }
    }
}
