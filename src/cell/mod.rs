// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cells: the smallest interactive unit of a diagram.
//!
//! A cell shows one variable, one variable pair, or one predictive-check statistic in each
//! space it is drawn for. Behaviour beyond the basic [`Cell`] contract is opted into through
//! the capability traits: [`SelectionAware`] cells accept range selections and contribute a
//! membership to their space's mask; [`CoordinateAware`] cells expose coordinate selectors
//! and re-slice their samples when a selector moves.
//!
//! Cells never write the mask. They read the published mask during [`Cell::refresh`] and
//! rebuild their own view state from it.

mod predictive;
mod scatter;
mod variable;
mod widgets;

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use predictive::{PredictiveCheckCell, Statistic};
pub use scatter::ScatterCell;
pub use variable::VariableCell;
pub use widgets::{legal_values, CoordinateState, CoordinateWidget};

use crate::interaction::{InteractionContext, Membership, PublishedMask, XRange};
use crate::model::{
    CellId, CoordValue, CoordinateSlice, DimName, Dimension, DistributionKind, Space, VarName,
};

/// Whether range selections are offered at all.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Interactive,
    Static,
}

impl RenderMode {
    pub fn allows_selection(self) -> bool {
        self == Self::Interactive
    }
}

pub trait Cell: Send + Sync + fmt::Debug {
    fn id(&self) -> CellId;

    fn label(&self) -> String;

    /// Spaces this cell is drawn in.
    fn spaces(&self) -> &[Space];

    fn shows(&self, space: Space) -> bool {
        self.spaces().contains(&space)
    }

    /// Rebuilds the view of `space` from the published mask.
    fn refresh(&self, space: Space, mask: &PublishedMask, ctx: &InteractionContext);

    fn frame(&self, space: Space) -> Option<CellFrame>;

    fn as_selection_aware(&self) -> Option<&dyn SelectionAware> {
        None
    }

    fn as_coordinate_aware(&self) -> Option<&dyn CoordinateAware> {
        None
    }
}

pub trait SelectionAware: Send + Sync {
    fn variable(&self) -> &VarName;

    /// Membership of the current slice's draws in `range`; `None` when `space` has no data.
    fn membership(&self, space: Space, range: XRange) -> Option<Membership>;

    /// Coordinates the current slice was taken at.
    fn coordinate_snapshot(&self) -> CoordinateSlice;
}

pub trait CoordinateAware: Send + Sync {
    /// Dimensions the selectors are built from.
    fn dims(&self) -> &[Dimension];

    fn widgets(&self, space: Space) -> Vec<CoordinateWidget>;

    fn widget(&self, space: Space, selector: &str) -> Option<CoordinateWidget> {
        self.widgets(space)
            .into_iter()
            .find(|widget| widget.name.as_str() == selector)
    }

    /// Moves one selector. Returns whether its value or options changed.
    fn apply_widget(
        &self,
        space: Space,
        selector: &DimName,
        options: Vec<CoordValue>,
        value: CoordValue,
    ) -> Result<bool, CoordinateError>;

    /// Reloads the samples of `space` for the current coordinates.
    fn reslice(&self, space: Space);

    fn coordinate_slice(&self) -> CoordinateSlice;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    UnknownSelector { selector: String },
    EmptyOptions { selector: String },
    ValueNotInOptions { selector: String, value: CoordValue },
    /// The value is not one the selector's dimension has at the current coordinates.
    NotADimensionValue { selector: String, value: CoordValue },
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSelector { selector } => write!(f, "no coordinate selector {selector:?}"),
            Self::EmptyOptions { selector } => {
                write!(f, "selector {selector:?} needs at least one option")
            }
            Self::ValueNotInOptions { selector, value } => {
                write!(f, "value {value} is not an option of selector {selector:?}")
            }
            Self::NotADimensionValue { selector, value } => {
                write!(f, "selector {selector:?} has no value {value}")
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

/// How a cell shows the published mask.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Highlight {
    /// No selection is active: the full sample set is shown.
    #[default]
    Unfiltered,
    /// Values of the draws the mask includes.
    Subset(Vec<f64>),
    /// The mask excludes every draw; shown explicitly, never as the full set.
    Empty,
}

impl Highlight {
    pub fn from_values(values: Vec<f64>) -> Self {
        if values.is_empty() {
            Self::Empty
        } else {
            Self::Subset(values)
        }
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Unfiltered => None,
            Self::Subset(values) => Some(values.len()),
            Self::Empty => Some(0),
        }
    }
}

/// A snapshot of what a cell shows in one space.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFrame {
    pub cell: CellId,
    pub label: String,
    pub space: Space,
    pub mask_revision: u64,
    pub body: FrameBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameBody {
    NoData,
    Distribution {
        kind: DistributionKind,
        x_range: (f64, f64),
        samples: usize,
        highlight: Highlight,
        selection: Option<XRange>,
        coordinates: CoordinateSlice,
    },
    Scatter {
        x_range: (f64, f64),
        y_range: (f64, f64),
        points: usize,
        selected: Option<usize>,
        coordinates: CoordinateSlice,
    },
    PredictiveCheck {
        statistic: Statistic,
        observed: Option<f64>,
        p_value: Option<f64>,
        draws: usize,
        highlight: Highlight,
        subset_p_value: Option<f64>,
    },
}
