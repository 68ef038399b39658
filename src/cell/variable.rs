// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use super::{
    Cell, CellFrame, CoordinateAware, CoordinateError, CoordinateState, CoordinateWidget,
    FrameBody, Highlight, RenderMode, SelectionAware,
};
use crate::artifact::ArtifactAccess;
use crate::interaction::{lock, InteractionContext, Membership, PublishedMask, XRange};
use crate::model::{
    padded_range, CellId, CoordValue, CoordinateSlice, DimName, Dimension, DistributionKind, Space,
    VarName,
};

/// One variable (continuous or discrete) in each space it has samples for.
pub struct VariableCell {
    id: CellId,
    variable: VarName,
    kind: DistributionKind,
    mode: RenderMode,
    artifact: Arc<dyn ArtifactAccess>,
    spaces: Vec<Space>,
    coords: CoordinateState,
    views: BTreeMap<Space, Mutex<VariableView>>,
}

#[derive(Debug, Default)]
struct VariableView {
    samples: Option<Vec<f64>>,
    x_range: Option<(f64, f64)>,
    highlight: Highlight,
    selection: Option<XRange>,
    mask_revision: u64,
}

impl VariableCell {
    /// `spaces` are the candidate spaces; the cell keeps those the variable has samples in.
    pub fn new(
        id: CellId,
        variable: VarName,
        artifact: Arc<dyn ArtifactAccess>,
        mode: RenderMode,
        spaces: &[Space],
    ) -> Self {
        let kind = artifact
            .distribution_kind(variable.as_str())
            .unwrap_or_default();
        let dims = artifact.dims(variable.as_str()).unwrap_or_default();
        let spaces: Vec<Space> = spaces
            .iter()
            .copied()
            .filter(|space| artifact.samples(variable.as_str(), *space).is_ok())
            .collect();
        let coords = CoordinateState::new(dims, &spaces);
        let views = spaces
            .iter()
            .map(|space| (*space, Mutex::new(VariableView::default())))
            .collect();
        Self {
            id,
            variable,
            kind,
            mode,
            artifact,
            spaces,
            coords,
            views,
        }
    }

    fn current_samples(&self, space: Space) -> Option<Vec<f64>> {
        let samples = match self.artifact.samples(self.variable.as_str(), space) {
            Ok(samples) => samples,
            Err(err) => {
                tracing::debug!(cell = %self.id, %space, error = %err, "no samples to show");
                return None;
            }
        };
        let positions = self.coords.positions(self.coords.dims())?;
        samples.draw_slice(&positions).map(<[f64]>::to_vec)
    }
}

impl fmt::Debug for VariableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableCell")
            .field("id", &self.id)
            .field("variable", &self.variable)
            .field("kind", &self.kind)
            .field("mode", &self.mode)
            .field("spaces", &self.spaces)
            .finish_non_exhaustive()
    }
}

impl Cell for VariableCell {
    fn id(&self) -> CellId {
        self.id
    }

    fn label(&self) -> String {
        self.variable.to_string()
    }

    fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    fn refresh(&self, space: Space, mask: &PublishedMask, ctx: &InteractionContext) {
        let Some(view) = self.views.get(&space) else {
            return;
        };
        // The box is drawn only in the space the latest selection was made in.
        let selection = if self.mode.allows_selection() && ctx.selected_space() == Some(space) {
            let current = self.coords.slice();
            ctx.selection(space, &self.variable)
                .filter(|state| state.coordinates == current)
                .map(|state| state.range)
        } else {
            None
        };
        let mut view = lock(view);
        let highlight = match (&view.samples, mask.mask.is_unrestricted()) {
            (_, true) | (None, false) => Highlight::Unfiltered,
            (Some(samples), false) => Highlight::from_values(mask.mask.filter(samples)),
        };
        view.highlight = highlight;
        view.selection = selection;
        view.mask_revision = mask.revision;
    }

    fn frame(&self, space: Space) -> Option<CellFrame> {
        let view = lock(self.views.get(&space)?);
        let body = match (&view.samples, view.x_range) {
            (Some(samples), Some(x_range)) => FrameBody::Distribution {
                kind: self.kind,
                x_range,
                samples: samples.len(),
                highlight: view.highlight.clone(),
                selection: view.selection,
                coordinates: self.coords.slice(),
            },
            _ => FrameBody::NoData,
        };
        Some(CellFrame {
            cell: self.id,
            label: self.label(),
            space,
            mask_revision: view.mask_revision,
            body,
        })
    }

    fn as_selection_aware(&self) -> Option<&dyn SelectionAware> {
        self.mode.allows_selection().then_some(self as &dyn SelectionAware)
    }

    fn as_coordinate_aware(&self) -> Option<&dyn CoordinateAware> {
        Some(self)
    }
}

impl SelectionAware for VariableCell {
    fn variable(&self) -> &VarName {
        &self.variable
    }

    fn membership(&self, space: Space, range: XRange) -> Option<Membership> {
        let view = lock(self.views.get(&space)?);
        let samples = view.samples.as_deref()?;
        Some(Membership::from_range(samples, range))
    }

    fn coordinate_snapshot(&self) -> CoordinateSlice {
        self.coords.slice()
    }
}

impl CoordinateAware for VariableCell {
    fn dims(&self) -> &[Dimension] {
        self.coords.dims()
    }

    fn widgets(&self, space: Space) -> Vec<CoordinateWidget> {
        self.coords.widgets(space)
    }

    fn apply_widget(
        &self,
        space: Space,
        selector: &DimName,
        options: Vec<CoordValue>,
        value: CoordValue,
    ) -> Result<bool, CoordinateError> {
        self.coords.apply(space, selector, options, value)
    }

    fn reslice(&self, space: Space) {
        let Some(view) = self.views.get(&space) else {
            return;
        };
        let samples = self.current_samples(space);
        let x_range = samples.as_deref().and_then(padded_range);
        let mut view = lock(view);
        view.samples = samples;
        view.x_range = x_range;
    }

    fn coordinate_slice(&self) -> CoordinateSlice {
        self.coords.slice()
    }
}
