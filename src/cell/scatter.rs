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
    FrameBody,
};
use crate::artifact::ArtifactAccess;
use crate::interaction::{lock, InteractionContext, PublishedMask};
use crate::model::{
    padded_range, CellId, CoordValue, CoordinateSlice, DimName, Dimension, Space, VarName,
};

/// Draw-paired samples of two variables.
pub struct ScatterCell {
    id: CellId,
    x: VarName,
    y: VarName,
    x_dims: Vec<Dimension>,
    y_dims: Vec<Dimension>,
    artifact: Arc<dyn ArtifactAccess>,
    spaces: Vec<Space>,
    coords: CoordinateState,
    views: BTreeMap<Space, Mutex<ScatterView>>,
}

#[derive(Debug, Default)]
struct ScatterView {
    points: Option<(Vec<f64>, Vec<f64>)>,
    selected: Option<usize>,
    mask_revision: u64,
}

impl ScatterCell {
    pub fn new(
        id: CellId,
        x: VarName,
        y: VarName,
        artifact: Arc<dyn ArtifactAccess>,
        spaces: &[Space],
    ) -> Self {
        let x_dims = artifact.dims(x.as_str()).unwrap_or_default();
        let y_dims = artifact.dims(y.as_str()).unwrap_or_default();
        let mut union = x_dims.clone();
        for dim in &y_dims {
            if !union.iter().any(|known| known.name() == dim.name()) {
                union.push(dim.clone());
            }
        }
        let spaces: Vec<Space> = spaces
            .iter()
            .copied()
            .filter(|space| {
                artifact.samples(x.as_str(), *space).is_ok()
                    && artifact.samples(y.as_str(), *space).is_ok()
            })
            .collect();
        let coords = CoordinateState::new(union, &spaces);
        let views = spaces
            .iter()
            .map(|space| (*space, Mutex::new(ScatterView::default())))
            .collect();
        Self {
            id,
            x,
            y,
            x_dims,
            y_dims,
            artifact,
            spaces,
            coords,
            views,
        }
    }

    fn slice_of(&self, var: &VarName, dims: &[Dimension], space: Space) -> Option<Vec<f64>> {
        let samples = self.artifact.samples(var.as_str(), space).ok()?;
        let positions = self.coords.positions(dims)?;
        samples.draw_slice(&positions).map(<[f64]>::to_vec)
    }
}

impl fmt::Debug for ScatterCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterCell")
            .field("id", &self.id)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("spaces", &self.spaces)
            .finish_non_exhaustive()
    }
}

impl Cell for ScatterCell {
    fn id(&self) -> CellId {
        self.id
    }

    fn label(&self) -> String {
        format!("{} vs {}", self.x, self.y)
    }

    fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    fn refresh(&self, space: Space, mask: &PublishedMask, _ctx: &InteractionContext) {
        let Some(view) = self.views.get(&space) else {
            return;
        };
        let mut view = lock(view);
        let selected = match (&view.points, mask.mask.membership()) {
            (Some((xs, _)), Some(membership)) => Some(
                (0..xs.len())
                    .filter(|draw| membership.contains(*draw))
                    .count(),
            ),
            _ => None,
        };
        view.selected = selected;
        view.mask_revision = mask.revision;
    }

    fn frame(&self, space: Space) -> Option<CellFrame> {
        let view = lock(self.views.get(&space)?);
        let ranges = view.points.as_ref().and_then(|(xs, ys)| {
            Some((padded_range(xs)?, padded_range(ys)?, xs.len()))
        });
        let body = match ranges {
            Some((x_range, y_range, points)) => FrameBody::Scatter {
                x_range,
                y_range,
                points,
                selected: view.selected,
                coordinates: self.coords.slice(),
            },
            None => FrameBody::NoData,
        };
        Some(CellFrame {
            cell: self.id,
            label: self.label(),
            space,
            mask_revision: view.mask_revision,
            body,
        })
    }

    fn as_coordinate_aware(&self) -> Option<&dyn CoordinateAware> {
        Some(self)
    }
}

impl CoordinateAware for ScatterCell {
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
        let points = match (
            self.slice_of(&self.x, &self.x_dims, space),
            self.slice_of(&self.y, &self.y_dims, space),
        ) {
            (Some(mut xs), Some(mut ys)) => {
                let paired = xs.len().min(ys.len());
                xs.truncate(paired);
                ys.truncate(paired);
                Some((xs, ys))
            }
            _ => None,
        };
        lock(view).points = points;
    }

    fn coordinate_slice(&self) -> CoordinateSlice {
        self.coords.slice()
    }
}
