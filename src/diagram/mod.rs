// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A linked-brushing diagram over one inference artifact.
//!
//! A [`Diagram`] owns the loaded artifact, the cell [`Grid`] and the [`InteractionContext`]
//! every cell reads from. Events (range selections, clearing, reset and coordinate changes)
//! are methods on the diagram; see [`protocol`] for how one event fans out to the cells and
//! settles.

mod error;
pub mod protocol;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

pub use error::DiagramError;
pub use protocol::{EventOutcome, IgnoreReason, SpaceSettlement};

use crate::artifact::{ArtifactAccess, InferenceArtifact};
use crate::cell::{Cell, CellFrame, RenderMode};
use crate::grid::{ControlPanel, Grid};
use crate::interaction::{InteractionContext, InteractionStats, PublishedMask, SelectionState};
use crate::model::{CellId, Space, VarName};

#[derive(Debug)]
pub struct Diagram {
    artifact: Arc<InferenceArtifact>,
    mode: RenderMode,
    spaces: Vec<Space>,
    grid: Grid,
    ctx: InteractionContext,
}

impl Diagram {
    /// Loads the artifact at `path` and builds the diagram. Artifact errors abort construction.
    pub fn open(
        path: impl AsRef<Path>,
        mode: RenderMode,
        predictive_checks: &[String],
    ) -> Result<Self, DiagramError> {
        let artifact = InferenceArtifact::open(path)?;
        Self::from_artifact(Arc::new(artifact), mode, predictive_checks)
    }

    pub fn from_artifact(
        artifact: Arc<InferenceArtifact>,
        mode: RenderMode,
        predictive_checks: &[String],
    ) -> Result<Self, DiagramError> {
        let grid = Grid::build(&artifact, mode, predictive_checks)?;
        let spaces = Grid::sample_spaces(artifact.as_ref());
        let draws: BTreeMap<Space, usize> = spaces
            .iter()
            .map(|space| (*space, artifact.draw_count(*space)))
            .collect();
        let diagram = Self {
            artifact,
            mode,
            spaces,
            grid,
            ctx: InteractionContext::new(draws),
        };
        diagram.grid.link_widgets(&mut diagram.ctx.links());
        diagram.prime(diagram.grid.cells());
        tracing::info!(
            mode = ?diagram.mode,
            cells = diagram.grid.cells().len(),
            spaces = ?diagram.spaces,
            "diagram ready"
        );
        Ok(diagram)
    }

    /// Adds a scatter cell for every pair of `variables`. Meant to be called right after
    /// construction, before any event.
    pub fn with_scatter(mut self, variables: &[String]) -> Result<Self, DiagramError> {
        let added = self.grid.add_scatter(&self.artifact, variables)?;
        self.grid.link_widgets(&mut self.ctx.links());
        let cells: Vec<Arc<dyn Cell>> = added
            .iter()
            .filter_map(|id| self.grid.cell(*id).cloned())
            .collect();
        self.prime(&cells);
        Ok(self)
    }

    /// Loads the first slice of every cell and draws it against the current masks.
    fn prime(&self, cells: &[Arc<dyn Cell>]) {
        cells.par_iter().for_each(|cell| {
            for space in cell.spaces() {
                if let Some(coords) = cell.as_coordinate_aware() {
                    coords.reslice(*space);
                }
                cell.refresh(*space, &self.ctx.mask(*space), &self.ctx);
            }
        });
    }

    pub fn artifact(&self) -> &Arc<InferenceArtifact> {
        &self.artifact
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Sample spaces the diagram draws, in display order.
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn context(&self) -> &InteractionContext {
        &self.ctx
    }

    pub fn mask(&self, space: Space) -> PublishedMask {
        self.ctx.mask(space)
    }

    pub fn selection(&self, variable: &str, space: Space) -> Option<SelectionState> {
        let variable = VarName::new(variable).ok()?;
        self.ctx.selection(space, &variable)
    }

    pub fn selected_space(&self) -> Option<Space> {
        self.ctx.selected_space()
    }

    pub fn frame(&self, cell: CellId, space: Space) -> Option<CellFrame> {
        self.grid.cell(cell)?.frame(space)
    }

    /// Frames of every cell drawn in `space`.
    pub fn frames(&self, space: Space) -> Vec<CellFrame> {
        self.grid
            .cells_in(space)
            .filter_map(|cell| cell.frame(space))
            .collect()
    }

    pub fn control_panel(&self) -> ControlPanel {
        self.grid.control_panel(&self.ctx.links())
    }

    pub fn stats(&self) -> InteractionStats {
        self.ctx.stats()
    }
}
