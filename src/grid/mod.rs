// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cell grids of a diagram and the coordinate-selector links between them.
//!
//! The graph grid holds one variable cell per model variable, one row per dependency level
//! (roots first). Predictive-check rows and scatter pairs are appended after it. Cell ids are
//! positions in [`Grid::cells`] and never change once assigned.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::artifact::{closest_name, ArtifactAccess, InferenceArtifact};
use crate::cell::{
    Cell, CoordinateWidget, PredictiveCheckCell, RenderMode, ScatterCell, Statistic, VariableCell,
};
use crate::diagram::DiagramError;
use crate::interaction::DimensionLinks;
use crate::model::{CellId, DimName, DimensionSplit, Space, VarName};

pub const RESET_LABEL: &str = "Reset Diagram";

#[derive(Debug, Default)]
pub struct Grid {
    cells: Vec<Arc<dyn Cell>>,
    graph_rows: Vec<Vec<CellId>>,
    predictive_rows: Vec<Vec<CellId>>,
    scatter: Vec<CellId>,
    by_variable: BTreeMap<VarName, CellId>,
}

/// A control-panel selector: the authority widget of one dimension in one space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelWidget {
    pub space: Space,
    pub authority: CellId,
    pub widget: CoordinateWidget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    pub widgets: Vec<PanelWidget>,
    pub reset_label: &'static str,
}

impl Grid {
    /// Sample spaces of `artifact` that cells are drawn for.
    pub fn sample_spaces(artifact: &dyn ArtifactAccess) -> Vec<Space> {
        Space::SAMPLE_SPACES
            .into_iter()
            .filter(|space| artifact.spaces().contains(space))
            .collect()
    }

    /// Builds the graph grid and one predictive-check row per requested observed variable.
    pub fn build(
        artifact: &Arc<InferenceArtifact>,
        mode: RenderMode,
        predictive_checks: &[String],
    ) -> Result<Self, DiagramError> {
        let observed = predictive_checks
            .iter()
            .map(|name| observed_variable(artifact, name))
            .collect::<Result<Vec<_>, _>>()?;

        let spaces = Self::sample_spaces(artifact.as_ref());
        let shared: Arc<dyn ArtifactAccess> = artifact.clone();
        let mut grid = Self::default();

        for level in artifact.variables_by_level() {
            let mut row = Vec::with_capacity(level.len());
            for variable in level {
                let id = grid.next_id();
                let cell = VariableCell::new(
                    id,
                    variable.name().clone(),
                    Arc::clone(&shared),
                    mode,
                    &spaces,
                );
                grid.by_variable.insert(variable.name().clone(), id);
                grid.cells.push(Arc::new(cell));
                row.push(id);
            }
            grid.graph_rows.push(row);
        }

        for variable in observed {
            let mut row = Vec::with_capacity(Statistic::ALL.len());
            for statistic in Statistic::ALL {
                let id = grid.next_id();
                let cell = PredictiveCheckCell::new(
                    id,
                    variable.clone(),
                    statistic,
                    artifact,
                    &spaces,
                );
                grid.cells.push(Arc::new(cell));
                row.push(id);
            }
            grid.predictive_rows.push(row);
        }

        tracing::debug!(
            cells = grid.cells.len(),
            levels = grid.graph_rows.len(),
            predictive_rows = grid.predictive_rows.len(),
            "grid built"
        );
        Ok(grid)
    }

    /// Appends one scatter cell per unordered pair of `variables` (duplicates ignored).
    pub fn add_scatter(
        &mut self,
        artifact: &Arc<InferenceArtifact>,
        variables: &[String],
    ) -> Result<Vec<CellId>, DiagramError> {
        let mut names: Vec<VarName> = Vec::with_capacity(variables.len());
        for name in variables {
            let variable = artifact.variable(name)?;
            if !names.contains(variable.name()) {
                names.push(variable.name().clone());
            }
        }
        if names.len() < 2 {
            return Err(DiagramError::TooFewScatterVariables { given: names.len() });
        }

        let spaces = Self::sample_spaces(artifact.as_ref());
        let shared: Arc<dyn ArtifactAccess> = artifact.clone();
        let mut added = Vec::new();
        for (index, x) in names.iter().enumerate() {
            for y in &names[index + 1..] {
                let id = self.next_id();
                let cell = ScatterCell::new(id, x.clone(), y.clone(), Arc::clone(&shared), &spaces);
                self.cells.push(Arc::new(cell));
                self.scatter.push(id);
                added.push(id);
            }
        }
        Ok(added)
    }

    fn next_id(&self) -> CellId {
        CellId(self.cells.len())
    }

    pub fn cells(&self) -> &[Arc<dyn Cell>] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Arc<dyn Cell>> {
        self.cells.get(id.0)
    }

    /// Graph-grid cell of a variable.
    pub fn variable_cell(&self, name: &str) -> Option<&Arc<dyn Cell>> {
        self.by_variable.get(name).and_then(|id| self.cell(*id))
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &VarName> + '_ {
        self.by_variable.keys()
    }

    pub fn graph_rows(&self) -> &[Vec<CellId>] {
        &self.graph_rows
    }

    pub fn predictive_rows(&self) -> &[Vec<CellId>] {
        &self.predictive_rows
    }

    pub fn scatter(&self) -> &[CellId] {
        &self.scatter
    }

    /// Cells drawn in `space`, in id order.
    pub fn cells_in(&self, space: Space) -> impl Iterator<Item = &Arc<dyn Cell>> + '_ {
        self.cells.iter().filter(move |cell| cell.shows(space))
    }

    /// Rebuilds `links` from scratch: selectors in cell order, then composite value maps.
    pub fn link_widgets(&self, links: &mut DimensionLinks) {
        links.clear();
        for cell in &self.cells {
            let Some(coords) = cell.as_coordinate_aware() else {
                continue;
            };
            for space in cell.spaces() {
                for widget in coords.widgets(*space) {
                    links.register(widget.name, *space, cell.id());
                }
                for dim in coords.dims() {
                    if let DimensionSplit::Composite { outer, inner } = dim.split() {
                        links.register_composite(*space, outer, inner, dim.inner_value_map());
                    }
                }
            }
        }
    }

    /// Current authority widget of every (space, selector) pair, selectors sorted.
    pub fn control_panel(&self, links: &DimensionLinks) -> ControlPanel {
        let mut widgets = Vec::new();
        for selector in links.selectors() {
            let mut seen: Vec<Space> = Vec::new();
            for link in links.linked(selector.as_str()) {
                if seen.contains(&link.space) {
                    continue;
                }
                seen.push(link.space);
                if let Some(widget) = self.widget(link.cell, link.space, selector) {
                    widgets.push(PanelWidget {
                        space: link.space,
                        authority: link.cell,
                        widget,
                    });
                }
            }
        }
        ControlPanel {
            widgets,
            reset_label: RESET_LABEL,
        }
    }

    pub fn widget(&self, cell: CellId, space: Space, selector: &DimName) -> Option<CoordinateWidget> {
        self.cell(cell)?
            .as_coordinate_aware()?
            .widget(space, selector.as_str())
    }
}

fn observed_variable(artifact: &InferenceArtifact, name: &str) -> Result<VarName, DiagramError> {
    let variable = artifact.variable(name)?;
    if variable.is_observed() {
        return Ok(variable.name().clone());
    }
    let observed = artifact.variables().into_iter().filter(|variable| variable.is_observed());
    Err(DiagramError::NotObserved {
        name: name.to_owned(),
        suggestion: closest_name(name, observed.map(|variable| variable.name().as_str())),
    })
}
