// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Event protocol: how a selection, clear, reset or coordinate change settles.
//!
//! Every event holds the context's event gate for its whole duration, so two events never
//! interleave their rounds. Within an event each affected space is settled by its own
//! coordinator thread, and a space settles in two phases:
//!
//! 1. *Contribute*: one short-lived worker per affected cell writes its part of the shared
//!    state (a membership, a removed selection, a re-sliced sample set). The coordinator
//!    waits on a [`Rendezvous`] whose expected count is the number of workers it handed an
//!    arrival to.
//! 2. The space's mask is recomputed from scratch over all current contributors and
//!    published with a new revision. Nothing is published before every phase-1 worker has
//!    arrived.
//! 3. *Refresh*: one worker per cell drawn in the space rebuilds its view from the published
//!    mask, joined the same way.
//!
//! A worker that panics, or never starts, still arrives through its [`Arrival`] guard; the
//! failure is reported in the [`SpaceSettlement`] instead of stalling the coordinator.
//!
//! [`Rendezvous`]: crate::interaction::Rendezvous
//! [`Arrival`]: crate::interaction::Arrival

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::thread;

use super::Diagram;
use crate::artifact::closest_name;
use crate::cell::{legal_values, Cell, CoordinateError, CoordinateWidget};
use crate::interaction::{InteractionContext, JoinReport, SelectionState, XRange};
use crate::model::{CellId, CoordValue, DimName, Space};

type Job<'env> = Box<dyn FnOnce() + Send + 'env>;

/// Result of one space's round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceSettlement {
    pub space: Space,
    /// Revision of the mask published by the round.
    pub revision: u64,
    /// Selected draw count; `None` when the mask is unrestricted.
    pub selected: Option<usize>,
    pub contributors: usize,
    /// Workers spawned over both phases.
    pub workers: usize,
    pub failed_workers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    StaticMode,
    InvalidRange,
    UnknownVariable {
        name: String,
        suggestion: Option<String>,
    },
    SpaceNotShown {
        variable: String,
        space: Space,
    },
    UnknownDimension {
        name: String,
        suggestion: Option<String>,
    },
    InvalidCoordinate(CoordinateError),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticMode => f.write_str("selections are disabled in static mode"),
            Self::InvalidRange => f.write_str("range bounds must be numbers"),
            Self::UnknownVariable { name, suggestion } => {
                write!(f, "unknown variable {name:?}")?;
                did_you_mean(f, suggestion.as_deref())
            }
            Self::SpaceNotShown { variable, space } => {
                write!(f, "variable {variable:?} is not drawn in space {space}")
            }
            Self::UnknownDimension { name, suggestion } => {
                write!(f, "no coordinate selector {name:?}")?;
                did_you_mean(f, suggestion.as_deref())
            }
            Self::InvalidCoordinate(err) => write!(f, "{err}"),
        }
    }
}

fn did_you_mean(f: &mut fmt::Formatter<'_>, suggestion: Option<&str>) -> fmt::Result {
    match suggestion {
        Some(suggestion) => write!(f, " (did you mean {suggestion:?}?)"),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event changed state; one entry per settled space, in space order.
    Settled(Vec<SpaceSettlement>),
    /// The event was valid but would not change anything.
    Unchanged,
    /// The event was rejected and left the state as it was.
    Ignored(IgnoreReason),
}

impl EventOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }

    pub fn settlements(&self) -> &[SpaceSettlement] {
        match self {
            Self::Settled(settlements) => settlements,
            Self::Unchanged | Self::Ignored(_) => &[],
        }
    }

    pub fn settlement(&self, space: Space) -> Option<&SpaceSettlement> {
        self.settlements()
            .iter()
            .find(|settlement| settlement.space == space)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Contribute,
    Refresh,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Contribute => "contribute",
            Self::Refresh => "refresh",
        })
    }
}

/// Runs `jobs` on one scoped thread each and waits until every one has arrived.
fn fan_out(ctx: &InteractionContext, space: Space, phase: Phase, jobs: Vec<Job<'_>>) -> JoinReport {
    let round = ctx.begin_round(space);
    let report = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(jobs.len());
        for (index, job) in jobs.into_iter().enumerate() {
            let arrival = round.arrival();
            let spawned = thread::Builder::new()
                .name(format!("brushlink-{phase}-{space}-{index}"))
                .spawn_scoped(scope, move || {
                    job();
                    arrival.complete();
                    tracing::trace!(%space, %phase, index, "worker arrived");
                });
            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(err) => {
                    tracing::warn!(%space, %phase, index, error = %err, "could not spawn worker");
                }
            }
        }
        let report = round.wait();
        for (index, handle) in handles {
            if handle.join().is_err() {
                tracing::warn!(%space, %phase, index, "worker panicked");
            }
        }
        report
    });
    ctx.end_round(space);
    report
}

impl Diagram {
    /// Settles one space: contributors, published mask, then every cell's refresh.
    fn settle(&self, space: Space, contributions: Vec<Job<'_>>) -> SpaceSettlement {
        let contributed = contributions.len();
        let first = fan_out(&self.ctx, space, Phase::Contribute, contributions);
        let published = self.ctx.publish_mask(space);

        let refreshes: Vec<Job<'_>> = self
            .grid
            .cells_in(space)
            .map(|cell| {
                let mask = published.clone();
                let ctx = &self.ctx;
                Box::new(move || cell.refresh(space, &mask, ctx)) as Job<'_>
            })
            .collect();
        let refreshed = refreshes.len();
        let second = fan_out(&self.ctx, space, Phase::Refresh, refreshes);

        let settlement = SpaceSettlement {
            space,
            revision: published.revision,
            selected: published.mask.selected(),
            contributors: self.ctx.contributors(space).len(),
            workers: contributed + refreshed,
            failed_workers: first.failed + second.failed,
        };
        if settlement.failed_workers > 0 {
            tracing::warn!(?settlement, "space settled with failed workers");
        } else {
            tracing::debug!(?settlement, "space settled");
        }
        settlement
    }

    /// Settles every planned space on its own coordinator thread.
    fn settle_all<'env>(&'env self, plans: BTreeMap<Space, Vec<Job<'env>>>) -> EventOutcome {
        let settlements = thread::scope(|scope| {
            let handles: Vec<_> = plans
                .into_iter()
                .map(|(space, jobs)| {
                    let spawned = thread::Builder::new()
                        .name(format!("brushlink-settle-{space}"))
                        .spawn_scoped(scope, move || self.settle(space, jobs));
                    (space, spawned)
                })
                .collect();
            handles
                .into_iter()
                .filter_map(|(space, spawned)| {
                    let joined = spawned
                        .map_err(|err| err.to_string())
                        .and_then(|handle| {
                            handle
                                .join()
                                .map_err(|_| "coordinator panicked".to_owned())
                        });
                    match joined {
                        Ok(settlement) => Some(settlement),
                        Err(err) => {
                            tracing::error!(%space, error = %err, "space did not settle");
                            None
                        }
                    }
                })
                .collect()
        });
        EventOutcome::Settled(settlements)
    }

    fn unknown_variable(&self, name: &str) -> IgnoreReason {
        IgnoreReason::UnknownVariable {
            name: name.to_owned(),
            suggestion: closest_name(name, self.grid.variable_names().map(|name| name.as_str())),
        }
    }

    /// Selects draws of `variable` whose current-slice value lies in `[min, max]`.
    ///
    /// The selection is recorded in every sample space the variable's cell shows, each against
    /// that space's own samples, and every such space settles.
    pub fn select(&self, variable: &str, space: Space, min: f64, max: f64) -> EventOutcome {
        if !self.mode.allows_selection() {
            return ignored(IgnoreReason::StaticMode);
        }
        let Some(range) = XRange::new(min, max) else {
            return ignored(IgnoreReason::InvalidRange);
        };
        let Some(cell) = self.grid.variable_cell(variable) else {
            return ignored(self.unknown_variable(variable));
        };
        let Some(selection) = cell.as_selection_aware() else {
            return ignored(IgnoreReason::StaticMode);
        };
        if !cell.shows(space) {
            return ignored(IgnoreReason::SpaceNotShown {
                variable: variable.to_owned(),
                space,
            });
        }

        let _gate = self.ctx.gate();
        self.ctx.record_selection_interaction();
        self.ctx.set_selected_space(Some(space));
        let snapshot = selection.coordinate_snapshot();
        tracing::debug!(%variable, %space, min = range.min(), max = range.max(), "select");

        let mut plans = BTreeMap::new();
        for target in cell.spaces().iter().copied() {
            let ctx = &self.ctx;
            let variable = selection.variable().clone();
            let state = SelectionState {
                range,
                coordinates: snapshot.clone(),
                origin: space,
            };
            let job: Job<'_> = Box::new(move || match selection.membership(target, range) {
                Some(membership) => ctx.record_selection(target, variable, state, membership),
                None => {
                    tracing::debug!(%variable, space = %target, "no samples to select from");
                    ctx.remove_selection(target, &variable);
                }
            });
            plans.insert(target, vec![job]);
        }
        self.settle_all(plans)
    }

    /// Drops the selection of `variable` in every space it holds one.
    pub fn clear_selection(&self, variable: &str) -> EventOutcome {
        if !self.mode.allows_selection() {
            return ignored(IgnoreReason::StaticMode);
        }
        let Some(cell) = self.grid.variable_cell(variable) else {
            return ignored(self.unknown_variable(variable));
        };
        let Some(selection) = cell.as_selection_aware() else {
            return ignored(IgnoreReason::StaticMode);
        };

        let _gate = self.ctx.gate();
        let name = selection.variable();
        let selected: Vec<Space> = cell
            .spaces()
            .iter()
            .copied()
            .filter(|space| self.ctx.selection(*space, name).is_some())
            .collect();
        if selected.is_empty() {
            return EventOutcome::Unchanged;
        }
        self.ctx.record_selection_interaction();
        tracing::debug!(%variable, spaces = ?selected, "clear selection");

        let mut plans = BTreeMap::new();
        for space in selected {
            let ctx = &self.ctx;
            let job: Job<'_> = Box::new(move || {
                ctx.remove_selection(space, name);
            });
            plans.insert(space, vec![job]);
        }
        let outcome = self.settle_all(plans);
        if !self.ctx.has_selections() {
            self.ctx.set_selected_space(None);
        }
        outcome
    }

    /// Clears every selection and the selected-space marker; every space returns to the
    /// unrestricted mask. Coordinates keep their values.
    pub fn reset(&self) -> EventOutcome {
        let _gate = self.ctx.gate();
        let _update = self.ctx.global_update();
        tracing::debug!("reset");
        self.ctx.clear_selections();
        let plans = self
            .spaces
            .iter()
            .map(|space| (*space, Vec::new()))
            .collect();
        self.settle_all(plans)
    }

    /// Moves the coordinate selector `dimension` to `value` with the option list `options`
    /// in every cell that exposes it.
    ///
    /// Moving the outer selector of a composite dimension resets each dependent inner selector
    /// to its first legal option before any cell re-slices. A cell whose coordinates no longer
    /// match its selection loses that selection. Values the dimension does not have are
    /// ignored. Programmatic moves are not counted as widget interactions.
    pub fn set_coordinate(
        &self,
        dimension: &str,
        options: Vec<CoordValue>,
        value: CoordValue,
    ) -> EventOutcome {
        self.move_coordinate(dimension, options, value, false)
    }

    /// Moves `dimension` to `value`, keeping the options its authority widget shows.
    ///
    /// This is the widget path: a move that changes anything counts as a widget interaction.
    pub fn change_coordinate(&self, dimension: &str, value: CoordValue) -> EventOutcome {
        let selector = match self.linked_selector(dimension) {
            Ok(selector) => selector,
            Err(reason) => return ignored(reason),
        };
        let Some(current) = self.authority_widget(&selector) else {
            return ignored(self.unknown_dimension(dimension));
        };
        self.move_coordinate(dimension, current.options, value, true)
    }

    fn move_coordinate(
        &self,
        dimension: &str,
        options: Vec<CoordValue>,
        value: CoordValue,
        from_widget: bool,
    ) -> EventOutcome {
        if options.is_empty() {
            return ignored(IgnoreReason::InvalidCoordinate(CoordinateError::EmptyOptions {
                selector: dimension.to_owned(),
            }));
        }
        if !options.contains(&value) {
            return ignored(IgnoreReason::InvalidCoordinate(
                CoordinateError::ValueNotInOptions {
                    selector: dimension.to_owned(),
                    value,
                },
            ));
        }
        let selector = match self.linked_selector(dimension) {
            Ok(selector) => selector,
            Err(reason) => return ignored(reason),
        };

        let _gate = self.ctx.gate();
        if let Some(legal) = self.dimension_values(&selector) {
            if let Some(stray) = std::iter::once(&value)
                .chain(&options)
                .find(|candidate| !legal.contains(candidate))
            {
                return ignored(IgnoreReason::InvalidCoordinate(
                    CoordinateError::NotADimensionValue {
                        selector: dimension.to_owned(),
                        value: stray.clone(),
                    },
                ));
            }
        }
        if let Some(current) = self.authority_widget(&selector) {
            if current.value == value && current.options == options {
                return EventOutcome::Unchanged;
            }
        }
        if from_widget {
            self.ctx.record_widget_interaction();
        }
        let _update = self.ctx.global_update();
        tracing::debug!(%dimension, %value, "set coordinate");

        let mut touched: BTreeMap<Space, BTreeSet<CellId>> = BTreeMap::new();
        let links: Vec<_> = self.ctx.links().linked(selector.as_str()).to_vec();
        for link in &links {
            self.apply(link.cell, link.space, &selector, options.clone(), value.clone(), &mut touched);
        }

        // Dependent inner selectors settle before any cell re-slices.
        let cascades: Vec<(Space, DimName, Vec<CoordValue>, Vec<CellId>)> = {
            let links = self.ctx.links();
            touched
                .keys()
                .flat_map(|space| {
                    links
                        .inner_of(*space, selector.as_str())
                        .iter()
                        .filter_map(|inner| {
                            let options = links
                                .inner_options(*space, inner.as_str(), &value)?
                                .to_vec();
                            let cells = links.linked_in(inner.as_str(), *space).collect();
                            Some((*space, inner.clone(), options, cells))
                        })
                        .collect::<Vec<_>>()
                })
                .collect()
        };
        for (space, inner, options, cells) in cascades {
            let Some(first) = options.first().cloned() else {
                continue;
            };
            for cell in cells {
                self.apply(cell, space, &inner, options.clone(), first.clone(), &mut touched);
            }
        }

        if touched.is_empty() {
            return EventOutcome::Unchanged;
        }
        let plans = touched
            .into_iter()
            .map(|(space, cells)| {
                let jobs = cells
                    .into_iter()
                    .filter_map(|id| self.grid.cell(id))
                    .map(|cell| self.reslice_job(cell.as_ref(), space))
                    .collect();
                (space, jobs)
            })
            .collect();
        let outcome = self.settle_all(plans);
        if !self.ctx.has_selections() {
            self.ctx.set_selected_space(None);
        }
        outcome
    }

    fn linked_selector(&self, dimension: &str) -> Result<DimName, IgnoreReason> {
        DimName::new(dimension)
            .ok()
            .filter(|selector| self.ctx.links().contains(selector.as_str()))
            .ok_or_else(|| self.unknown_dimension(dimension))
    }

    fn unknown_dimension(&self, dimension: &str) -> IgnoreReason {
        let links = self.ctx.links();
        IgnoreReason::UnknownDimension {
            name: dimension.to_owned(),
            suggestion: closest_name(dimension, links.selectors().map(|name| name.as_str())),
        }
    }

    fn authority_widget(&self, selector: &DimName) -> Option<CoordinateWidget> {
        let authority = self.ctx.links().authority(selector.as_str())?;
        self.grid.widget(authority.cell, authority.space, selector)
    }

    /// Values the authority cell's dimension allows for `selector` at its current coordinates.
    fn dimension_values(&self, selector: &DimName) -> Option<Vec<CoordValue>> {
        let authority = self.ctx.links().authority(selector.as_str())?;
        let coords = self.grid.cell(authority.cell)?.as_coordinate_aware()?;
        legal_values(coords.dims(), &coords.coordinate_slice(), selector.as_str())
    }

    fn apply(
        &self,
        cell: CellId,
        space: Space,
        selector: &DimName,
        options: Vec<CoordValue>,
        value: CoordValue,
        touched: &mut BTreeMap<Space, BTreeSet<CellId>>,
    ) {
        let Some(coords) = self.grid.cell(cell).and_then(|cell| cell.as_coordinate_aware()) else {
            return;
        };
        match coords.apply_widget(space, selector, options, value) {
            Ok(true) => {
                touched.entry(space).or_default().insert(cell);
            }
            Ok(false) => {}
            Err(err) => tracing::debug!(%cell, %space, error = %err, "selector not applied"),
        }
    }

    /// Re-slices `cell` in `space` and drops its selection there if it was taken at other
    /// coordinates.
    fn reslice_job<'env>(&'env self, cell: &'env dyn Cell, space: Space) -> Job<'env> {
        let ctx = &self.ctx;
        Box::new(move || {
            if let Some(coords) = cell.as_coordinate_aware() {
                coords.reslice(space);
            }
            let Some(selection) = cell.as_selection_aware() else {
                return;
            };
            let variable = selection.variable();
            let stale = ctx
                .selection(space, variable)
                .is_some_and(|state| state.coordinates != selection.coordinate_snapshot());
            if stale && ctx.remove_selection(space, variable) {
                tracing::debug!(%variable, %space, "selection invalidated by coordinate change");
            }
        })
    }
}

fn ignored(reason: IgnoreReason) -> EventOutcome {
    tracing::debug!(%reason, "event ignored");
    EventOutcome::Ignored(reason)
}
