// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::links::DimensionLinks;
use super::mask::{Membership, SampleMask};
use super::rendezvous::Rendezvous;
use super::selection::SelectionState;
use super::lock;
use crate::model::{Space, VarName};

/// A mask as last published for a space. The revision grows by one per publication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedMask {
    pub mask: Arc<SampleMask>,
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionStats {
    pub widget_interactions: u64,
    pub selection_interactions: u64,
}

/// Shared interaction state of one diagram.
///
/// Every logical map sits behind its own mutex and is only held for a read-modify-write;
/// nothing here is locked while a worker computes. Consistency after an event comes from
/// recomputing the mask from scratch once the round's workers have all arrived, never from
/// holding two maps at once.
#[derive(Debug, Default)]
pub struct InteractionContext {
    draws: BTreeMap<Space, usize>,
    selections: Mutex<BTreeMap<(Space, VarName), SelectionState>>,
    memberships: Mutex<BTreeMap<Space, BTreeMap<VarName, Arc<Membership>>>>,
    masks: Mutex<BTreeMap<Space, PublishedMask>>,
    selected_space: Mutex<Option<Space>>,
    global_update: Mutex<bool>,
    links: Mutex<DimensionLinks>,
    rounds: Mutex<BTreeMap<Space, Arc<Rendezvous>>>,
    event_gate: Mutex<()>,
    stats: Mutex<InteractionStats>,
}

impl InteractionContext {
    pub fn new(draws: BTreeMap<Space, usize>) -> Self {
        Self {
            draws,
            ..Self::default()
        }
    }

    pub fn draw_count(&self, space: Space) -> usize {
        self.draws.get(&space).copied().unwrap_or(0)
    }

    /// Serialises top-level events; held for the whole event.
    pub fn gate(&self) -> MutexGuard<'_, ()> {
        lock(&self.event_gate)
    }

    pub fn record_selection(
        &self,
        space: Space,
        var: VarName,
        state: SelectionState,
        membership: Membership,
    ) {
        let membership = Arc::new(membership.resized(self.draw_count(space)));
        lock(&self.memberships)
            .entry(space)
            .or_default()
            .insert(var.clone(), membership);
        lock(&self.selections).insert((space, var), state);
    }

    /// Returns whether a selection was removed.
    pub fn remove_selection(&self, space: Space, var: &VarName) -> bool {
        if let Some(by_var) = lock(&self.memberships).get_mut(&space) {
            by_var.remove(var);
        }
        lock(&self.selections)
            .remove(&(space, var.clone()))
            .is_some()
    }

    pub fn selection(&self, space: Space, var: &VarName) -> Option<SelectionState> {
        lock(&self.selections).get(&(space, var.clone())).cloned()
    }

    pub fn selections_in(&self, space: Space) -> Vec<(VarName, SelectionState)> {
        lock(&self.selections)
            .iter()
            .filter(|((selection_space, _), _)| *selection_space == space)
            .map(|((_, var), state)| (var.clone(), state.clone()))
            .collect()
    }

    pub fn has_selections(&self) -> bool {
        !lock(&self.selections).is_empty()
    }

    /// Contributor memberships of `space`, cloned out of the lock.
    pub fn contributors(&self, space: Space) -> Vec<Arc<Membership>> {
        lock(&self.memberships)
            .get(&space)
            .map(|by_var| by_var.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Recomputes the mask of `space` from the current contributors and publishes it.
    pub fn publish_mask(&self, space: Space) -> PublishedMask {
        let contributors = self.contributors(space);
        let mask = SampleMask::intersect(
            self.draw_count(space),
            contributors.iter().map(Arc::as_ref),
        );
        let mut masks = lock(&self.masks);
        let entry = masks.entry(space).or_default();
        entry.mask = Arc::new(mask);
        entry.revision += 1;
        entry.clone()
    }

    pub fn mask(&self, space: Space) -> PublishedMask {
        lock(&self.masks).get(&space).cloned().unwrap_or_default()
    }

    pub fn set_selected_space(&self, space: Option<Space>) {
        *lock(&self.selected_space) = space;
    }

    pub fn selected_space(&self) -> Option<Space> {
        *lock(&self.selected_space)
    }

    /// Marks a diagram-wide update (coordinate change, reset) until the guard drops.
    pub fn global_update(&self) -> GlobalUpdate<'_> {
        *lock(&self.global_update) = true;
        GlobalUpdate { ctx: self }
    }

    pub fn is_global_update(&self) -> bool {
        *lock(&self.global_update)
    }

    pub fn links(&self) -> MutexGuard<'_, DimensionLinks> {
        lock(&self.links)
    }

    /// Opens the completion registry of a round in `space`.
    pub fn begin_round(&self, space: Space) -> Arc<Rendezvous> {
        let round = Rendezvous::new();
        let previous = lock(&self.rounds).insert(space, Arc::clone(&round));
        if let Some(previous) = previous {
            tracing::warn!(
                %space,
                pending = previous.pending(),
                "round opened while the previous one was still registered"
            );
        }
        round
    }

    pub fn end_round(&self, space: Space) {
        lock(&self.rounds).remove(&space);
    }

    pub fn active_rounds(&self) -> usize {
        lock(&self.rounds).len()
    }

    /// Drops every selection, contributor and the selected-space marker.
    pub fn clear_selections(&self) {
        lock(&self.memberships).clear();
        lock(&self.selections).clear();
        *lock(&self.selected_space) = None;
    }

    pub fn record_widget_interaction(&self) {
        lock(&self.stats).widget_interactions += 1;
    }

    pub fn record_selection_interaction(&self) {
        lock(&self.stats).selection_interactions += 1;
    }

    pub fn stats(&self) -> InteractionStats {
        *lock(&self.stats)
    }
}

#[must_use = "the global-update flag is cleared when the guard drops"]
pub struct GlobalUpdate<'a> {
    ctx: &'a InteractionContext,
}

impl Drop for GlobalUpdate<'_> {
    fn drop(&mut self) {
        *lock(&self.ctx.global_update) = false;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::InteractionContext;
    use crate::interaction::{Membership, SelectionState, XRange};
    use crate::model::{CoordinateSlice, Space, VarName};

    fn ctx() -> InteractionContext {
        let mut draws = BTreeMap::new();
        draws.insert(Space::Prior, 10);
        draws.insert(Space::Posterior, 10);
        InteractionContext::new(draws)
    }

    fn var(name: &str) -> VarName {
        VarName::new(name).expect("var")
    }

    fn state(space: Space) -> SelectionState {
        SelectionState {
            range: XRange::new(0.0, 1.0).expect("range"),
            coordinates: CoordinateSlice::default(),
            origin: space,
        }
    }

    #[test]
    fn fresh_spaces_publish_the_unrestricted_sentinel() {
        let ctx = ctx();
        assert!(ctx.mask(Space::Posterior).mask.is_unrestricted());
        assert_eq!(ctx.mask(Space::Posterior).revision, 0);

        let published = ctx.publish_mask(Space::Posterior);
        assert!(published.mask.is_unrestricted());
        assert_eq!(published.revision, 1);
    }

    #[test]
    fn published_mask_is_the_intersection_per_space() {
        let ctx = ctx();
        ctx.record_selection(
            Space::Posterior,
            var("mu"),
            state(Space::Posterior),
            Membership::from_indices(10, [1, 2, 3]),
        );
        ctx.record_selection(
            Space::Posterior,
            var("tau"),
            state(Space::Posterior),
            Membership::from_indices(10, [2, 3, 4]),
        );
        ctx.record_selection(
            Space::Prior,
            var("mu"),
            state(Space::Posterior),
            Membership::from_indices(10, [9]),
        );

        let posterior = ctx.publish_mask(Space::Posterior);
        assert_eq!(
            posterior.mask.membership().map(Membership::indices),
            Some(vec![2, 3])
        );
        let prior = ctx.publish_mask(Space::Prior);
        assert_eq!(prior.mask.membership().map(Membership::indices), Some(vec![9]));

        assert!(ctx.remove_selection(Space::Posterior, &var("mu")));
        assert!(!ctx.remove_selection(Space::Posterior, &var("mu")));
        let posterior = ctx.publish_mask(Space::Posterior);
        assert_eq!(
            posterior.mask.membership().map(Membership::indices),
            Some(vec![2, 3, 4])
        );
        assert_eq!(ctx.selections_in(Space::Posterior).len(), 1);
    }

    #[test]
    fn clearing_drops_selections_and_marker() {
        let ctx = ctx();
        ctx.set_selected_space(Some(Space::Prior));
        ctx.record_selection(
            Space::Prior,
            var("mu"),
            state(Space::Prior),
            Membership::from_indices(10, [0]),
        );
        ctx.clear_selections();
        assert!(!ctx.has_selections());
        assert_eq!(ctx.selected_space(), None);
        assert!(ctx.publish_mask(Space::Prior).mask.is_unrestricted());
    }

    #[test]
    fn global_update_flag_follows_the_guard() {
        let ctx = ctx();
        {
            let _update = ctx.global_update();
            assert!(ctx.is_global_update());
        }
        assert!(!ctx.is_global_update());
    }

    #[test]
    fn rounds_are_registered_until_drained() {
        let ctx = ctx();
        let round = ctx.begin_round(Space::Prior);
        assert_eq!(ctx.active_rounds(), 1);
        round.wait();
        ctx.end_round(Space::Prior);
        assert_eq!(ctx.active_rounds(), 0);
    }
}
