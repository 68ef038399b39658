// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use super::lock;

/// Counted-completion barrier for one fan-out.
///
/// Every [`Arrival`] handed out raises the expected count, so the count always matches the
/// workers actually spawned. An arrival dropped without [`Arrival::complete`] (a panicking
/// worker, or a closure dropped because its thread never started) still counts, as a failure.
#[derive(Debug, Default)]
pub struct Rendezvous {
    state: Mutex<RoundState>,
    settled: Condvar,
}

#[derive(Debug, Default)]
struct RoundState {
    expected: usize,
    arrived: usize,
    failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinReport {
    pub arrived: usize,
    pub failed: usize,
}

impl Rendezvous {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn arrival(self: &Arc<Self>) -> Arrival {
        lock(&self.state).expected += 1;
        Arrival {
            round: Arc::clone(self),
            completed: false,
        }
    }

    pub fn expected(&self) -> usize {
        lock(&self.state).expected
    }

    pub fn pending(&self) -> usize {
        let state = lock(&self.state);
        state.expected - state.arrived
    }

    /// Blocks until every issued arrival has been completed or dropped.
    pub fn wait(&self) -> JoinReport {
        let mut state = lock(&self.state);
        while state.arrived < state.expected {
            state = self
                .settled
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        JoinReport {
            arrived: state.arrived,
            failed: state.failed,
        }
    }

    fn arrive(&self, completed: bool) {
        let mut state = lock(&self.state);
        state.arrived += 1;
        if !completed {
            state.failed += 1;
        }
        if state.arrived >= state.expected {
            self.settled.notify_all();
        }
    }
}

#[derive(Debug)]
#[must_use = "an arrival that is dropped right away counts as a failed worker"]
pub struct Arrival {
    round: Arc<Rendezvous>,
    completed: bool,
}

impl Arrival {
    pub fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for Arrival {
    fn drop(&mut self) {
        self.round.arrive(self.completed);
    }
}
