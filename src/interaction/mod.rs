// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared selection state and the counted-completion barrier used by diagram events.

mod context;
mod links;
mod mask;
mod rendezvous;
mod selection;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use context::{GlobalUpdate, InteractionContext, InteractionStats, PublishedMask};
pub use links::{DimensionLinks, WidgetLink};
pub use mask::{Membership, SampleMask};
pub use rendezvous::{Arrival, JoinReport, Rendezvous};
pub use selection::{SelectionState, XRange};

/// A worker that panicked mid-update leaves the map in a state the next round overwrites,
/// so poisoning is not propagated.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
