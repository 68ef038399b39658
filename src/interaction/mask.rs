// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rayon::prelude::*;

use super::selection::XRange;

/// Below this many draws the sequential loops win over rayon's fork/join.
const PARALLEL_THRESHOLD: usize = 16 * 1024;

/// Per-draw membership of one variable's selection in one space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Membership {
    bits: Vec<bool>,
}

impl Membership {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Draws whose value lies inside `range`; NaN values never qualify.
    pub fn from_range(values: &[f64], range: XRange) -> Self {
        let bits = if values.len() >= PARALLEL_THRESHOLD {
            values.par_iter().map(|value| range.contains(*value)).collect()
        } else {
            values.iter().map(|value| range.contains(*value)).collect()
        };
        Self { bits }
    }

    pub fn from_indices(len: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bits = vec![false; len];
        for index in indices {
            if let Some(bit) = bits.get_mut(index) {
                *bit = true;
            }
        }
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn contains(&self, draw: usize) -> bool {
        self.bits.get(draw).copied().unwrap_or(false)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(draw, bit)| bit.then_some(draw))
            .collect()
    }

    /// Pads with `false` or truncates to exactly `len` draws.
    pub fn resized(mut self, len: usize) -> Self {
        self.bits.resize(len, false);
        self
    }

    fn and_assign(&mut self, other: &Membership) {
        let len = self.bits.len();
        let other = &other.bits[..other.bits.len().min(len)];
        if len >= PARALLEL_THRESHOLD {
            self.bits
                .par_iter_mut()
                .zip(other.par_iter())
                .for_each(|(bit, other)| *bit &= *other);
        } else {
            self.bits
                .iter_mut()
                .zip(other)
                .for_each(|(bit, other)| *bit &= *other);
        }
        // Draws the other membership does not cover cannot qualify.
        for bit in self.bits.iter_mut().skip(other.len()) {
            *bit = false;
        }
    }
}

/// Combined inclusion mask of one space.
///
/// `Unrestricted` is the explicit "no selection" sentinel. A `Restricted` mask whose bits are
/// all `true` means that every draw satisfies at least one active selection, which is not the
/// same thing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SampleMask {
    #[default]
    Unrestricted,
    Restricted(Membership),
}

impl SampleMask {
    /// Elementwise AND over every contributor, each taken at `draws` length. Zero contributors
    /// yield [`SampleMask::Unrestricted`].
    pub fn intersect<'a>(draws: usize, contributors: impl IntoIterator<Item = &'a Membership>) -> Self {
        let mut contributors = contributors.into_iter();
        let Some(first) = contributors.next() else {
            return Self::Unrestricted;
        };
        let mut combined = first.clone().resized(draws);
        for membership in contributors {
            combined.and_assign(membership);
        }
        Self::Restricted(combined)
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    pub fn membership(&self) -> Option<&Membership> {
        match self {
            Self::Unrestricted => None,
            Self::Restricted(membership) => Some(membership),
        }
    }

    pub fn includes(&self, draw: usize) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Restricted(membership) => membership.contains(draw),
        }
    }

    /// Selected draw count, `None` while unrestricted.
    pub fn selected(&self) -> Option<usize> {
        self.membership().map(Membership::count)
    }

    /// Values of `samples` at draws the mask includes.
    pub fn filter(&self, samples: &[f64]) -> Vec<f64> {
        match self {
            Self::Unrestricted => samples.to_vec(),
            Self::Restricted(membership) => samples
                .iter()
                .zip(membership.as_slice())
                .filter_map(|(value, keep)| keep.then_some(*value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Membership, SampleMask};
    use crate::interaction::XRange;

    #[test]
    fn zero_contributors_are_distinct_from_all_true() {
        let none = SampleMask::intersect(4, std::iter::empty());
        assert!(none.is_unrestricted());
        assert_eq!(none.selected(), None);

        let everything = Membership::from_bits(vec![true; 4]);
        let all_true = SampleMask::intersect(4, [&everything]);
        assert!(!all_true.is_unrestricted());
        assert_eq!(all_true.selected(), Some(4));
        assert_ne!(none, all_true);
    }

    #[test]
    fn intersection_is_order_independent() {
        let a = Membership::from_indices(100, [3, 7, 42]);
        let b = Membership::from_indices(100, [7, 42, 90]);
        let c = Membership::from_indices(100, [1, 7, 42, 99]);

        let abc = SampleMask::intersect(100, [&a, &b, &c]);
        let cab = SampleMask::intersect(100, [&c, &a, &b]);
        assert_eq!(abc, cab);
        assert_eq!(abc.membership().map(Membership::indices), Some(vec![7, 42]));
    }

    #[test]
    fn disjoint_selections_give_an_empty_restricted_mask() {
        let a = Membership::from_indices(10, [1]);
        let b = Membership::from_indices(10, [2]);
        let mask = SampleMask::intersect(10, [&a, &b]);
        assert_eq!(mask.selected(), Some(0));
        assert!(!mask.includes(1));
        assert!(mask.filter(&[0.0; 10]).is_empty());
    }

    #[test]
    fn shorter_contributors_exclude_uncovered_draws() {
        let long = Membership::from_bits(vec![true; 6]);
        let short = Membership::from_bits(vec![true; 3]);
        let mask = SampleMask::intersect(6, [&long, &short]);
        assert_eq!(mask.membership().map(Membership::indices), Some(vec![0, 1, 2]));
    }

    #[test]
    fn range_membership_is_inclusive_and_skips_nan() {
        let range = XRange::new(0.2, 0.8).expect("range");
        let membership = Membership::from_range(&[0.2, 0.5, 0.8, 0.81, f64::NAN], range);
        assert_eq!(membership.indices(), vec![0, 1, 2]);
    }

    #[test]
    fn large_inputs_take_the_parallel_path() {
        let values: Vec<f64> = (0..40_000).map(|draw| draw as f64).collect();
        let range = XRange::new(100.0, 199.0).expect("range");
        let membership = Membership::from_range(&values, range);
        assert_eq!(membership.count(), 100);

        let other = Membership::from_indices(values.len(), 150..40_000);
        let mask = SampleMask::intersect(values.len(), [&membership, &other]);
        assert_eq!(mask.selected(), Some(50));
    }
}
