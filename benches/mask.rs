// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use brushlink::interaction::{Membership, SampleMask, XRange};

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Groups: `mask.membership`, `mask.intersect`, `mask.filter`
// - Case IDs are the fixture size names (`small`, `medium`, `large`), suffixed with the
//   contributor count for `mask.intersect`.
fn benches_mask(c: &mut Criterion) {
    let range = XRange::new(0.25, 0.75).expect("finite range");

    let mut group = c.benchmark_group("mask.membership");
    for (name, draws) in fixtures::SIZES {
        let values = fixtures::column(draws, 1);
        group.throughput(Throughput::Elements(draws as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let membership = Membership::from_range(black_box(&values), range);
                black_box(membership.count())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("mask.intersect");
    for (name, draws) in fixtures::SIZES {
        for contributors in [2usize, 8] {
            let memberships: Vec<Membership> = (0..contributors)
                .map(|salt| Membership::from_range(&fixtures::column(draws, salt + 1), range))
                .collect();
            group.throughput(Throughput::Elements((draws * contributors) as u64));
            group.bench_function(format!("{name}_{contributors}"), |b| {
                b.iter(|| {
                    let mask = SampleMask::intersect(draws, black_box(&memberships));
                    black_box(mask.selected())
                })
            });
        }
    }
    group.finish();

    let mut group = c.benchmark_group("mask.filter");
    for (name, draws) in fixtures::SIZES {
        let values = fixtures::column(draws, 7);
        let memberships = [
            Membership::from_range(&fixtures::column(draws, 1), range),
            Membership::from_range(&fixtures::column(draws, 2), range),
        ];
        let mask = SampleMask::intersect(draws, &memberships);
        group.throughput(Throughput::Elements(draws as u64));
        group.bench_function(name, |b| {
            b.iter(|| black_box(mask.filter(black_box(&values)).len()))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_mask
}
criterion_main!(benches);
