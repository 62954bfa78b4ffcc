// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use photostory_projection::{
    ChangeTranslator, OrderPolicy, ProjectionBuilder, ProjectionState, StillImageClassifier,
};
use photostory_source::{ChangeDetails, MediaKind, SourceItem};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Asset {
    id: u64,
    kind: MediaKind,
}

impl SourceItem for Asset {
    fn kind(&self) -> MediaKind {
        self.kind
    }
}

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

/// A synthetic library with roughly the kind mix of a real camera roll:
/// mostly stills, some videos, a sprinkle of everything else.
fn build_library(n: u64, seed: u64) -> Vec<Asset> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|id| {
            let kind = match rng.next_u32() % 10 {
                0..=6 => MediaKind::Image,
                7 | 8 => MediaKind::Video,
                9 => MediaKind::Audio,
                _ => MediaKind::Unknown,
            };
            Asset { id, kind }
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("photostory_projection");
    group.sample_size(50);

    for &n in &[1_024_u64, 16_384_u64, 131_072_u64] {
        let library = build_library(n, 0xF070_0000_0000_0001);

        group.bench_function(format!("derive(n={n})"), |b| {
            b.iter(|| {
                let state = ProjectionState::derive(
                    library.as_slice(),
                    &StillImageClassifier,
                    OrderPolicy::Natural,
                );
                black_box(state);
            });
        });

        group.bench_function(format!("derive_reversed(n={n})"), |b| {
            b.iter(|| {
                let state = ProjectionState::derive(
                    library.as_slice(),
                    &StillImageClassifier,
                    OrderPolicy::Reversed,
                );
                black_box(state);
            });
        });

        group.bench_function(format!("cold_start_then_settle(n={n})"), |b| {
            let builder = ProjectionBuilder::new(StillImageClassifier, OrderPolicy::Natural, 100);
            b.iter(|| {
                let cold = builder.cold_start(&library);
                let scan = cold.scan.expect("budget below library size");
                let settled = builder.settle(&library, scan);
                black_box(settled);
            });
        });
    }

    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("photostory_translate");
    group.sample_size(50);

    for &n in &[1_024_u64, 16_384_u64, 131_072_u64] {
        let before = build_library(n, 0xF070_0000_0000_0002);
        let translator = ChangeTranslator::new(StillImageClassifier, OrderPolicy::Natural);

        // A head insertion batch, the common "new photos taken" shape.
        let fresh: Vec<Asset> = (0..64)
            .map(|i| Asset {
                id: n + i,
                kind: MediaKind::Image,
            })
            .collect();
        let mut after = fresh.clone();
        after.extend_from_slice(&before);
        let inserted: Vec<usize> = (0..fresh.len()).collect();

        group.bench_function(format!("translate_head_insert(n={n})"), |b| {
            b.iter_batched(
                || {
                    ProjectionState::derive(
                        before.as_slice(),
                        &StillImageClassifier,
                        OrderPolicy::Natural,
                    )
                },
                |state| {
                    let change = ChangeDetails {
                        inserted: &inserted,
                        inserted_items: &fresh,
                        ..ChangeDetails::empty(before.as_slice(), after.as_slice())
                    };
                    let translation = translator
                        .translate(&state, &change)
                        .expect("well-formed notification");
                    black_box(translation);
                },
                BatchSize::LargeInput,
            );
        });

        // A scattered removal batch.
        let removed: Vec<usize> = (0..n as usize).step_by(97).collect();
        let shrunk: Vec<Asset> = before
            .iter()
            .enumerate()
            .filter(|(position, _)| position % 97 != 0)
            .map(|(_, asset)| *asset)
            .collect();

        group.bench_function(format!("translate_scattered_remove(n={n})"), |b| {
            b.iter_batched(
                || {
                    ProjectionState::derive(
                        before.as_slice(),
                        &StillImageClassifier,
                        OrderPolicy::Natural,
                    )
                },
                |state| {
                    let change = ChangeDetails {
                        removed: &removed,
                        ..ChangeDetails::empty(before.as_slice(), shrunk.as_slice())
                    };
                    let translation = translator
                        .translate(&state, &change)
                        .expect("well-formed notification");
                    black_box(translation);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_projection, bench_translate);
criterion_main!(benches);
