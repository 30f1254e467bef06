// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Rect, Size};
use understory_carousel::{
    CarouselConfig, ItemView, ParallaxAdapter, WindowedRecycler, WraparoundAdapter,
};

#[derive(Default)]
struct Slide {
    frame: Rect,
    item: usize,
}

impl ItemView for Slide {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }
}

const ITEM_WIDTH: f64 = 320.0;

fn recycler(count: usize) -> WindowedRecycler<Slide> {
    let mut recycler = WindowedRecycler::new(CarouselConfig::new(ITEM_WIDTH)).unwrap();
    recycler
        .reload(count, |slide: &mut Slide, index| {
            slide.item = index;
            Ok(())
        })
        .unwrap();
    recycler
}

fn bench_recycler_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel/recycler_sweep");

    // Quarter-page steps across the whole strip. After the first window the
    // pool absorbs every eviction.
    for viewport_pages in [1usize, 3, 8] {
        let count = 1_000;
        let viewport = Size::new(ITEM_WIDTH * viewport_pages as f64, 600.0);
        let steps: Vec<f64> = (0..count * 4).map(|i| i as f64 * ITEM_WIDTH / 4.0).collect();
        group.throughput(Throughput::Elements(steps.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("layout", viewport_pages),
            &steps,
            |b, steps| {
                b.iter_batched(
                    || recycler(count),
                    |mut recycler| {
                        for &offset in steps {
                            black_box(recycler.layout(offset, viewport));
                        }
                        black_box(recycler.visible().map(|(_, slide)| slide.item).sum::<usize>());
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_wraparound_paging(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel/wraparound_paging");

    for count in [2usize, 16, 256] {
        let viewport = Size::new(ITEM_WIDTH, 600.0);
        let pages = count * 3;
        group.throughput(Throughput::Elements(pages as u64));

        group.bench_with_input(BenchmarkId::new("scroll_to_next", count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let mut adapter =
                        WraparoundAdapter::<Slide>::new(CarouselConfig::new(ITEM_WIDTH)).unwrap();
                    adapter
                        .reload(count, |slide: &mut Slide, index| {
                            slide.item = index;
                            Ok(())
                        })
                        .unwrap();
                    adapter.layout(adapter.scroll_offset(), viewport);
                    adapter
                },
                |mut adapter| {
                    for _ in 0..pages {
                        let request = adapter.scroll_to_next(false);
                        black_box(adapter.layout(request.to, viewport));
                    }
                    black_box(adapter.normalized_page_index());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_parallax_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel/parallax_drag");

    let count = 32;
    let viewport = Size::new(ITEM_WIDTH, 600.0);
    let steps: Vec<f64> = (0..=(count * 16))
        .map(|i| ITEM_WIDTH + i as f64 * ITEM_WIDTH / 16.0)
        .collect();
    group.throughput(Throughput::Elements(steps.len() as u64));

    group.bench_function("layout", |b| {
        b.iter_batched(
            || {
                let mut adapter =
                    ParallaxAdapter::<Slide>::new(CarouselConfig::new(ITEM_WIDTH)).unwrap();
                adapter
                    .reload(count, |slide: &mut Slide, index| {
                        slide.item = index;
                        Ok(())
                    })
                    .unwrap();
                adapter
            },
            |mut adapter| {
                // The last step crosses the right boundary and snaps.
                for &offset in &steps {
                    black_box(adapter.layout(offset, viewport));
                }
                black_box(adapter);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_recycler_sweep,
    bench_wraparound_paging,
    bench_parallax_drag
);
criterion_main!(benches);
