//! Arena and capability benchmarks
//!
//! Compares the arena against the heap backend across typical workloads

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use groundwork_memory::core::size::MB;
use groundwork_memory::{Allocator, AllocatorRef, Arena, ArenaConfig};
use std::alloc::Layout;
use std::hint::black_box;

/// Benchmark single allocation/free cycle through the capability
fn bench_single_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_allocation");
    let layout = Layout::from_size_align(64, 8).unwrap();

    group.bench_function("arena_64b", |b| {
        let mut buffer = vec![0u8; MB];
        let arena = Arena::with_config(&mut buffer, ArenaConfig::production()).unwrap();
        let allocator = arena.allocator();

        b.iter(|| {
            let block = allocator.allocate(layout).unwrap();
            // SAFETY: block is the last allocation with this layout.
            unsafe { allocator.deallocate(block.cast(), layout) };
            black_box(block);
        });
    });

    group.bench_function("heap_64b", |b| {
        let allocator = AllocatorRef::heap();

        b.iter(|| {
            let block = allocator.allocate(layout).unwrap();
            // SAFETY: block was just allocated with this layout.
            unsafe { allocator.deallocate(block.cast(), layout) };
            black_box(block);
        });
    });

    group.finish();
}

/// Benchmark many allocations released in bulk
fn bench_batch_then_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_then_reset");

    for count in [16usize, 256, 4096] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("arena_reset", count), &count, |b, &count| {
            let mut buffer = vec![0u8; MB];
            let arena = Arena::with_config(&mut buffer, ArenaConfig::production()).unwrap();

            b.iter(|| {
                for _ in 0..count {
                    black_box(arena.alloc(48, 8).unwrap());
                }
                arena.reset();
            });
        });

        group.bench_with_input(BenchmarkId::new("arena_region", count), &count, |b, &count| {
            let mut buffer = vec![0u8; MB];
            let arena = Arena::with_config(&mut buffer, ArenaConfig::production()).unwrap();

            b.iter(|| {
                let region = arena.begin_region();
                for _ in 0..count {
                    black_box(arena.alloc(48, 8).unwrap());
                }
                region.end();
            });
        });
    }

    group.finish();
}

/// Benchmark growing a buffer by doubling, in place vs. through the heap
fn bench_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth");

    group.bench_function("arena_in_place", |b| {
        let mut buffer = vec![0u8; MB];
        let arena = Arena::with_config(&mut buffer, ArenaConfig::production()).unwrap();

        b.iter(|| {
            let mut block = arena.alloc(16, 8).unwrap();
            let mut size = 16;
            while size < 64 * 1024 {
                // SAFETY: block is live with `size` bytes.
                block = unsafe { arena.realloc(Some(block.cast()), size, size * 2, 8) }.unwrap();
                size *= 2;
            }
            black_box(block);
            arena.reset();
        });
    });

    group.bench_function("heap_realloc", |b| {
        let allocator = AllocatorRef::heap();

        b.iter(|| {
            let mut size = 16;
            let mut block = allocator
                .allocate(Layout::from_size_align(size, 8).unwrap())
                .unwrap();
            while size < 64 * 1024 {
                let layout = Layout::from_size_align(size * 2, 8).unwrap();
                // SAFETY: block is live with `size` bytes and alignment 8.
                block = unsafe { allocator.reallocate(Some(block.cast()), size, layout) }.unwrap();
                size *= 2;
            }
            // SAFETY: block is live with its final layout.
            unsafe {
                allocator.deallocate(block.cast(), Layout::from_size_align(size, 8).unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_allocation,
    bench_batch_then_reset,
    bench_growth
);
criterion_main!(benches);
