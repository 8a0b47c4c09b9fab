//! Criterion SPSC throughput benchmark
//!
//! Run: cargo bench --bench bench_spsc
//!
//! One full producer/consumer transfer per iteration, threads pinned to
//! separate cores where the platform allows it.

use criterion::{ criterion_group, criterion_main, BenchmarkId, Criterion, Throughput };
use std::hint::black_box;
use std::thread;

use sluice::{ cpu, PopState, RingQueue };

const TOTAL_EVENTS: u64 = 1_000_000;
const PRODUCER_CPU: usize = 2;
const CONSUMER_CPU: usize = 0;

/// Blocking push/pop across two pinned threads
fn spsc_transfer(mask: u64, events: u64) -> u64 {
    let (mut producer, mut consumer) = RingQueue::<u64>::with_capacity_mask(mask)
        .unwrap()
        .split();

    let feeder = thread::spawn(move || {
        let _ = cpu::pin_to_cpu(PRODUCER_CPU);
        for i in 0..events {
            let _ = producer.push(i);
        }
        producer.stop();
    });

    let drainer = thread::spawn(move || {
        let _ = cpu::pin_to_cpu(CONSUMER_CPU);
        let mut count = 0u64;
        while let Some(value) = consumer.pop() {
            black_box(value);
            count += 1;
        }
        count
    });

    feeder.join().unwrap();
    drainer.join().unwrap()
}

/// Two-phase push/pop, spinning in the caller instead of the queue
fn spsc_transfer_two_phase(mask: u64, events: u64) -> u64 {
    let (mut producer, mut consumer) = RingQueue::<u64>::with_capacity_mask(mask)
        .unwrap()
        .split();

    let feeder = thread::spawn(move || {
        let _ = cpu::pin_to_cpu(PRODUCER_CPU);
        for i in 0..events {
            while !producer.try_push() {
                std::hint::spin_loop();
            }
            producer.push_after_try(i);
        }
        producer.stop();
    });

    let drainer = thread::spawn(move || {
        let _ = cpu::pin_to_cpu(CONSUMER_CPU);
        let mut count = 0u64;
        loop {
            match consumer.try_pop() {
                PopState::Ready => {
                    black_box(consumer.pop_after_try());
                    count += 1;
                }
                PopState::NotReady => std::hint::spin_loop(),
                PopState::EndOfService => {
                    break;
                }
            }
        }
        count
    });

    feeder.join().unwrap();
    drainer.join().unwrap()
}

fn benchmark_depths(c: &mut Criterion) {
    let mut group = c.benchmark_group("SPSC throughput by depth");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(20);

    for (label, mask) in [
        ("depth 2", 0b1u64),
        ("depth 16", 0b1111),
        ("depth 1024", 0b11_1111_1111),
    ] {
        group.bench_with_input(BenchmarkId::new("blocking", label), &mask, |b, &mask| {
            b.iter(|| spsc_transfer(mask, TOTAL_EVENTS));
        });
        group.bench_with_input(BenchmarkId::new("two-phase", label), &mask, |b, &mask| {
            b.iter(|| spsc_transfer_two_phase(mask, TOTAL_EVENTS));
        });
    }

    group.finish();
}

fn benchmark_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("SPSC heap vs mapped");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(20);

    group.bench_function("heap depth 1024", |b| {
        b.iter(|| spsc_transfer(0b11_1111_1111, TOTAL_EVENTS));
    });
    group.bench_function("mapped depth 1024", |b| {
        b.iter(|| {
            let (mut producer, mut consumer) = RingQueue::<u64>
                ::with_capacity_mask_mapped(0b11_1111_1111)
                .unwrap()
                .split();

            let feeder = thread::spawn(move || {
                let _ = cpu::pin_to_cpu(PRODUCER_CPU);
                for i in 0..TOTAL_EVENTS {
                    let _ = producer.push(i);
                }
                producer.stop();
            });

            let mut count = 0u64;
            let _ = cpu::pin_to_cpu(CONSUMER_CPU);
            while let Some(value) = consumer.pop() {
                black_box(value);
                count += 1;
            }
            feeder.join().unwrap();
            count
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_depths, benchmark_allocation);
criterion_main!(benches);
