//! Blocking push/pop across two threads
//!
//! Streams one million numbers through a shallow queue and verifies the
//! sum on the consuming side.

use sluice::RingQueue;
use std::thread;
use std::time::Instant;

const QUEUE_MASK: u64 = 0b1111; // depth 16
const MAX_NUMBER: u64 = 1_000_000;

fn main() {
    let (mut producer, mut consumer) = RingQueue::<u64>::with_capacity_mask(QUEUE_MASK)
        .expect("valid capacity mask")
        .split();

    let start = Instant::now();

    let feeder = thread::spawn(move || {
        for number in 1..=MAX_NUMBER {
            producer.push(number).expect("queue stopped early");
        }
        producer.stop();
    });

    let mut sum = 0u64;
    let mut count = 0u64;
    while let Some(number) = consumer.pop() {
        sum += number;
        count += 1;
    }

    feeder.join().unwrap();
    let duration = start.elapsed();

    let expected_sum = MAX_NUMBER * (MAX_NUMBER + 1) / 2;
    println!("Received {} numbers in {:.3}s", count, duration.as_secs_f64());
    println!("Sum: {} (expected {})", sum, expected_sum);
    println!(
        "Throughput: {:.2}M items/sec",
        count as f64 / duration.as_secs_f64() / 1_000_000.0
    );

    assert_eq!(count, MAX_NUMBER);
    assert_eq!(sum, expected_sum);
    println!("Verification passed");
}
