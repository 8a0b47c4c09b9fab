//! Two-phase API with parked waiting
//!
//! Low-frequency traffic through a shallow queue: the consumer parks on
//! a Waiter instead of spinning, and the producer notifies it after each
//! delivery. Payloads are stamped blocks so the consumer can verify
//! integrity as it drains.

use sluice::{ PopState, RingQueue, StampedBlock, Waiter };
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const QUEUE_MASK: u64 = 0b1; // depth 2
const BLOCKS: u64 = 200;

fn main() {
    let (mut producer, mut consumer) = RingQueue::<StampedBlock>::with_capacity_mask(QUEUE_MASK)
        .expect("valid capacity mask")
        .split();
    let waiter = Arc::new(Waiter::new());

    let feeder_waiter = waiter.clone();
    let feeder = thread::spawn(move || {
        for counter in 0..BLOCKS {
            let payload = counter.to_le_bytes().to_vec();
            // Infrequent data: sleep between deliveries
            thread::sleep(Duration::from_millis(1));
            producer
                .push(StampedBlock::stamp(counter, payload))
                .expect("queue stopped early");
            feeder_waiter.notify();
        }
        producer.stop();
        feeder_waiter.notify();
    });

    let mut verified = 0u64;
    loop {
        match consumer.try_pop() {
            PopState::Ready => {
                let block = consumer.pop_after_try();
                assert!(block.verify_next(verified), "corrupt block {}", block.counter);
                verified += 1;
            }
            // Park instead of burning a core; re-poll on wake
            PopState::NotReady => waiter.wait(Duration::from_millis(5)),
            PopState::EndOfService => {
                break;
            }
        }
    }

    feeder.join().unwrap();

    println!("Verified {} stamped blocks, end of service reached", verified);
    assert_eq!(verified, BLOCKS);
}
