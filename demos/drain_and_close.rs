use sluice_channel::InMemoryChannel;
use sluice_core::DeliveryTag;
use sluice_publisher::throttle::{PublishOptions, Throttle};

fn main() {
    // Window of 2: sluice e2e: publish -> queue -> confirm -> refill -> close.
    let mut throttle = Throttle::new(InMemoryChannel::new(), 2);
    throttle.on_error(|error| eprintln!("publisher error: {error}"));

    for body in ["alpha", "bravo", "charlie", "delta", "echo"] {
        let accepted = throttle.publish(
            "orders",
            "eu.west",
            body.as_bytes().to_vec(),
            PublishOptions::default(),
        );
        assert!(accepted, "publish should be accepted");
    }
    println!(
        "published 5: in flight = {}, queued = {}",
        throttle.unacknowledged(),
        throttle.waiting()
    );

    // Request shutdown up front; the handle resolves only once drained.
    let handle = throttle.close().expect("close should register");
    assert!(!handle.is_resolved());

    // Simulate the broker confirming everything that goes out.
    while !throttle.is_drained() {
        let confirmed: Vec<DeliveryTag> = throttle
            .channel_mut()
            .take_sent()
            .into_iter()
            .map(|(tag, _frame)| tag)
            .collect();
        for tag in confirmed {
            throttle.channel_mut().push_ack(tag, false);
        }
        throttle.pump();
        println!(
            "after confirms: in flight = {}, queued = {}",
            throttle.unacknowledged(),
            throttle.waiting()
        );
    }

    assert_eq!(handle.outcome(), Some(Ok(())));
    let stats = throttle.stats();
    println!(
        "closed cleanly: published = {}, sent = {}, acked = {}",
        stats.published, stats.sent, stats.acked
    );
}
