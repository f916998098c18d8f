//! Command queue contract: bounded FIFO with blocking backpressure.

use std::sync::Arc;
use std::time::Duration;

use lightsout::app::queue::CommandQueue;

#[test]
fn preserves_fifo_order() {
    let queue = CommandQueue::new();
    for byte in [b'1', b'0', b'1', b'X'] {
        queue.send_blocking(byte);
    }
    let drained: Vec<u8> = (0..4).map(|_| queue.recv_blocking()).collect();
    assert_eq!(drained, [b'1', b'0', b'1', b'X']);
}

#[test]
fn try_send_reports_full_at_capacity() {
    let queue = CommandQueue::new();
    for _ in 0..queue.capacity() {
        queue.try_send(b'1').unwrap();
    }
    assert!(queue.try_send(b'1').is_err());
    assert_eq!(queue.len(), queue.capacity());
}

#[test]
fn full_queue_blocks_sender_until_a_dequeue() {
    let queue = Arc::new(CommandQueue::new());
    for _ in 0..queue.capacity() {
        queue.send_blocking(b'0');
    }

    // The N+1th send must block until the consumer makes room.
    let sender = {
        let queue = Arc::clone(&queue);
        std::thread::spawn(move || {
            queue.send_blocking(b'1');
        })
    };

    // Give the sender time to reach the blocking point.
    std::thread::sleep(Duration::from_millis(50));
    assert!(!sender.is_finished(), "send into a full queue must block");

    assert_eq!(queue.recv_blocking(), b'0');
    sender.join().unwrap();

    // The blocked byte landed at the tail, behind the remaining items.
    let mut drained = Vec::new();
    while !queue.is_empty() {
        drained.push(queue.recv_blocking());
    }
    assert_eq!(drained.last(), Some(&b'1'));
    assert_eq!(drained.len(), queue.capacity());
}
