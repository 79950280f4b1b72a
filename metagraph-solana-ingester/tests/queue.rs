mod common;

use common::{bidder_metadata_account, last_bid_of, RecordingWriter};
use metagraph_solana_ingester::{decode::auction::auction_program, queue::ChangeQueue};
use solana_sdk::pubkey::Pubkey;
use std::sync::{atomic::Ordering, Arc};
use tokio::time::{sleep, Duration};

#[tokio::test]
async fn buffers_until_started_then_drains_in_enqueue_order() {
    common::init_logging();
    let writer = Arc::new(RecordingWriter::default());
    let queue = ChangeQueue::new(auction_program(), writer.clone());
    let sender = queue.sender();

    for last_bid in 1..=3 {
        sender.enqueue(bidder_metadata_account(Pubkey::new_unique(), last_bid));
    }

    sleep(Duration::from_millis(50)).await;
    assert!(!queue.is_running());
    assert!(
        writer.persisted.lock().unwrap().is_empty(),
        "a buffering queue must not execute tasks"
    );

    queue.start();
    assert!(queue.is_running());

    let mut applied = Vec::new();
    for _ in 0..100 {
        applied = writer.persisted.lock().unwrap().clone();
        if applied.len() == 3 {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    let order: Vec<u64> = applied.iter().map(last_bid_of).collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[tokio::test]
async fn changes_enqueued_after_start_are_applied_and_flushed() {
    let writer = Arc::new(RecordingWriter::default());
    let queue = ChangeQueue::new(auction_program(), writer.clone());
    queue.start();

    let sender = queue.sender();
    sender.enqueue(bidder_metadata_account(Pubkey::new_unique(), 7));

    for _ in 0..100 {
        if writer.flushes.load(Ordering::SeqCst) >= 1 {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    let applied = writer.persisted.lock().unwrap().clone();
    assert_eq!(applied.len(), 1);
    assert_eq!(last_bid_of(&applied[0]), 7);
    assert!(
        writer.flushes.load(Ordering::SeqCst) >= 1,
        "each drained change must be flushed"
    );
}
