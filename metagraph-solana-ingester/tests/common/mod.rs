#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use borsh::BorshSerialize;
use metagraph_solana_ingester::{
    account::RawAccount,
    decode::auction::AUCTION_PROGRAM_ID,
    records::{AuctionDataExtended, BidderMetadata, BidderPot, DecodedRecord},
    writer::WriterAdapter,
};
use solana_sdk::pubkey::Pubkey;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, Once,
};

static INIT_LOGGING: Once = Once::new();

/// Installs a default tracing subscriber once per test binary.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        metagraph_solana_logger::init(&metagraph_solana_logger::LogConfig::default()).ok();
    });
}

/// An 81-byte bidder-metadata account owned by the auction program.
///
/// The embedded pubkeys are fixed so decode attempts by the other kinds fail
/// deterministically.
pub fn bidder_metadata_account(pubkey: Pubkey, last_bid: u64) -> RawAccount {
    let metadata = BidderMetadata {
        bidder_pubkey: Pubkey::new_from_array([1; 32]),
        auction_pubkey: Pubkey::new_from_array([2; 32]),
        last_bid,
        last_bid_timestamp: 1_650_000_000,
        cancelled: false,
    };
    RawAccount {
        pubkey,
        owner: AUCTION_PROGRAM_ID,
        data: metadata.try_to_vec().unwrap(),
    }
}

/// A 97-byte bidder-pot account owned by the auction program.
pub fn bidder_pot_account(pubkey: Pubkey) -> RawAccount {
    let pot = BidderPot {
        bidder_pot: Pubkey::new_from_array([4; 32]),
        bidder_act: Pubkey::new_from_array([5; 32]),
        auction_act: Pubkey::new_from_array([6; 32]),
        emptied: false,
    };
    RawAccount {
        pubkey,
        owner: AUCTION_PROGRAM_ID,
        data: pot.try_to_vec().unwrap(),
    }
}

/// A 219-byte extended-auction account whose padding is poisoned so the base
/// auction kind, which is always attempted, fails to parse it.
pub fn extended_auction_account(pubkey: Pubkey) -> RawAccount {
    let extended = AuctionDataExtended {
        total_uncancelled_bids: 4,
        tick_size: Some(100),
        gap_tick_size_percentage: Some(5),
    };
    let mut data = extended.try_to_vec().unwrap();
    data.resize(219, 0);
    // Invalid Option tag at the offset where the base auction layout expects
    // its `last_bid` field.
    data[64] = 255;
    RawAccount {
        pubkey,
        owner: AUCTION_PROGRAM_ID,
        data,
    }
}

pub fn last_bid_of(record: &DecodedRecord) -> u64 {
    match record {
        DecodedRecord::BidderMetadata { metadata, .. } => metadata.last_bid,
        other => panic!("expected a bidder-metadata record, got {other:?}"),
    }
}

/// A writer that logs every staged record in call order.
#[derive(Default)]
pub struct RecordingWriter {
    pub persisted: Mutex<Vec<DecodedRecord>>,
    pub flushes: AtomicUsize,
}

#[async_trait]
impl WriterAdapter for RecordingWriter {
    async fn persist(&self, record: DecodedRecord) -> Result<()> {
        self.persisted.lock().unwrap().push(record);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A writer whose `persist` always fails.
pub struct FailingWriter;

#[async_trait]
impl WriterAdapter for FailingWriter {
    async fn persist(&self, _record: DecodedRecord) -> Result<()> {
        anyhow::bail!("store rejected the write")
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
