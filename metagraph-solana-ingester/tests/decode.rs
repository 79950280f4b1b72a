mod common;

use borsh::BorshSerialize;
use common::{bidder_metadata_account, bidder_pot_account, extended_auction_account};
use metagraph_solana_ingester::{
    account::RawAccount,
    decode::auction::{auction_program, AUCTION_PROGRAM_ID},
    records::{AuctionData, AuctionState, BidState, DecodedRecord, PriceFloor},
    writer::{MemoryWriter, WriterAdapter},
};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

fn auction_account(pubkey: Pubkey) -> (RawAccount, AuctionData) {
    let auction = AuctionData {
        authority: Pubkey::new_from_array([7; 32]),
        token_mint: Pubkey::new_from_array([8; 32]),
        last_bid: Some(12_345),
        ended_at: None,
        end_auction_at: None,
        end_auction_gap: Some(50),
        price_floor: PriceFloor::MinimumPrice([9; 32]),
        state: AuctionState::Started,
        bid_state: BidState::EnglishAuction {
            bids: vec![],
            max: 1,
        },
    };
    let account = RawAccount {
        pubkey,
        owner: AUCTION_PROGRAM_ID,
        data: auction.try_to_vec().unwrap(),
    };
    (account, auction)
}

#[tokio::test]
async fn auction_account_decodes_into_the_auctions_collection() {
    common::init_logging();
    let program = auction_program();
    let writer = MemoryWriter::new();

    let pubkey = Pubkey::new_unique();
    let (account, auction) = auction_account(pubkey);
    program.decode_account(&account, &writer).await.unwrap();
    writer.flush().await.unwrap();

    assert_eq!(
        writer.get("auctions", &pubkey.to_string()),
        Some(DecodedRecord::Auction {
            pubkey: pubkey.to_string(),
            auction,
        })
    );
    assert_eq!(writer.collection_len("auctionsDataExtended"), 0);
    assert_eq!(writer.collection_len("bidderMetadatas"), 0);
    assert_eq!(writer.collection_len("bidderPots"), 0);
}

#[tokio::test]
async fn length_dispatch_selects_bidder_kinds() {
    let program = auction_program();
    let writer = MemoryWriter::new();

    let metadata_key = Pubkey::new_unique();
    let pot_key = Pubkey::new_unique();
    program
        .decode_account(&bidder_metadata_account(metadata_key, 500), &writer)
        .await
        .unwrap();
    program
        .decode_account(&bidder_pot_account(pot_key), &writer)
        .await
        .unwrap();
    writer.flush().await.unwrap();

    assert!(writer.get("bidderMetadatas", &metadata_key.to_string()).is_some());
    assert!(writer.get("bidderPots", &pot_key.to_string()).is_some());
    // Neither layout parses as base auction data.
    assert_eq!(writer.collection_len("auctions"), 0);
}

#[tokio::test]
async fn persisting_the_same_account_twice_stores_one_record() {
    let program = auction_program();
    let writer = MemoryWriter::new();

    let pubkey = Pubkey::new_unique();
    let account = bidder_metadata_account(pubkey, 42);
    program.decode_account(&account, &writer).await.unwrap();
    writer.flush().await.unwrap();
    let first = writer.get("bidderMetadatas", &pubkey.to_string());

    program.decode_account(&account, &writer).await.unwrap();
    writer.flush().await.unwrap();

    assert_eq!(writer.collection_len("bidderMetadatas"), 1);
    assert_eq!(writer.get("bidderMetadatas", &pubkey.to_string()), first);
}

#[tokio::test]
async fn malformed_kind_never_blocks_a_valid_kind() {
    common::init_logging();
    let program = auction_program();
    let writer = MemoryWriter::new();

    // Structurally matches both the extended kind (exact length) and the base
    // auction kind (always attempted), but only parses as extended.
    let pubkey = Pubkey::new_unique();
    let account = extended_auction_account(pubkey);
    program.decode_account(&account, &writer).await.unwrap();
    writer.flush().await.unwrap();

    assert!(writer
        .get("auctionsDataExtended", &pubkey.to_string())
        .is_some());
    assert_eq!(writer.collection_len("auctions"), 0);
}

#[tokio::test]
async fn accounts_of_other_owners_yield_nothing() {
    let program = auction_program();
    let writer = MemoryWriter::new();

    let foreign = RawAccount {
        pubkey: Pubkey::new_unique(),
        owner: Pubkey::new_unique(),
        data: bidder_pot_account(Pubkey::new_unique()).data,
    };
    program.decode_account(&foreign, &writer).await.unwrap();
    writer.flush().await.unwrap();

    assert_eq!(writer.staged_len(), 0);
    assert_eq!(writer.collection_len("bidderPots"), 0);
}

#[tokio::test]
async fn last_write_wins_for_a_key() {
    let program = auction_program();
    let writer = Arc::new(MemoryWriter::new());

    let pubkey = Pubkey::new_unique();
    program
        .decode_account(&bidder_metadata_account(pubkey, 1), writer.as_ref())
        .await
        .unwrap();
    program
        .decode_account(&bidder_metadata_account(pubkey, 2), writer.as_ref())
        .await
        .unwrap();
    writer.flush().await.unwrap();

    let record = writer.get("bidderMetadatas", &pubkey.to_string()).unwrap();
    assert_eq!(common::last_bid_of(&record), 2);
}
