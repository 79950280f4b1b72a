//! Typed domain records and the on-chain byte layouts they are decoded from.
//!
//! The payload structs mirror the borsh layouts of the Metaplex auction
//! program's account state. Exact serialized sizes gate which record kinds are
//! even attempted against an account (see [`crate::decode`]).

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Serialized size of an `AuctionDataExtended` account (8 + 9 + 2 payload
/// bytes plus 200 reserved bytes).
pub const MAX_AUCTION_DATA_EXTENDED_SIZE: usize = 8 + 9 + 2 + 200;
/// Exact serialized size of a `BidderMetadata` account.
pub const BIDDER_METADATA_LEN: usize = 32 + 32 + 8 + 8 + 1;
/// Exact serialized size of a `BidderPot` account.
pub const BIDDER_POT_LEN: usize = 32 + 32 + 32 + 1;

/// A record decoded from one raw account, tagged with its kind.
///
/// Each variant carries the account pubkey (the storage id within its
/// collection) and the typed payload. A `(collection, key)` pair names at most
/// one logical entity; a later write under the same key replaces the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DecodedRecord {
    Auction {
        pubkey: String,
        auction: AuctionData,
    },
    AuctionExtended {
        pubkey: String,
        extended: AuctionDataExtended,
    },
    BidderMetadata {
        pubkey: String,
        metadata: BidderMetadata,
    },
    BidderPot {
        pubkey: String,
        pot: BidderPot,
    },
}

impl DecodedRecord {
    /// The collection this record is stored under.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Auction { .. } => "auctions",
            Self::AuctionExtended { .. } => "auctionsDataExtended",
            Self::BidderMetadata { .. } => "bidderMetadatas",
            Self::BidderPot { .. } => "bidderPots",
        }
    }

    /// The storage id within [`collection`](Self::collection).
    pub fn key(&self) -> &str {
        match self {
            Self::Auction { pubkey, .. }
            | Self::AuctionExtended { pubkey, .. }
            | Self::BidderMetadata { pubkey, .. }
            | Self::BidderPot { pubkey, .. } => pubkey,
        }
    }
}

/// Core state of one auction.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct AuctionData {
    /// Authority with permission to modify this auction.
    pub authority: Pubkey,
    /// Mint of the SPL token being used to bid.
    pub token_mint: Pubkey,
    /// Slot of the last bid, used to track auction timing.
    pub last_bid: Option<u64>,
    /// Slot the auction was officially ended by.
    pub ended_at: Option<u64>,
    /// Cut-off slot the auction is forced to end by.
    pub end_auction_at: Option<u64>,
    /// Slots after the previous bid at which the auction ends.
    pub end_auction_gap: Option<u64>,
    /// Minimum price for any bid to meet.
    pub price_floor: PriceFloor,
    pub state: AuctionState,
    /// Open bids; each bidder may have one bid open at a time.
    pub bid_state: BidState,
}

/// Price floor of an auction. Every variant carries the same 32 bytes so the
/// serialized size is uniform across them.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize)]
pub enum PriceFloor {
    /// No floor; any bid is valid.
    None([u8; 32]),
    /// Explicit minimum price; bids below it are rejected.
    MinimumPrice([u8; 32]),
    /// Hidden minimum price, revealed when the auction ends.
    BlindedPrice([u8; 32]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub enum AuctionState {
    Created,
    Started,
    Ended,
}

/// Bids for one auction, ordered by the program.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize)]
pub enum BidState {
    EnglishAuction { bids: Vec<Bid>, max: u64 },
    OpenEdition { bids: Vec<Bid>, max: u64 },
}

/// One open bid: the bidder's key and the bid amount.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct Bid(pub Pubkey, pub u64);

/// Overflow state of an auction that does not fit the base account.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct AuctionDataExtended {
    pub total_uncancelled_bids: u64,
    pub tick_size: Option<u64>,
    pub gap_tick_size_percentage: Option<u8>,
}

/// Per-bidder bookkeeping for one auction.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct BidderMetadata {
    /// Relationship with the bidder who's metadata this covers.
    pub bidder_pubkey: Pubkey,
    /// Relationship with the auction this bid was placed on.
    pub auction_pubkey: Pubkey,
    /// Amount that the user bid.
    pub last_bid: u64,
    /// Tracks the last time this user bid.
    pub last_bid_timestamp: i64,
    /// Whether the last bid the user made was cancelled.
    pub cancelled: bool,
}

/// Escrow account holding one bidder's funds for one auction.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct BidderPot {
    /// Points at the actual pot in the SPL token account.
    pub bidder_pot: Pubkey,
    pub bidder_act: Pubkey,
    pub auction_act: Pubkey,
    pub emptied: bool,
}
