//! Record-kind decoders for the Metaplex auction program.
//!
//! Dispatch within the program's account set goes by exact byte length: the
//! extended, bidder-metadata and bidder-pot kinds each check the serialized
//! size of their layout before parsing, while the base auction kind is
//! attempted against every program-owned account. Kinds that happen to share
//! a length would all be attempted and all persisted; the contract tolerates
//! multiple simultaneous matches.

use super::{try_from_slice_unchecked, DecodeOutcome, KindDecoder, WatchedProgram};
use crate::{
    account::RawAccount,
    records::{
        AuctionData, AuctionDataExtended, BidderMetadata, BidderPot, DecodedRecord,
        BIDDER_METADATA_LEN, BIDDER_POT_LEN, MAX_AUCTION_DATA_EXTENDED_SIZE,
    },
};
use solana_sdk::pubkey::Pubkey;

/// Address of the auction program.
pub const AUCTION_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("auctxRXpeJoc4817jDhf4HbjnhEcr1cCXenosMhK5R8");

/// The auction program with all of its record kinds registered.
pub fn auction_program() -> WatchedProgram {
    WatchedProgram {
        program_id: AUCTION_PROGRAM_ID,
        decoders: vec![
            KindDecoder {
                kind: "auction",
                decode: decode_auction,
            },
            KindDecoder {
                kind: "auctionDataExtended",
                decode: decode_auction_extended,
            },
            KindDecoder {
                kind: "bidderMetadata",
                decode: decode_bidder_metadata,
            },
            KindDecoder {
                kind: "bidderPot",
                decode: decode_bidder_pot,
            },
        ],
    }
}

/// Base auction data has no fixed serialized size (the bid vector grows), so
/// every program-owned account is attempted and parse failures are reported
/// as malformed.
fn decode_auction(account: &RawAccount) -> DecodeOutcome {
    match try_from_slice_unchecked::<AuctionData>(&account.data) {
        Ok(auction) => DecodeOutcome::Decoded(DecodedRecord::Auction {
            pubkey: account.pubkey.to_string(),
            auction,
        }),
        Err(e) => DecodeOutcome::Malformed(e.to_string()),
    }
}

fn decode_auction_extended(account: &RawAccount) -> DecodeOutcome {
    if account.data.len() != MAX_AUCTION_DATA_EXTENDED_SIZE {
        return DecodeOutcome::NotApplicable;
    }
    match try_from_slice_unchecked::<AuctionDataExtended>(&account.data) {
        Ok(extended) => DecodeOutcome::Decoded(DecodedRecord::AuctionExtended {
            pubkey: account.pubkey.to_string(),
            extended,
        }),
        Err(e) => DecodeOutcome::Malformed(e.to_string()),
    }
}

fn decode_bidder_metadata(account: &RawAccount) -> DecodeOutcome {
    if account.data.len() != BIDDER_METADATA_LEN {
        return DecodeOutcome::NotApplicable;
    }
    match try_from_slice_unchecked::<BidderMetadata>(&account.data) {
        Ok(metadata) => DecodeOutcome::Decoded(DecodedRecord::BidderMetadata {
            pubkey: account.pubkey.to_string(),
            metadata,
        }),
        Err(e) => DecodeOutcome::Malformed(e.to_string()),
    }
}

fn decode_bidder_pot(account: &RawAccount) -> DecodeOutcome {
    if account.data.len() != BIDDER_POT_LEN {
        return DecodeOutcome::NotApplicable;
    }
    match try_from_slice_unchecked::<BidderPot>(&account.data) {
        Ok(pot) => DecodeOutcome::Decoded(DecodedRecord::BidderPot {
            pubkey: account.pubkey.to_string(),
            pot,
        }),
        Err(e) => DecodeOutcome::Malformed(e.to_string()),
    }
}
