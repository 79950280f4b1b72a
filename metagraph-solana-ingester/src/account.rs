use solana_sdk::{account::Account, pubkey::Pubkey};

/// An undecoded account as observed on chain, either in a backlog snapshot or
/// in a live change notification.
///
/// Instances are transient: each one lives for a single decode-and-persist
/// pass and is never stored itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub pubkey: Pubkey,
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

impl RawAccount {
    pub fn from_keyed(pubkey: Pubkey, account: Account) -> Self {
        Self {
            pubkey,
            owner: account.owner,
            data: account.data,
        }
    }
}

/// A live account change held by a [`ChangeQueue`](crate::queue::ChangeQueue)
/// until the queue leaves its buffering state.
#[derive(Debug, Clone)]
pub struct PendingChange {
    pub account: RawAccount,
    pub program_id: Pubkey,
    /// Position of this change in its queue's arrival order.
    pub observed_at: u64,
}
