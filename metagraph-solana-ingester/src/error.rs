use solana_sdk::pubkey::Pubkey;

/// Fatal failures of the ingestion pipeline.
///
/// Per-kind decode failures are not represented here: a structurally matching
/// decoder that cannot parse its payload is logged and swallowed at the
/// account level. `IngestError` covers the failures that abort a backlog pass.
///
/// The enum is `Clone` so the memoized outcome of
/// [`Loader::load`](crate::loader::Loader::load) can be shared by every caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    /// The backlog snapshot fetch failed. Fatal to the whole `load()`.
    #[error("failed to load accounts for program {program}: {reason}")]
    SnapshotFetch { program: Pubkey, reason: String },

    /// Registering the live account-change subscription failed.
    #[error("failed to subscribe to account changes for program {program}: {reason}")]
    Subscribe { program: Pubkey, reason: String },

    /// Staging a decoded record failed. Fatal to the running backlog pass.
    #[error("failed to persist a record into `{collection}`: {reason}")]
    Persist {
        collection: &'static str,
        reason: String,
    },

    /// Committing staged records at a checkpoint failed.
    #[error("failed to flush staged records: {reason}")]
    Flush { reason: String },
}
