//! Per-program record-kind dispatch.
//!
//! A [`WatchedProgram`] owns the list of [`KindDecoder`]s registered for one
//! on-chain program. Decoding an account attempts every registered kind
//! independently: a kind whose structural check does not match is silently
//! skipped, a kind that matches structurally but fails to parse is logged and
//! swallowed, and every kind that decodes hands its record straight to the
//! writer. One account may therefore yield several records.

pub mod auction;

use crate::{account::RawAccount, error::IngestError, records::DecodedRecord, writer::WriterAdapter};
use borsh::BorshDeserialize;
use solana_sdk::pubkey::Pubkey;

/// Result of attempting one structural interpretation of an account's bytes.
///
/// The three cases are deliberately explicit: suppression of a speculative
/// decode attempt is a visible branch on [`Malformed`](Self::Malformed), not
/// an error guard.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// The structural check (byte length, discriminant) did not match.
    /// This is not an error.
    NotApplicable,
    /// Structurally matched, but the payload failed to parse.
    Malformed(String),
    /// Successfully decoded into a record.
    Decoded(DecodedRecord),
}

/// One structural interpretation of an account owned by a watched program.
#[derive(Debug, Clone, Copy)]
pub struct KindDecoder {
    /// Name of the record kind, used in logs.
    pub kind: &'static str,
    pub decode: fn(&RawAccount) -> DecodeOutcome,
}

/// An on-chain program whose entire account set the pipeline tracks, together
/// with the record kinds registered for it. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct WatchedProgram {
    pub program_id: Pubkey,
    pub decoders: Vec<KindDecoder>,
}

impl WatchedProgram {
    /// Attempts every registered kind against `account`, persisting each
    /// success as a side effect.
    ///
    /// A malformed payload never blocks the remaining kinds and never fails
    /// the account. A `persist` failure does propagate: that is a processing
    /// failure of the pipeline, not a decode failure.
    pub async fn decode_account(
        &self,
        account: &RawAccount,
        writer: &dyn WriterAdapter,
    ) -> Result<(), IngestError> {
        if account.owner != self.program_id {
            return Ok(());
        }
        for decoder in &self.decoders {
            match (decoder.decode)(account) {
                DecodeOutcome::NotApplicable => {}
                DecodeOutcome::Malformed(reason) => {
                    tracing::debug!(
                        kind = decoder.kind,
                        account = %account.pubkey,
                        "skipping malformed account data: {}",
                        reason
                    );
                }
                DecodeOutcome::Decoded(record) => {
                    let collection = record.collection();
                    writer
                        .persist(record)
                        .await
                        .map_err(|e| IngestError::Persist {
                            collection,
                            reason: e.to_string(),
                        })?;
                }
            }
        }
        Ok(())
    }
}

/// The default registry of watched programs.
pub fn watched_programs() -> Vec<WatchedProgram> {
    vec![auction::auction_program()]
}

/// Borsh-deserializes a value from a prefix of `data`, tolerating trailing
/// bytes. Account data is often longer than the struct serialized into it.
pub(crate) fn try_from_slice_unchecked<T: BorshDeserialize>(data: &[u8]) -> std::io::Result<T> {
    let mut cursor = data;
    T::deserialize(&mut cursor)
}
