//! An ordered, single-worker task queue for live account changes.
//!
//! The queue is created in a buffering state: changes enqueued before
//! [`ChangeQueue::start`] are retained, not executed. Once started, a single
//! worker drains strictly in enqueue order, finishing each change before
//! beginning the next. That single-worker discipline is what gives the system
//! a total order of mutations once live draining begins.

use crate::{
    account::{PendingChange, RawAccount},
    decode::WatchedProgram,
    error::IngestError,
    writer::WriterAdapter,
};
use solana_sdk::pubkey::Pubkey;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::{mpsc, watch};

/// A clonable handle for appending account changes to a [`ChangeQueue`].
#[derive(Debug, Clone)]
pub struct QueueSender {
    program_id: Pubkey,
    tx: mpsc::UnboundedSender<PendingChange>,
    next_seq: Arc<AtomicU64>,
}

impl QueueSender {
    /// Appends a change, stamping its position in the arrival order. Changes
    /// accepted while the queue is still buffering are retained and processed
    /// once it starts. The upstream notification stream has no backpressure
    /// channel, so the queue never refuses an append.
    pub fn enqueue(&self, account: RawAccount) {
        let change = PendingChange {
            account,
            program_id: self.program_id,
            observed_at: self.next_seq.fetch_add(1, Ordering::SeqCst),
        };
        if self.tx.send(change).is_err() {
            tracing::warn!(
                program = %self.program_id,
                "change queue worker is gone; dropping account update"
            );
        }
    }
}

/// A first-in-first-out change queue with exactly one worker.
pub struct ChangeQueue {
    sender: QueueSender,
    started: watch::Sender<bool>,
}

impl ChangeQueue {
    /// Spawns the (initially idle) worker that will decode and persist this
    /// program's changes.
    pub fn new(program: WatchedProgram, writer: Arc<dyn WriterAdapter>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (started, start_rx) = watch::channel(false);
        let sender = QueueSender {
            program_id: program.program_id,
            tx,
            next_seq: Arc::new(AtomicU64::new(0)),
        };
        tokio::spawn(run_worker(program, writer, rx, start_rx));
        Self { sender, started }
    }

    pub fn sender(&self) -> QueueSender {
        self.sender.clone()
    }

    /// Whether the queue has left its buffering state.
    pub fn is_running(&self) -> bool {
        *self.started.borrow()
    }

    /// Transitions the queue from buffering to draining. Buffered changes are
    /// processed first, in arrival order, then the worker stays on the live
    /// stream for the life of the queue.
    pub fn start(&self) {
        let _ = self.started.send(true);
    }
}

async fn run_worker(
    program: WatchedProgram,
    writer: Arc<dyn WriterAdapter>,
    mut rx: mpsc::UnboundedReceiver<PendingChange>,
    mut started: watch::Receiver<bool>,
) {
    // Buffer until the loader signals that the backlog has settled.
    while !*started.borrow_and_update() {
        if started.changed().await.is_err() {
            return;
        }
    }
    tracing::debug!(program = %program.program_id, "change queue draining");

    while let Some(change) = rx.recv().await {
        if let Err(e) = apply_change(&program, writer.as_ref(), &change).await {
            tracing::error!(
                program = %change.program_id,
                account = %change.account.pubkey,
                seq = change.observed_at,
                "failed to apply account change: {}",
                e
            );
        }
    }
}

async fn apply_change(
    program: &WatchedProgram,
    writer: &dyn WriterAdapter,
    change: &PendingChange,
) -> Result<(), IngestError> {
    tracing::trace!(
        account = %change.account.pubkey,
        seq = change.observed_at,
        "applying account change"
    );
    program.decode_account(&change.account, writer).await?;
    writer
        .flush()
        .await
        .map_err(|e| IngestError::Flush {
            reason: e.to_string(),
        })
}
