//! Backlog orchestration and the handoff from buffering to live draining.

use crate::{
    account::RawAccount,
    config::IngesterConfig,
    connection::{ChainConnection, SolanaConnection},
    decode::WatchedProgram,
    error::IngestError,
    pipeline::{run_pipeline, PipelineOptions},
    queue::ChangeQueue,
    writer::WriterAdapter,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Orchestrates, per watched program, subscription setup, backlog fetch,
/// pipeline execution and the switch of the change queues from buffering to
/// draining.
///
/// A loader moves from idle through loading into a draining steady state, or
/// into a failed state on a fatal backlog error. [`load`](Self::load) is
/// memoized: the first caller triggers the work and every concurrent or later
/// caller observes the same outcome. A failed loader stays failed; retrying
/// requires constructing a fresh instance.
pub struct Loader {
    name: String,
    connection: Arc<dyn ChainConnection>,
    writer: Arc<dyn WriterAdapter>,
    programs: Vec<WatchedProgram>,
    queues: Vec<ChangeQueue>,
    pipeline: PipelineOptions,
    outcome: OnceCell<Result<(), IngestError>>,
}

impl Loader {
    /// Creates a loader over a fixed set of watched programs.
    ///
    /// One buffering change queue is spawned per program. Nothing is fetched
    /// or subscribed until [`load`](Self::load) is called.
    pub fn new(
        name: impl Into<String>,
        config: &IngesterConfig,
        connection: Arc<dyn ChainConnection>,
        writer: Arc<dyn WriterAdapter>,
        programs: Vec<WatchedProgram>,
    ) -> Self {
        let queues = programs
            .iter()
            .map(|program| ChangeQueue::new(program.clone(), writer.clone()))
            .collect();
        Self {
            name: name.into(),
            connection,
            writer,
            programs,
            queues,
            pipeline: PipelineOptions {
                jobs: config.pipeline.jobs,
                batch_size: config.pipeline.batch_size,
            },
            outcome: OnceCell::new(),
        }
    }

    /// Creates a loader with a [`SolanaConnection`] built from `config`.
    pub fn connect(
        name: impl Into<String>,
        config: &IngesterConfig,
        writer: Arc<dyn WriterAdapter>,
        programs: Vec<WatchedProgram>,
    ) -> Self {
        let connection = Arc::new(SolanaConnection::new(&config.solana));
        Self::new(name, config, connection, writer, programs)
    }

    /// Whether every change queue has left its buffering state.
    ///
    /// A loader with no watched programs has nothing to drain and never
    /// reports `true`, even after a successful [`load`](Self::load).
    pub fn is_draining(&self) -> bool {
        !self.queues.is_empty() && self.queues.iter().all(ChangeQueue::is_running)
    }

    /// Loads the backlog of every watched program, then switches the change
    /// queues to draining.
    ///
    /// Resolves once all backlogs are ingested and all queues are running;
    /// draining itself continues in the background for the life of the
    /// process. Concurrent and repeated calls share a single backlog pass and
    /// its outcome.
    pub async fn load(&self) -> Result<(), IngestError> {
        self.outcome.get_or_init(|| self.run_load()).await.clone()
    }

    async fn run_load(&self) -> Result<(), IngestError> {
        tracing::info!(loader = %self.name, "start loading data");
        for (program, queue) in self.programs.iter().zip(&self.queues) {
            self.subscribe_program(program, queue).await?;
            let accounts = self.fetch_backlog(program).await?;
            self.process_backlog(program, accounts).await?;
        }
        for queue in &self.queues {
            queue.start();
        }
        tracing::info!(loader = %self.name, "data loaded and processed; live draining started");
        Ok(())
    }

    /// Registers the live subscription before the snapshot fetch. An account
    /// mutated in between appears in the snapshot and/or the buffered queue;
    /// idempotent last-write-wins persistence converges either way.
    async fn subscribe_program(
        &self,
        program: &WatchedProgram,
        queue: &ChangeQueue,
    ) -> Result<(), IngestError> {
        let mut rx = self
            .connection
            .subscribe_account_changes(&program.program_id)
            .await
            .map_err(|e| IngestError::Subscribe {
                program: program.program_id,
                reason: e.to_string(),
            })?;
        let sender = queue.sender();
        tokio::spawn(async move {
            while let Some(account) = rx.recv().await {
                sender.enqueue(account);
            }
        });
        Ok(())
    }

    async fn fetch_backlog(&self, program: &WatchedProgram) -> Result<Vec<RawAccount>, IngestError> {
        tracing::info!(loader = %self.name, program = %program.program_id, "loading program accounts");
        let accounts = self
            .connection
            .fetch_program_accounts(&program.program_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    loader = %self.name,
                    program = %program.program_id,
                    "failed to load program accounts"
                );
                IngestError::SnapshotFetch {
                    program: program.program_id,
                    reason: e.to_string(),
                }
            })?;
        tracing::info!(
            loader = %self.name,
            program = %program.program_id,
            count = accounts.len(),
            "loaded program accounts"
        );
        Ok(accounts)
    }

    async fn process_backlog(
        &self,
        program: &WatchedProgram,
        accounts: Vec<RawAccount>,
    ) -> Result<(), IngestError> {
        tracing::info!(
            loader = %self.name,
            program = %program.program_id,
            count = accounts.len(),
            "start processing accounts"
        );
        let writer = self.writer.as_ref();
        run_pipeline(
            accounts,
            self.pipeline,
            |account| async move { program.decode_account(&account, writer).await },
            move || async move { self.flush().await },
        )
        .await?;
        self.flush().await?;
        tracing::info!(loader = %self.name, program = %program.program_id, "accounts processed");
        Ok(())
    }

    async fn flush(&self) -> Result<(), IngestError> {
        self.writer.flush().await.map_err(|e| IngestError::Flush {
            reason: e.to_string(),
        })
    }
}
