//! A generic bounded-concurrency executor with periodic flush checkpoints.

use futures::{stream::FuturesUnordered, StreamExt};
use std::future::Future;

/// Concurrency degree and checkpoint cadence for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Maximum number of in-flight `process` calls.
    pub jobs: usize,
    /// Number of completed items between checkpoints.
    pub batch_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            jobs: 2,
            batch_size: 1000,
        }
    }
}

/// Maps `process` over `items` with at most `options.jobs` calls in flight,
/// admitting the next item as soon as a slot frees.
///
/// `checkpoint` runs after every `options.batch_size` completions, before
/// further work is admitted, and exactly once more after the final item — for
/// `n` items it is invoked `n.div_ceil(batch_size)` times. Items may complete
/// in any order; only the checkpoint cadence is ordered by completion count.
///
/// The first error returned by `process` stops admission, lets in-flight items
/// finish, and is propagated. `checkpoint` is not invoked after a failure.
pub async fn run_pipeline<T, E, P, PF, C, CF>(
    items: impl IntoIterator<Item = T>,
    options: PipelineOptions,
    process: P,
    mut checkpoint: C,
) -> Result<(), E>
where
    P: Fn(T) -> PF,
    PF: Future<Output = Result<(), E>>,
    C: FnMut() -> CF,
    CF: Future<Output = Result<(), E>>,
{
    let jobs = options.jobs.max(1);
    let batch_size = options.batch_size.max(1);

    let mut items = items.into_iter().peekable();
    let mut in_flight = FuturesUnordered::new();
    let mut completed: usize = 0;
    let mut first_error: Option<E> = None;

    loop {
        while first_error.is_none() && in_flight.len() < jobs {
            match items.next() {
                Some(item) => in_flight.push(process(item)),
                None => break,
            }
        }

        let Some(result) = in_flight.next().await else {
            break;
        };
        match result {
            Ok(()) => completed += 1,
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
                continue;
            }
        }

        // The batch-boundary checkpoint; the tail is covered by the final one.
        let more_work = items.peek().is_some() || !in_flight.is_empty();
        if first_error.is_none() && completed % batch_size == 0 && more_work {
            checkpoint().await?;
        }
    }

    if let Some(error) = first_error {
        return Err(error);
    }
    if completed > 0 {
        checkpoint().await?;
    }
    Ok(())
}
