use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::available_parallelism;

use compio::dispatcher::{Dispatcher, DispatcherBuilder};
use compio::runtime::spawn;
use futures::StreamExt;
use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use snafu::{ResultExt, Snafu};
use tracing::{debug, error, info, warn};

use crate::executor::populate;
use crate::jobs::{CopyError, CopyJob};
use crate::scratches::ScratchIndex;
use crate::structure::ProjectTree;

/// Default number of worker threads when unable to determine system parallelism
const DEFAULT_WORKER_THREADS: usize = 1;

/// Outcome of a population run. Failures carry the identity of their pair in
/// the error itself, so the caller can report them without replaying the walk.
#[derive(Debug, Default)]
pub struct CopyReport {
    pub copied: usize,
    pub failures: Vec<CopyError>,
}

/// Runs the pending content copies on a bounded worker pool. The tree walk
/// produces jobs on a channel, every job is dispatched to the pool, and the
/// result loop acts as the completion barrier: it acknowledges exactly as
/// many results as copies were dispatched before returning. After the first
/// failure no new copies are dispatched; in-flight ones still finish and are
/// awaited.
pub struct CopyExecutor {
    dispatcher: Dispatcher,
}

impl CopyExecutor {
    pub fn new() -> Result<Self, CopyExecutorCreationError> {
        let workers_num = Self::determine_worker_count();
        debug!("Using {} worker threads for content copies", workers_num);

        let dispatcher = DispatcherBuilder::new()
            .worker_threads(workers_num)
            .build()
            .context(DispatcherSnafu)?;

        Ok(Self { dispatcher })
    }

    fn determine_worker_count() -> NonZeroUsize {
        available_parallelism()
            .map(|n| n.get())
            .map(NonZeroUsize::new)
            .ok()
            .flatten()
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_WORKER_THREADS).unwrap())
    }

    /// Pairs tree nodes with scratches and copies the matched content.
    pub async fn execute(
        &self,
        tree: Arc<ProjectTree>,
        index: Arc<ScratchIndex>,
    ) -> Result<CopyReport, CopyExecutionError> {
        let (job_sender, job_receiver) = mpsc::unbounded::<CopyJob>();

        spawn(async move {
            populate(&tree, &index, &job_sender);
        })
        .detach();

        self.drive(job_receiver).await
    }

    /// Dispatches every received job and waits for all dispatched copies to
    /// acknowledge before returning.
    async fn drive(
        &self,
        mut job_receiver: UnboundedReceiver<CopyJob>,
    ) -> Result<CopyReport, CopyExecutionError> {
        let (result_sender, mut result_receiver) =
            mpsc::unbounded::<Result<String, CopyError>>();

        let mut report = CopyReport::default();
        let mut in_flight: usize = 0;
        let mut skipped: usize = 0;

        while let Some(job) = job_receiver.next().await {
            Self::collect_ready_results(&mut result_receiver, &mut report, &mut in_flight);
            if !report.failures.is_empty() {
                skipped += 1;
                continue;
            }

            self.dispatch_copy(result_sender.clone(), job)?;
            in_flight += 1;
        }
        if skipped > 0 {
            warn!("Skipped dispatching {} copies after a failure", skipped);
        }

        // Completion barrier: every dispatched copy sends exactly one result.
        while in_flight > 0 {
            let Some(result) = result_receiver.next().await else {
                break;
            };
            Self::acknowledge(result, &mut report);
            in_flight -= 1;
        }

        Ok(report)
    }

    /// Drains results that are already available without blocking, so a
    /// failure observed mid-walk stops further dispatching.
    fn collect_ready_results(
        result_receiver: &mut UnboundedReceiver<Result<String, CopyError>>,
        report: &mut CopyReport,
        in_flight: &mut usize,
    ) {
        while let Ok(Some(result)) = result_receiver.try_next() {
            Self::acknowledge(result, report);
            *in_flight -= 1;
        }
    }

    fn acknowledge(result: Result<String, CopyError>, report: &mut CopyReport) {
        match result {
            Ok(destination) => {
                debug!("Acknowledged copy into '{}'", destination);
                report.copied += 1;
            }
            Err(copy_error) => {
                error!("{copy_error}");
                report.failures.push(copy_error);
            }
        }
    }

    /// Dispatch a copy to the worker pool and forward its result to the
    /// result receiver.
    fn dispatch_copy(
        &self,
        result_sender: UnboundedSender<Result<String, CopyError>>,
        job: CopyJob,
    ) -> Result<(), CopyExecutionError> {
        let destination = job.destination.clone();

        let receiver = self
            .dispatcher
            .dispatch(move || async move { job.run().await })
            .map_err(|e| CopyExecutionError::CopyDispatchError {
                destination: destination.clone(),
                error: e.to_string(),
            })?;

        info!("Dispatched copy into '{}'", destination);

        let destination_for_spawn = destination.clone();
        spawn(async move {
            let result = match receiver.await {
                Ok(inner) => inner,
                Err(e) => {
                    debug!(
                        "Copy into '{}' was canceled: {}",
                        destination_for_spawn, e
                    );
                    Err(CopyError::CanceledError {
                        destination: destination_for_spawn.clone(),
                        source: e,
                    })
                }
            };

            if let Err(send_err) = result_sender.unbounded_send(result) {
                debug!(
                    "Failed to send copy result for '{}': {}",
                    destination_for_spawn, send_err
                );
            }
        })
        .detach();

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum CopyExecutorCreationError {
    #[snafu(display("Failed to create copy dispatcher"))]
    DispatcherError { source: std::io::Error },
}

#[derive(Debug, Snafu)]
pub enum CopyExecutionError {
    #[snafu(display("Failed to dispatch copy into '{}': {}", destination, error))]
    CopyDispatchError { destination: String, error: String },
}
