//! Job submission and status polling.

use super::{AnalysisService, DocumentLocation};
use crate::error::{Error, Result};
use crate::model::{AnalysisPage, JobStatus};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Options for polling an analysis job.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Wait before the first status query
    pub initial_delay: Duration,

    /// Fixed wait between status queries
    pub interval: Duration,

    /// Upper bound on total polling time (`None` = unbounded)
    pub max_wait: Option<Duration>,
}

impl PollOptions {
    /// Create new poll options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wait before the first status query.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the wait between status queries.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the upper bound on total polling time.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Poll until the job finishes, however long it takes.
    pub fn unbounded(mut self) -> Self {
        self.max_wait = None;
        self
    }

    /// No waiting at all between queries.
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            interval: Duration::ZERO,
            max_wait: None,
        }
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            interval: Duration::from_secs(1),
            max_wait: Some(Duration::from_secs(60 * 60)),
        }
    }
}

/// Cancellation signal shared between a poller and its owner.
///
/// Clones share state; cancelling any clone wakes a waiting poller.
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug)]
struct CancelInner {
    cancelled: AtomicBool,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = unbounded();
        Self {
            inner: Arc::new(CancelInner {
                cancelled: AtomicBool::new(false),
                wake_tx,
                wake_rx,
            }),
        }
    }

    /// Cancel and wake any waiter.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        let _ = self.inner.wake_tx.send(());
    }

    /// Check if the token was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Block for `duration` unless cancelled first.
    pub fn wait(&self, duration: Duration) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if duration.is_zero() {
            return Ok(());
        }
        match self.inner.wake_rx.recv_timeout(duration) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if self.is_cancelled() {
                    // pass the wake-up on to other waiters
                    let _ = self.inner.wake_tx.send(());
                    Err(Error::Cancelled)
                } else {
                    Ok(())
                }
            }
            Err(RecvTimeoutError::Timeout) => Ok(()),
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal status and result pages of one job.
#[derive(Debug, Clone)]
pub struct JobResults {
    /// Job identifier
    pub job_id: String,

    /// Terminal job status
    pub status: JobStatus,

    /// Status detail reported with the terminal status
    pub status_message: Option<String>,

    /// Result pages in continuation order
    pub pages: Vec<AnalysisPage>,
}

/// Submits analysis jobs and polls them to a terminal status.
pub struct JobPoller<S> {
    service: S,
    options: PollOptions,
    cancel: CancelToken,
}

impl<S: AnalysisService> JobPoller<S> {
    /// Create a poller.
    pub fn new(service: S, options: PollOptions) -> Self {
        Self {
            service,
            options,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Cancellation token of this poller.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Submit a job and return its identifier.
    pub fn submit(&self, location: &DocumentLocation) -> Result<String> {
        let job_id = self.service.start_analysis(location)?;
        log::info!("Started job with id: {}", job_id);
        Ok(job_id)
    }

    /// Query status until it leaves IN_PROGRESS.
    ///
    /// Returns the terminal status and its status message. FAILED is returned
    /// like any other terminal status.
    pub fn wait_for_completion(&self, job_id: &str) -> Result<(JobStatus, Option<String>)> {
        let started = Instant::now();
        self.pause(job_id, started, self.options.initial_delay)?;

        loop {
            let page = self.service.get_analysis(job_id, None)?;
            let status = page.job_status.ok_or_else(|| {
                Error::Service(format!("no job status returned for job {}", job_id))
            })?;
            log::info!("Job status: {}", status);

            if status.is_terminal() {
                return Ok((status, page.status_message));
            }
            self.pause(job_id, started, self.options.interval)?;
        }
    }

    /// Fetch the first result page and every continuation page.
    pub fn fetch_results(&self, job_id: &str) -> Result<Vec<AnalysisPage>> {
        let mut pages = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self.service.get_analysis(job_id, next_token.as_deref())?;
            next_token = page.next_token.clone().filter(|t| !t.is_empty());
            pages.push(page);
            log::debug!("Result set page received: {}", pages.len());

            if next_token.is_none() {
                break;
            }
        }

        Ok(pages)
    }

    /// Submit, wait for a terminal status, and fetch all result pages.
    pub fn run(&self, location: &DocumentLocation) -> Result<JobResults> {
        let job_id = self.submit(location)?;
        let (status, status_message) = self.wait_for_completion(&job_id)?;
        let pages = self.fetch_results(&job_id)?;
        Ok(JobResults {
            job_id,
            status,
            status_message,
            pages,
        })
    }

    fn pause(&self, job_id: &str, started: Instant, duration: Duration) -> Result<()> {
        let Some(max_wait) = self.options.max_wait else {
            return self.cancel.wait(duration);
        };

        let elapsed = started.elapsed();
        if elapsed >= max_wait {
            return Err(Error::PollTimeout {
                job_id: job_id.to_string(),
                waited: elapsed,
            });
        }
        self.cancel.wait(duration.min(max_wait - elapsed))
    }
}
