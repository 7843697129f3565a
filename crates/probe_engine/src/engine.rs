use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_error, engine_info, engine_warn};
use futures_util::FutureExt;
use probe_core::{AnalysisResult, JobId, JobState};
use tokio::time::Instant;

use crate::types::JobFailure;
use crate::{ExtractionError, JobStore, PageExtractor, PageLoader, Stage, ValidationError};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on loading plus extraction for one job. `None` waits as
    /// long as the loader does.
    pub job_timeout: Option<Duration>,
    /// Path prefix under which job status is served; the job id is appended.
    pub status_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            job_timeout: None,
            status_path: "/status".to_string(),
        }
    }
}

/// Handle returned to the submitter before any analysis work has happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job_id: JobId,
    pub status_url: String,
}

/// Accepts page analysis requests and runs each one as its own tokio task.
///
/// Outcomes are only observable through [`AnalysisEngine::status`]. Must be
/// used from within a tokio runtime.
#[derive(Clone)]
pub struct AnalysisEngine {
    runner: JobRunner,
    status_path: String,
}

#[derive(Clone)]
struct JobRunner {
    store: Arc<JobStore>,
    loader: Arc<dyn PageLoader>,
    extractor: PageExtractor,
    job_timeout: Option<Duration>,
}

impl AnalysisEngine {
    pub fn new(loader: Arc<dyn PageLoader>, config: EngineConfig) -> Self {
        Self::with_store(Arc::new(JobStore::new()), loader, config)
    }

    pub fn with_store(
        store: Arc<JobStore>,
        loader: Arc<dyn PageLoader>,
        config: EngineConfig,
    ) -> Self {
        Self {
            runner: JobRunner {
                store,
                loader,
                extractor: PageExtractor,
                job_timeout: config.job_timeout,
            },
            status_path: config.status_path.trim_end_matches('/').to_string(),
        }
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.runner.store
    }

    /// Creates a job for `url` and schedules its analysis in the background.
    pub fn submit(&self, url: &str) -> Result<Submission, ValidationError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingUrl);
        }

        let job_id = self.runner.store.create();
        engine_info!("Job {} submitted url={} stage={:?}", job_id, url, Stage::Queued);

        let runner = self.runner.clone();
        let url = url.to_string();
        tokio::spawn(async move { runner.run(job_id, url).await });

        Ok(Submission {
            job_id,
            status_url: format!("{}/{}", self.status_path, job_id),
        })
    }

    pub fn status(&self, job_id: JobId) -> Option<JobState> {
        self.runner.store.get(job_id)
    }
}

impl JobRunner {
    async fn run(self, job_id: JobId, url: String) {
        let outcome = AssertUnwindSafe(self.analyse(job_id, &url))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ExtractionError::Panicked.into()));

        let recorded = match outcome {
            Ok(result) => {
                engine_info!(
                    "Job {} completed links={} icons={} stage={:?}",
                    job_id,
                    result.links.count(),
                    result.icons.count(),
                    Stage::Done
                );
                self.store.complete(job_id, result)
            }
            Err(failure) => {
                engine_warn!("Job {} failed: {}", job_id, failure);
                self.store.fail(job_id, failure.to_string())
            }
        };
        if let Err(err) = recorded {
            engine_error!("Job {} outcome was not recorded: {}", job_id, err);
        }
    }

    /// Load, extract, and release the page on every path out.
    async fn analyse(&self, job_id: JobId, url: &str) -> Result<AnalysisResult, JobFailure> {
        let deadline = self.job_timeout.map(|limit| (Instant::now() + limit, limit));

        engine_info!("Job {} stage={:?}", job_id, Stage::Loading);
        let page = bounded(deadline, self.loader.load(url)).await??;

        engine_info!("Job {} stage={:?} final_url={}", job_id, Stage::Extracting, page.url());
        let extraction = bounded(
            deadline,
            AssertUnwindSafe(self.extractor.extract(page.as_ref())).catch_unwind(),
        )
        .await;

        engine_info!("Job {} stage={:?}", job_id, Stage::Releasing);
        if let Err(err) = self.loader.release(page).await {
            engine_warn!("Job {}: {}", job_id, err);
        }

        let summary = extraction?.unwrap_or(Err(ExtractionError::Panicked))?;
        Ok(summary.into_result(url))
    }
}

async fn bounded<F: Future>(
    deadline: Option<(Instant, Duration)>,
    work: F,
) -> Result<F::Output, JobFailure> {
    match deadline {
        Some((at, limit)) => tokio::time::timeout_at(at, work)
            .await
            .map_err(|_| JobFailure::TimedOut(limit)),
        None => Ok(work.await),
    }
}
