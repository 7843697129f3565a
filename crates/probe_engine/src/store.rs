use std::collections::HashMap;

use parking_lot::RwLock;
use probe_core::{AnalysisResult, JobId, JobState, TransitionError};

/// Process-lifetime registry of jobs, shared between the submission path,
/// the background job tasks and status polling.
///
/// Every mutation swaps in a whole new [`JobState`], so readers only ever see
/// complete records.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, JobState>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh job in the processing state.
    pub fn create(&self) -> JobId {
        let mut jobs = self.jobs.write();
        let mut id = JobId::new();
        while jobs.contains_key(&id) {
            id = JobId::new();
        }
        jobs.insert(id, JobState::Processing);
        id
    }

    pub fn complete(&self, id: JobId, result: AnalysisResult) -> Result<(), TransitionError> {
        self.transition(id, |state| state.complete(result))
    }

    pub fn fail(&self, id: JobId, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(id, |state| state.fail(error))
    }

    /// Snapshot of the job's current state.
    pub fn get(&self, id: JobId) -> Option<JobState> {
        self.jobs.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    fn transition(
        &self,
        id: JobId,
        next: impl FnOnce(&JobState) -> Result<JobState, TransitionError>,
    ) -> Result<(), TransitionError> {
        let mut jobs = self.jobs.write();
        let slot = jobs.get_mut(&id).ok_or(TransitionError::UnknownJob(id))?;
        *slot = next(slot)?;
        Ok(())
    }
}
