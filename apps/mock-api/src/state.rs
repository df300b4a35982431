use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use formloom_domain::{CreateSubmissionRequest, SubmissionResponse};
use tokio::sync::RwLock;

/// Submissions kept in memory; older ones are evicted first. Nothing
/// survives a restart.
pub const MAX_STORED_SUBMISSIONS: usize = 500;

/// Submission accepted by the mock backend.
#[derive(Debug, Clone)]
pub struct StoredSubmission {
    pub request: CreateSubmissionRequest,
    pub response: SubmissionResponse,
}

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    pub latency: Duration,
    pub submissions: Arc<RwLock<VecDeque<StoredSubmission>>>,
}

impl AppState {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            submissions: Arc::default(),
        }
    }

    /// Keeps `submission`, evicting the oldest once the store is full.
    pub async fn record_submission(&self, submission: StoredSubmission) {
        let mut submissions = self.submissions.write().await;
        while submissions.len() >= MAX_STORED_SUBMISSIONS {
            submissions.pop_front();
        }
        submissions.push_back(submission);
    }

    /// Waits for the configured artificial latency.
    pub async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
