//! Submission Adapter: the boundary between an emotion snapshot and the
//! remote emotions endpoint.

use super::context::EmotionSnapshot;
use crate::api::{ApiClient, ApiError, SubmitReceipt};
use async_trait::async_trait;

/// Sends a snapshot for one entry. Failures are returned as-is: no retry,
/// no backoff, no offline queue.
#[async_trait]
pub trait EmotionSubmitter: Send + Sync {
    async fn submit_emotions(
        &self,
        entry_id: i64,
        snapshot: &EmotionSnapshot,
    ) -> Result<SubmitReceipt, ApiError>;
}

#[async_trait]
impl EmotionSubmitter for ApiClient {
    async fn submit_emotions(
        &self,
        entry_id: i64,
        snapshot: &EmotionSnapshot,
    ) -> Result<SubmitReceipt, ApiError> {
        tracing::debug!("[Emotion] Submitting emotions for entry {}", entry_id);
        self.update_entry_emotions(entry_id, snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotions::{PrimaryEmotion, PrimarySelection};
    use std::sync::Mutex;

    struct FlakySubmitter {
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl EmotionSubmitter for FlakySubmitter {
        async fn submit_emotions(
            &self,
            _entry_id: i64,
            _snapshot: &EmotionSnapshot,
        ) -> Result<SubmitReceipt, ApiError> {
            *self.calls.lock().unwrap() += 1;
            Err(ApiError::Status {
                status: 503,
                message: "Network error".into(),
            })
        }
    }

    #[test]
    fn failures_are_not_retried() {
        let submitter = FlakySubmitter {
            calls: Mutex::new(0),
        };
        let snapshot = EmotionSnapshot {
            primary: Some(PrimarySelection::new(PrimaryEmotion::Sadness, 60)),
            energy: -10,
            ..Default::default()
        };
        let err = tokio_test::block_on(submitter.submit_emotions(1, &snapshot)).unwrap_err();
        assert!(err.to_string().contains("Network error"));
        assert_eq!(*submitter.calls.lock().unwrap(), 1);
    }
}
