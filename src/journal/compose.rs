//! One entry's emotion-tracking scope, from first selection to submission.

use crate::api::{ApiError, SubmitReceipt};
use crate::emotions::{
    EmotionContext, EmotionProvider, EmotionSnapshot, EmotionSubmitter, SessionError,
};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Failed to submit emotions: {0}")]
    Submit(#[from] ApiError),
}

pub struct CompositionSession {
    provider: Option<EmotionProvider>,
    context: EmotionContext,
}

impl CompositionSession {
    pub fn new() -> Self {
        let provider = EmotionProvider::new();
        let context = provider.context();
        Self {
            provider: Some(provider),
            context,
        }
    }

    pub fn id(&self) -> Uuid {
        self.context.session_id()
    }

    /// Handle for the selectors. Goes inactive once the session ends.
    pub fn context(&self) -> EmotionContext {
        self.context.clone()
    }

    pub fn is_active(&self) -> bool {
        self.provider.is_some()
    }

    /// Send exactly the current snapshot for `entry_id`.
    ///
    /// On success the session ends. On failure the error is returned and the
    /// selections stay in place for another attempt.
    pub async fn submit(
        &mut self,
        submitter: &dyn EmotionSubmitter,
        entry_id: i64,
    ) -> Result<SubmitReceipt, ComposeError> {
        let snapshot = self.context.snapshot()?;
        let receipt = submitter.submit_emotions(entry_id, &snapshot).await?;
        tracing::info!(
            "[Emotion] Submitted session {} for entry {}",
            self.id(),
            receipt.entry_id
        );
        self.end();
        Ok(receipt)
    }

    /// Abandon the session. Returns what had been selected, if it was still
    /// active.
    pub fn cancel(&mut self) -> Option<EmotionSnapshot> {
        let discarded = self.end();
        if discarded.is_some() {
            tracing::debug!("[Emotion] Session {} cancelled", self.id());
        }
        discarded
    }

    fn end(&mut self) -> Option<EmotionSnapshot> {
        self.provider.take().and_then(EmotionProvider::end)
    }
}

impl Default for CompositionSession {
    fn default() -> Self {
        Self::new()
    }
}
