//! Emotion Aggregation Context: the session-scoped store behind a
//! journal-entry composition.
//!
//! An [`EmotionProvider`] opens the scope and owns the state; it hands out
//! cheap [`EmotionContext`] handles to whatever needs to read or update it.
//! Once the provider is ended (or dropped) every handle turns inactive and
//! each operation fails with [`SessionError::Inactive`].
//!
//! The store never validates across fields: callers enforce selection caps
//! and ranges before writing.

use super::primary::{PrimaryEmotion, PrimarySelection};
use super::secondary::SecondaryEmotion;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("emotion context used outside of an active composition session ({0})")]
    Inactive(Uuid),
}

// ── Snapshot ───────────────────────────────────────────

/// Optional circumstances recorded alongside the emotions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

impl EntryContext {
    /// Shallow merge: every field set in `partial` overwrites ours.
    pub fn merge(&mut self, partial: EntryContext) {
        if partial.location.is_some() {
            self.location = partial.location;
        }
        if partial.activity.is_some() {
            self.activity = partial.activity;
        }
        if partial.social.is_some() {
            self.social = partial.social;
        }
        if partial.trigger.is_some() {
            self.trigger = partial.trigger;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == EntryContext::default()
    }
}

/// Aggregated emotion state of one composition session. Also the wire
/// payload of the emotions endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionSnapshot {
    pub primary: Option<PrimarySelection>,
    #[serde(default)]
    pub secondary: Vec<SecondaryEmotion>,
    #[serde(default)]
    pub energy: i32,
    #[serde(default)]
    pub context: EntryContext,
}

impl EmotionSnapshot {
    pub fn is_empty(&self) -> bool {
        *self == EmotionSnapshot::default()
    }
}

type SharedState = Arc<Mutex<Option<EmotionSnapshot>>>;

fn lock(state: &SharedState) -> MutexGuard<'_, Option<EmotionSnapshot>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Provider ───────────────────────────────────────────

/// Owner of one session's emotion state.
pub struct EmotionProvider {
    id: Uuid,
    state: SharedState,
}

impl EmotionProvider {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!("[Emotion] Session {} opened", id);
        Self {
            id,
            state: Arc::new(Mutex::new(Some(EmotionSnapshot::default()))),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A handle bound to this provider's scope.
    pub fn context(&self) -> EmotionContext {
        EmotionContext {
            session: self.id,
            state: self.state.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).is_some()
    }

    /// Close the scope and return the final state.
    pub fn end(self) -> Option<EmotionSnapshot> {
        lock(&self.state).take()
    }
}

impl Default for EmotionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EmotionProvider {
    fn drop(&mut self) {
        if lock(&self.state).take().is_some() {
            tracing::debug!("[Emotion] Session {} closed", self.id);
        }
    }
}

// ── Handle ─────────────────────────────────────────────

/// Handle to a provider's state. Clones share the same session.
#[derive(Clone)]
pub struct EmotionContext {
    session: Uuid,
    state: SharedState,
}

impl EmotionContext {
    pub fn session_id(&self) -> Uuid {
        self.session
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).is_some()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut EmotionSnapshot) -> R) -> Result<R, SessionError> {
        let mut guard = lock(&self.state);
        match guard.as_mut() {
            Some(snapshot) => Ok(f(snapshot)),
            None => Err(SessionError::Inactive(self.session)),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Result<EmotionSnapshot, SessionError> {
        self.with_state(|s| s.clone())
    }

    pub fn update_primary_emotion(
        &self,
        emotion: PrimaryEmotion,
        intensity: u8,
    ) -> Result<(), SessionError> {
        self.with_state(|s| s.primary = Some(PrimarySelection { emotion, intensity }))
    }

    pub fn update_secondary_emotions(
        &self,
        emotions: Vec<SecondaryEmotion>,
    ) -> Result<(), SessionError> {
        self.with_state(|s| s.secondary = emotions)
    }

    pub fn update_energy_level(&self, energy: i32) -> Result<(), SessionError> {
        self.with_state(|s| s.energy = energy)
    }

    pub fn update_context(&self, partial: EntryContext) -> Result<(), SessionError> {
        self.with_state(|s| s.context.merge(partial))
    }

    pub fn reset_emotions(&self) -> Result<(), SessionError> {
        self.with_state(|s| *s = EmotionSnapshot::default())
    }
}

impl std::fmt::Debug for EmotionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionContext")
            .field("session", &self.session)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(ctx: &EmotionContext) {
        ctx.update_primary_emotion(PrimaryEmotion::Fear, 85).unwrap();
        ctx.update_secondary_emotions(vec![SecondaryEmotion::Anxious, SecondaryEmotion::Restless])
            .unwrap();
        ctx.update_energy_level(-35).unwrap();
        ctx.update_context(EntryContext {
            location: Some("office".into()),
            social: Some(true),
            ..Default::default()
        })
        .unwrap();
    }

    #[test]
    fn starts_empty() {
        let provider = EmotionProvider::new();
        let snap = provider.context().snapshot().unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.primary, None);
        assert_eq!(snap.energy, 0);
    }

    #[test]
    fn updates_replace_fields_wholesale() {
        let provider = EmotionProvider::new();
        let ctx = provider.context();
        populated(&ctx);
        ctx.update_primary_emotion(PrimaryEmotion::Joy, 60).unwrap();
        ctx.update_secondary_emotions(vec![SecondaryEmotion::Proud]).unwrap();

        let snap = ctx.snapshot().unwrap();
        assert_eq!(snap.primary, Some(PrimarySelection::new(PrimaryEmotion::Joy, 60)));
        assert_eq!(snap.secondary, vec![SecondaryEmotion::Proud]);
        assert_eq!(snap.energy, -35);
    }

    #[test]
    fn context_updates_merge_shallowly() {
        let provider = EmotionProvider::new();
        let ctx = provider.context();
        populated(&ctx);
        ctx.update_context(EntryContext {
            activity: Some("commuting".into()),
            location: Some("train".into()),
            ..Default::default()
        })
        .unwrap();

        let context = ctx.snapshot().unwrap().context;
        assert_eq!(context.location.as_deref(), Some("train"));
        assert_eq!(context.activity.as_deref(), Some("commuting"));
        assert_eq!(context.social, Some(true));
        assert_eq!(context.trigger, None);
    }

    #[test]
    fn store_does_not_enforce_selection_cap() {
        let provider = EmotionProvider::new();
        let ctx = provider.context();
        let four = SecondaryEmotion::ALL[..4].to_vec();
        ctx.update_secondary_emotions(four.clone()).unwrap();
        assert_eq!(ctx.snapshot().unwrap().secondary, four);
    }

    #[test]
    fn reset_always_yields_initial_state() {
        let provider = EmotionProvider::new();
        let ctx = provider.context();
        populated(&ctx);
        ctx.reset_emotions().unwrap();
        assert_eq!(ctx.snapshot().unwrap(), EmotionSnapshot::default());
        ctx.reset_emotions().unwrap();
        assert_eq!(ctx.snapshot().unwrap(), EmotionSnapshot::default());
    }

    #[test]
    fn handles_fail_fast_after_scope_ends() {
        let provider = EmotionProvider::new();
        let id = provider.id();
        let ctx = provider.context();
        populated(&ctx);

        let last = provider.end().unwrap();
        assert_eq!(last.energy, -35);
        assert!(!ctx.is_active());
        assert_eq!(ctx.snapshot(), Err(SessionError::Inactive(id)));
        assert_eq!(
            ctx.update_energy_level(10),
            Err(SessionError::Inactive(id))
        );
        assert!(ctx.reset_emotions().is_err());
    }

    #[test]
    fn dropping_provider_closes_scope() {
        let ctx = {
            let provider = EmotionProvider::new();
            provider.context()
        };
        assert!(ctx.update_primary_emotion(PrimaryEmotion::Joy, 60).is_err());
    }

    #[test]
    fn sessions_are_isolated() {
        let a = EmotionProvider::new();
        let b = EmotionProvider::new();
        a.context().update_energy_level(20).unwrap();
        assert_eq!(b.context().snapshot().unwrap().energy, 0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn snapshot_wire_shape() {
        let snap = EmotionSnapshot {
            primary: Some(PrimarySelection::new(PrimaryEmotion::Joy, 30)),
            secondary: vec![SecondaryEmotion::Proud],
            energy: 30,
            context: EntryContext::default(),
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "primary": {"emotion": "joy", "intensity": 30},
                "secondary": ["proud"],
                "energy": 30,
                "context": {}
            })
        );

        let empty = serde_json::to_value(EmotionSnapshot::default()).unwrap();
        assert_eq!(empty["primary"], serde_json::Value::Null);
    }
}
