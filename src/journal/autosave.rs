//! Draft auto-save.
//!
//! `AutoSaveMachine` holds the rules and never touches a clock or the network:
//! callers feed it edits, timer expiries and save results along with the
//! current instant, and it answers with what to do next. `AutoSaver` drives one
//! machine on a Tokio task and publishes its status through a `watch` channel.

use crate::api::{ApiClient, EntryUpdate, NewEntry};
use crate::config::AutoSaveConfig;
use async_trait::async_trait;
use futures::future::OptionFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// The part of an entry that auto-save persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub content: String,
    pub mood: Option<String>,
}

impl Draft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mood: None,
        }
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    /// Whitespace-only content is never saved.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    /// Indicator text; `None` while idle (nothing is shown).
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SaveStatus::Idle => None,
            SaveStatus::Saving => Some("Saving..."),
            SaveStatus::Saved => Some("Saved"),
            SaveStatus::Error => Some("Failed to save"),
        }
    }
}

/// What the driver should do after feeding the machine an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Arm (or re-arm) the timer for this instant.
    Schedule(Instant),
    /// Disarm the timer.
    Cancel,
    /// Persist this draft now.
    Save(Draft),
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pending { due: Instant },
    Saving,
}

#[derive(Debug)]
pub struct AutoSaveMachine {
    debounce: Duration,
    min_interval: Duration,
    saved_display: Duration,
    error_display: Duration,
    draft: Draft,
    phase: Phase,
    /// An edit arrived while a save was in flight.
    dirty: bool,
    last_saved: Instant,
    status: SaveStatus,
    status_since: Instant,
}

impl AutoSaveMachine {
    /// The minimum-interval clock starts at `now`.
    pub fn new(config: &AutoSaveConfig, now: Instant) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_interval: Duration::from_millis(config.min_interval_ms),
            saved_display: Duration::from_millis(config.saved_display_ms),
            error_display: Duration::from_millis(config.error_display_ms),
            draft: Draft::default(),
            phase: Phase::Idle,
            dirty: false,
            last_saved: now,
            status: SaveStatus::Idle,
            status_since: now,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_saving(&self) -> bool {
        self.phase == Phase::Saving
    }

    /// When the armed timer should fire, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Pending { due } => Some(due),
            _ => None,
        }
    }

    /// When a transient `Saved`/`Error` status falls back to `Idle`.
    pub fn status_expires_at(&self) -> Option<Instant> {
        match self.status {
            SaveStatus::Saved => Some(self.status_since + self.saved_display),
            SaveStatus::Error => Some(self.status_since + self.error_display),
            _ => None,
        }
    }

    /// Revert an expired transient status. Returns `true` if it changed.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        match self.status_expires_at() {
            Some(at) if now >= at => {
                self.set_status(SaveStatus::Idle, now);
                true
            }
            _ => false,
        }
    }

    fn set_status(&mut self, status: SaveStatus, now: Instant) {
        self.status = status;
        self.status_since = now;
    }

    pub fn edit(&mut self, draft: Draft, now: Instant) -> Action {
        self.draft = draft;

        if self.phase == Phase::Saving {
            self.dirty = true;
            return Action::Nothing;
        }

        if self.draft.is_blank() {
            let was_pending = matches!(self.phase, Phase::Pending { .. });
            self.phase = Phase::Idle;
            return if was_pending {
                Action::Cancel
            } else {
                Action::Nothing
            };
        }

        let due = now + self.debounce;
        self.phase = Phase::Pending { due };
        Action::Schedule(due)
    }

    pub fn timer_fired(&mut self, now: Instant) -> Action {
        let due = match self.phase {
            Phase::Pending { due } => due,
            _ => return Action::Nothing,
        };
        if now < due {
            return Action::Schedule(due);
        }

        let earliest = self.last_saved + self.min_interval;
        if now < earliest {
            tracing::debug!("[AutoSave] Too soon since last save, re-arming");
            self.phase = Phase::Pending { due: earliest };
            return Action::Schedule(earliest);
        }

        self.phase = Phase::Saving;
        self.set_status(SaveStatus::Saving, now);
        Action::Save(self.draft.clone())
    }

    pub fn save_finished(&mut self, succeeded: bool, now: Instant) -> Action {
        if self.phase != Phase::Saving {
            return Action::Nothing;
        }
        self.phase = Phase::Idle;

        if succeeded {
            self.last_saved = now;
            self.set_status(SaveStatus::Saved, now);
        } else {
            self.set_status(SaveStatus::Error, now);
        }

        if std::mem::take(&mut self.dirty) && !self.draft.is_blank() {
            let due = now + self.debounce;
            self.phase = Phase::Pending { due };
            return Action::Schedule(due);
        }
        Action::Nothing
    }
}

// ── Persistence ────────────────────────────────────────

#[async_trait]
pub trait DraftSaver: Send + Sync {
    async fn save_draft(&self, draft: &Draft) -> anyhow::Result<()>;
}

/// Saves drafts of one journal entry: the first save creates it, later saves
/// update it in place.
pub struct EntryDraftSaver {
    client: Arc<ApiClient>,
    entry_id: Mutex<Option<i64>>,
}

impl EntryDraftSaver {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            entry_id: Mutex::new(None),
        }
    }

    /// Continue editing an entry that already exists.
    pub fn for_entry(client: Arc<ApiClient>, entry_id: i64) -> Self {
        Self {
            client,
            entry_id: Mutex::new(Some(entry_id)),
        }
    }

    pub async fn entry_id(&self) -> Option<i64> {
        *self.entry_id.lock().await
    }
}

#[async_trait]
impl DraftSaver for EntryDraftSaver {
    async fn save_draft(&self, draft: &Draft) -> anyhow::Result<()> {
        let mut entry_id = self.entry_id.lock().await;
        match *entry_id {
            Some(id) => {
                let update = EntryUpdate {
                    content: Some(draft.content.clone()),
                    mood: draft.mood.clone(),
                    ..Default::default()
                };
                self.client.update_entry(id, &update).await?;
            }
            None => {
                let entry = self
                    .client
                    .create_entry(&NewEntry {
                        content: draft.content.clone(),
                        mood: draft.mood.clone(),
                        ..Default::default()
                    })
                    .await?;
                tracing::info!("[AutoSave] Created entry {}", entry.id);
                *entry_id = Some(entry.id);
            }
        }
        Ok(())
    }
}

// ── Driver ─────────────────────────────────────────────

enum Command {
    Edit(Draft),
}

/// Handle to a running auto-save loop. Dropping it stops the loop; a save
/// already in flight is left to finish.
pub struct AutoSaver {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<SaveStatus>,
}

impl AutoSaver {
    pub fn spawn(config: &AutoSaveConfig, saver: Arc<dyn DraftSaver>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
        let (status_tx, status_rx) = watch::channel(SaveStatus::Idle);
        let mut machine = AutoSaveMachine::new(config, Instant::now());

        tokio::spawn(async move {
            let mut in_flight: Option<JoinHandle<anyhow::Result<()>>> = None;

            loop {
                let deadline = machine.deadline();
                let expiry = machine.status_expires_at();

                tokio::select! {
                    command = rx.recv() => match command {
                        Some(Command::Edit(draft)) => {
                            machine.edit(draft, Instant::now());
                        }
                        None => break,
                    },
                    _ = sleep_until_some(deadline) => {
                        if let Action::Save(draft) = machine.timer_fired(Instant::now()) {
                            tracing::debug!("[AutoSave] Saving {} chars", draft.content.len());
                            let saver = saver.clone();
                            in_flight = Some(tokio::spawn(async move {
                                saver.save_draft(&draft).await
                            }));
                        }
                    },
                    Some(joined) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                        in_flight = None;
                        let succeeded = match joined {
                            Ok(Ok(())) => true,
                            Ok(Err(e)) => {
                                tracing::error!("[AutoSave] Save failed: {:#}", e);
                                false
                            }
                            Err(e) => {
                                tracing::error!("[AutoSave] Save task aborted: {}", e);
                                false
                            }
                        };
                        machine.save_finished(succeeded, Instant::now());
                    },
                    _ = sleep_until_some(expiry) => {
                        machine.expire_status(Instant::now());
                    },
                }

                let status = machine.status();
                status_tx.send_if_modified(|current| {
                    if *current != status {
                        *current = status;
                        true
                    } else {
                        false
                    }
                });
            }

            tracing::debug!("[AutoSave] Loop stopped");
        });

        Self {
            commands: tx,
            status: status_rx,
        }
    }

    /// Report the editor's current content.
    pub fn edit(&self, draft: Draft) {
        if self.commands.send(Command::Edit(draft)).is_err() {
            tracing::warn!("[AutoSave] Loop has stopped, edit dropped");
        }
    }

    pub fn status(&self) -> SaveStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config(debounce_ms: u64, min_interval_ms: u64) -> AutoSaveConfig {
        AutoSaveConfig {
            debounce_ms,
            min_interval_ms,
            ..Default::default()
        }
    }

    // ── Machine ──

    #[test]
    fn blank_content_never_schedules() {
        let t0 = Instant::now();
        let mut m = AutoSaveMachine::new(&AutoSaveConfig::default(), t0);
        assert_eq!(m.edit(Draft::new("  \n\t"), t0), Action::Nothing);
        assert_eq!(m.deadline(), None);
    }

    #[test]
    fn clearing_content_cancels_pending_save() {
        let t0 = Instant::now();
        let mut m = AutoSaveMachine::new(&AutoSaveConfig::default(), t0);
        assert_eq!(m.edit(Draft::new("hi"), t0), Action::Schedule(t0 + ms(2000)));
        assert_eq!(m.edit(Draft::new(""), t0 + ms(500)), Action::Cancel);
        assert_eq!(m.timer_fired(t0 + ms(2000)), Action::Nothing);
    }

    #[test]
    fn each_edit_pushes_the_deadline() {
        let t0 = Instant::now();
        let mut m = AutoSaveMachine::new(&AutoSaveConfig::default(), t0);
        m.edit(Draft::new("a"), t0);
        assert_eq!(
            m.edit(Draft::new("ab"), t0 + ms(1500)),
            Action::Schedule(t0 + ms(3500))
        );
        // A stale wake-up re-arms for the real deadline.
        assert_eq!(m.timer_fired(t0 + ms(2000)), Action::Schedule(t0 + ms(3500)));
        assert_eq!(
            m.timer_fired(t0 + ms(3500)),
            Action::Save(Draft::new("ab"))
        );
        assert_eq!(m.status(), SaveStatus::Saving);
    }

    #[test]
    fn min_interval_counts_from_creation_and_last_success() {
        let t0 = Instant::now();
        let mut m = AutoSaveMachine::new(&config(100, 2000), t0);

        m.edit(Draft::new("a"), t0);
        assert_eq!(m.timer_fired(t0 + ms(100)), Action::Schedule(t0 + ms(2000)));
        assert_eq!(m.timer_fired(t0 + ms(2000)), Action::Save(Draft::new("a")));
        m.save_finished(true, t0 + ms(2100));

        m.edit(Draft::new("ab"), t0 + ms(2200));
        assert_eq!(m.timer_fired(t0 + ms(2300)), Action::Schedule(t0 + ms(4100)));
    }

    #[test]
    fn failed_save_does_not_reset_interval_clock() {
        let t0 = Instant::now();
        let mut m = AutoSaveMachine::new(&config(100, 1000), t0);
        m.edit(Draft::new("a"), t0 + ms(1000));
        assert!(matches!(m.timer_fired(t0 + ms(1100)), Action::Save(_)));
        m.save_finished(false, t0 + ms(1200));
        assert_eq!(m.status(), SaveStatus::Error);

        m.edit(Draft::new("ab"), t0 + ms(1300));
        assert!(matches!(m.timer_fired(t0 + ms(1400)), Action::Save(_)));
    }

    #[test]
    fn edit_during_save_rearms_after_completion() {
        let t0 = Instant::now();
        let mut m = AutoSaveMachine::new(&config(100, 0), t0);
        m.edit(Draft::new("a"), t0);
        assert!(matches!(m.timer_fired(t0 + ms(100)), Action::Save(_)));

        assert_eq!(m.edit(Draft::new("ab"), t0 + ms(200)), Action::Nothing);
        assert!(m.is_saving());
        assert_eq!(m.deadline(), None);

        assert_eq!(
            m.save_finished(true, t0 + ms(600)),
            Action::Schedule(t0 + ms(700))
        );
        assert_eq!(m.timer_fired(t0 + ms(700)), Action::Save(Draft::new("ab")));
    }

    #[test]
    fn transient_statuses_expire() {
        let t0 = Instant::now();
        let mut m = AutoSaveMachine::new(&config(100, 0), t0);
        m.edit(Draft::new("a"), t0);
        m.timer_fired(t0 + ms(100));
        m.save_finished(true, t0 + ms(200));
        assert_eq!(m.status_expires_at(), Some(t0 + ms(2200)));
        assert!(!m.expire_status(t0 + ms(2199)));
        assert!(m.expire_status(t0 + ms(2200)));
        assert_eq!(m.status(), SaveStatus::Idle);

        m.edit(Draft::new("ab"), t0 + ms(3000));
        m.timer_fired(t0 + ms(3100));
        m.save_finished(false, t0 + ms(3200));
        assert_eq!(m.status_expires_at(), Some(t0 + ms(6200)));
    }

    #[test]
    fn status_labels() {
        assert_eq!(SaveStatus::Idle.label(), None);
        assert_eq!(SaveStatus::Saving.label(), Some("Saving..."));
        assert_eq!(SaveStatus::Error.label(), Some("Failed to save"));
    }

    // ── Driver ──

    #[derive(Default)]
    struct FakeSaver {
        saved: std::sync::Mutex<Vec<Draft>>,
        delay: Duration,
        fail: bool,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl FakeSaver {
        fn contents(&self) -> Vec<String> {
            self.saved
                .lock()
                .unwrap()
                .iter()
                .map(|d| d.content.clone())
                .collect()
        }
    }

    #[async_trait]
    impl DraftSaver for FakeSaver {
        async fn save_draft(&self, draft: &Draft) -> anyhow::Result<()> {
            let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now_active, Ordering::SeqCst);
            sleep(self.delay).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("disk full");
            }
            self.saved.lock().unwrap().push(draft.clone());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn saves_once_after_quiet_period_then_reverts_to_idle() {
        let saver = Arc::new(FakeSaver::default());
        let auto = AutoSaver::spawn(&AutoSaveConfig::default(), saver.clone());

        auto.edit(Draft::new("hello").with_mood("good"));
        sleep(ms(1999)).await;
        assert!(saver.contents().is_empty());

        sleep(ms(2)).await;
        assert_eq!(saver.contents(), vec!["hello"]);
        assert_eq!(saver.saved.lock().unwrap()[0].mood.as_deref(), Some("good"));
        assert_eq!(auto.status(), SaveStatus::Saved);

        sleep(ms(2000)).await;
        assert_eq!(auto.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_saves_latest_content_once() {
        let saver = Arc::new(FakeSaver::default());
        let auto = AutoSaver::spawn(&AutoSaveConfig::default(), saver.clone());

        auto.edit(Draft::new("a"));
        sleep(ms(1000)).await;
        auto.edit(Draft::new("ab"));
        sleep(ms(1500)).await;
        assert!(saver.contents().is_empty());

        sleep(ms(600)).await;
        assert_eq!(saver.contents(), vec!["ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_is_never_saved() {
        let saver = Arc::new(FakeSaver::default());
        let auto = AutoSaver::spawn(&AutoSaveConfig::default(), saver.clone());
        auto.edit(Draft::new("   "));
        sleep(Duration::from_secs(10)).await;
        assert!(saver.contents().is_empty());
        assert_eq!(auto.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn respects_min_interval_between_saves() {
        let saver = Arc::new(FakeSaver::default());
        let auto = AutoSaver::spawn(&config(100, 2000), saver.clone());

        auto.edit(Draft::new("a"));
        sleep(ms(1900)).await;
        assert!(saver.contents().is_empty());
        sleep(ms(150)).await;
        assert_eq!(saver.contents().len(), 1);

        auto.edit(Draft::new("ab"));
        sleep(ms(1850)).await;
        assert_eq!(saver.contents().len(), 1);
        sleep(ms(200)).await;
        assert_eq!(saver.contents(), vec!["a", "ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn saves_never_overlap() {
        let saver = Arc::new(FakeSaver {
            delay: ms(500),
            ..Default::default()
        });
        let auto = AutoSaver::spawn(&config(100, 0), saver.clone());

        auto.edit(Draft::new("a"));
        sleep(ms(300)).await;
        assert_eq!(auto.status(), SaveStatus::Saving);
        auto.edit(Draft::new("ab"));

        sleep(ms(1000)).await;
        assert_eq!(saver.contents(), vec!["a", "ab"]);
        assert_eq!(saver.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_shows_error_then_idle() {
        let saver = Arc::new(FakeSaver {
            fail: true,
            ..Default::default()
        });
        let auto = AutoSaver::spawn(&AutoSaveConfig::default(), saver.clone());
        let mut status = auto.subscribe();

        auto.edit(Draft::new("doomed"));
        sleep(ms(2001)).await;
        assert_eq!(auto.status(), SaveStatus::Error);
        assert!(status.has_changed().unwrap());

        sleep(ms(2998)).await;
        assert_eq!(auto.status(), SaveStatus::Error);
        sleep(ms(2)).await;
        assert_eq!(auto.status(), SaveStatus::Idle);
    }

    #[tokio::test]
    async fn entry_saver_creates_then_updates() {
        use wiremock::matchers::{body_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let entry = serde_json::json!({
            "id": 42,
            "user_id": 1,
            "content": "first",
            "created_at": "2024-03-01T09:00:00Z",
            "updated_at": "2024-03-01T09:00:00Z"
        });
        Mock::given(method("POST"))
            .and(path("/api/entries/"))
            .and(body_json(serde_json::json!({"content": "first"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(entry.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/entries/42"))
            .and(body_json(serde_json::json!({"content": "second", "mood": "okay"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(entry))
            .expect(1)
            .mount(&server)
            .await;

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = Arc::new(ApiClient::with_client(server.uri(), http));
        let saver = EntryDraftSaver::new(client);

        saver.save_draft(&Draft::new("first")).await.unwrap();
        assert_eq!(saver.entry_id().await, Some(42));
        saver
            .save_draft(&Draft::new("second").with_mood("okay"))
            .await
            .unwrap();
    }

    #[cfg(feature = "stress")]
    #[tokio::test(start_paused = true)]
    async fn keystroke_flood_collapses_to_one_save() {
        let saver = Arc::new(FakeSaver::default());
        let auto = AutoSaver::spawn(&AutoSaveConfig::default(), saver.clone());

        let mut text = String::new();
        for i in 0..10_000 {
            text.push(char::from(b'a' + (i % 26) as u8));
            auto.edit(Draft::new(text.clone()));
            sleep(ms(1)).await;
        }
        sleep(ms(2001)).await;
        assert_eq!(saver.contents().len(), 1);
        assert_eq!(saver.contents()[0].len(), 10_000);
    }
}
