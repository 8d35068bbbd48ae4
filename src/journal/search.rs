//! Entry search: debounced free-text queries, immediate filter changes.
//!
//! Results are published through a `watch` channel. Every fetch carries a
//! sequence number and only the most recently requested one may publish, so a
//! slow response never overwrites a newer one.

use super::filter::{EntryFilter, Mood};
use crate::api::{ApiClient, ApiError, EntryQuery, JournalEntry};
use crate::config::SearchConfig;
use crate::timing::Debouncer;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn fetch_entries(&self, query: &EntryQuery) -> Result<Vec<JournalEntry>, ApiError>;
}

#[async_trait]
impl EntrySource for ApiClient {
    async fn fetch_entries(&self, query: &EntryQuery) -> Result<Vec<JournalEntry>, ApiError> {
        self.list_entries(query).await
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// The filter these entries were fetched for.
    pub filter: EntryFilter,
    pub entries: Vec<JournalEntry>,
    /// A full page came back, so there may be another.
    pub has_more: bool,
}

impl SearchResults {
    /// Placeholder text when there is nothing to list.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.entries
            .is_empty()
            .then(|| self.filter.empty_message())
    }
}

#[derive(Clone)]
struct Fetcher {
    source: Arc<dyn EntrySource>,
    page_size: u32,
    latest: Arc<AtomicU64>,
    results: Arc<watch::Sender<SearchResults>>,
}

impl Fetcher {
    fn next_seq(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn run(self, filter: EntryFilter, seq: u64) {
        let query = filter.to_query(self.page_size);
        let entries = match self.source.fetch_entries(&query).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("[Search] Failed to fetch entries: {}", e);
                Vec::new()
            }
        };

        if self.latest.load(Ordering::SeqCst) != seq {
            tracing::debug!("[Search] Dropping stale results #{}", seq);
            return;
        }
        let has_more = entries.len() as u32 >= self.page_size;
        self.results.send_replace(SearchResults {
            filter,
            entries,
            has_more,
        });
    }
}

pub struct EntrySearch {
    filter: EntryFilter,
    debouncer: Debouncer,
    fetcher: Fetcher,
}

impl EntrySearch {
    pub fn new(source: Arc<dyn EntrySource>, config: &SearchConfig) -> Self {
        let (tx, _) = watch::channel(SearchResults::default());
        Self {
            filter: EntryFilter::default(),
            debouncer: Debouncer::new(config.debounce()),
            fetcher: Fetcher {
                source,
                page_size: config.page_size.max(1),
                latest: Arc::new(AtomicU64::new(0)),
                results: Arc::new(tx),
            },
        }
    }

    pub fn filter(&self) -> &EntryFilter {
        &self.filter
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.fetcher.results.subscribe()
    }

    pub fn results(&self) -> SearchResults {
        self.fetcher.results.borrow().clone()
    }

    /// Typing in the search box. A non-empty query waits for a pause and then
    /// loads its first page; clearing the box reloads at once.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        if self.filter.search_term().is_some() {
            self.filter.page = 1;
            let fetcher = self.fetcher.clone();
            let filter = self.filter.clone();
            let seq = fetcher.next_seq();
            self.debouncer.schedule(move || fetcher.run(filter, seq));
        } else {
            self.refresh();
        }
    }

    pub fn set_mood(&mut self, mood: Option<Mood>) {
        self.filter.mood = mood;
        self.filter.page = 1;
        self.refresh();
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.filter.date = date;
        self.filter.page = 1;
        self.refresh();
    }

    pub fn set_page(&mut self, page: u32) {
        self.filter.page = page.max(1);
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.filter.clear();
        self.refresh();
    }

    /// Fetch the current filter now, dropping any pending debounced query.
    pub fn refresh(&self) {
        self.debouncer.cancel();
        let seq = self.fetcher.next_seq();
        tokio::spawn(self.fetcher.clone().run(self.filter.clone(), seq));
    }
}
