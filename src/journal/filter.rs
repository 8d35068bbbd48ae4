//! Entry list filtering and pagination.

use crate::api::EntryQuery;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EMPTY_FILTERED: &str = "No entries found matching your filters.";
pub const EMPTY_JOURNAL: &str = "No entries yet. Start writing your first entry!";

/// Pages with more buttons than this collapse into an ellipsis window.
const FULL_PAGINATION_MAX: u32 = 7;

/// Overall mood tag stored on an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Amazing,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Amazing,
        Mood::Good,
        Mood::Okay,
        Mood::Bad,
        Mood::Terrible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Amazing => "amazing",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Bad => "bad",
            Mood::Terrible => "terrible",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Amazing => "😊",
            Mood::Good => "🙂",
            Mood::Okay => "😐",
            Mood::Bad => "😕",
            Mood::Terrible => "😢",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFilter {
    pub query: String,
    pub mood: Option<Mood>,
    pub date: Option<NaiveDate>,
    /// 1-based.
    pub page: u32,
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            mood: None,
            date: None,
            page: 1,
        }
    }
}

impl EntryFilter {
    /// The query string, if it holds anything but whitespace.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.query.trim();
        (!term.is_empty()).then_some(term)
    }

    /// Number shown on the filter toggle: mood and date only.
    pub fn active_filter_count(&self) -> usize {
        usize::from(self.mood.is_some()) + usize::from(self.date.is_some())
    }

    pub fn is_filtering(&self) -> bool {
        self.search_term().is_some() || self.active_filter_count() > 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn empty_message(&self) -> &'static str {
        if self.is_filtering() {
            EMPTY_FILTERED
        } else {
            EMPTY_JOURNAL
        }
    }

    /// A date filter matches that one day.
    pub fn to_query(&self, page_size: u32) -> EntryQuery {
        EntryQuery {
            skip: Some(self.page.max(1).saturating_sub(1).saturating_mul(page_size)),
            limit: Some(page_size),
            search: self.search_term().map(str::to_string),
            mood: self.mood.map(|m| m.as_str().to_string()),
            start_date: self.date,
            end_date: self.date,
        }
    }
}

// ── Pagination ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Page buttons for `current` of `total`: all of them up to seven pages,
/// otherwise the first, the last and the neighbours of `current`, with an
/// ellipsis over each gap.
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    let shown: Vec<u32> = (1..=total)
        .filter(|&p| {
            total <= FULL_PAGINATION_MAX || p == 1 || p == total || p.abs_diff(current) <= 1
        })
        .collect();

    let mut items = Vec::with_capacity(shown.len() * 2);
    for (i, &p) in shown.iter().enumerate() {
        if i > 0 && shown[i - 1] != p - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(p));
    }
    items
}
