pub mod client;
pub mod interface;

pub use client::ApiClient;
pub use interface::{
    ApiError, EmotionHistory, EmotionSuggestion, EntryQuery, EntryUpdate, JournalEntry, NewEntry,
    Stats, SubmitReceipt, TokenResponse, User,
};
