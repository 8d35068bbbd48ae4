//! Entry-level workflows built on the API client: composing an entry's
//! emotions, auto-saving its text, suggesting prompts and browsing the journal.

pub mod autosave;
pub mod compose;
pub mod filter;
pub mod prompts;
pub mod search;

pub use autosave::{AutoSaveMachine, AutoSaver, Draft, DraftSaver, EntryDraftSaver, SaveStatus};
pub use compose::{ComposeError, CompositionSession};
pub use filter::{page_items, EntryFilter, Mood, PageItem};
pub use prompts::{prompts_for_mood, random_prompts, Prompt, PromptCategory};
pub use search::{EntrySearch, EntrySource, SearchResults};
