pub mod debounce;

pub use debounce::{Canceller, Debouncer};
