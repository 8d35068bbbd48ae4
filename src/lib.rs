//! Emotion tracking core of the Reflect journaling app: the emotion
//! selectors and their session store, the REST client that submits what was
//! recorded, and the entry workflows around it (auto-save, search).

pub mod api;
pub mod config;
pub mod emotions;
pub mod journal;
pub mod timing;

use tracing_subscriber::{fmt, EnvFilter};

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
