//! Blog feed presentation state with a request generation guard.
//!
//! Every refresh takes a new generation. A response is applied only if its
//! generation is still the latest, so a slow, superseded fetch can never
//! overwrite the list of a newer one.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::blog::{BlogError, BlogListing};
use crate::domain::BlogPost;

/// What the blog page shows. Exactly one at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FeedState {
    Loading,
    Error { message: String },
    Loaded { posts: Vec<BlogPost> },
}

impl From<Result<Vec<BlogPost>, BlogError>> for FeedState {
    fn from(result: Result<Vec<BlogPost>, BlogError>) -> Self {
        match result {
            Ok(posts) => FeedState::Loaded { posts },
            Err(e) => FeedState::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTicket {
    generation: u64,
    pub is_admin: bool,
}

pub struct BlogFeed {
    generation: AtomicU64,
    state: Mutex<FeedState>,
}

impl Default for BlogFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogFeed {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            state: Mutex::new(FeedState::Loading),
        }
    }

    pub fn state(&self) -> FeedState {
        self.lock().clone()
    }

    /// Start a fetch for a viewing context. Supersedes every earlier ticket.
    pub fn begin(&self, is_admin: bool) -> FeedTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock() = FeedState::Loading;
        FeedTicket {
            generation,
            is_admin,
        }
    }

    /// Apply a fetch result. Returns `false` when the ticket is stale and
    /// the result was dropped.
    pub fn settle(&self, ticket: FeedTicket, result: Result<Vec<BlogPost>, BlogError>) -> bool {
        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != ticket.generation {
            tracing::debug!(
                generation = ticket.generation,
                "Dropping superseded blog feed response"
            );
            return false;
        }
        *state = FeedState::from(result);
        true
    }

    /// Fetch for the given viewing context and apply it if still current.
    pub async fn refresh(&self, listing: &BlogListing, is_admin: bool) -> bool {
        let ticket = self.begin(is_admin);
        let result = listing.fetch(ticket.is_admin).await;
        self.settle(ticket, result)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
