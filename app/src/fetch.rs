use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::tmdb::NetworkError;

/// Lifecycle of one page's remote data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum FetchState<T> {
    Idle,
    Loading,
    Error(String),
    Ready(T),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Proof that a navigation was started. Only the ticket of the latest
/// navigation may settle the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Owns the [`FetchState`] of one page and the generation counter that
/// decides which response is allowed to land.
///
/// Every navigation bumps the generation and resets the state to
/// `Loading`. A response is applied only while its ticket is still the
/// current generation; superseded requests run to completion and their
/// result is dropped. Generation checks and state writes both happen under
/// the watch channel's lock.
///
/// The discard rule only matters to a caller that reuses one controller
/// across navigations; a controller built per request sees one ticket.
pub struct FetchController<T> {
    state: watch::Sender<FetchState<T>>,
    generation: AtomicU64,
}

impl<T: Clone> FetchController<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(FetchState::Idle);

        Self {
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// For callers that keep one controller across navigations and redraw on
    /// every transition. Request handlers build a controller per request and
    /// only read the settled state.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    pub fn begin(&self) -> Ticket {
        let mut ticket = Ticket(0);
        self.state.send_modify(|state| {
            ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
            *state = FetchState::Loading;
        });
        ticket
    }

    /// Settles the navigation behind `ticket`. Failures are logged and
    /// replaced by `message`. Returns false if the ticket was stale.
    pub fn resolve(&self, ticket: Ticket, result: Result<T, NetworkError>, message: &str) -> bool {
        let next = match result {
            Ok(payload) => FetchState::Ready(payload),
            Err(err) => {
                error!("{}: {}", message, err);
                FetchState::Error(message.to_string())
            }
        };
        self.apply(ticket, next)
    }

    /// Settles without a network round trip.
    pub fn settle(&self, ticket: Ticket, payload: T) -> bool {
        self.apply(ticket, FetchState::Ready(payload))
    }

    fn apply(&self, ticket: Ticket, next: FetchState<T>) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != ticket.0 {
                return false;
            }
            *state = next;
            true
        });
        if !applied {
            debug!("Discarding stale response for generation {}", ticket.0);
        }
        applied
    }

    /// Begins a navigation, drives `load` to completion and resolves it.
    /// Returns the controller's state afterwards, which belongs to a newer
    /// navigation if this one was superseded meanwhile.
    pub async fn navigate<F>(&self, message: &str, load: F) -> FetchState<T>
    where
        F: Future<Output = Result<T, NetworkError>>,
    {
        let ticket = self.begin();
        let result = load.await;
        self.resolve(ticket, result, message);
        self.state()
    }
}

impl<T: Clone> Default for FetchController<T> {
    fn default() -> Self {
        Self::new()
    }
}
