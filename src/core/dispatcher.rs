//! Mutating commands: add, replay, play/pause/skip/seek
//!
//! Nothing here mutates local state. Every command that reached the server is
//! followed by a fresh snapshot, whatever the server answered. Failures are
//! alerted on the surface and reported as a [`DispatchOutcome`], never as `Err`.

use crate::core::refresh::Refresher;
use crate::core::surface::Controls;
use crate::error::JukeboxError;
use crate::types::{AddRequest, Command, DispatchOutcome};
use std::sync::Arc;
use tracing::{debug, info, warn};

const UNKNOWN_REASON: &str = "unknown";

pub struct Dispatcher {
    refresher: Arc<Refresher>,
    controls: Arc<dyn Controls>,
}

impl Dispatcher {
    pub fn new(refresher: Arc<Refresher>, controls: Arc<dyn Controls>) -> Self {
        Self {
            refresher,
            controls,
        }
    }

    pub fn refresher(&self) -> &Arc<Refresher> {
        &self.refresher
    }

    /// `POST` a playback command, then refresh
    pub async fn dispatch(&self, command: Command) -> DispatchOutcome {
        let endpoint = command.endpoint();
        debug!(endpoint, ?command, "dispatching");

        match self.refresher.client().send(&command).await {
            Ok(_) => {
                self.refresher.refresh().await;
                DispatchOutcome::Applied
            }
            Err(e) => self.transport_failure(endpoint, e.to_string()),
        }
    }

    /// Queue a search; whitespace-only queries are dropped without a call
    pub async fn add(&self, query: &str, play_next: bool) -> DispatchOutcome {
        if query.trim().is_empty() {
            return DispatchOutcome::Ignored;
        }

        let request = self.build_add(query, play_next);
        info!(q = %request.q, play_next, by = %request.by, "adding");

        match self.refresher.client().add(&request).await {
            Ok(response) if response.ok => {
                self.refresher.refresh().await;
                DispatchOutcome::Applied
            }
            Ok(response) => {
                let reason = response
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| UNKNOWN_REASON.to_string());
                let rejected = JukeboxError::Rejected(reason.clone());
                warn!(code = ?rejected.code(), "Add rejected: {}", rejected);
                self.refresher
                    .surface()
                    .alert(&format!("Error: {}", rejected));
                // Other clients may have changed things even if ours failed
                self.refresher.refresh().await;
                DispatchOutcome::Rejected(reason)
            }
            Err(e) => self.transport_failure("/add", e.to_string()),
        }
    }

    /// Re-search a history entry by its title and uploader
    ///
    /// Looks the id up in a freshly fetched snapshot, not the one on screen.
    /// An id that is no longer in history is ignored silently.
    pub async fn replay(&self, history_id: &str) -> DispatchOutcome {
        let snapshot = match self.refresher.client().fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(history_id, "Replay lookup failed: {}", e);
                return DispatchOutcome::Failed(e.to_string());
            }
        };

        let Some(entry) = snapshot.history.iter().find(|item| item.id == history_id) else {
            debug!(history_id, "replay target no longer in history");
            return DispatchOutcome::Ignored;
        };

        let query = format!("{} {}", entry.title, entry.uploader);
        self.add(&query, false).await
    }

    /// Build the `/add` body from the query and the current control state
    pub fn build_add(&self, query: &str, play_next: bool) -> AddRequest {
        AddRequest {
            q: query.to_string(),
            play_next,
            allow_age_restricted: self.controls.allow_age_restricted(),
            by: self.controls.identity().tag(),
        }
    }

    fn transport_failure(&self, endpoint: &str, message: String) -> DispatchOutcome {
        warn!(endpoint, "Dispatch failed: {}", message);
        self.refresher
            .surface()
            .alert(&format!("Error: {}", message));
        DispatchOutcome::Failed(message)
    }
}
