//! Fetch-and-render cycle with stale response discard

use crate::core::client::RemoteClient;
use crate::core::render::render;
use crate::core::surface::Surface;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Orders overlapping fetches by when they were issued
///
/// Tickets are handed out in send order. A response may only be shown if no
/// later-issued fetch has been shown already.
#[derive(Debug, Default)]
pub struct TicketGate {
    issued: AtomicU64,
    rendered: AtomicU64,
}

impl TicketGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a fetch about to be sent; first ticket is 1
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the display for `ticket`; false if a newer one got there first
    pub fn commit(&self, ticket: u64) -> bool {
        self.rendered.fetch_max(ticket, Ordering::SeqCst) < ticket
    }

    pub fn last_rendered(&self) -> u64 {
        self.rendered.load(Ordering::SeqCst)
    }
}

/// Fetches a snapshot and hands its rendering to the surface
pub struct Refresher {
    client: RemoteClient,
    surface: Arc<dyn Surface>,
    gate: TicketGate,
}

impl Refresher {
    pub fn new(client: RemoteClient, surface: Arc<dyn Surface>) -> Self {
        Self {
            client,
            surface,
            gate: TicketGate::new(),
        }
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn surface(&self) -> &Arc<dyn Surface> {
        &self.surface
    }

    /// One fetch + render. Returns whether something was rendered.
    ///
    /// A failed fetch is logged and leaves the previous render on screen.
    pub async fn refresh(&self) -> bool {
        let ticket = self.gate.issue();

        let snapshot = match self.client.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(ticket, "Refresh failed: {}", e);
                return false;
            }
        };

        let regions = render(&snapshot);
        if !self.gate.commit(ticket) {
            debug!(
                ticket,
                newer = self.gate.last_rendered(),
                "discarding stale snapshot"
            );
            return false;
        }

        debug!(
            ticket,
            queue = snapshot.queue.len(),
            history = snapshot.history.len(),
            playing = snapshot.now.is_some(),
            "rendered snapshot"
        );
        self.surface.render(&regions);
        true
    }
}
