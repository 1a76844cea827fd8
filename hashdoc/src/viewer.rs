//! Documentation viewer state
//!
//! Each navigation bumps a generation counter and hands out a ticket. A
//! fetch result is only applied when its ticket is still current, so a slow
//! response for a page the reader already left can never overwrite the page
//! they navigated to afterwards.

use std::sync::Arc;
use std::thread::JoinHandle;

use crate::fetch::{DocumentSource, FetchError};
use crate::render_model::{render_fetched, RenderOptions, RenderedPage};

/// What the viewer is currently showing
#[derive(Debug, Clone)]
pub enum ViewState {
    /// Nothing opened yet, or the viewer was closed
    Idle,
    /// A fetch is in flight
    Loading {
        /// Section being loaded
        section_id: String,
    },
    /// A page (or its fallback block) is displayed
    Ready {
        /// Section shown
        section_id: String,
        /// Rendered page
        page: RenderedPage,
    },
}

/// Proof of a navigation; results are accepted only for the latest one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTicket {
    generation: u64,
    section_id: String,
}

impl NavigationTicket {
    /// Section this navigation targets
    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    /// Generation number of this navigation
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A fetch running on a background thread
pub struct PendingFetch {
    ticket: NavigationTicket,
    handle: JoinHandle<Result<String, FetchError>>,
}

impl PendingFetch {
    /// Ticket of the navigation that started this fetch
    pub fn ticket(&self) -> &NavigationTicket {
        &self.ticket
    }
}

/// Owns the page state of one documentation view
pub struct DocViewer {
    generation: u64,
    state: ViewState,
    options: RenderOptions,
}

impl DocViewer {
    /// Create an idle viewer
    pub fn new(options: RenderOptions) -> Self {
        Self {
            generation: 0,
            state: ViewState::Idle,
            options,
        }
    }

    /// Current state
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Page currently displayed, if any
    pub fn current_page(&self) -> Option<&RenderedPage> {
        match &self.state {
            ViewState::Ready { page, .. } => Some(page),
            _ => None,
        }
    }

    /// Start navigating to a section
    ///
    /// Any navigation still in flight is superseded.
    pub fn begin_navigation(&mut self, section_id: &str) -> NavigationTicket {
        self.generation += 1;
        self.state = ViewState::Loading {
            section_id: section_id.to_string(),
        };

        log::debug!(
            "Navigation {} to '{}' started",
            self.generation,
            section_id
        );

        NavigationTicket {
            generation: self.generation,
            section_id: section_id.to_string(),
        }
    }

    /// Whether a ticket belongs to the latest navigation
    pub fn is_current(&self, ticket: &NavigationTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a fetch result
    ///
    /// # Returns
    /// * `true` - The result was rendered and is now displayed
    /// * `false` - The ticket is stale and the result was discarded
    pub fn complete(
        &mut self,
        ticket: NavigationTicket,
        result: Result<String, FetchError>,
    ) -> bool {
        if !self.is_current(&ticket) {
            log::debug!(
                "Discarding stale result for '{}' (navigation {}, current {})",
                ticket.section_id,
                ticket.generation,
                self.generation
            );
            return false;
        }

        let page = render_fetched(result, &self.options);
        self.state = ViewState::Ready {
            section_id: ticket.section_id,
            page,
        };
        true
    }

    /// Navigate and fetch synchronously
    pub fn open<S: DocumentSource + ?Sized>(
        &mut self,
        source: &S,
        section_id: &str,
    ) -> &ViewState {
        let ticket = self.begin_navigation(section_id);
        let result = source.fetch(section_id);
        self.complete(ticket, result);
        &self.state
    }

    /// Navigate and fetch on a background thread
    ///
    /// Call [`DocViewer::finish`] with the returned handle to apply the result.
    pub fn spawn_fetch<S>(&mut self, source: Arc<S>, section_id: &str) -> PendingFetch
    where
        S: DocumentSource + Send + Sync + 'static,
    {
        let ticket = self.begin_navigation(section_id);
        let id = section_id.to_string();
        let handle = std::thread::spawn(move || source.fetch(&id));

        PendingFetch { ticket, handle }
    }

    /// Wait for a background fetch and apply it if still current
    pub fn finish(&mut self, pending: PendingFetch) -> bool {
        let PendingFetch { ticket, handle } = pending;

        let result = handle.join().unwrap_or_else(|_| {
            Err(FetchError::Network {
                url: ticket.section_id.clone(),
                message: "fetch thread panicked".to_string(),
            })
        });

        self.complete(ticket, result)
    }

    /// Tear the view down; in-flight fetches are discarded when they land
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = ViewState::Idle;
    }
}

impl Default for DocViewer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
