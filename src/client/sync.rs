//! Listing state owned by an interactive front end.
//!
//! `ListingSync` holds the five filter fields plus the page number, decides
//! when a query must go out and which responses may be rendered. It performs
//! no I/O: every state change that needs a query hands back an [`Outgoing`],
//! and the caller feeds the result in through [`ListingSync::on_response`]
//! with the same sequence number.

use crate::client::debounce::Debouncer;
use crate::client::mutations::{Mutation, MutationQueue, PendingMutation};
use crate::core::listing::ListingResponse;
use crate::core::pagination::{PageEnvelope, page_url};
use crate::core::query::{QueryRequest, SortField, SortOrder, StatusFilter, clamp_per_page};
use crate::errors::AppError;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing,
    Requesting,
}

/// A query the caller must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub seq: u64,
    pub request: QueryRequest,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    Failed,
    /// A newer request was issued after this one; nothing changed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationFailure {
    NotFound,
    Validation(String),
    /// The store could not be reached; retrying may succeed.
    Transient(String),
    Rejected(String),
}

impl From<&AppError> for MutationFailure {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::NotFound(_) => MutationFailure::NotFound,
            AppError::Validation(errors) => MutationFailure::Validation(errors.to_string()),
            other if other.is_transient() => MutationFailure::Transient(other.to_string()),
            other => MutationFailure::Rejected(other.to_string()),
        }
    }
}

/// What to do after a mutation finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Next queued mutation for the same entry, now released.
    pub next: Option<PendingMutation>,
    /// Query that reloads the current page.
    pub refresh: Outgoing,
}

#[derive(Debug)]
pub struct ListingSync {
    request: QueryRequest,
    /// Search box contents as typed; `request.search` is the trimmed form.
    search_input: String,
    path: String,
    default_per_page: u32,
    debouncer: Debouncer,
    phase: Phase,
    last_seq: u64,
    envelope: Option<PageEnvelope>,
    last_error: Option<String>,
    notices: Vec<Notice>,
    mutations: MutationQueue,
}

impl ListingSync {
    pub fn new(path: &str, default_per_page: u32, debounce: Duration) -> Self {
        let default_per_page = clamp_per_page(None, default_per_page);
        Self {
            request: QueryRequest {
                per_page: default_per_page,
                ..QueryRequest::default()
            },
            search_input: String::new(),
            path: path.to_string(),
            default_per_page,
            debouncer: Debouncer::new(debounce),
            phase: Phase::Idle,
            last_seq: 0,
            envelope: None,
            last_error: None,
            notices: Vec::new(),
            mutations: MutationQueue::new(),
        }
    }

    /// Start from an existing URL (deep link or restored session).
    pub fn from_url(path: &str, url: &str, default_per_page: u32, debounce: Duration) -> Self {
        let mut sync = Self::new(path, default_per_page, debounce);
        sync.request = QueryRequest::from_url(url, sync.default_per_page);
        sync.search_input = sync.request.search.clone();
        sync
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    /// Text to show in the search box. Keeps surrounding whitespace the user
    /// typed, which the query itself drops.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Last page the server returned. Survives failed requests.
    pub fn envelope(&self) -> Option<&PageEnvelope> {
        self.envelope.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn current_url(&self) -> String {
        page_url(&self.path, &self.request, self.request.page)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Time until the pending search fires, if any.
    pub fn debounce_remaining(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    /// Record search text. The query goes out from [`ListingSync::poll`]
    /// once the input has been quiet for the debounce interval.
    pub fn set_search(&mut self, text: &str, now: Instant) {
        self.search_input = text.to_string();
        self.request.search = text.trim().to_string();
        self.request.page = 1;
        self.debouncer.reset(now);
        self.phase = Phase::Debouncing;
    }

    pub fn poll(&mut self, now: Instant) -> Option<Outgoing> {
        if self.debouncer.fire(now) {
            Some(self.issue())
        } else {
            None
        }
    }

    pub fn set_status(&mut self, raw: &str) -> Outgoing {
        self.request.status = StatusFilter::parse(raw);
        self.request.page = 1;
        self.issue()
    }

    pub fn set_per_page(&mut self, per_page: u32) -> Outgoing {
        self.request.per_page = clamp_per_page(Some(&per_page.to_string()), self.default_per_page);
        self.request.page = 1;
        self.issue()
    }

    pub fn set_page(&mut self, page: u32) -> Outgoing {
        self.request.page = page.max(1);
        self.issue()
    }

    /// Same field flips the order, another field starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) -> Outgoing {
        if self.request.sort_field == field {
            self.request.sort_order = self.request.sort_order.toggled();
        } else {
            self.request.sort_field = field;
            self.request.sort_order = SortOrder::Asc;
        }
        self.issue()
    }

    /// Navigate to a link taken from the current envelope.
    pub fn follow_link(&mut self, url: &str) -> Outgoing {
        self.request = QueryRequest::from_url(url, self.default_per_page);
        self.adopt_search();
        self.issue()
    }

    pub fn refresh(&mut self) -> Outgoing {
        self.issue()
    }

    /// Replace the typed text only when it no longer matches the query.
    fn adopt_search(&mut self) {
        if self.search_input.trim() != self.request.search {
            self.search_input = self.request.search.clone();
        }
    }

    fn issue(&mut self) -> Outgoing {
        // The immediate query already carries the typed search text.
        self.debouncer.cancel();
        self.last_seq += 1;
        self.phase = Phase::Requesting;
        Outgoing {
            seq: self.last_seq,
            request: self.request.clone(),
            url: self.current_url(),
        }
    }

    pub fn on_response(&mut self, seq: u64, result: Result<ListingResponse, String>) -> ResponseOutcome {
        if seq < self.last_seq {
            tracing::debug!(seq, latest = self.last_seq, "discarding stale listing response");
            return ResponseOutcome::Stale;
        }

        self.phase = if self.debouncer.is_pending() {
            Phase::Debouncing
        } else {
            Phase::Idle
        };

        match result {
            Ok(response) => {
                // Newer typed search text stays until its own query lands.
                if !self.debouncer.is_pending() {
                    let meta = response.entries.meta;
                    self.request.page = meta.current_page;
                    self.request.per_page = meta.per_page;
                    self.request.sort_field = response.filters.sort_field;
                    self.request.sort_order = response.filters.sort_order;
                    self.request.status = StatusFilter::parse(&response.filters.status);
                    self.request.search = response.filters.search;
                    self.adopt_search();
                }
                self.envelope = Some(response.entries);
                self.last_error = None;
                ResponseOutcome::Applied
            }
            Err(message) => {
                self.notices.push(Notice::Error(format!("Could not load entries: {message}")));
                self.last_error = Some(message);
                ResponseOutcome::Failed
            }
        }
    }

    /// Queue a mutation for entry `id`. Returns it when it may be sent now.
    pub fn submit_mutation(&mut self, id: i64, mutation: Mutation) -> Option<PendingMutation> {
        self.mutations.enqueue(id, mutation)
    }

    pub fn mutation_busy(&self, id: i64) -> bool {
        self.mutations.is_busy(id)
    }

    /// Report the result of the in-flight mutation for `id`.
    pub fn on_mutation_result(&mut self, id: i64, result: Result<String, MutationFailure>) -> MutationOutcome {
        match result {
            Ok(message) => self.notices.push(Notice::Success(message)),
            Err(MutationFailure::NotFound) => self
                .notices
                .push(Notice::Error(format!("Entry #{id} no longer exists"))),
            Err(MutationFailure::Validation(message)) => self
                .notices
                .push(Notice::Error(format!("Entry #{id} was not saved: {message}"))),
            Err(MutationFailure::Transient(message)) => self
                .notices
                .push(Notice::Error(format!("Entry #{id} was not saved, try again: {message}"))),
            Err(MutationFailure::Rejected(message)) => self
                .notices
                .push(Notice::Error(format!("Entry #{id}: {message}"))),
        }

        let next = self.mutations.complete(id);
        MutationOutcome {
            next,
            refresh: self.issue(),
        }
    }
}
