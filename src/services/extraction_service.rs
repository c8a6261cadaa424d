use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::config::Settings;
use crate::document::HtmlDocument;
use crate::domain::{RenderedNote, ServiceKind};
use crate::errors::{PodNoteError, PodNoteResult};
use crate::services::fetch_service::PageFetcher;
use crate::services::note_service::{NoteSink, Notifier, NOTE_EXTENSION};
use crate::sources::SourceRegistry;
use crate::template;

pub const LOADING_NOTICE: &str = "Loading Podcast Info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnsupportedService,
    NetworkError,
    MalformedDocument,
    Delivery,
}

impl FailureKind {
    fn from_error(err: &PodNoteError) -> Self {
        match err {
            PodNoteError::UnsupportedService(_) => FailureKind::UnsupportedService,
            PodNoteError::Network(_) | PodNoteError::InvalidUrl(_) => FailureKind::NetworkError,
            PodNoteError::MalformedDocument(_) => FailureKind::MalformedDocument,
            _ => FailureKind::Delivery,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Resolving,
    Fetching,
    Parsing,
    Extracting,
    Rendering,
    Delivered,
    Failed(FailureKind),
}

/// Where the note went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    AtCursor,
    NewNote { path: String },
}

/// Terminal result of one run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub state: PipelineState,
    pub service: Option<ServiceKind>,
    pub note: Option<RenderedNote>,
    pub delivery: Option<Delivery>,
}

impl PipelineOutcome {
    pub fn is_delivered(&self) -> bool {
        self.state == PipelineState::Delivered
    }
}

/// Liveness of whatever started a run. Clones share the flag, so the
/// trigger can be dismissed while the run is still pending.
#[derive(Debug, Clone)]
pub struct TriggerContext {
    alive: Arc<AtomicBool>,
}

impl TriggerContext {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn dismiss(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

impl Default for TriggerContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Fully rendered output, kept in memory until delivery.
struct PreparedNote {
    note: RenderedNote,
    note_path: Option<String>,
}

pub struct ExtractionService<F: PageFetcher, S: NoteSink, N: Notifier> {
    source_registry: SourceRegistry,
    fetcher: F,
    sink: S,
    notifier: N,
    clock: Box<dyn Fn() -> NaiveDateTime>,
    state: Cell<PipelineState>,
    running: Cell<bool>,
}

impl<F: PageFetcher, S: NoteSink, N: Notifier> ExtractionService<F, S, N> {
    pub fn new(source_registry: SourceRegistry, fetcher: F, sink: S, notifier: N) -> Self {
        Self {
            source_registry,
            fetcher,
            sink,
            notifier,
            clock: Box::new(|| Local::now().naive_local()),
            state: Cell::new(PipelineState::Idle),
            running: Cell::new(false),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state.get()
    }

    fn transition(&self, next: PipelineState) {
        tracing::debug!(from = ?self.state.get(), to = ?next, "pipeline transition");
        self.state.set(next);
    }

    /// Run the whole pipeline for one URL.
    ///
    /// Failures end the run in `Failed` with one notice to the user; they are
    /// not returned as errors. Only a nested run is rejected with `Err`.
    /// A successful resolution records the matched service in `settings`;
    /// persisting it is up to the caller.
    pub fn run(
        &self,
        url: &str,
        settings: &mut Settings,
        trigger: &TriggerContext,
    ) -> PodNoteResult<PipelineOutcome> {
        if self.running.replace(true) {
            return Err(PodNoteError::InvalidInput(
                "An extraction is already in progress".to_string(),
            ));
        }

        let mut service = None;
        let result = self
            .prepare(url, settings, trigger, &mut service)
            .and_then(|prepared| self.deliver(prepared, settings.at_cursor));

        let outcome = match result {
            Ok((note, delivery)) => {
                self.transition(PipelineState::Delivered);
                PipelineOutcome {
                    state: PipelineState::Delivered,
                    service,
                    note: Some(note),
                    delivery: Some(delivery),
                }
            }
            Err(err) => {
                let kind = FailureKind::from_error(&err);
                tracing::warn!(error = %err, ?kind, url, "podcast note run failed");
                self.transition(PipelineState::Failed(kind));
                self.notify_error(trigger, &err.user_message());
                PipelineOutcome {
                    state: PipelineState::Failed(kind),
                    service,
                    note: None,
                    delivery: None,
                }
            }
        };

        self.transition(PipelineState::Idle);
        self.running.set(false);
        Ok(outcome)
    }

    fn prepare(
        &self,
        url: &str,
        settings: &mut Settings,
        trigger: &TriggerContext,
        service: &mut Option<ServiceKind>,
    ) -> PodNoteResult<PreparedNote> {
        self.transition(PipelineState::Resolving);
        let request = self.source_registry.resolve(url)?;
        settings.service = request.service;
        *service = Some(request.service);

        self.transition(PipelineState::Fetching);
        self.notify_progress(trigger, LOADING_NOTICE);
        let body = self.fetcher.fetch_body(&request.host, &request.path)?;

        self.transition(PipelineState::Parsing);
        let document = HtmlDocument::parse(&body);

        self.transition(PipelineState::Extracting);
        let metadata =
            self.source_registry
                .extract(&document, request.service, url, (self.clock)())?;

        self.transition(PipelineState::Rendering);
        let text = template::render(&settings.template, &metadata, url);
        let note_path = if settings.at_cursor {
            None
        } else {
            let file_name = template::render_file_name(
                &settings.file_name,
                &metadata.title,
                &metadata.retrieved_at,
            );
            Some(format!("{}{}{}", settings.folder, file_name, NOTE_EXTENSION))
        };

        Ok(PreparedNote {
            note: RenderedNote::new(text, metadata.title),
            note_path,
        })
    }

    fn deliver(
        &self,
        prepared: PreparedNote,
        at_cursor: bool,
    ) -> PodNoteResult<(RenderedNote, Delivery)> {
        let PreparedNote { note, note_path } = prepared;

        let delivery = match (at_cursor, note_path) {
            (false, Some(path)) => {
                self.sink.create_note(&path, &note.text)?;
                Delivery::NewNote { path }
            }
            _ => {
                self.sink.insert_at_cursor(&note.text)?;
                Delivery::AtCursor
            }
        };

        Ok((note, delivery))
    }

    fn notify_progress(&self, trigger: &TriggerContext, message: &str) {
        if trigger.is_alive() {
            self.notifier.progress(message);
        } else {
            tracing::debug!(notice = message, "trigger dismissed, progress notice dropped");
        }
    }

    fn notify_error(&self, trigger: &TriggerContext, message: &str) {
        if trigger.is_alive() {
            self.notifier.error(message);
        } else {
            tracing::info!(notice = message, "trigger dismissed, error notice dropped");
        }
    }
}
