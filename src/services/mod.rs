pub mod fetch_service;
pub mod note_service;
pub mod extraction_service;

pub use fetch_service::{HttpFetcher, PageFetcher};
pub use note_service::{ActiveDocument, ConsoleNotifier, FileSink, NoteSink, Notifier, StdoutSink};
pub use extraction_service::{
    Delivery, ExtractionService, FailureKind, PipelineOutcome, PipelineState, TriggerContext,
};
