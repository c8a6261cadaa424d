use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use podnote::config::Settings;
use podnote::errors::PodNoteResult;
use podnote::services::{
    ActiveDocument, Delivery, ExtractionService, FailureKind, FileSink, Notifier, PageFetcher,
    PipelineState, TriggerContext,
};
use podnote::sources::SourceRegistry;

const APPLE_URL: &str = "https://podcasts.apple.com/us/podcast/the-show/id42?i=1000600";

const APPLE_PAGE: &str = r#"<!DOCTYPE html>
<html><head>
  <meta property="og:title" content="Episode 12: On Rust">
  <meta property="og:description" content="Short summary">
</head><body>
  <section class="product-hero-desc__section">
    <div class="we-truncate"><p>We talk about <b>ownership</b>.</p></div>
  </section>
  <picture class="we-artwork">
    <source class="we-artwork__source" srcset="https://is1.example/art/300x300.webp 300w, https://is1.example/art/600x600.webp 600w">
  </picture>
</body></html>"#;

struct StaticFetcher {
    body: &'static str,
    requests: Rc<RefCell<Vec<(String, String)>>>,
}

impl PageFetcher for StaticFetcher {
    fn fetch_body(&self, host: &str, path: &str) -> PodNoteResult<String> {
        self.requests
            .borrow_mut()
            .push((host.to_string(), path.to_string()));
        Ok(self.body.to_string())
    }
}

#[derive(Default, Clone)]
struct RecordingNotifier {
    errors: Rc<RefCell<Vec<String>>>,
}

impl Notifier for RecordingNotifier {
    fn progress(&self, _message: &str) {}

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

fn clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 2)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap()
}

fn fetcher(body: &'static str) -> StaticFetcher {
    StaticFetcher {
        body,
        requests: Rc::new(RefCell::new(Vec::new())),
    }
}

#[test]
fn apple_episode_creates_note_in_folder() {
    let vault = TempDir::new().unwrap();
    let service = ExtractionService::new(
        SourceRegistry::new(),
        fetcher(APPLE_PAGE),
        FileSink::new(vault.path()),
        RecordingNotifier::default(),
    )
    .with_clock(clock);

    let mut settings = Settings {
        at_cursor: false,
        folder: "Podcasts/".to_string(),
        file_name: "{{Title}}".to_string(),
        ..Settings::default()
    };

    let outcome = service
        .run(APPLE_URL, &mut settings, &TriggerContext::new())
        .unwrap();

    assert_eq!(
        outcome.delivery,
        Some(Delivery::NewNote {
            path: "Podcasts/Episode 12 On Rust.md".to_string()
        })
    );

    let written =
        fs::read_to_string(vault.path().join("Podcasts").join("Episode 12 On Rust.md")).unwrap();
    assert!(written.starts_with("---\ntags: [Podcast]\ndate: 02-11-2024 18:30\n---\n"));
    assert!(written.contains("# Episode 12: On Rust\n"));
    assert!(written.contains("![](https://is1.example/art/300x300.webp)"));
    assert!(written.contains("We talk about <b>ownership</b>."));
    assert!(written.contains(&format!("-> [Podcast Link]({})", APPLE_URL)));
}

#[test]
fn spotify_episode_inserted_at_cursor() {
    let vault = TempDir::new().unwrap();
    let doc_path = vault.path().join("Daily.md");
    fs::write(&doc_path, "# Today\n\n## Listening\n").unwrap();

    let page = r#"<html><head>
        <meta property="og:title" content="Ep 1">
        <meta property="og:description" content="Desc">
        <meta property="og:image" content="http://img/1.png">
    </head></html>"#;

    let service = ExtractionService::new(
        SourceRegistry::new(),
        fetcher(page),
        FileSink::new(vault.path()).with_active_document(Some(ActiveDocument {
            path: doc_path.clone(),
            line: Some(3),
        })),
        RecordingNotifier::default(),
    )
    .with_clock(clock);

    let mut settings = Settings {
        template: "# {{Title}}\n{{Description}}\n".to_string(),
        ..Settings::default()
    };

    let outcome = service
        .run(
            "https://open.spotify.com/episode/abc123",
            &mut settings,
            &TriggerContext::new(),
        )
        .unwrap();

    assert_eq!(outcome.delivery, Some(Delivery::AtCursor));
    assert_eq!(
        fs::read_to_string(&doc_path).unwrap(),
        "# Today\n\n# Ep 1\nDesc\n## Listening\n"
    );
    // Nothing else was written to the vault
    assert_eq!(fs::read_dir(vault.path()).unwrap().count(), 1);
}

#[test]
fn malformed_page_leaves_vault_untouched() {
    let vault = TempDir::new().unwrap();
    let notifier = RecordingNotifier::default();
    let service = ExtractionService::new(
        SourceRegistry::new(),
        fetcher("<html><head><title>Not found</title></head></html>"),
        FileSink::new(vault.path()),
        notifier.clone(),
    );

    let mut settings = Settings {
        at_cursor: false,
        ..Settings::default()
    };

    let outcome = service
        .run(APPLE_URL, &mut settings, &TriggerContext::new())
        .unwrap();

    assert_eq!(
        outcome.state,
        PipelineState::Failed(FailureKind::MalformedDocument)
    );
    assert_eq!(fs::read_dir(vault.path()).unwrap().count(), 0);
    assert_eq!(*notifier.errors.borrow(), vec!["The URL is invalid.".to_string()]);
}

#[test]
fn fetch_targets_resolved_host_and_path() {
    let vault = TempDir::new().unwrap();
    let fetcher = fetcher(APPLE_PAGE);
    let requests = Rc::clone(&fetcher.requests);
    let service = ExtractionService::new(
        SourceRegistry::new(),
        fetcher,
        FileSink::new(vault.path()),
        RecordingNotifier::default(),
    );

    let mut settings = Settings {
        at_cursor: false,
        ..Settings::default()
    };
    service
        .run(APPLE_URL, &mut settings, &TriggerContext::new())
        .unwrap();

    assert_eq!(
        *requests.borrow(),
        vec![(
            "podcasts.apple.com".to_string(),
            "/us/podcast/the-show/id42?i=1000600".to_string()
        )]
    );
}

#[test]
fn second_note_with_same_title_is_refused() {
    let vault = TempDir::new().unwrap();
    let notifier = RecordingNotifier::default();
    let service = ExtractionService::new(
        SourceRegistry::new(),
        fetcher(APPLE_PAGE),
        FileSink::new(vault.path()),
        notifier.clone(),
    );

    let mut settings = Settings {
        at_cursor: false,
        ..Settings::default()
    };
    let first = service
        .run(APPLE_URL, &mut settings, &TriggerContext::new())
        .unwrap();
    let second = service
        .run(APPLE_URL, &mut settings, &TriggerContext::new())
        .unwrap();

    assert!(first.is_delivered());
    assert_eq!(second.state, PipelineState::Failed(FailureKind::Delivery));
    assert_eq!(notifier.errors.borrow().len(), 1);
    assert!(notifier.errors.borrow()[0].starts_with("Note already exists"));
}
