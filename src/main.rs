use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use podnote::cli::{Cli, Commands, ConfigCommand};
use podnote::config::{Config, Settings};
use podnote::errors::PodNoteResult;
use podnote::services::{
    ActiveDocument, ConsoleNotifier, Delivery, ExtractionService, FileSink, HttpFetcher,
    NoteSink, PipelineOutcome, StdoutSink, TriggerContext,
};
use podnote::sources::SourceRegistry;

fn main() {
    // Logs go to stderr; failure details show up with RUST_LOG=warn
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded. Pipeline failures have already
/// been reported to the user and only affect the exit code.
fn run() -> PodNoteResult<bool> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command {
        Commands::Add {
            url,
            at_cursor,
            new_note,
            into,
            line,
            vault,
            dry_run,
        } => {
            let mode = if at_cursor {
                Some(true)
            } else if new_note {
                Some(false)
            } else {
                None
            };
            let active = into.map(|path| ActiveDocument {
                path: PathBuf::from(path),
                line,
            });
            cmd_add(&url, mode, active, &vault, dry_run, &config)
        }
        Commands::Config { command } => cmd_config(command, &config).map(|_| true),
        Commands::Services => cmd_services(&config).map(|_| true),
    }
}

fn cmd_add(
    url: &str,
    mode: Option<bool>,
    active: Option<ActiveDocument>,
    vault: &str,
    dry_run: bool,
    config: &Config,
) -> PodNoteResult<bool> {
    let mut settings = Settings::load(&config.settings_path)?;

    // Command-line mode applies to this run only
    let mut run_settings = settings.clone();
    if let Some(at_cursor) = mode {
        run_settings.at_cursor = at_cursor;
    }

    let active_path = active.as_ref().map(|a| a.path.display().to_string());
    let trigger = TriggerContext::new();

    let outcome = if dry_run {
        run_pipeline(StdoutSink, url, &mut run_settings, &trigger)?
    } else {
        let sink = FileSink::new(vault).with_active_document(active);
        run_pipeline(sink, url, &mut run_settings, &trigger)?
    };

    if !dry_run && run_settings.service != settings.service {
        settings.service = run_settings.service;
        settings.save(&config.settings_path)?;
    }

    match (&outcome.note, &outcome.delivery) {
        (Some(note), Some(Delivery::AtCursor)) if !dry_run => {
            println!(
                "Inserted \"{}\" into {}",
                note.suggested_title,
                active_path.unwrap_or_default()
            );
        }
        (Some(_), Some(Delivery::NewNote { path })) if !dry_run => {
            println!("Created note: {}", path);
        }
        (Some(note), _) => {
            println!("\nSuggested title: {}", note.suggested_title);
        }
        _ => {}
    }

    Ok(outcome.is_delivered())
}

fn run_pipeline<S: NoteSink>(
    sink: S,
    url: &str,
    settings: &mut Settings,
    trigger: &TriggerContext,
) -> PodNoteResult<PipelineOutcome> {
    let service = ExtractionService::new(
        SourceRegistry::new(),
        HttpFetcher::new(),
        sink,
        ConsoleNotifier::stderr(),
    );
    service.run(url, settings, trigger)
}

fn cmd_config(command: ConfigCommand, config: &Config) -> PodNoteResult<()> {
    match command {
        ConfigCommand::Show => {
            let settings = Settings::load(&config.settings_path)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigCommand::Set { key, value } => {
            let mut settings = Settings::load(&config.settings_path)?;
            settings.set(&key, &value)?;
            settings.save(&config.settings_path)?;
            println!("Updated {}", key);
        }
        ConfigCommand::Path => {
            println!("{}", config.settings_path.display());
        }
    }

    Ok(())
}

fn cmd_services(config: &Config) -> PodNoteResult<()> {
    let settings = Settings::load(&config.settings_path)?;
    let registry = SourceRegistry::new();

    println!("Supported podcast services:\n");
    for source in registry.sources() {
        let marker = if source.service() == settings.service {
            "*"
        } else {
            " "
        };
        println!(
            "  {} {} [{}] ({})",
            marker,
            source.service().display_name(),
            source.service(),
            source.host()
        );
    }

    Ok(())
}
