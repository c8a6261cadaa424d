use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "podnote")]
#[command(about = "Turn a podcast episode page into a templated Markdown note")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a podcast note from an episode URL (Apple Podcasts, Spotify)
    Add {
        /// Episode URL
        url: String,

        /// Insert into the active document, overriding the configured mode
        #[arg(long, conflicts_with = "new_note")]
        at_cursor: bool,

        /// Create a new note, overriding the configured mode
        #[arg(long)]
        new_note: bool,

        /// Active document to insert into
        #[arg(long, value_name = "FILE")]
        into: Option<String>,

        /// Cursor line in the active document (1-based, default: end of file)
        #[arg(long, requires = "into")]
        line: Option<usize>,

        /// Notes folder that new notes are created under
        #[arg(long, env = "PODNOTE_VAULT", default_value = ".")]
        vault: String,

        /// Print the rendered note instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// List supported podcast services
    Services,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print current settings as JSON
    Show,

    /// Change one setting (template, file-name, service, at-cursor, folder)
    Set {
        /// Setting name
        key: String,

        /// New value
        value: String,
    },

    /// Print the settings file location
    Path,
}
