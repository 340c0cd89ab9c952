//! # zettel CLI
//!
//! ```bash
//! zettel new "reading list"        # create + open 20260118093005-reading-list.md
//! zettel open borrow checker       # open by ID or search, prompting if ambiguous
//! zettel search ownership          # print matching note IDs
//! zettel link 20260118093005 20260118101500
//! zettel index "Rust hub" rust cli # index note linking every #rust or #cli note
//! zettel tags                      # every unique tag
//! ```
//!
//! The notes directory is `$ZETTEL_HOME`, else `notes_dir` from the config
//! file, else `~/zettelkasten`.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use zettel::commands;
use zettel::config::{self, Config};
use zettel::editor::{CommandEditor, Editor, NoEditor};
use zettel::search::{FixedSelector, PromptSelector, Selector};
use zettel::store::NoteStore;

#[derive(Parser)]
#[command(
    name = "zettel",
    about = "Zettelkasten notes: create, search, tag, index, and link Markdown notes",
    version
)]
struct Cli {
    /// Path to a TOML configuration file.
    ///
    /// Defaults to `$ZETTEL_CONFIG`, then `<config dir>/zettel/config.toml`
    /// when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Store(StoreCommand),

    /// Print a shell completion script.
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Commands that operate on the notes directory.
#[derive(Subcommand)]
enum StoreCommand {
    /// Create a new note and open it in the editor.
    ///
    /// With a title the file is named `<timestamp>-<slug>.md` and seeded with
    /// a heading and a `#tagme` placeholder.
    New {
        /// Optional title; multiple words are joined with spaces.
        title: Vec<String>,

        /// Create the note without launching the editor.
        #[arg(long)]
        no_edit: bool,
    },

    /// Open an existing note by exact ID.
    Edit {
        id: String,

        #[arg(long)]
        no_edit: bool,
    },

    /// Open a note by ID, or by file-name/content search.
    ///
    /// Several matches produce a numbered list and a prompt on stdin.
    Open {
        #[arg(required = true)]
        query: Vec<String>,

        /// Choose the Nth match instead of prompting.
        #[arg(long)]
        pick: Option<usize>,

        /// Print the chosen path without launching the editor.
        #[arg(long)]
        no_edit: bool,
    },

    /// List every note file.
    List,

    /// Print IDs of notes whose file name or content contains the query.
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Append a `[[TARGET]]` link to SOURCE.
    Link { source: String, target: String },

    /// Create an index note linking every note carrying any of the tags.
    Index {
        title: String,

        /// Tags to include, with or without the leading `#`.
        tags: Vec<String>,

        #[arg(long)]
        no_edit: bool,
    },

    /// List every unique tag.
    Tags {
        /// Read the tag cache instead of scanning notes.
        #[arg(long)]
        cached: bool,
    },

    /// Rebuild the tag cache in `<notes>/.zettel/tags.json`.
    Reindex,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zettel={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let command = match cli.command {
        // Needs neither config nor the notes directory.
        Commands::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "zettel", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Store(command) => command,
    };

    let cfg = config::load_config(cli.config.as_deref())?;
    let store = NoteStore::open(&cfg)?;

    match command {
        StoreCommand::New { title, no_edit } => {
            let title = title.join(" ");
            let title = (!title.trim().is_empty()).then_some(title.as_str());
            commands::run_new(&cfg, &store, editor_for(&cfg, no_edit).as_ref(), title)?;
        }
        StoreCommand::Edit { id, no_edit } => {
            commands::run_edit(&store, editor_for(&cfg, no_edit).as_ref(), &id)?;
        }
        StoreCommand::Open {
            query,
            pick,
            no_edit,
        } => {
            let mut selector: Box<dyn Selector> = match pick {
                Some(n) => Box::new(FixedSelector(n)),
                None => Box::new(PromptSelector::stdio()),
            };
            commands::run_open(
                &store,
                editor_for(&cfg, no_edit).as_ref(),
                &query.join(" "),
                selector.as_mut(),
            )?;
        }
        StoreCommand::List => commands::run_list(&store)?,
        StoreCommand::Search { query } => commands::run_search(&store, &query.join(" "))?,
        StoreCommand::Link { source, target } => commands::run_link(&store, &source, &target)?,
        StoreCommand::Index {
            title,
            tags,
            no_edit,
        } => {
            commands::run_index(&cfg, &store, editor_for(&cfg, no_edit).as_ref(), &title, &tags)?;
        }
        StoreCommand::Tags { cached } => commands::run_tags(&store, cached)?,
        StoreCommand::Reindex => commands::run_reindex(&store)?,
    }

    Ok(())
}

fn editor_for(cfg: &Config, no_edit: bool) -> Box<dyn Editor> {
    if no_edit {
        Box::new(NoEditor)
    } else {
        Box::new(CommandEditor::new(cfg.editor.clone()))
    }
}
