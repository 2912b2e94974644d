mod config;
mod session;
mod tui;

use std::{env, io, num::ParseIntError, path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::debug;
use tutorial_model::{FileSource, LoadError, TutorialModel};
use tutorial_tree::{DefaultSelection, Event, EventError, NodePath, TreeOptions, element_tree};

pub use crate::config::{Config, ConfigError};
pub use crate::session::{Session, SessionError};
pub use crate::tui::{TuiError, tui};

#[derive(Parser, Debug)]
#[command(name = "tutorial", version, about = "Branched tutorial viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long = "config", global = true, env = "TUTORIAL_CONFIG")]
    pub config_path: Option<PathBuf>,

    #[arg(long = "log", global = true, default_value = "info")]
    pub log: String,

    /// Tutorial document (JSON). Overrides `document` from the config file.
    #[arg(long = "document", global = true)]
    pub document: Option<PathBuf>,

    /// Branch selection before any click. Overrides `default_selection` from the config file.
    #[arg(long = "default-selection", global = true, value_enum)]
    pub default_selection: Option<DefaultSelection>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tutorial versions in document order
    Versions,
    /// Print a version as a text tree
    Render {
        /// Version to render (default: config, then first version)
        #[arg(long = "version")]
        version: Option<String>,

        /// Click to apply before rendering, in order: `PATH` toggles notes,
        /// `PATH=NAME` selects a branch. PATH is dot-separated, e.g. `3.0`.
        #[arg(long = "click")]
        clicks: Vec<Click>,
    },
    /// Browse a version interactively in the terminal
    View {
        /// Version to open (default: config, then first version)
        #[arg(long = "version")]
        version: Option<String>,
    },
}

/// A command-line stand-in for a click from the rendering host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click(pub Event);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid click {input:?}: {source}")]
pub struct ParseClickError {
    input: String,
    #[source]
    source: ParseIntError,
}

impl FromStr for Click {
    type Err = ParseClickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, name) = match s.split_once('=') {
            Some((path, name)) => (path, Some(name)),
            None => (s, None),
        };
        let path: NodePath = path.parse().map_err(|source| ParseClickError {
            input: s.to_owned(),
            source,
        })?;
        let event = match name {
            Some(name) => Event::SelectBranch {
                path,
                name: name.to_owned(),
            },
            None => Event::ToggleNotes(path),
        };
        Ok(Click(event))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to get current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("no tutorial document given: pass --document or set `document` in tutorial.toml")]
    NoDocument,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("click failed: {0}")]
    Click(#[from] EventError),

    #[error(transparent)]
    Tui(#[from] TuiError),
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    let cwd = env::current_dir().map_err(AppError::CurrentDir)?;
    let config = Config::load(cli.config_path.as_deref(), &cwd).await?;
    debug!(?config, "loaded config");

    let document = cli
        .document
        .clone()
        .or_else(|| config.document.clone())
        .ok_or(AppError::NoDocument)?;
    let options = TreeOptions::default().default_selection(
        cli.default_selection
            .unwrap_or(config.default_selection),
    );
    let model = TutorialModel::load(&FileSource::new(document)).await?;

    match cli.command {
        Command::Versions => cmd_versions(&model),
        Command::Render { version, clicks } => {
            let version = version.or(config.version);
            cmd_render(&model, version.as_deref(), options, clicks)
        }
        Command::View { version } => {
            let version = version.or(config.version);
            cmd_view(&model, version.as_deref(), options).await
        }
    }
}

fn cmd_versions(model: &TutorialModel) -> Result<(), AppError> {
    for version in model.versions() {
        println!("{version}");
    }
    Ok(())
}

fn cmd_render(
    model: &TutorialModel,
    version: Option<&str>,
    options: TreeOptions,
    clicks: Vec<Click>,
) -> Result<(), AppError> {
    let mut session = Session::open(model, version, options)?;
    for Click(event) in clicks {
        session.handle(&event)?;
    }
    println!("{}", element_tree(session.version(), &session.render()));
    Ok(())
}

async fn cmd_view(
    model: &TutorialModel,
    version: Option<&str>,
    options: TreeOptions,
) -> Result<(), AppError> {
    let session = Session::open(model, version, options)?;
    tui(session).await?;
    Ok(())
}
