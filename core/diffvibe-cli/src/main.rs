//! diffvibe: command-line access to the DiffVibe session store.
//!
//! Reads and writes the same files as the desktop app (`~/.diffvibe` unless
//! `--home`/`DIFFVIBE_HOME` says otherwise).
//!
//! ## Subcommands
//!
//! - `recent`: list, add, remove or clear recent comparisons
//! - `theme`: get, set or toggle the UI theme
//! - `syntax-theme`: get or set the code highlighting theme
//! - `highlight`: highlight stdin as the diff panes would

mod error;
mod highlight;
mod logging;
mod prefs;
mod recent;

use clap::{Parser, Subcommand};
use diffvibe_core::{AppSession, CompareMode, StorageConfig, SystemAppearance, Theme};
use std::path::PathBuf;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "diffvibe")]
#[command(about = "DiffVibe session and preference tool")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to ~/.diffvibe)
    #[arg(long, global = true, env = "DIFFVIBE_HOME", value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the recent comparisons list
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },

    /// Show or change the UI theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Show or change the code highlighting theme
    SyntaxTheme {
        #[command(subcommand)]
        action: Option<SyntaxThemeAction>,
    },

    /// Highlight source read from stdin
    Highlight {
        /// Path used to infer the language (the file need not exist)
        #[arg(long, value_name = "HINT")]
        path: String,

        /// Override the stored syntax theme for this run
        #[arg(long)]
        theme: Option<String>,
    },
}

#[derive(Subcommand)]
enum RecentAction {
    /// Print the list, newest first
    List {
        #[arg(long)]
        json: bool,
    },

    /// Record a comparison
    Add {
        #[arg(value_name = "LEFT")]
        left: String,

        #[arg(value_name = "RIGHT")]
        right: String,

        /// file, directory or merge
        #[arg(long, default_value = "file")]
        mode: CompareMode,

        /// Common ancestor for merges
        #[arg(long)]
        base: Option<String>,
    },

    /// Remove the entry at INDEX (as shown by `list`)
    Remove {
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// Remove every entry
    Clear,
}

#[derive(Subcommand)]
enum ThemeAction {
    Get,
    Set {
        /// light or dark
        #[arg(value_name = "THEME")]
        theme: Theme,
    },
    Toggle,
}

#[derive(Subcommand)]
enum SyntaxThemeAction {
    Get,
    Set {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let storage = cli
        .home
        .map(StorageConfig::with_root)
        .unwrap_or_else(StorageConfig::from_env);
    let _logging_guard = logging::init(&storage);

    if let Err(e) = run(cli.command, storage) {
        tracing::error!(error = %e, "diffvibe failed");
        std::process::exit(1);
    }
}

fn run(command: Commands, storage: StorageConfig) -> Result<(), CliError> {
    let mut session = AppSession::open(storage)?;
    session.init(SystemAppearance::default());

    match command {
        Commands::Recent { action } => match action {
            RecentAction::List { json } => recent::list(&session, json)?,
            RecentAction::Add {
                left,
                right,
                mode,
                base,
            } => recent::add(&mut session, left, right, mode, base)?,
            RecentAction::Remove { index } => recent::remove(&mut session, index)?,
            RecentAction::Clear => recent::clear(&mut session)?,
        },
        Commands::Theme { action } => match action.unwrap_or(ThemeAction::Get) {
            ThemeAction::Get => prefs::theme_get(&session),
            ThemeAction::Set { theme } => prefs::theme_set(&mut session, theme),
            ThemeAction::Toggle => prefs::theme_toggle(&mut session),
        },
        Commands::SyntaxTheme { action } => match action.unwrap_or(SyntaxThemeAction::Get) {
            SyntaxThemeAction::Get => prefs::syntax_theme_get(&session),
            SyntaxThemeAction::Set { name } => prefs::syntax_theme_set(&mut session, &name),
        },
        Commands::Highlight { path, theme } => {
            highlight::run(&session, &path, theme.as_deref())?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parses_recent_add_with_mode_and_base() {
        let cli = Cli::try_parse_from([
            "diffvibe", "recent", "add", "l.rs", "r.rs", "--mode", "merge", "--base", "b.rs",
        ])
        .unwrap();

        match cli.command {
            Commands::Recent {
                action:
                    RecentAction::Add {
                        left,
                        right,
                        mode,
                        base,
                    },
            } => {
                assert_eq!(left, "l.rs");
                assert_eq!(right, "r.rs");
                assert_eq!(mode, CompareMode::Merge);
                assert_eq!(base.as_deref(), Some("b.rs"));
            }
            _ => panic!("expected recent add"),
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let parsed =
            Cli::try_parse_from(["diffvibe", "recent", "add", "a", "b", "--mode", "tree"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_theme_without_action_defaults_to_get() {
        let cli = Cli::try_parse_from(["diffvibe", "theme"]).unwrap();
        assert!(matches!(cli.command, Commands::Theme { action: None }));
    }

    #[test]
    fn test_home_flag_is_global() {
        let cli = Cli::try_parse_from(["diffvibe", "recent", "list", "--home", "/tmp/dv"]).unwrap();
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/dv")));
    }

    #[test]
    fn test_run_persists_under_home() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());

        run(
            Commands::Recent {
                action: RecentAction::Add {
                    left: "a".to_string(),
                    right: "b".to_string(),
                    mode: CompareMode::Directory,
                    base: None,
                },
            },
            storage.clone(),
        )
        .unwrap();
        run(
            Commands::Theme {
                action: Some(ThemeAction::Set { theme: Theme::Light }),
            },
            storage.clone(),
        )
        .unwrap();

        let mut session = AppSession::open(storage).unwrap();
        session.init(SystemAppearance::Dark);
        assert_eq!(session.tabs.recent().items()[0].mode, CompareMode::Directory);
        assert_eq!(session.theme.value(), Theme::Light);
    }
}
