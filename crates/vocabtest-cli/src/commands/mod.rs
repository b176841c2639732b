//! Command implementations shared by one-shot invocations and the shell.

pub mod add;
pub mod clear;
pub mod delete;
pub mod progress;
pub mod shell;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Subcommand;

use vocabtest_core::{FileStore, ProgressStore};
use vocabtest_providers::config::{load_config_from, VocabtestConfig};

#[derive(Subcommand)]
pub enum Command {
    /// Quiz yourself on a vocab set
    Test {
        /// Name of the vocab set
        name: String,
    },

    /// Add a vocab set from a word list (one word per line)
    Add {
        /// Path to the word list
        path: PathBuf,

        /// Name for the new set (prompted for when omitted)
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete a vocab set, or `all` of them
    Delete {
        /// Set name or `all`
        target: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Reset progress of a vocab set, or `all` of them
    Clear {
        /// Set name or `all`
        target: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show progress for every set, or the words of one set by category
    Progress {
        /// Name of the vocab set
        name: Option<String>,
    },
}

/// Run one command outside the shell.
pub async fn dispatch(ctx: &mut Context, console: &mut Console, command: Command) -> Result<()> {
    match command {
        Command::Test { name } => test::execute(ctx, console, &name).await,
        Command::Add { path, name } => add::execute(ctx, console, &path, name).map(|_| ()),
        Command::Delete { target, yes } => delete::execute(ctx, console, &target, yes),
        Command::Clear { target, yes } => clear::execute(ctx, console, &target, yes),
        Command::Progress { name } => progress::execute(ctx, name.as_deref()),
    }
}

/// Loaded configuration and the store it points at.
pub struct Context {
    pub config: VocabtestConfig,
    pub store: ProgressStore,
}

impl Context {
    pub fn open(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = load_config_from(config_path)?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        tracing::debug!(data_dir = %config.data_dir.display(), "opening store");
        let store = ProgressStore::open(Box::new(FileStore::new(config.data_dir.clone())))
            .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;
        Ok(Self { config, store })
    }
}

/// Line-oriented terminal input.
pub struct Console {
    input: Box<dyn BufRead>,
}

impl Console {
    pub fn stdin() -> Self {
        Self::new(Box::new(io::stdin().lock()))
    }

    pub fn new(input: Box<dyn BufRead>) -> Self {
        Self { input }
    }

    /// Print `prompt` and read one line. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(|c: char| c == '\n' || c == '\r').to_string()))
    }
}

/// A reply to a yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Yes,
    No,
    Invalid,
}

impl Reply {
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "y" | "yes" => Reply::Yes,
            "n" | "no" => Reply::No,
            _ => Reply::Invalid,
        }
    }
}

/// Ask a yes/no question. End of input counts as "no".
pub fn ask(console: &mut Console, question: &str) -> io::Result<Reply> {
    println!(">> {question} [y/n]");
    Ok(match console.read_line(">> ")? {
        Some(text) => Reply::parse(&text),
        None => Reply::No,
    })
}

/// Confirm a destructive action unless `assume_yes` is set.
///
/// Prints `declined` on "no" and the retry hint on anything unrecognised.
pub fn confirm(console: &mut Console, question: &str, declined: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    match ask(console, question)? {
        Reply::Yes => Ok(true),
        Reply::No => {
            println!(">> {declined}");
            Ok(false)
        }
        Reply::Invalid => {
            println!(">> Please select [y/n]");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_parsing() {
        assert_eq!(Reply::parse("y"), Reply::Yes);
        assert_eq!(Reply::parse(" YES "), Reply::Yes);
        assert_eq!(Reply::parse("n"), Reply::No);
        assert_eq!(Reply::parse("no"), Reply::No);
        assert_eq!(Reply::parse("maybe"), Reply::Invalid);
        assert_eq!(Reply::parse(""), Reply::Invalid);
    }

    #[test]
    fn console_reads_lines() {
        let mut console = Console::new(Box::new(io::Cursor::new(b"first\r\nsecond\n".to_vec())));
        assert_eq!(console.read_line("").unwrap().as_deref(), Some("first"));
        assert_eq!(console.read_line("").unwrap().as_deref(), Some("second"));
        assert_eq!(console.read_line("").unwrap(), None);
    }

    #[test]
    fn confirm_paths() {
        let mut console = Console::new(Box::new(io::Cursor::new(b"yes\nno\nwhat\n".to_vec())));
        assert!(confirm(&mut console, "Go?", "Nothing happened.", true).unwrap());
        assert!(confirm(&mut console, "Go?", "Nothing happened.", false).unwrap());
        assert!(!confirm(&mut console, "Go?", "Nothing happened.", false).unwrap());
        assert!(!confirm(&mut console, "Go?", "Nothing happened.", false).unwrap());
        // Input exhausted.
        assert!(!confirm(&mut console, "Go?", "Nothing happened.", false).unwrap());
    }
}
