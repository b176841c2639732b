//! The `vocabtest add` command.

use std::path::Path;

use anyhow::Result;

use super::{Console, Context};

/// Register the word list at `path` as a new set and return its name.
pub fn execute(ctx: &mut Context, console: &mut Console, path: &Path, name: Option<String>) -> Result<String> {
    let name = match name {
        Some(name) => name,
        None => {
            println!(">> Please enter a name for this vocab set");
            match console.read_line(">> ")? {
                Some(name) => name.trim().to_string(),
                None => anyhow::bail!("no name given for the vocab set"),
            }
        }
    };

    let set = ctx.store.create_set(&name, path)?;
    tracing::info!(name = %name, words = set.len(), "added vocab set");
    println!(">> Vocab set '{}' added! ({} words)", set.name(), set.len());
    Ok(name)
}
