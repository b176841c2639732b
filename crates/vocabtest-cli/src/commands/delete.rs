//! The `vocabtest delete` command.

use anyhow::Result;

use vocabtest_core::VocabError;

use super::{confirm, Console, Context};

pub fn execute(ctx: &mut Context, console: &mut Console, target: &str, yes: bool) -> Result<()> {
    if target == "all" {
        if confirm(console, "Delete all vocab sets?", "Nothing happened.", yes)? {
            let deleted = ctx.store.delete_all_sets()?;
            println!(">> All vocab sets deleted! ({deleted} removed)");
        }
        return Ok(());
    }

    if !ctx.store.registry().contains(target) {
        return Err(VocabError::UnknownSet(target.to_string()).into());
    }
    if confirm(console, &format!("Delete: {target}?"), "Nothing happened.", yes)? {
        ctx.store.delete_set(target)?;
        println!(">> Deleted: {target}");
    }
    Ok(())
}
