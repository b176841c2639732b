//! The `vocabtest clear` command.

use anyhow::Result;

use vocabtest_core::VocabError;

use super::{confirm, Console, Context};

pub fn execute(ctx: &mut Context, console: &mut Console, target: &str, yes: bool) -> Result<()> {
    if target == "all" {
        if confirm(console, "Clear all progress?", "Progress unchanged.", yes)? {
            let outcomes = ctx.store.clear_all_progress();
            let total = outcomes.len();
            let failed: Vec<_> = outcomes
                .into_iter()
                .filter_map(|(name, outcome)| outcome.err().map(|e| (name, e)))
                .collect();
            if failed.is_empty() {
                println!(">> All progress cleared! ({total} sets)");
            } else {
                println!(">> Cleared progress for {} of {total} sets", total - failed.len());
                for (name, e) in &failed {
                    println!(">> {name}: {e}");
                }
                anyhow::bail!("{} vocab set(s) could not be cleared", failed.len());
            }
        }
        return Ok(());
    }

    if !ctx.store.registry().contains(target) {
        return Err(VocabError::UnknownSet(target.to_string()).into());
    }
    if confirm(console, &format!("Clear progress for: {target}?"), "Progress unchanged.", yes)? {
        ctx.store.clear_progress(target)?;
        println!(">> Cleared progress for: {target}");
    }
    Ok(())
}
