//! The interactive shell started when no command is given.

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::{add, ask, dispatch, test, Command, Console, Context, Reply};

#[derive(Parser)]
#[command(
    name = "vocabtest",
    no_binary_name = true,
    disable_version_flag = true,
    override_usage = "<COMMAND> [ARGS]"
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Run(Command),

    /// Leave vocabtest
    Exit,
}

pub async fn run(ctx: &mut Context, console: &mut Console) -> Result<()> {
    println!(">> MAIN MENU");
    println!(">> Welcome! Type help or ? to list commands.");

    while let Some(line) = console.read_line(">> ")? {
        let mut words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        if words[0] == "?" {
            words[0] = "help";
        }

        let command = match ShellLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Help output and usage errors alike.
                e.print()?;
                continue;
            }
        };

        let outcome = match command {
            ShellCommand::Exit => break,
            ShellCommand::Run(Command::Add { path, name }) => add_then_offer(ctx, console, &path, name).await,
            ShellCommand::Run(Command::Test { name }) => {
                let result = test::execute(ctx, console, &name).await;
                if result.is_ok() {
                    println!(">> Back to main menu.");
                }
                result
            }
            ShellCommand::Run(command) => dispatch(ctx, console, command).await,
        };

        if let Err(e) = outcome {
            tracing::debug!(error = %e, "shell command failed");
            println!(">> Error: {e:#}");
        }
    }

    println!(">> Goodbye!");
    Ok(())
}

async fn add_then_offer(
    ctx: &mut Context,
    console: &mut Console,
    path: &std::path::Path,
    name: Option<String>,
) -> Result<()> {
    let name = add::execute(ctx, console, path, name)?;
    match ask(console, &format!("Begin practicing on '{name}'?"))? {
        Reply::Yes => {
            test::execute(ctx, console, &name).await?;
            println!(">> Back to main menu.");
        }
        Reply::No => println!(">> Back at main menu"),
        Reply::Invalid => println!(">> Please select [y/n]"),
    }
    Ok(())
}
