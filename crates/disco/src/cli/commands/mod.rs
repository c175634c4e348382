//! Command implementations and dispatch.

pub mod check;
pub mod compile;
pub mod config;
pub mod filter;
pub mod init;
pub mod snippet;
pub mod spellcheck;
pub mod tokenize;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Compile(cmd) => compile::run(ctx, &cmd),
        Commands::Filter(cmd) => filter::run(ctx, &cmd),
        Commands::Spellcheck(cmd) => spellcheck::run(&cmd),
        Commands::Tokenize(cmd) => tokenize::run(&cmd),
        Commands::Snippet(cmd) => snippet::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
        Commands::Check => check::run(ctx),
        Commands::Init(cmd) => init::run(ctx, &cmd),
    }
}
