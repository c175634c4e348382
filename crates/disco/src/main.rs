//! Command-line interface for `disco`.

use std::{io::Write, process::ExitCode};

use disco::cli::{CommandContext, args::parse_cli, commands};
use env_logger::{Builder, Env};

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let ctx = if cli.command.needs_config() {
        CommandContext::load(cli.config.as_deref())
    } else {
        CommandContext::load_cwd_only()
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}

/// Initializes `env_logger` at a level derived from `-v`. `RUST_LOG` takes precedence.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}
