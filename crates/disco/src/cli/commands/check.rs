//! Implementation of `disco check`.

use std::process::ExitCode;

use disco_config::is_global_config;

use crate::cli::{
    context::CommandContext,
    output::{dim, header, success, warning, warning_hint},
};

/// Lists the loaded config files and reports validation warnings.
///
/// Exits with status 1 when any warning is reported.
pub fn run(ctx: &CommandContext) -> ExitCode {
    if ctx.config_files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!("Run {} to create a configuration file.", header("disco init"));
        return ExitCode::SUCCESS;
    }

    println!("{}", header("Config files:"));
    for path in &ctx.config_files {
        let scope = if is_global_config(path) { " (global)" } else { "" };
        println!("   {}{}", path.display(), dim(scope));
    }
    println!();

    let schema = &ctx.config.schema;
    println!(
        "{}",
        dim(&format!(
            "{} fields, {} groups, {} facets",
            schema.fields.len(),
            schema.groups.len(),
            schema.facets.len()
        ))
    );
    println!();

    let warnings = ctx.config.validate();
    if warnings.is_empty() {
        println!("{}", success("No issues found."));
        return ExitCode::SUCCESS;
    }

    println!("{}", header(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    let mut hints: Vec<&str> = warnings.iter().filter_map(warning_hint).collect();
    hints.sort_unstable();
    hints.dedup();
    for hint in hints {
        println!("{}", dim(&format!("Hint: {hint}")));
    }

    ExitCode::FAILURE
}
