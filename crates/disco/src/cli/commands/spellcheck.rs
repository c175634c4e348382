//! Implementation of `disco spellcheck`.

use std::process::ExitCode;

use disco_text::{merge_spellcheck, spellcheck_query};

use crate::cli::{args::SpellcheckCommand, output::dim};

/// Prints the spellchecker input, or the original phrase with corrections merged in.
pub fn run(cmd: &SpellcheckCommand) -> ExitCode {
    if cmd.query {
        match spellcheck_query(&cmd.original) {
            Some(text) => println!("{text}"),
            None => eprintln!("{}", dim("nothing to check")),
        }
        return ExitCode::SUCCESS;
    }

    let corrected = cmd.corrected.as_deref().unwrap_or_default();
    println!("{}", merge_spellcheck(&cmd.original, corrected));
    ExitCode::SUCCESS
}
