//! Implementation of `disco tokenize`.

use std::process::ExitCode;

use comfy_table::Cell;
use disco_text::tokenize_phrase;

use crate::cli::{
    args::TokenizeCommand,
    output::{dim, print_json, table},
};

/// Prints the quoted and unquoted segments of a phrase.
pub fn run(cmd: &TokenizeCommand) -> ExitCode {
    let segments = tokenize_phrase(&cmd.phrase);

    if cmd.json {
        return print_json(&segments);
    }
    if segments.is_empty() {
        println!("{}", dim("no segments"));
        return ExitCode::SUCCESS;
    }

    let mut table = table(&["#", "Kind", "Text"]);
    for (i, segment) in segments.iter().enumerate() {
        let kind = if segment.quoted { "quoted" } else { "words" };
        table.add_row(vec![
            Cell::new(i),
            Cell::new(kind),
            Cell::new(format!("{:?}", segment.text)),
        ]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}
