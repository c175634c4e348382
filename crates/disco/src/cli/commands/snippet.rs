//! Implementation of `disco snippet`.

use std::process::ExitCode;

use disco_text::{Snippet, SnippetWindow};

use crate::cli::{
    args::SnippetCommand,
    context::CommandContext,
    output::{dim, emphasize, header, print_json},
};

/// Cuts a highlighted snippet from the text.
pub fn run(ctx: &CommandContext, cmd: &SnippetCommand) -> ExitCode {
    let builder = ctx.snippet_builder(cmd.padding);
    let terms: Vec<&str> = cmd.terms.iter().map(String::as_str).collect();
    let snippet = builder.build(&cmd.text, &terms);

    if cmd.json {
        return print_json(&snippet);
    }

    let Some(snippet) = snippet else {
        println!("{}", dim("no matches"));
        return ExitCode::SUCCESS;
    };

    println!("{}", snippet.text);
    println!();
    println!("{}", header("Windows:"));
    for window in &snippet.windows {
        println!(
            "  {} {}",
            dim(&format!("{}..{}", window.start, window.end)),
            emphasize_window(&cmd.text, *window, &snippet)
        );
    }
    ExitCode::SUCCESS
}

/// The window's text with its matches emphasized for the terminal.
fn emphasize_window(text: &str, window: SnippetWindow, snippet: &Snippet) -> String {
    let ranges: Vec<_> = snippet
        .matches
        .iter()
        .filter(|m| window.contains(m))
        .map(|m| (m.start - window.start)..(m.end - window.start))
        .collect();
    emphasize(window.slice(text), &ranges)
}
