//! Implementation of `disco filter`.

use std::process::ExitCode;

use comfy_table::Cell;
use disco_compile::{FilterBuilder, FilterQueries};
use serde::Serialize;

use crate::cli::{
    args::FilterCommand,
    context::CommandContext,
    output::{dim, print_json, table},
};

/// JSON output of `disco filter`.
#[derive(Serialize)]
struct JsonFilterOutput<'a> {
    /// Clauses mapped to their tags; `null` when nothing was produced.
    filters: Option<&'a FilterQueries>,
    /// Engine filter parameters.
    params: Vec<String>,
}

/// Builds filter clauses from a JSON specification.
pub fn run(ctx: &CommandContext, cmd: &FilterCommand) -> ExitCode {
    let mut settings = ctx.config.filter.clone();
    settings.strict_root |= cmd.strict;

    let built = FilterBuilder::new(ctx.config.schema(), &settings).build_str(&cmd.spec);
    let queries = match built {
        Ok(queries) => queries,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&JsonFilterOutput {
            filters: queries.as_ref(),
            params: queries
                .as_ref()
                .map(FilterQueries::to_params)
                .unwrap_or_default(),
        });
    }

    let Some(queries) = queries else {
        println!("{}", dim("no filters"));
        return ExitCode::SUCCESS;
    };

    let mut table = table(&["Clause", "Tag"]);
    for (clause, tag) in queries.iter() {
        table.add_row(vec![Cell::new(clause), Cell::new(tag.unwrap_or("-"))]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}
