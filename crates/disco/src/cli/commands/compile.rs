//! Implementation of `disco compile`.

use std::process::ExitCode;

use disco_compile::{CompiledQuery, QueryCompiler};
use disco_query::{Expr, parse};
use serde::Serialize;

use crate::cli::{
    args::CompileCommand,
    context::CommandContext,
    output::{dim, header, print_json, query},
};

/// JSON output of `disco compile`.
#[derive(Serialize)]
struct JsonCompileOutput<'a> {
    /// Canonical form of the parsed expression, with `--explain`.
    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<String>,
    /// The compiled query and its fields.
    #[serde(flatten)]
    compiled: &'a CompiledQuery,
}

/// Parses and compiles an expression against the configured field schema.
pub fn run(ctx: &CommandContext, cmd: &CompileCommand) -> ExitCode {
    let expr = match parse(&cmd.expression) {
        Ok(Some(expr)) => expr,
        Ok(None) => {
            println!("{}", dim("no query"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let compiled = match QueryCompiler::new(ctx.config.schema()).compile(&expr) {
        Ok(compiled) => compiled,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&JsonCompileOutput {
            expression: cmd.explain.then(|| expr.to_query_string()),
            compiled: &compiled,
        });
    }

    if cmd.explain {
        print_explain(&expr);
    }
    print_compiled(&compiled);
    ExitCode::SUCCESS
}

/// Prints the parsed expression tree.
fn print_explain(expr: &Expr) {
    println!("{}", header("Expression:"));
    println!("  {}", expr.to_query_string());
    println!();
    println!("{}", header("Tree:"));
    for line in expr.to_string().lines() {
        println!("  {line}");
    }
    println!();
}

/// Prints the query and the fields it searches.
fn print_compiled(compiled: &CompiledQuery) {
    if compiled.query.is_empty() {
        println!("{}", dim("(empty query)"));
    } else {
        println!("{}", query(&compiled.query));
    }
    let fields: Vec<&str> = compiled.fields.iter().map(String::as_str).collect();
    println!("{}", dim(&format!("fields: {}", fields.join(", "))));
}
