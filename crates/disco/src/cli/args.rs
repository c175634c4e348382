//! Clap argument definitions for the `disco` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "disco")]
#[command(about = "Search discovery tooling - compile queries, filters and snippets")]
#[command(version)]
pub struct Cli {
    /// Use this configuration file instead of discovering .disco.toml files
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug logging)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `disco compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    /// Comparison expression, e.g. 'title==Bible;year=ge=1500'
    pub expression: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Also show the parsed expression tree
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for `disco filter`.
#[derive(Args, Debug, Clone)]
pub struct FilterCommand {
    /// Filter specification as a JSON object, e.g. '{"format-facet": ["Codex"]}'
    pub spec: String,

    /// Reject specifications that are not JSON objects
    #[arg(long)]
    pub strict: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `disco spellcheck`.
#[derive(Args, Debug, Clone)]
pub struct SpellcheckCommand {
    /// The phrase as the user typed it
    pub original: String,

    /// The spellchecker's corrected phrase
    #[arg(required_unless_present = "query")]
    pub corrected: Option<String>,

    /// Print the text to send to the spellchecker instead of merging
    #[arg(long, conflicts_with = "corrected")]
    pub query: bool,
}

/// Arguments for `disco tokenize`.
#[derive(Args, Debug, Clone)]
pub struct TokenizeCommand {
    /// Search phrase to split into quoted and unquoted segments
    pub phrase: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `disco snippet`.
#[derive(Args, Debug, Clone)]
pub struct SnippetCommand {
    /// Text to cut the snippet from
    pub text: String,

    /// Search terms to highlight
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// Characters of context on each side of a match [default: 60]
    #[arg(short = 'p', long)]
    pub padding: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `disco init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.disco.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `disco` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a comparison expression into an engine query
    #[command(after_help = "\
EXPRESSION SYNTAX:
  field==value          Field matches value
  field!=value          Field does not match value
  field=in=(a,b)        Field matches any of the values
  field=ge=1500         Range: =lt=, =le=, =gt=, =ge= (or <, <=, >, >=)
  a;b   a and b         Both constraints
  a,b   a or b          Either constraint
  (expr)                Grouping

Values with spaces or search syntax are expanded as free text: quoted
phrases search the exact field variant, other words the stemmed one.

EXAMPLES:
  disco compile 'title==Bible'
  disco compile 'ORIGIN==Berlin;title==\"codex gigas\"'
  disco compile 'format=in=(Codex,Fragment),shelfmark==\"Ms. germ.*\"'
  disco compile --explain 'title==Bible;(year>=1500,year<1600)'")]
    Compile(CompileCommand),

    /// Build tagged filter clauses from a JSON facet specification
    Filter(FilterCommand),

    /// Merge spellchecker corrections back into a phrase
    Spellcheck(SpellcheckCommand),

    /// Split a phrase into quoted and unquoted segments
    Tokenize(TokenizeCommand),

    /// Cut a highlighted snippet around search term matches
    Snippet(SnippetCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and report warnings
    Check,

    /// Initialize disco configuration in current directory
    Init(InitCommand),
}

impl Commands {
    /// Whether the command reads the merged configuration.
    ///
    /// `init` must work even when an existing config file is invalid.
    pub fn needs_config(&self) -> bool {
        !matches!(
            self,
            Self::Init(_) | Self::Spellcheck(_) | Self::Tokenize(_)
        )
    }
}

/// Parses CLI arguments, exiting with usage on error.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
