//! Rendering and JSON serialization for CLI output.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use disco_config::ConfigWarning;
pub use disco_highlight::{dim, emphasize, header, query, success, warning};
use disco_highlight::Highlighter;
use serde::Serialize;

/// Prints `value` as pretty JSON.
///
/// Output is syntax highlighted only when stdout is a terminal, so piped JSON stays
/// machine-readable.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            if io::stdout().is_terminal() {
                println!("{}", Highlighter::new().highlight_json(&json));
            } else {
                println!("{json}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Creates a table with the shared preset and header row.
pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header.to_vec());
    table
}

/// Returns a hint for resolving a warning, if there is a common fix.
pub fn warning_hint(w: &ConfigWarning) -> Option<&'static str> {
    match w {
        ConfigWarning::NoFieldsDefined => Some("add a [fields] section to .disco.toml"),
        ConfigWarning::UndefinedGroupMember { .. } => {
            Some("group members must be defined under [fields] or [groups]")
        }
        ConfigWarning::GroupCycle { .. } => Some("remove the group from its own member list"),
        ConfigWarning::FilterFieldNotFacet { .. } => {
            Some("add the field to [facets] fields, or the filter builder will skip it")
        }
        ConfigWarning::NoDividers => Some("set [snippet] dividers, e.g. \"()[]{};.:!?\""),
        _ => None,
    }
}
