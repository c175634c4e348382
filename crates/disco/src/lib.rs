//! disco: search-discovery query tooling.
//!
//! The `disco` binary drives the query pipeline from the command line: it compiles
//! comparison expressions into engine queries, turns JSON facet specifications into
//! tagged filter clauses, tokenizes phrases, merges spellchecker corrections and cuts
//! highlighted snippets. Field metadata and settings come from `.disco.toml`.

#![warn(missing_docs)]

pub mod cli;
