//! Tokenized command-line parser for build options.
//!
//! The parser knows nothing about what an option means. It is configured with
//! a set of [`OptionSpec`]s, splits argv into recognised switches (kept in the
//! order they were typed) and extra arguments, and rejects malformed input.

mod config;
mod parser;
mod result;

pub use config::OptionSpec;
pub use parser::CommandLineParser;
pub use result::{ParseError, ParsedCommandLine, Switch};
