//! Command-line interface orchestration for themeword.
//!
//! `pick` loads a model and prints words for one theme; `serve` exposes the
//! same selection over HTTP.

mod commands;

pub use commands::{
    Cli, CliError, Command, CommandOutcome, DEFAULT_BIND, DeficitPolicyArg, ModelArgs,
    ModelFormat, PickCommand, SelectorArgs, ServeCommand, SharedProvider, load_provider,
    render_words, run_cli,
};

#[cfg(test)]
mod test_helpers;
