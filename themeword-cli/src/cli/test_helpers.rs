//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use super::{CliError, ModelArgs, ModelFormat, PickCommand, SelectorArgs, run_cli};
use super::{Cli, Command, CommandOutcome};

pub(super) const WEATHER: &str = "\
winter\tsnow,frost,ice_skating,sleet,blizzard,hot-chocolate
summer\tsun,heatwave,ice_cream
";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_file(dir: &TempDir, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents)?;
    Ok(path)
}

pub(super) fn model_args(path: PathBuf, format: ModelFormat) -> ModelArgs {
    ModelArgs {
        model: path,
        format,
        limit: None,
        name: None,
    }
}

pub(super) fn pick(model: ModelArgs, theme: &str, count: i64) -> PickCommand {
    PickCommand {
        model,
        selector: SelectorArgs::default(),
        theme: theme.to_owned(),
        count,
        single_word: false,
        exclude: None,
        max_length: 20,
        seed: Some(17),
    }
}

pub(super) fn run_pick(command: PickCommand) -> Result<Vec<String>, CliError> {
    match run_cli(Cli {
        command: Command::Pick(command),
    })? {
        CommandOutcome::Picked(mut words) => {
            words.sort();
            Ok(words)
        }
        CommandOutcome::Served => panic!("pick must not serve"),
    }
}

pub(super) fn run_pick_expecting_error(command: PickCommand, panic_msg: &str) -> CliError {
    match run_pick(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
