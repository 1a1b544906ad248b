//! Command implementations and argument parsing for the themeword CLI.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use themeword_core::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_LENGTH, DEFAULT_MAX_QUERIES, DeficitPolicy, ExclusionSet,
    SelectionError, SelectorBuilder, SimilarityProvider, WordRequest, WordSelector,
};
use themeword_providers_embedding::{EmbeddingProvider, EmbeddingProviderError, Word2VecFormat};
use themeword_providers_text::{ThesaurusError, ThesaurusProvider};
use tracing::{Span, field, info, instrument};

use crate::server;

/// Address the HTTP server binds to by default.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// A loaded similarity model shared by every request.
pub type SharedProvider = Arc<dyn SimilarityProvider + Send + Sync>;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "themeword", about = "Pick random words related to a theme.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the words API over HTTP.
    Serve(ServeCommand),
    /// Print words for one theme, one per line.
    Pick(PickCommand),
}

/// Model loading options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Path to the model file.
    #[arg(long, env = "THEMEWORD_MODEL")]
    pub model: PathBuf,

    /// On-disk format of the model.
    #[arg(long, value_enum, env = "THEMEWORD_MODEL_FORMAT", default_value_t = ModelFormat::Word2vecBinary)]
    pub format: ModelFormat,

    /// Load only the first N vocabulary rows of an embedding model.
    #[arg(long, env = "THEMEWORD_MODEL_LIMIT")]
    pub limit: Option<usize>,

    /// Override name for the model (defaults to the file name).
    #[arg(long, env = "THEMEWORD_MODEL_NAME")]
    pub name: Option<String>,
}

/// Supported model formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelFormat {
    /// word2vec text vectors.
    #[value(name = "word2vec-text")]
    Word2vecText,
    /// word2vec binary vectors.
    #[value(name = "word2vec-binary")]
    Word2vecBinary,
    /// Tab-separated related-word lists.
    #[value(name = "thesaurus")]
    Thesaurus,
}

impl ModelFormat {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Word2vecText => "word2vec-text",
            Self::Word2vecBinary => "word2vec-binary",
            Self::Thesaurus => "thesaurus",
        }
    }
}

/// Expansion tuning shared by every command.
#[derive(Debug, Args, Clone)]
pub struct SelectorArgs {
    /// Provider lookups allowed per expansion.
    #[arg(long, env = "THEMEWORD_MAX_QUERIES", default_value_t = DEFAULT_MAX_QUERIES)]
    pub max_queries: usize,

    /// How far from the theme the expansion may walk.
    #[arg(long, env = "THEMEWORD_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Wall-clock budget per expansion, in milliseconds.
    #[arg(long, env = "THEMEWORD_DEADLINE_MS")]
    pub deadline_ms: Option<u64>,

    /// How expansion shortfalls are measured.
    #[arg(long, value_enum, env = "THEMEWORD_DEFICIT_POLICY", default_value_t = DeficitPolicyArg::PreLengthFilter)]
    pub deficit_policy: DeficitPolicyArg,

    /// Ignore the built-in curated theme lists.
    #[arg(long, env = "THEMEWORD_NO_CURATED")]
    pub no_curated: bool,
}

impl Default for SelectorArgs {
    fn default() -> Self {
        Self {
            max_queries: DEFAULT_MAX_QUERIES,
            max_depth: DEFAULT_MAX_DEPTH,
            deadline_ms: None,
            deficit_policy: DeficitPolicyArg::PreLengthFilter,
            no_curated: false,
        }
    }
}

impl SelectorArgs {
    /// Maps the options onto a [`SelectorBuilder`].
    #[must_use]
    pub fn builder(&self) -> SelectorBuilder {
        SelectorBuilder::new()
            .with_max_queries(self.max_queries)
            .with_max_depth(self.max_depth)
            .with_deadline(self.deadline_ms.map(Duration::from_millis))
            .with_deficit_policy(self.deficit_policy.into())
            .with_curated_themes(!self.no_curated)
    }
}

/// Command-line spelling of [`DeficitPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeficitPolicyArg {
    /// Count candidates before the length filter.
    #[value(name = "pre-length-filter")]
    PreLengthFilter,
    /// Count fully accepted candidates.
    #[value(name = "post-length-filter")]
    PostLengthFilter,
}

impl From<DeficitPolicyArg> for DeficitPolicy {
    fn from(value: DeficitPolicyArg) -> Self {
        match value {
            DeficitPolicyArg::PreLengthFilter => Self::PreLengthFilter,
            DeficitPolicyArg::PostLengthFilter => Self::PostLengthFilter,
        }
    }
}

/// Options accepted by the `serve` command.
#[derive(Debug, Args, Clone)]
pub struct ServeCommand {
    /// Model configuration.
    #[command(flatten)]
    pub model: ModelArgs,

    /// Expansion tuning.
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Socket address to listen on.
    #[arg(long, env = "THEMEWORD_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,
}

/// Options accepted by the `pick` command.
#[derive(Debug, Args, Clone)]
pub struct PickCommand {
    /// Model configuration.
    #[command(flatten)]
    pub model: ModelArgs,

    /// Expansion tuning.
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Theme to pick words for.
    #[arg(long, env = "THEMEWORD_THEME")]
    pub theme: String,

    /// Number of words; zero or negative prints nothing.
    #[arg(long, env = "THEMEWORD_COUNT", allow_negative_numbers = true)]
    pub count: i64,

    /// Only return single words.
    #[arg(long, env = "THEMEWORD_SINGLE_WORD")]
    pub single_word: bool,

    /// Comma-separated words that must not be returned.
    #[arg(long, env = "THEMEWORD_EXCLUDE")]
    pub exclude: Option<String>,

    /// Letter ceiling per word, spaces excluded.
    #[arg(long, env = "THEMEWORD_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Seed for reproducible picks.
    #[arg(long, env = "THEMEWORD_SEED")]
    pub seed: Option<u64>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Embedding model ingestion failed.
    #[error("failed to load embedding model `{path}`: {source}")]
    Embedding {
        /// Model path.
        path: PathBuf,
        /// Underlying ingestion error.
        #[source]
        source: EmbeddingProviderError,
    },
    /// Thesaurus ingestion failed.
    #[error("failed to load thesaurus `{path}`: {source}")]
    Thesaurus {
        /// Thesaurus path.
        path: PathBuf,
        /// Underlying ingestion error.
        #[source]
        source: ThesaurusError,
    },
    /// Selection failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// The HTTP server could not start or stopped with an error.
    #[error("server on `{bind}` failed: {source}")]
    Server {
        /// Address the server was bound to.
        bind: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Words chosen by `pick`.
    Picked(Vec<String>),
    /// The server shut down cleanly.
    Served,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the model, selecting words or serving
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use themeword_cli::cli::{
/// #     Cli, Command, CommandOutcome, ModelArgs, ModelFormat, PickCommand, SelectorArgs, run_cli,
/// # };
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "tea\tcoffee,biscuit,kettle\n")?;
/// let cli = Cli {
///     command: Command::Pick(PickCommand {
///         model: ModelArgs {
///             model: file.path().to_path_buf(),
///             format: ModelFormat::Thesaurus,
///             limit: None,
///             name: None,
///         },
///         selector: SelectorArgs::default(),
///         theme: "tea".into(),
///         count: 2,
///         single_word: false,
///         exclude: None,
///         max_length: 20,
///         seed: Some(7),
///     }),
/// };
/// let CommandOutcome::Picked(words) = run_cli(cli)? else { unreachable!() };
/// assert_eq!(words.len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutcome, CliError> {
    match cli.command {
        Command::Pick(pick) => {
            Span::current().record("command", "pick");
            run_pick(pick).map(CommandOutcome::Picked)
        }
        Command::Serve(serve) => {
            Span::current().record("command", "serve");
            run_serve(serve).map(|()| CommandOutcome::Served)
        }
    }
}

#[instrument(
    name = "cli.pick",
    err,
    skip(command),
    fields(theme = %command.theme, count = command.count, picked = field::Empty),
)]
pub(super) fn run_pick(command: PickCommand) -> Result<Vec<String>, CliError> {
    let selector = command.selector.builder().build(load_provider(&command.model)?)?;
    let request = WordRequest::builder(command.theme)
        .with_signed_count(command.count)
        .with_allow_multiword(!command.single_word)
        .with_already_used(
            command
                .exclude
                .as_deref()
                .map(ExclusionSet::from_comma_separated)
                .unwrap_or_default(),
        )
        .with_max_length(command.max_length)
        .build()?;
    let words = match command.seed {
        Some(seed) => selector.pick_words_with_rng(&request, &mut SmallRng::seed_from_u64(seed))?,
        None => selector.pick_words(&request)?,
    };
    Span::current().record("picked", words.len());
    Ok(words)
}

#[instrument(name = "cli.serve", err, skip(command), fields(bind = %command.bind))]
pub(super) fn run_serve(command: ServeCommand) -> Result<(), CliError> {
    let bind = command.bind;
    let server_error = |source| CliError::Server { bind, source };
    let selector: WordSelector<SharedProvider> = command
        .selector
        .builder()
        .build(load_provider(&command.model)?)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(server_error)?;
    runtime
        .block_on(async move {
            let listener = tokio::net::TcpListener::bind(bind).await?;
            info!(addr = %listener.local_addr()?, "words API listening");
            server::serve(listener, Arc::new(selector)).await
        })
        .map_err(server_error)
}

/// Loads the model described by `args`.
///
/// # Errors
/// Returns [`CliError::Embedding`] or [`CliError::Thesaurus`] when the file
/// cannot be read or parsed.
#[instrument(
    name = "cli.load_model",
    err,
    skip(args),
    fields(path = %args.model.display(), format = args.format.as_str()),
)]
pub fn load_provider(args: &ModelArgs) -> Result<SharedProvider, CliError> {
    let name = derive_model_name(&args.model, args.name.as_deref());
    let path = &args.model;
    let embedding = |format| {
        EmbeddingProvider::open(name.clone(), path, format, args.limit)
            .map(|provider| Arc::new(provider) as SharedProvider)
            .map_err(|source| CliError::Embedding {
                path: path.clone(),
                source,
            })
    };
    match args.format {
        ModelFormat::Word2vecText => embedding(Word2VecFormat::Text),
        ModelFormat::Word2vecBinary => embedding(Word2VecFormat::Binary),
        ModelFormat::Thesaurus => ThesaurusProvider::open(name.clone(), path)
            .map(|provider| Arc::new(provider) as SharedProvider)
            .map_err(|source| CliError::Thesaurus {
                path: path.clone(),
                source,
            }),
    }
}

pub(super) fn derive_model_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "model".to_owned(), ToOwned::to_owned)
}

/// Writes `words` to `writer`, one per line.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use themeword_cli::cli::render_words;
/// let mut buffer = Vec::new();
/// render_words(&["snow".to_owned(), "ice skating".to_owned()], &mut buffer)?;
/// assert_eq!(buffer, b"snow\nice skating\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_words(words: &[String], mut writer: impl Write) -> io::Result<()> {
    for word in words {
        writeln!(writer, "{word}")?;
    }
    Ok(())
}
