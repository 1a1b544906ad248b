//! HTTP surface for word selection.
//!
//! `GET /` answers a liveness probe and `GET /words` maps loosely typed query
//! parameters onto a [`WordRequest`]. Selection is CPU bound, so it runs on
//! Tokio's blocking pool.

use std::{io, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use themeword_core::{ExclusionSet, SelectionError, WordRequest, WordSelector};
use tokio::net::TcpListener;
use tracing::{Span, field, info, instrument, warn};

use crate::cli::SharedProvider;

/// Body returned by `GET /`.
pub const LIVENESS_MESSAGE: &str = "Words API is working!";

/// Selector shared by every request.
pub type SharedSelector = Arc<WordSelector<SharedProvider>>;

/// Query string accepted by `GET /words`.
///
/// Every field is optional here so validation errors use the JSON error body
/// rather than the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RawWordsQuery {
    /// Theme to pick words for.
    pub theme: Option<String>,
    /// Signed word count.
    pub count: Option<String>,
    /// Boolean allowing multi-word phrases.
    pub allow_multiword: Option<String>,
    /// Comma-separated exclusions.
    pub already_used: Option<String>,
    /// Letter ceiling per word.
    pub max_length: Option<String>,
}

/// Errors returned by `GET /words`.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required parameter was absent.
    #[error("missing required parameter `{name}`")]
    MissingParameter {
        /// Parameter name.
        name: &'static str,
    },
    /// A parameter was not a valid integer.
    #[error("parameter `{name}` must be an integer (got `{raw}`)")]
    InvalidInteger {
        /// Parameter name.
        name: &'static str,
        /// Raw value supplied by the client.
        raw: String,
    },
    /// `allow_multiword` was not a recognised boolean.
    #[error("parameter `allow_multiword` must be true/false/1/0/yes/no (got `{raw}`)")]
    InvalidBoolean {
        /// Raw value supplied by the client.
        raw: String,
    },
    /// Request validation or selection failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// The blocking selection task did not complete.
    #[error("selection task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl RequestError {
    /// Stable machine-readable code for the error body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "REQUEST_MISSING_PARAMETER",
            Self::InvalidInteger { .. } => "REQUEST_INVALID_INTEGER",
            Self::InvalidBoolean { .. } => "REQUEST_INVALID_BOOLEAN",
            Self::Selection(error) => error.code().as_str(),
            Self::Worker(_) => "REQUEST_WORKER_FAILED",
        }
    }

    /// HTTP status for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Selection(error) if !error.is_client_error() => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// JSON body describing a failed request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable code.
    pub code: String,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, code = self.code(), "words request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code().to_owned(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parses `raw` into a validated [`WordRequest`].
///
/// # Errors
/// Returns [`RequestError`] when a parameter is missing or malformed, or when
/// the request fails core validation.
///
/// # Examples
/// ```
/// use themeword_cli::server::{RawWordsQuery, parse_request};
///
/// let request = parse_request(RawWordsQuery {
///     theme: Some("winter".into()),
///     count: Some("-4".into()),
///     allow_multiword: Some("No".into()),
///     ..RawWordsQuery::default()
/// })?;
/// assert_eq!(request.count(), 0);
/// assert!(!request.allow_multiword());
/// # Ok::<(), themeword_cli::server::RequestError>(())
/// ```
pub fn parse_request(raw: RawWordsQuery) -> Result<WordRequest, RequestError> {
    let theme = raw
        .theme
        .ok_or(RequestError::MissingParameter { name: "theme" })?;
    let count = raw
        .count
        .ok_or(RequestError::MissingParameter { name: "count" })?;
    let mut builder =
        WordRequest::builder(theme).with_signed_count(parse_integer::<i64>("count", &count)?);
    if let Some(allow) = raw.allow_multiword {
        builder = builder.with_allow_multiword(parse_bool(&allow)?);
    }
    if let Some(used) = raw.already_used {
        builder = builder.with_already_used(ExclusionSet::from_comma_separated(&used));
    }
    if let Some(max_length) = raw.max_length {
        builder = builder.with_max_length(parse_integer::<usize>("max_length", &max_length)?);
    }
    Ok(builder.build()?)
}

fn parse_integer<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, RequestError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| RequestError::InvalidInteger {
            name,
            raw: raw.to_owned(),
        })
}

fn parse_bool(raw: &str) -> Result<bool, RequestError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(RequestError::InvalidBoolean {
            raw: raw.to_owned(),
        }),
    }
}

/// Builds the words API router.
pub fn router(selector: SharedSelector) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/words", get(words))
        .with_state(selector)
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

#[instrument(
    name = "http.words",
    err(Display),
    skip_all,
    fields(theme = field::Empty, count = field::Empty, returned = field::Empty),
)]
async fn words(
    State(selector): State<SharedSelector>,
    Query(raw): Query<RawWordsQuery>,
) -> Result<Json<Vec<String>>, RequestError> {
    let request = parse_request(raw)?;
    let span = Span::current();
    span.record("theme", request.theme());
    span.record("count", request.count());
    let words =
        tokio::task::spawn_blocking(move || selector.pick_words(&request)).await??;
    span.record("returned", words.len());
    Ok(Json(words))
}

/// Serves the words API on `listener` until Ctrl-C.
///
/// # Errors
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, selector: SharedSelector) -> io::Result<()> {
    axum::serve(listener, router(selector))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
