use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error preserved when a step wraps an underlying failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// Programmer error caught before any network call is made.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error(transparent)]
    Validation(#[from] AggregateError),
    #[error("writing policy {name}: {source}")]
    PolicyWrite {
        name: String,
        #[source]
        source: BoxError,
    },
    #[error("writing kubernetes auth role at {path}: {source}")]
    RoleWrite {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
    /// Non-success response from the backend, body preserved verbatim.
    #[error("backend returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("json payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Ordered collection of validation failures reported as one error value.
///
/// Validation passes collect every failure they find and combine them here
/// instead of short-circuiting on the first. Messages keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateError {
    messages: Vec<String>,
}

impl AggregateError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine a list of errors, or `None` when the list is empty.
    pub fn from_errors<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: fmt::Display,
    {
        let messages: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
        if messages.is_empty() {
            None
        } else {
            Some(Self { messages })
        }
    }

    pub fn push(&mut self, error: impl fmt::Display) {
        self.messages.push(error.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Individual failure messages, in the order they were collected.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// `Ok` when nothing was collected, otherwise the combined error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join(", "))
    }
}

impl std::error::Error for AggregateError {}
