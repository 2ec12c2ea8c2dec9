//! ProcessError - processor failure with a kind tag
//!
//! kind はログの詳細度と「再投入するかどうか」だけを決める。

use std::error::Error as StdError;
use std::fmt;

/// Classification of a processor failure.
///
/// `Known` and `Unexpected` take the same retry path; they only differ in how
/// much the drainer logs. `Rejected` is for payloads that can never succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Anticipated failure for one item (malformed or missing source data).
    Known,

    /// Anything else. Logged with the full source chain.
    Unexpected,

    /// No processor can handle this payload. Dropped without retry.
    Rejected,
}

/// Error returned by a [`Processor`](crate::ports::Processor).
#[derive(Debug)]
pub struct ProcessError {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ProcessError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn known(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Known, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rejected, message)
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Is this failure eligible for the requeue path?
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind, ErrorKind::Rejected)
    }

    /// Message plus every `source()` in the chain, one per line.
    pub fn detail(&self) -> String {
        let mut out = format!("{self}");
        let mut next = StdError::source(self);
        while let Some(err) = next {
            out.push_str("\n  caused by: ");
            out.push_str(&err.to_string());
            next = err.source();
        }
        out
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for ProcessError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}
