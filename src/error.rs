use std::fmt::{Debug, Display, Formatter};

/// Machine-readable error class.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad user input: command-line arguments, malformed lines, out-of-range timestamps.
    InvalidArgument,

    /// Network outage, I/O failure, or a programming error.
    Internal,

    /// The error has not been classified, which usually means it is not handled properly.
    Unknown,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::InvalidArgument => "invalid-argument",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
        })
    }
}

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Tagged domain error.
///
/// Each layer names the operation it was performing and may override the kind and
/// the user-facing message. When a layer leaves them unset, [`Error::kind`] and
/// [`Error::message`] look through to the wrapped [`Error`].
///
/// `Display` renders this layer only, the wrapped errors are reachable through
/// [`std::error::Error::source`].
#[must_use]
#[derive(thiserror::Error)]
#[error("{op}{}{}", kind_tag(.kind.as_ref()), message_tag(.message.as_deref()))]
pub struct Error {
    kind: Option<ErrorKind>,

    /// Human-readable message for external developers.
    message: Option<String>,

    /// Operation being performed, usually the name of the failing step.
    op: &'static str,

    #[source]
    source: Option<Source>,
}

impl Error {
    pub const fn new(op: &'static str) -> Self {
        Self { kind: None, message: None, op, source: None }
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<Source>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub const fn op(&self) -> &'static str {
        self.op
    }

    /// Explicit kind of this error, or the kind of the wrapped one.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind.unwrap_or_else(|| self.inner().map_or(ErrorKind::Unknown, Self::kind))
    }

    /// Message safe to show to external developers.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_else(|| {
            self.inner().map_or("please contact technical support", Self::message)
        })
    }

    fn inner(&self) -> Option<&Self> {
        self.source.as_deref().and_then(|source| source.downcast_ref::<Self>())
    }
}

fn kind_tag(kind: Option<&ErrorKind>) -> String {
    kind.map(|kind| format!(" <{kind}>")).unwrap_or_default()
}

fn message_tag(message: Option<&str>) -> String {
    message.map(|message| format!(": {message}")).unwrap_or_default()
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind())
            .field("op", &self.op)
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}
