use std::error::Error as StdError;
use std::fmt;

use serde_json::error::Category;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Parse,
    Convert,
    InvalidEnum,
    DuplicateKey,
    DepthExceeded,
    Unsupported,
    Io,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    property: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            property: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Classifies an engine error into a facade kind and keeps it as the source.
    pub(crate) fn from_json(err: serde_json::Error) -> Self {
        let kind = classify(&err);
        Error::new(kind).with_source(err)
    }
}

// serde_json does not expose the depth-cap, unknown-variant, or custom-marker
// conditions structurally, so classification reads the stable message text.
fn classify(err: &serde_json::Error) -> ErrorKind {
    let text = err.to_string();
    match err.classify() {
        Category::Io => ErrorKind::Io,
        Category::Syntax | Category::Eof => {
            if text.contains("recursion limit exceeded") {
                ErrorKind::DepthExceeded
            } else {
                ErrorKind::Parse
            }
        }
        Category::Data => {
            if text.contains("unknown variant") {
                ErrorKind::InvalidEnum
            } else if text.contains("write-only") {
                ErrorKind::Unsupported
            } else {
                ErrorKind::Convert
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(property) = &self.property {
            write!(f, " (property: {property})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}
