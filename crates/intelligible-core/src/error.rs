//! Error types for Intelligible Core.

use thiserror::Error;

/// Errors raised while building or signing a document.
///
/// Building functions fail synchronously on malformed input and never leave a
/// partially assembled document behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("missing required field `{field}` in {context}")]
    MissingRequiredField { field: String, context: String },

    #[error("malformed reference id {0:?}: expected '#' followed by a name")]
    MalformedReferenceId(String),

    #[error("unknown reference type: {0}")]
    UnknownReferenceType(String),

    #[error("signatory {0} already signed this document")]
    DuplicateSignature(String),

    #[error("invalid fragment at {path}: {reason}")]
    InvalidFragment { path: String, reason: String },
}

impl DocumentError {
    pub(crate) fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub(crate) fn fragment(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFragment {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Reasons a text could not be read back as a document.
///
/// [`crate::Document::parse`] folds all of these into `None`; use
/// [`crate::Document::try_parse`] when the reason matters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("xml error: {0}")]
    Xml(String),

    #[error("expected root element <{expected}>, found <{found}>")]
    MissingRoot { expected: String, found: String },

    #[error("missing <{0}> section")]
    MissingSection(&'static str),

    #[error("input contains no element")]
    Empty,
}

impl From<quick_xml::Error> for ParseError {
    fn from(e: quick_xml::Error) -> Self {
        ParseError::Xml(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Xml(e.to_string())
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(e: std::str::Utf8Error) -> Self {
        ParseError::Xml(e.to_string())
    }
}
