//! Error types for parsing and DOM operations.
//!
//! Two kinds, per the error taxonomy: [`ParseError`] for failures raised
//! while scanning a buffer, and [`DomError`] for invalid DOM operations.
//! Precondition violations on internal APIs (detached-child requirements,
//! non-empty buffers) are programmer errors and are reported as panics via
//! `debug_assert!`, not through either error type.

use std::fmt;

/// A parse failure, carrying a human-readable message and the byte offset
/// (`p - s`, cursor minus buffer start) at which it was detected.
///
/// The parser is not required to recover: once a `ParseError` is raised,
/// the handler may have received a prefix of events but will not receive
/// `end_document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    offset: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
        }
    }

    /// Byte offset into the input buffer where the error was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte offset {})", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

/// An invalid DOM operation: a document with no root element, or
/// serialization reaching an unreachable node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomError {
    message: String,
}

impl DomError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        DomError {
            message: message.into(),
        }
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomError {}
