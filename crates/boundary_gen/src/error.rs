//! Errors reported by batch generation.

use thiserror::Error;

/// Why a batch could not be generated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The message length divides the capacity, so laying messages end to
    /// end would only ever fill the buffer exactly.
    #[error(
        "buffer capacity {capacity} is an integral multiple of message length {message_length}, try another template"
    )]
    Alignment {
        capacity: usize,
        message_length: usize,
    },

    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Inputs rejected before any message is rendered past index 0.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    #[error("template rendered an empty message for index 0")]
    EmptyMessage,

    /// `count * message_length` does not fit in `usize`.
    #[error("a batch of {message_count} messages of {message_length} bytes overflows the address space")]
    TooLarge {
        message_count: usize,
        message_length: usize,
    },

    /// The index outgrew the template's digit width and changed the line length.
    #[error("message {index} is {actual} bytes, expected {expected} (index outgrew the template width?)")]
    VariableLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
