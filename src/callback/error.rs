use super::event::PayloadSchema;
use std::fmt;

/// Errors raised while preparing or submitting callback invocations.
///
/// A missing callback is never an error; dispatch skips it.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Event name not present in the event table
    UnknownEvent(String),
    /// The payload cannot render the schema one of the event's versions needs
    UnsupportedSchema {
        event: &'static str,
        version: u32,
        schema: PayloadSchema,
    },
    /// Rendering the payload body failed
    Payload(String),
    /// The execution context no longer accepts invocations
    QueueClosed,
    /// A bounded execution context is at capacity
    QueueFull,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownEvent(name) => write!(f, "unknown event '{}'", name),
            DispatchError::UnsupportedSchema {
                event,
                version,
                schema,
            } => write!(
                f,
                "payload cannot render {} schema for '{}' version {}",
                schema, event, version
            ),
            DispatchError::Payload(reason) => write!(f, "failed to build payload: {}", reason),
            DispatchError::QueueClosed => write!(f, "script queue is closed"),
            DispatchError::QueueFull => write!(f, "script queue is full"),
        }
    }
}

impl std::error::Error for DispatchError {}
