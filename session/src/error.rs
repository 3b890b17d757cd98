//! FILENAME: session/src/error.rs

use filter_parser::FilterError;
use grid_engine::{GridError, GridSpecError, PreferenceError};
use thiserror::Error;
use wire::{ProviderKind, WireError};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned HTTP status {status} with an empty body")]
    Status { status: u16 },

    #[error("Transport failure: {0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot change provider once connected")]
    AlreadyConnected,

    #[error("No provider connection established")]
    NotConnected,

    #[error("No cube is open")]
    NotAttached,

    /// An `<exception>` returned in place of the expected response.
    #[error("{method} failed: {description} (code {code})")]
    Provider {
        method: String,
        code: String,
        native: String,
        kind: String,
        description: String,
        details: Option<String>,
    },

    #[error("Unexpected response from SmartView provider to {method}: {body}")]
    UnexpectedResponse { method: String, body: String },

    #[error("Malformed {method} response: {detail}")]
    Malformed { method: String, detail: String },

    #[error("{operation} is not supported by {provider} providers")]
    UnsupportedOperation {
        operation: &'static str,
        provider: ProviderKind,
    },

    #[error("Invalid session configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Cannot read session configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Spec(#[from] GridSpecError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Preference(#[from] PreferenceError),
}
