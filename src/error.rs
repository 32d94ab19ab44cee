//! Domain errors for remote queries and tree assembly.

use thiserror::Error;

/// Errors raised while querying the remote inventory service.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("remote query failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote service returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Errors raised while assembling the ad unit tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("no ad unit with id {0} in the fetched result set")]
    RootNotFound(String),

    #[error("parent cycle detected at ad unit {0}")]
    Cycle(String),
}
