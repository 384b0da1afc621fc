// src/error.rs
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::powerdns::types::ChangeType;
use crate::validation::ValidationError;

/// Error body PowerDNS attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponseBody {
    pub error: String,
}

/// Failures of a single call against the PowerDNS API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("PowerDNS rejected {method} {path} with {status}: {message}")]
    Rejected {
        method: Method,
        path: String,
        status: StatusCode,
        message: String,
    },

    #[error("malformed response from {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn transport<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        ApiError::Transport(Box::new(err))
    }

    /// Builds a rejection from a raw error body, preferring PowerDNS's `error` field.
    pub fn rejected(method: Method, path: impl Into<String>, status: StatusCode, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ErrorResponseBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => String::from_utf8_lossy(body).trim().to_string(),
        };
        ApiError::Rejected {
            method,
            path: path.into(),
            status,
            message,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::transport(err)
    }
}

/// Failure of a locate/provision/normalize/mutate step, naming what it was working on.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationError),

    #[error("locating zone for {name} failed: {source}")]
    Locate {
        name: String,
        #[source]
        source: ApiError,
    },

    #[error("no managed zone governs {0}")]
    NoOwningZone(String),

    #[error("cannot provision zone {0}: no nameservers configured")]
    NoNameservers(String),

    #[error("provisioning zone {zone} failed: {source}")]
    Provision {
        zone: String,
        #[source]
        source: ApiError,
    },

    #[error("normalizing SOA-EDIT-API of zone {zone} failed: {source}")]
    Normalize {
        zone: String,
        #[source]
        source: ApiError,
    },

    #[error("{changetype} of {rrtype} {name} in zone {zone} failed: {source}")]
    Mutate {
        zone: String,
        name: String,
        rrtype: String,
        changetype: ChangeType,
        #[source]
        source: ApiError,
    },
}
