use std::{error::Error, fmt};

use thiserror::Error as ThisError;

/// The single failure kind surfaced by the data gateway and the supabase
/// client. A non-2xx response carries the status; a transport or decode
/// failure carries the underlying cause instead.
#[derive(Debug)]
pub struct RequestFailed {
    resource: String,
    status: Option<u16>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl RequestFailed {
    pub fn http(resource: impl Into<String>, status: u16) -> Self {
        RequestFailed {
            resource: resource.into(),
            status: Some(status),
            source: None,
        }
    }

    pub fn transport(
        resource: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        RequestFailed {
            resource: resource.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for RequestFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "RequestFailed: {} (status {})", self.resource, code),
            None => write!(f, "RequestFailed: {}", self.resource),
        }
    }
}

impl Error for RequestFailed {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

/// Route parameter extraction failure. Dispatch never produces this (the
/// anchored matcher only accepts paths with the template's segment count);
/// it is reachable through direct extraction calls only.
#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum ParamError {
    #[error("segment count mismatch: template has {template} segments, path has {path}")]
    SegmentCountMismatch { template: usize, path: usize },
}
