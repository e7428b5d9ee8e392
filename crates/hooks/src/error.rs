//! Invocation failures, kept in distinct outward categories so a
//! caller can tell "bad payload" from "the hook itself failed".

use thiserror::Error;

use gantry_codec::{DecodeError, EncodeError};

/// An error raised by hook implementation code, as opposed to the
/// codec or the dispatch machinery around it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookFault {
    pub message: String,
}

impl HookFault {
    pub fn new(message: impl Into<String>) -> Self {
        HookFault {
            message: message.into(),
        }
    }
}

/// Outward failure category of an [`InvokeError`]; the transport layer
/// maps these to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCategory {
    /// No such app or hook.
    Routing,
    /// The caller's payloads are missing or undecodable.
    Payload,
    /// The hook's own result failed to encode.
    Codec,
    /// The hook implementation raised.
    Hook,
}

impl FaultCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCategory::Routing => "routing",
            FaultCategory::Payload => "payload",
            FaultCategory::Codec => "codec",
            FaultCategory::Hook => "hook",
        }
    }
}

/// Errors surfaced by [`invoke`](crate::invoke).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokeError {
    #[error("unknown app '{0}'")]
    UnknownApp(String),

    #[error("app '{app}' has no hook '{hook}'")]
    UnknownHook { app: String, hook: String },

    #[error("missing payload for parameter '{0}'")]
    MissingParameter(String),

    #[error("invalid payload for parameter '{name}': {source}")]
    InvalidParameter {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("failed to encode result of hook '{hook}': {source}")]
    ResultEncode {
        hook: String,
        #[source]
        source: EncodeError,
    },

    #[error("hook '{hook}' failed: {source}")]
    HookFailed {
        hook: String,
        #[source]
        source: HookFault,
    },
}

impl InvokeError {
    pub fn category(&self) -> FaultCategory {
        match self {
            InvokeError::UnknownApp(_) | InvokeError::UnknownHook { .. } => FaultCategory::Routing,
            InvokeError::MissingParameter(_) | InvokeError::InvalidParameter { .. } => {
                FaultCategory::Payload
            }
            InvokeError::ResultEncode { .. } => FaultCategory::Codec,
            InvokeError::HookFailed { .. } => FaultCategory::Hook,
        }
    }
}
