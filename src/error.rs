use thiserror::Error;

use crate::domain::FunctionId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Credential and token-exchange errors.
///
/// These always propagate unmodified: a credential failure aborts the
/// batch under both error strategies and is never downgraded to a
/// per-response fault.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("app key secret is malformed: {reason}")]
    Format { reason: String },

    #[error("failed to fetch app key secret '{name}': {message}")]
    Fetch { name: String, message: String },

    #[error("auth server returned an unexpected response (status {status}): {body}")]
    AuthServerResponse { status: u16, body: String },
}

/// Service-directory (CSDS) lookup errors.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("no host registered for service '{service}'")]
    NotFound { service: String },

    #[error("service directory lookup failed: {message}")]
    Lookup { message: String },
}

/// OS-level network failure classification.
///
/// Assigned once at the point of failure and matched exhaustively
/// downstream; never re-derived by inspecting error shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    ConnectionReset,
    NotFound,
    TimedOut,
    SocketTimedOut,
    ConnectionRefused,
    HostUnreachable,
    BrokenPipe,
    DnsRetry,
    /// Anything outside the known transient set. Never retried.
    Other,
}

impl NetworkErrorKind {
    /// Stable wire name for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionReset => "connection-reset",
            Self::NotFound => "not-found",
            Self::TimedOut => "timed-out",
            Self::SocketTimedOut => "socket-timed-out",
            Self::ConnectionRefused => "connection-refused",
            Self::HostUnreachable => "host-unreachable",
            Self::BrokenPipe => "broken-pipe",
            Self::DnsRetry => "dns-retry",
            Self::Other => "other",
        }
    }

    /// Whether this kind is transient enough to retry by default.
    #[must_use]
    pub const fn is_retriable(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Failure of a single HTTP exchange at the transport boundary.
#[derive(Error, Debug, Clone)]
#[error("network error ({}): {message}", .kind.as_str())]
pub struct TransportError {
    pub kind: NetworkErrorKind,
    pub message: String,
}

/// Terminal classification of a failed invocation.
///
/// Carries everything the caller needs to act on the failure: the target,
/// the status/body/headers for HTTP-level failures, the network kind for
/// transport failures.
#[derive(Error, Debug, Clone)]
pub enum InvocationError {
    #[error("batch deadline of {budget_ms} ms elapsed")]
    BatchTimeout { budget_ms: u64 },

    #[error("function '{target}' exceeded its {budget_ms} ms call budget")]
    PerCallTimeout { target: FunctionId, budget_ms: u64 },

    #[error("function '{target}' returned status {status}")]
    Status {
        target: FunctionId,
        status: u16,
        body: String,
        headers: Vec<(String, String)>,
    },

    #[error("network failure calling '{target}' ({}): {message}", .kind.as_str())]
    Network {
        target: FunctionId,
        kind: NetworkErrorKind,
        message: String,
    },

    #[error("invocation of '{target}' failed: {message}")]
    Unknown { target: FunctionId, message: String },
}

impl InvocationError {
    /// Stable wire code identifying the failure class.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BatchTimeout { .. } => "batch-timeout",
            Self::PerCallTimeout { .. } => "per-call-timeout",
            Self::Status { .. } => "invocation-status",
            Self::Network { .. } => "network",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// HTTP status code, for status-classified failures.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response headers, for status-classified failures.
    #[must_use]
    pub fn response_headers(&self) -> Option<&[(String, String)]> {
        match self {
            Self::Status { headers, .. } => Some(headers),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Which component classified this error.
    #[must_use]
    pub const fn component(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Credential(_) => "credentials",
            Self::Directory(_) => "directory",
            Self::Invocation(_) => "invocation",
            Self::Transport(_) | Self::Http(_) => "transport",
            Self::Json(_) | Self::Url(_) => "internal",
        }
    }

    /// Stable wire code for the failure class.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Credential(CredentialError::Format { .. }) => "credential-format",
            Self::Credential(CredentialError::Fetch { .. }) => "credential-fetch",
            Self::Credential(CredentialError::AuthServerResponse { .. }) => {
                "auth-server-response"
            }
            Self::Directory(DirectoryError::NotFound { .. }) => "service-not-found",
            Self::Directory(DirectoryError::Lookup { .. }) => "directory-lookup",
            Self::Invocation(inner) => inner.code(),
            Self::Transport(_) | Self::Http(_) => "network",
            Self::Json(_) => "json",
            Self::Url(_) => "url",
        }
    }

    /// HTTP status code carried by the failure, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Invocation(inner) => inner.status_code(),
            Self::Credential(CredentialError::AuthServerResponse { status, .. }) => {
                Some(*status)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
