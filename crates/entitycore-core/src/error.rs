use entitycore_io::FileError;

/// Failure categories a transport implementation can report.
///
/// Only the transient kinds are eligible for retry during multipart part
/// uploads; [`TransportKind::Other`] covers everything that is not safely
/// retryable (TLS setup, malformed URLs, request construction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Connect,
    ReadTimeout,
    WriteTimeout,
    Protocol,
    Other,
}

impl TransportKind {
    pub fn is_transient(&self) -> bool {
        !matches!(self, TransportKind::Other)
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransportKind::Connect => "connect",
            TransportKind::ReadTimeout => "read timeout",
            TransportKind::WriteTimeout => "write timeout",
            TransportKind::Protocol => "protocol",
            TransportKind::Other => "transport",
        };
        f.write_str(name)
    }
}

/// A network-level failure, before any HTTP status was obtained.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    pub kind: TransportKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Error taxonomy for the entitycore client.
///
/// Everything propagates to the caller; the only local recovery happens in
/// the retry executor, and only for the transient [`Error::Transport`] kinds
/// it is configured with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("result is empty")]
    EmptyResult,

    #[error("result has more than one item")]
    MultipleResults,

    #[error("pagination {field} mismatch: requested {expected}, server reported {actual}")]
    PaginationMismatch {
        field: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("server error: {method} {url} returned {status}\nrequest: {request}\nresponse: {response}")]
    Server {
        method: String,
        url: String,
        status: u16,
        request: String,
        response: String,
    },

    #[error("upload of part {part_number} failed")]
    PartUpload {
        part_number: u32,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    File(#[from] FileError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
