//! Error type for fetching RDAP resources.

use std::error;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;

use crate::bootstrap::{MatchError, RegistryError};
use crate::protocol::ProtocolError;
use crate::query::QueryError;
use crate::transport::TransportError;

//------------ Error ---------------------------------------------------------

/// Error type for fetching RDAP resources.
#[derive(Clone, Debug)]
pub enum Error {
    /// There were no servers to send the query to.
    NoCandidates,

    /// The query value is not valid for the query type.
    InvalidQuery(QueryError),

    /// A request URI could not be built from a server’s base URI.
    InvalidUri(String),

    /// Sending a request or receiving its response failed.
    Transport(TransportError),

    /// The server doesn’t have the requested object.
    NotFound,

    /// The response was not an RDAP response.
    UnexpectedResponse {
        /// The status code of the response.
        status: StatusCode,

        /// The content type of the response, if present.
        content_type: Option<String>,
    },

    /// The server returned an error response.
    Protocol(ProtocolError),

    /// A response body could not be decoded.
    Decode(Arc<serde_json::Error>),

    /// Fetching a bootstrap registry returned an unexpected status.
    BootstrapStatus(StatusCode),

    /// A bootstrap registry could not be decoded.
    Registry(RegistryError),

    /// A bootstrap registry contained an invalid entry.
    Match(MatchError),

    /// No bootstrap service covers the given query value.
    NoMatches(String),
}

impl Error {
    /// Returns whether the error means the object doesn’t exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound => true,
            Error::Protocol(err) => err.error_code == 404,
            _ => false,
        }
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::InvalidQuery(err)
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        Error::Protocol(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(Arc::new(err))
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Error::Registry(err)
    }
}

impl From<MatchError> for Error {
    fn from(err: MatchError) -> Self {
        Error::Match(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoCandidates => write!(f, "no RDAP servers to query"),
            Error::InvalidQuery(err) => fmt::Display::fmt(err, f),
            Error::InvalidUri(uri) => write!(f, "invalid request URI {uri}"),
            Error::Transport(err) => fmt::Display::fmt(err, f),
            Error::NotFound => write!(f, "not found"),
            Error::UnexpectedResponse {
                status,
                content_type,
            } => {
                write!(f, "unexpected response: {status}")?;
                if let Some(content_type) = content_type {
                    write!(f, " ({content_type})")?;
                }
                Ok(())
            }
            Error::Protocol(err) => fmt::Display::fmt(err, f),
            Error::Decode(err) => write!(f, "invalid response: {err}"),
            Error::BootstrapStatus(status) => {
                write!(f, "unexpected status code {status}")
            }
            Error::Registry(err) => fmt::Display::fmt(err, f),
            Error::Match(err) => fmt::Display::fmt(err, f),
            Error::NoMatches(value) => write!(f, "no matches for {value}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::NoCandidates => None,
            Error::InvalidQuery(err) => Some(err),
            Error::InvalidUri(_) => None,
            Error::Transport(err) => Some(err),
            Error::NotFound => None,
            Error::UnexpectedResponse { .. } => None,
            Error::Protocol(err) => Some(err),
            Error::Decode(err) => Some(err.as_ref()),
            Error::BootstrapStatus(_) => None,
            Error::Registry(err) => Some(err),
            Error::Match(err) => Some(err),
            Error::NoMatches(_) => None,
        }
    }
}
