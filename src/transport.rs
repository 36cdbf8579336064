//! Sending HTTP requests.
//!
//! All HTTP traffic goes through the [`HttpClient`] trait. It is small on
//! purpose so that it is easy to slip in a caching layer or a test double.
//! Any closure taking a request and returning a response implements the
//! trait. Fetchers that need the client in more than one place clone it,
//! so clients should be cheap to clone.
//!
//! With the `ureq` feature enabled, [`UreqClient`] provides a blocking
//! client for the real world.

use std::error;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};

//------------ HttpClient ----------------------------------------------------

/// A type that can exchange an HTTP request for a response.
///
/// Implementations must return responses of all status codes as a
/// response. Only failing to get a response at all, such as when the
/// connection can’t be established, is an error.
pub trait HttpClient {
    /// Sends a request and waits for the complete response.
    fn send(
        &self,
        request: Request<()>,
    ) -> Result<Response<Bytes>, TransportError>;
}

impl<F> HttpClient for F
where
    F: Fn(Request<()>) -> Result<Response<Bytes>, TransportError>,
{
    fn send(
        &self,
        request: Request<()>,
    ) -> Result<Response<Bytes>, TransportError> {
        (self)(request)
    }
}

//------------ TransportError ------------------------------------------------

/// Getting a response failed.
#[derive(Clone)]
pub struct TransportError(Arc<dyn error::Error + Send + Sync>);

impl TransportError {
    /// Creates a transport error from the underlying error.
    pub fn new(err: impl error::Error + Send + Sync + 'static) -> Self {
        TransportError(Arc::new(err))
    }
}

impl fmt::Debug for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransportError").field(&self.0).finish()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl error::Error for TransportError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

//------------ UreqClient ----------------------------------------------------

#[cfg(feature = "ureq")]
pub use self::ureq_client::UreqClient;

#[cfg(feature = "ureq")]
mod ureq_client {
    use std::io::{self, Read};

    use bytes::Bytes;
    use http::{Request, Response};
    use tracing::trace;

    use super::{HttpClient, TransportError};
    use crate::config::Config;

    /// A blocking HTTP client based on ureq.
    ///
    /// The client keeps a pool of connections, so it is worthwhile to
    /// create it once and share it. Cloning is cheap.
    #[cfg_attr(docsrs, doc(cfg(feature = "ureq")))]
    #[derive(Clone, Debug)]
    pub struct UreqClient {
        agent: ureq::Agent,
    }

    impl UreqClient {
        /// Creates a client using the timeouts and user agent of `config`.
        pub fn new(config: &Config) -> Self {
            let agent = ureq::AgentBuilder::new()
                .timeout_connect(config.connect_timeout())
                .timeout(config.timeout())
                .user_agent(config.user_agent())
                .build();
            UreqClient { agent }
        }

        /// Creates a client from an already configured agent.
        pub fn from_agent(agent: ureq::Agent) -> Self {
            UreqClient { agent }
        }
    }

    impl Default for UreqClient {
        fn default() -> Self {
            Self::new(&Config::default())
        }
    }

    impl HttpClient for UreqClient {
        fn send(
            &self,
            request: Request<()>,
        ) -> Result<Response<Bytes>, TransportError> {
            let uri = request.uri().to_string();
            let mut call =
                self.agent.request(request.method().as_str(), &uri);
            for (name, value) in request.headers() {
                match value.to_str() {
                    Ok(value) => call = call.set(name.as_str(), value),
                    Err(_) => trace!("skipping non-ASCII header {}", name),
                }
            }

            // ureq treats 4xx and 5xx as errors but we want to look at them.
            let response = match call.call() {
                Ok(response) => response,
                Err(ureq::Error::Status(_, response)) => response,
                Err(ureq::Error::Transport(err)) => {
                    return Err(TransportError::new(err))
                }
            };

            let mut builder = Response::builder().status(response.status());
            for name in response.headers_names() {
                for value in response.all(&name) {
                    builder = builder.header(name.as_str(), value);
                }
            }

            let mut body = Vec::new();
            response
                .into_reader()
                .read_to_end(&mut body)
                .map_err(TransportError::new)?;

            builder.body(Bytes::from(body)).map_err(|err| {
                TransportError::new(io::Error::new(
                    io::ErrorKind::InvalidData,
                    err,
                ))
            })
        }
    }
}

//============ Testing =======================================================
