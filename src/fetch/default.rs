//! Fetching directly from a list of servers.

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{Request, Response, StatusCode};
use tracing::{debug, trace};
use url::Url;

use super::Fetcher;
use crate::config::Config;
use crate::error::Error;
use crate::protocol::{ProtocolError, RDAP_MEDIA_TYPE};
use crate::query::QueryType;
use crate::transport::HttpClient;

//------------ DefaultFetcher ------------------------------------------------

/// A fetcher sending queries to the given servers one after another.
///
/// For every candidate, the fetcher sends a request for
/// `<uri>/<query type>/<query value>`. The first response that has a
/// success status code and is an RDAP response is returned. Any other
/// outcome is remembered and the next candidate is tried. If no candidate
/// succeeds, the error of the last one is returned.
///
/// A 404 response results in [`Error::NotFound`], a response that isn’t an
/// RDAP response in [`Error::UnexpectedResponse`], and other error status
/// codes in [`Error::Protocol`] carrying the error description from the
/// response body.
#[derive(Clone, Debug)]
pub struct DefaultFetcher<H> {
    /// The HTTP client to send requests with.
    http: H,

    /// Value of the User-Agent header.
    user_agent: String,

    /// Value of the X-Forwarded-For header, if any.
    x_forwarded_for: Option<String>,
}

impl<H> DefaultFetcher<H> {
    /// Creates a new fetcher atop the given HTTP client.
    pub fn new(http: H, config: &Config) -> Self {
        DefaultFetcher {
            http,
            user_agent: config.user_agent().into(),
            x_forwarded_for: config.x_forwarded_for().map(Into::into),
        }
    }

    /// Returns a reference to the HTTP client.
    pub fn http(&self) -> &H {
        &self.http
    }
}

impl<H: HttpClient> DefaultFetcher<H> {
    /// Fetches the resource from a single server.
    fn fetch_one(
        &self,
        base: &str,
        query_type: QueryType,
        query_value: &str,
    ) -> Result<Response<Bytes>, Error> {
        let uri = request_uri(base, query_type, query_value)?;
        let mut request = Request::get(uri.as_str())
            .header(ACCEPT, RDAP_MEDIA_TYPE)
            .header(USER_AGENT, self.user_agent.as_str());
        if let Some(addr) = &self.x_forwarded_for {
            request = request.header("X-Forwarded-For", addr.as_str());
        }
        let request =
            request.body(()).map_err(|_| Error::InvalidUri(uri.clone()))?;

        debug!("querying {}", uri);
        classify(self.http.send(request)?)
    }
}

impl<H: HttpClient> Fetcher for DefaultFetcher<H> {
    fn fetch(
        &self,
        uris: &[String],
        query_type: QueryType,
        query_value: &str,
    ) -> Result<Response<Bytes>, Error> {
        let mut last_err = Error::NoCandidates;
        for uri in uris {
            match self.fetch_one(uri, query_type, query_value) {
                Ok(response) => return Ok(response),
                Err(err) => {
                    debug!("query to {} failed: {}", uri, err);
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}

/// Builds the URI of the request for a query to a server.
///
/// The query value is percent-encoded. Only IP networks keep their `/`
/// since the prefix length is a path segment of its own.
fn request_uri(
    base: &str,
    query_type: QueryType,
    query_value: &str,
) -> Result<String, Error> {
    let invalid = || Error::InvalidUri(base.into());
    let mut uri = Url::parse(base).map_err(|_| invalid())?;
    {
        let mut segments = uri.path_segments_mut().map_err(|_| invalid())?;
        segments.pop_if_empty().push(query_type.path_segment());
        match query_type {
            QueryType::IpNetwork => segments.extend(query_value.split('/')),
            _ => segments.push(query_value),
        };
    }
    Ok(uri.into())
}

/// Decides whether a response is usable.
fn classify(response: Response<Bytes>) -> Result<Response<Bytes>, Error> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound);
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    if !content_type.map_or(false, is_rdap_media_type) {
        trace!("unexpected content type {:?}", content_type);
        return Err(Error::UnexpectedResponse {
            status,
            content_type: content_type.map(Into::into),
        });
    }

    if !status.is_success() {
        let err: ProtocolError = serde_json::from_slice(response.body())?;
        return Err(err.into());
    }

    Ok(response)
}

/// Returns whether a Content-Type value is the RDAP media type.
///
/// Parameters such as a charset are ignored.
fn is_rdap_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map_or(false, |essence| {
            essence.trim().eq_ignore_ascii_case(RDAP_MEDIA_TYPE)
        })
}

//============ Testing =======================================================
