#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{Request, Response};
use rdap::transport::{HttpClient, TransportError};
use tracing_subscriber::EnvFilter;

/// Setup logging of events reported by rdap and the test suite.
///
/// Use the RUST_LOG environment variable to override the defaults.
///
/// E.g. To enable debug level logging:
///   RUST_LOG=DEBUG
///
/// Or to log only what the bootstrap fetcher does:
///   RUST_LOG=rdap::fetch::bootstrap=TRACE
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .with_test_writer()
        .try_init()
        .ok();
}

//------------ MockHttp ------------------------------------------------------

/// An HTTP client serving canned responses.
///
/// Requests to data.iana.org are answered from the registries in
/// `test-data/bootstrap`. Everything else is looked up among the objects
/// added via [`MockHttp::with_object`] and results in a 404 if missing.
#[derive(Clone, Default)]
pub struct MockHttp {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    objects: HashMap<String, (u16, String)>,
    cached: bool,
    requests: Vec<String>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an RDAP response for the given URI.
    pub fn with_object(self, uri: &str, status: u16, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(uri.into(), (status, body.into()));
        self
    }

    /// Marks all registry responses as coming from a cache.
    pub fn set_cached(&self, cached: bool) {
        self.state.lock().unwrap().cached = cached;
    }

    /// Returns the URIs of all requests received so far.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    fn registry(&self, path: &str) -> Response<Bytes> {
        let file = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("test-data/bootstrap")
            .join(path.trim_start_matches("/rdap/"));
        let Ok(body) = std::fs::read(file) else {
            return Response::builder().status(404).body(Bytes::new()).unwrap();
        };
        let mut response = Response::builder()
            .status(200)
            .header("Content-Type", "application/json");
        if self.state.lock().unwrap().cached {
            response = response.header("X-From-Cache", "1");
        }
        response.body(Bytes::from(body)).unwrap()
    }
}

impl HttpClient for MockHttp {
    fn send(
        &self,
        request: Request<()>,
    ) -> Result<Response<Bytes>, TransportError> {
        let uri = request.uri().to_string();
        self.state.lock().unwrap().requests.push(uri.clone());

        if request.uri().host() == Some("data.iana.org") {
            return Ok(self.registry(request.uri().path()));
        }

        let object = self.state.lock().unwrap().objects.get(&uri).cloned();
        Ok(match object {
            Some((status, body)) => Response::builder()
                .status(status)
                .header("Content-Type", "application/rdap+json")
                .body(Bytes::from(body))
                .unwrap(),
            None => Response::builder().status(404).body(Bytes::new()).unwrap(),
        })
    }
}
