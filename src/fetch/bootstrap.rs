//! Finding the servers for a query through the bootstrap registries.

use bytes::Bytes;
use http::header::{ACCEPT, CACHE_CONTROL, USER_AGENT};
use http::{Request, Response, StatusCode};
use tracing::{debug, trace, warn};

use super::default::DefaultFetcher;
use super::Fetcher;
use crate::bootstrap::{prioritize_https, ServiceRegistry};
use crate::config::Config;
use crate::error::Error;
use crate::protocol::JSON_MEDIA_TYPE;
use crate::query::{IdentifierSpace, Query, QueryType};
use crate::resolv::{NoNsLookup, NsLookup};
use crate::transport::HttpClient;

//------------ CacheDetector -------------------------------------------------

/// A type deciding whether a response was served from a cache.
///
/// The bootstrap fetcher only suspects a registry of being outdated if it
/// came out of a cache. Since caching is up to the HTTP client, so is
/// telling cached responses apart. Any closure taking a response and
/// returning a `bool` is a cache detector, which lets a caching client
/// hand out a detector that consults its own state.
pub trait CacheDetector {
    /// Returns whether `response` came out of a cache.
    fn is_cached(&self, response: &Response<Bytes>) -> bool;
}

impl<F> CacheDetector for F
where
    F: Fn(&Response<Bytes>) -> bool,
{
    fn is_cached(&self, response: &Response<Bytes>) -> bool {
        (self)(response)
    }
}

//------------ CacheHeader ---------------------------------------------------

/// Detects cached responses by an `X-From-Cache: 1` header.
///
/// This is the default cache detector. The header is what common caching
/// layers for HTTP clients add to responses they serve from the cache.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheHeader;

impl CacheDetector for CacheHeader {
    fn is_cached(&self, response: &Response<Bytes>) -> bool {
        from_cache_header(response)
    }
}

/// Returns whether a response carries an `X-From-Cache: 1` header.
pub fn from_cache_header(response: &Response<Bytes>) -> bool {
    response
        .headers()
        .get("X-From-Cache")
        .map_or(false, |value| value.as_bytes() == b"1")
}

//------------ BootstrapFetcher ----------------------------------------------

/// A fetcher that finds the servers for a query in the bootstrap registries.
///
/// For domain names, AS numbers, IP addresses, and IP networks, the fetcher
/// downloads the bootstrap registry for the identifier space, picks the
/// service covering the query value, and hands the service’s URIs to the
/// inner fetcher in place of the candidates it was given. HTTPS URIs are
/// moved to the front of the list. Entity queries have no bootstrap
/// registry and go to the inner fetcher with the original candidates.
///
/// # Outdated registries
///
/// If a domain isn’t covered by any service, the registry was served from
/// a cache, and the domain has name servers, the registry is likely older
/// than the delegation of the domain’s top-level domain. In this case,
/// the registry is downloaded once more, asking any caches to revalidate,
/// and matched again. Whether a response came from a cache is decided by
/// the [`CacheDetector`], whether a domain has name servers by the
/// [`NsLookup`]. The default lookup, [`NoNsLookup`], never finds any name
/// servers, so the check is disabled unless a lookup is provided via
/// [`with_ns_lookup`][Self::with_ns_lookup].
#[derive(Clone, Debug)]
pub struct BootstrapFetcher<F, H, N = NoNsLookup, C = CacheHeader> {
    /// The fetcher to delegate the actual query to.
    inner: F,

    /// The HTTP client for downloading bootstrap registries.
    http: H,

    /// The name server lookup for detecting outdated registries.
    ns_lookup: N,

    /// Decides whether a registry came out of a cache.
    cache_detector: C,

    /// The configuration.
    config: Config,
}

impl<F, H> BootstrapFetcher<F, H> {
    /// Creates a new bootstrap fetcher.
    ///
    /// Queries will be sent via `inner` while bootstrap registries are
    /// downloaded with `http` from the location given in `config`.
    pub fn new(inner: F, http: H, config: &Config) -> Self {
        BootstrapFetcher {
            inner,
            http,
            ns_lookup: NoNsLookup,
            cache_detector: CacheHeader,
            config: config.clone(),
        }
    }
}

impl<H: Clone> BootstrapFetcher<DefaultFetcher<H>, H> {
    /// Creates a bootstrap fetcher atop a default fetcher.
    ///
    /// Both the queries and the bootstrap registries use the same client.
    pub fn with_http(http: H, config: &Config) -> Self {
        Self::new(DefaultFetcher::new(http.clone(), config), http, config)
    }
}

impl<F, H, N, C> BootstrapFetcher<F, H, N, C> {
    /// Replaces the name server lookup.
    pub fn with_ns_lookup<M>(
        self,
        ns_lookup: M,
    ) -> BootstrapFetcher<F, H, M, C> {
        BootstrapFetcher {
            inner: self.inner,
            http: self.http,
            ns_lookup,
            cache_detector: self.cache_detector,
            config: self.config,
        }
    }

    /// Replaces the cache detector.
    pub fn with_cache_detector<D>(
        self,
        cache_detector: D,
    ) -> BootstrapFetcher<F, H, N, D> {
        BootstrapFetcher {
            inner: self.inner,
            http: self.http,
            ns_lookup: self.ns_lookup,
            cache_detector,
            config: self.config,
        }
    }

    /// Returns a reference to the inner fetcher.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<F, H, N, C> BootstrapFetcher<F, H, N, C>
where
    H: HttpClient,
    N: NsLookup,
    C: CacheDetector,
{
    /// Returns the URIs of the service responsible for a query.
    ///
    /// The result is empty if no service covers the query.
    fn service_uris(
        &self,
        query: &Query,
        space: IdentifierSpace,
    ) -> Result<Vec<String>, Error> {
        let registry_uri = self.config.bootstrap_uri(space.registry_name());
        let (registry, cached) = self.load_registry(&registry_uri, false)?;

        let uris = match query {
            Query::Domain(name) => {
                let uris = registry.match_domain(name);
                if uris.is_empty() && cached && self.is_delegated(name) {
                    debug!(
                        "{} is delegated but missing from cached {}",
                        name, registry_uri
                    );
                    let (registry, _) =
                        self.load_registry(&registry_uri, true)?;
                    return Ok(registry.match_domain(name).to_vec());
                }
                uris
            }
            Query::Autnum(asn) => registry.match_as(*asn)?,
            Query::IpAddress(addr) => registry.match_ip(*addr)?,
            Query::IpNetwork(net) => registry.match_ip_network(net)?,
            Query::Entity(_) => &[],
        };
        Ok(uris.to_vec())
    }

    /// Downloads and decodes a bootstrap registry.
    ///
    /// Returns the registry and whether it was served from a cache. If
    /// `reload` is set, caches are asked to revalidate the registry.
    fn load_registry(
        &self,
        uri: &str,
        reload: bool,
    ) -> Result<(ServiceRegistry, bool), Error> {
        let mut request = Request::get(uri)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(USER_AGENT, self.config.user_agent());
        if reload {
            request = request.header(CACHE_CONTROL, "max-age=0");
        }
        let request = request
            .body(())
            .map_err(|_| Error::InvalidUri(uri.into()))?;

        debug!("fetching bootstrap registry {}", uri);
        let response = self.http.send(request)?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::NOT_MODIFIED {
            return Err(Error::BootstrapStatus(status));
        }
        let cached = self.cache_detector.is_cached(&response);
        let registry = ServiceRegistry::from_slice(response.body())?;
        trace!(
            "bootstrap registry {} has {} services{}",
            uri,
            registry.services().len(),
            if cached { " (cached)" } else { "" }
        );
        Ok((registry, cached))
    }

    /// Returns whether the domain has name servers.
    ///
    /// A failed lookup counts as not delegated.
    fn is_delegated(&self, name: &str) -> bool {
        match self.ns_lookup.lookup_ns(name) {
            Ok(servers) => !servers.is_empty(),
            Err(err) => {
                warn!("name server lookup for {} failed: {}", name, err);
                false
            }
        }
    }
}

impl<F, H, N, C> Fetcher for BootstrapFetcher<F, H, N, C>
where
    F: Fetcher,
    H: HttpClient,
    N: NsLookup,
    C: CacheDetector,
{
    fn fetch(
        &self,
        uris: &[String],
        query_type: QueryType,
        query_value: &str,
    ) -> Result<Response<Bytes>, Error> {
        let query = Query::parse(query_type, query_value)?;
        let Some(space) = query.identifier_space() else {
            trace!("no bootstrap for {} queries", query_type);
            return self.inner.fetch(uris, query_type, query_value);
        };

        let mut uris = self.service_uris(&query, space)?;
        if uris.is_empty() {
            return Err(Error::NoMatches(query_value.into()));
        }
        prioritize_https(&mut uris);
        debug!("servers for {}: {}", query, uris.join(", "));
        self.inner.fetch(&uris, query_type, &query.value())
    }
}

//============ Testing =======================================================
