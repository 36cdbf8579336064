//! Fetching RDAP resources from a list of servers.
//!
//! A [`Fetcher`] takes a list of candidate server URIs and a query and
//! returns the first usable response. There are two implementations:
//!
//! * [`DefaultFetcher`] sends the query to each of the candidates in turn
//!   until one of them answers successfully, and
//! * [`BootstrapFetcher`] wraps another fetcher and replaces the candidates
//!   with the servers listed in the bootstrap registry for the query before
//!   handing over to it.
//!
//! Which of the two is used, and whether bootstrapping happens at all, is
//! decided when the fetcher is constructed:
//!
//! ```no_run
//! # #[cfg(feature = "ureq")] {
//! use rdap::fetch::{BootstrapFetcher, DefaultFetcher, Fetcher};
//! use rdap::transport::UreqClient;
//! use rdap::{Config, QueryType};
//!
//! let config = Config::default();
//! let http = UreqClient::new(&config);
//!
//! // Ask a known server directly.
//! let direct = DefaultFetcher::new(http.clone(), &config);
//! let response = direct.fetch(
//!     &["https://rdap.registro.br".into()],
//!     QueryType::Domain,
//!     "nic.br",
//! );
//!
//! // Find the server through the IANA bootstrap registries first.
//! let bootstrap = BootstrapFetcher::new(direct, http, &config);
//! let response = bootstrap.fetch(&[], QueryType::Autnum, "22548");
//! # }
//! ```
//!
//! Fetchers keep no state between calls other than their configuration.

pub use self::bootstrap::{
    from_cache_header, BootstrapFetcher, CacheDetector, CacheHeader,
};
pub use self::default::DefaultFetcher;

mod bootstrap;
mod default;

use bytes::Bytes;
use http::Response;

use crate::error::Error;
use crate::query::QueryType;

//------------ Fetcher -------------------------------------------------------

/// A type that can fetch an RDAP resource from a list of servers.
pub trait Fetcher {
    /// Fetches the resource for a query.
    ///
    /// The candidates are the base URIs of the servers to try. They may be
    /// empty, in which case it is up to the fetcher to find servers or
    /// fail.
    fn fetch(
        &self,
        uris: &[String],
        query_type: QueryType,
        query_value: &str,
    ) -> Result<Response<Bytes>, Error>;
}

impl<F> Fetcher for F
where
    F: Fn(&[String], QueryType, &str) -> Result<Response<Bytes>, Error>,
{
    fn fetch(
        &self,
        uris: &[String],
        query_type: QueryType,
        query_value: &str,
    ) -> Result<Response<Bytes>, Error> {
        (self)(uris, query_type, query_value)
    }
}
