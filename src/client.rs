//! A client for querying RDAP servers.
//!
//! [`Client`] is a thin layer atop a [`Fetcher`] that turns typed queries
//! into fetches and optionally decodes the response.
//!
//! ```no_run
//! # #[cfg(all(feature = "ureq", feature = "resolv"))] {
//! use rdap::{Client, Config};
//!
//! let client = Client::bootstrap(&Config::default());
//! let domain: serde_json::Value = client
//!     .query_as(&"nic.br".parse().unwrap())
//!     .unwrap();
//! println!("{}", domain["handle"]);
//! # }
//! ```

use std::net::IpAddr;

use bytes::Bytes;
use http::Response;
use ipnet::IpNet;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::fetch::Fetcher;
use crate::query::Query;

//------------ Client --------------------------------------------------------

/// A client sending queries through a fetcher.
///
/// The client keeps a list of server URIs that is passed to the fetcher
/// with every query. With a [`BootstrapFetcher`][crate::BootstrapFetcher],
/// the list can be empty since the servers are taken from the bootstrap
/// registries. It is only used for entity queries then.
#[derive(Clone, Debug)]
pub struct Client<F> {
    /// The fetcher performing the queries.
    fetcher: F,

    /// The server URIs to hand to the fetcher.
    uris: Vec<String>,
}

impl<F> Client<F> {
    /// Creates a client without any server URIs.
    pub fn new(fetcher: F) -> Self {
        Self::with_uris(fetcher, Vec::new())
    }

    /// Creates a client sending queries to the given servers.
    pub fn with_uris(fetcher: F, uris: Vec<String>) -> Self {
        Client { fetcher, uris }
    }

    /// Returns a reference to the fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the server URIs.
    pub fn uris(&self) -> &[String] {
        &self.uris
    }
}

impl<F: Fetcher> Client<F> {
    /// Performs a query and returns the raw response.
    pub fn query(&self, query: &Query) -> Result<Response<Bytes>, Error> {
        self.fetcher
            .fetch(&self.uris, query.query_type(), &query.value())
    }

    /// Performs a query and decodes the response body.
    ///
    /// Use [`serde_json::Value`] to get the response as is or your own
    /// type describing the objects you are interested in.
    pub fn query_as<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> Result<T, Error> {
        let response = self.query(query)?;
        Ok(serde_json::from_slice(response.body())?)
    }

    /// Queries a free-form object.
    ///
    /// The kind of object is guessed as described for the
    /// [`FromStr`][std::str::FromStr] impl of [`Query`].
    pub fn query_str(&self, object: &str) -> Result<Response<Bytes>, Error> {
        self.query(&object.parse::<Query>()?)
    }

    /// Queries a domain name.
    pub fn domain(&self, name: &str) -> Result<Response<Bytes>, Error> {
        self.query(&Query::domain(name)?)
    }

    /// Queries an autonomous system number.
    pub fn autnum(&self, asn: u32) -> Result<Response<Bytes>, Error> {
        self.query(&Query::Autnum(asn))
    }

    /// Queries an IP address.
    pub fn ip(&self, addr: IpAddr) -> Result<Response<Bytes>, Error> {
        self.query(&Query::IpAddress(addr))
    }

    /// Queries an IP network.
    pub fn ip_network(&self, net: IpNet) -> Result<Response<Bytes>, Error> {
        self.query(&Query::IpNetwork(net))
    }

    /// Queries an entity by its handle.
    pub fn entity(&self, handle: &str) -> Result<Response<Bytes>, Error> {
        self.query(&Query::entity(handle))
    }
}

#[cfg(feature = "ureq")]
impl Client<crate::fetch::DefaultFetcher<crate::transport::UreqClient>> {
    /// Creates a client querying the given servers directly.
    #[cfg_attr(docsrs, doc(cfg(feature = "ureq")))]
    pub fn direct(uris: Vec<String>, config: &crate::config::Config) -> Self {
        let http = crate::transport::UreqClient::new(config);
        Self::with_uris(crate::fetch::DefaultFetcher::new(http, config), uris)
    }
}

#[cfg(all(feature = "ureq", feature = "resolv"))]
impl
    Client<
        crate::fetch::BootstrapFetcher<
            crate::fetch::DefaultFetcher<crate::transport::UreqClient>,
            crate::transport::UreqClient,
            crate::resolv::StubNsLookup,
        >,
    >
{
    /// Creates a client finding servers through the bootstrap registries.
    ///
    /// Registries that appear outdated are checked against the name servers
    /// found through the system’s resolver.
    #[cfg_attr(docsrs, doc(cfg(all(feature = "ureq", feature = "resolv"))))]
    pub fn bootstrap(config: &crate::config::Config) -> Self {
        let http = crate::transport::UreqClient::new(config);
        Self::new(
            crate::fetch::BootstrapFetcher::with_http(http, config)
                .with_ns_lookup(crate::resolv::StubNsLookup::new()),
        )
    }
}

//============ Testing =======================================================
