//! Registry-driven RDAP server discovery and fetching.
//!
//! The Registration Data Access Protocol (RDAP) spreads its data over many
//! servers. Which server holds the record for a given domain name,
//! autonomous system number, or IP network is published by IANA in a set
//! of bootstrap service registries defined in [RFC 9224]. This crate
//! provides the building blocks for finding the right server and fetching
//! the record from it:
//!
//! * [bootstrap] contains the bootstrap service registry data model and the
//!   algorithms for picking the most specific service for an identifier,
//! * [fetch] contains the [`Fetcher`][fetch::Fetcher] abstraction with a
//!   direct implementation that tries a list of servers in order and a
//!   bootstrapping decorator that first resolves that list through the
//!   registries,
//! * [client] wraps a fetcher into a convenient [`Client`][client::Client].
//!
//! Decoding the returned records into domain, entity, or network objects
//! is left to the user: [`Client::query_as`][client::Client::query_as]
//! decodes into any type implementing `serde::Deserialize`.
//!
//! HTTP and DNS are accessed through the small capability traits
//! [`HttpClient`][transport::HttpClient] and
//! [`NsLookup`][resolv::NsLookup] so that caching transports or test
//! doubles can be injected.
//!
//! # Reference of Feature Flags
//!
//! * `ureq`: provides [`transport::UreqClient`], a blocking HTTP client
//!   based on [ureq](https://github.com/algesten/ureq). Enabled by default.
//! * `resolv`: provides [`resolv::StubNsLookup`], which asks the system’s
//!   resolvers for name servers through the stub resolver of the
//!   [domain](https://github.com/NLnetLabs/domain) crate. Enabled by
//!   default.
//!
//! [RFC 9224]: https://www.rfc-editor.org/rfc/rfc9224

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod protocol;
pub mod query;
pub mod resolv;
pub mod transport;

pub use self::client::Client;
pub use self::config::Config;
pub use self::error::Error;
pub use self::fetch::{BootstrapFetcher, DefaultFetcher, Fetcher};
pub use self::query::{IdentifierSpace, Query, QueryType};
