//! Bootstrap service registries.
//!
//! IANA publishes one bootstrap service registry per identifier space: DNS
//! names, AS numbers, IPv4 networks, and IPv6 networks. Each registry is a
//! JSON document listing services, where a service pairs a set of entries
//! describing a part of the identifier space with the base URIs of the
//! RDAP servers responsible for it.
//!
//! The [`ServiceRegistry`] type represents such a document. It is decoded
//! freshly from every bootstrap response via
//! [`ServiceRegistry::from_slice`], which also rejects registries of an
//! unsupported version. The matching functions on the registry, defined in
//! the `matchers` sub-module, select the URIs of the most specific service
//! for a given identifier.

pub use self::matchers::MatchError;
pub use self::registry::{
    prioritize_https, RegistryError, Service, ServiceRegistry, VERSION,
};

mod matchers;
mod registry;
