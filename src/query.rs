//! What to ask an RDAP server for.
//!
//! A [`Query`] is one of the identifiers RDAP knows how to look up. Each
//! query has a [`QueryType`] which determines the path segment used in the
//! request URI, and all query types except entities belong to an
//! [`IdentifierSpace`] that has its own bootstrap registry.

use std::error;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use url::Host;

//------------ QueryType -----------------------------------------------------

/// The kind of object a query asks for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum QueryType {
    /// A domain name.
    Domain,

    /// An autonomous system number.
    Autnum,

    /// A single IP address.
    Ip,

    /// An IP network in CIDR notation.
    IpNetwork,

    /// An entity handle.
    Entity,
}

impl QueryType {
    /// Returns the path segment for requests of this type.
    ///
    /// Both single addresses and networks are looked up under `ip`.
    pub fn path_segment(self) -> &'static str {
        match self {
            QueryType::Domain => "domain",
            QueryType::Autnum => "autnum",
            QueryType::Ip | QueryType::IpNetwork => "ip",
            QueryType::Entity => "entity",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryType::Domain => "domain",
            QueryType::Autnum => "autnum",
            QueryType::Ip => "ip",
            QueryType::IpNetwork => "ipnetwork",
            QueryType::Entity => "entity",
        })
    }
}

//------------ IdentifierSpace -----------------------------------------------

/// An identifier space with its own bootstrap registry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IdentifierSpace {
    /// Domain names.
    Domain,

    /// Autonomous system numbers.
    Autnum,

    /// IPv4 addresses and networks.
    Ipv4,

    /// IPv6 addresses and networks.
    Ipv6,
}

impl IdentifierSpace {
    /// Returns the name of the registry for this space.
    ///
    /// These are the names IANA publishes the registries under.
    pub fn registry_name(self) -> &'static str {
        match self {
            IdentifierSpace::Domain => "dns",
            IdentifierSpace::Autnum => "asn",
            IdentifierSpace::Ipv4 => "ipv4",
            IdentifierSpace::Ipv6 => "ipv6",
        }
    }

    fn for_addr(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => IdentifierSpace::Ipv4,
            IpAddr::V6(_) => IdentifierSpace::Ipv6,
        }
    }
}

impl fmt::Display for IdentifierSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registry_name())
    }
}

//------------ Query ---------------------------------------------------------

/// An identifier to look up.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Query {
    /// A domain name in its normalized ASCII form.
    Domain(String),

    /// An autonomous system number.
    Autnum(u32),

    /// A single IP address.
    IpAddress(IpAddr),

    /// An IP network.
    IpNetwork(IpNet),

    /// An entity handle.
    Entity(String),
}

impl Query {
    /// Creates a domain query, normalizing the name.
    ///
    /// Internationalized names are converted into their ASCII compatible
    /// encoding, all letters are lower-cased, and a trailing dot is removed.
    pub fn domain(name: &str) -> Result<Self, QueryError> {
        normalize_domain(name).map(Query::Domain)
    }

    /// Creates an entity query.
    pub fn entity(handle: impl Into<String>) -> Self {
        Query::Entity(handle.into())
    }

    /// Creates a query from its type and string value.
    ///
    /// This is the reverse of [`query_type`][Self::query_type] and
    /// [`value`][Self::value].
    pub fn parse(
        query_type: QueryType,
        value: &str,
    ) -> Result<Self, QueryError> {
        match query_type {
            QueryType::Domain => Self::domain(value),
            QueryType::Autnum => u32::from_str(value)
                .map(Query::Autnum)
                .map_err(|_| QueryError::InvalidAutnum(value.into())),
            QueryType::Ip => IpAddr::from_str(value)
                .map(Query::IpAddress)
                .map_err(|_| QueryError::InvalidIp(value.into())),
            QueryType::IpNetwork => IpNet::from_str(value)
                .map(Query::IpNetwork)
                .map_err(|_| QueryError::InvalidNetwork(value.into())),
            QueryType::Entity => Ok(Self::entity(value)),
        }
    }

    /// Returns the type of the query.
    pub fn query_type(&self) -> QueryType {
        match self {
            Query::Domain(_) => QueryType::Domain,
            Query::Autnum(_) => QueryType::Autnum,
            Query::IpAddress(_) => QueryType::Ip,
            Query::IpNetwork(_) => QueryType::IpNetwork,
            Query::Entity(_) => QueryType::Entity,
        }
    }

    /// Returns the value of the query as used in the request URI.
    pub fn value(&self) -> String {
        match self {
            Query::Domain(name) => name.clone(),
            Query::Autnum(asn) => asn.to_string(),
            Query::IpAddress(addr) => addr.to_string(),
            Query::IpNetwork(net) => net.to_string(),
            Query::Entity(handle) => handle.clone(),
        }
    }

    /// Returns the identifier space of the query.
    ///
    /// Entities don’t have a bootstrap registry and return `None`.
    pub fn identifier_space(&self) -> Option<IdentifierSpace> {
        match self {
            Query::Domain(_) => Some(IdentifierSpace::Domain),
            Query::Autnum(_) => Some(IdentifierSpace::Autnum),
            Query::IpAddress(addr) => Some(IdentifierSpace::for_addr(*addr)),
            Query::IpNetwork(net) => {
                Some(IdentifierSpace::for_addr(net.network()))
            }
            Query::Entity(_) => None,
        }
    }
}

/// Guesses the kind of query from a free-form object.
///
/// Decimal numbers, optionally prefixed with `AS`, are AS numbers, then IP
/// addresses and IP networks are tried. Anything containing a dot that is a
/// valid host name is a domain name. Everything else is an entity handle.
impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(QueryError::Empty);
        }
        let digits = s
            .strip_prefix("AS")
            .or_else(|| s.strip_prefix("as"))
            .unwrap_or(s);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return u32::from_str(digits)
                .map(Query::Autnum)
                .map_err(|_| QueryError::InvalidAutnum(s.into()));
        }
        if let Ok(addr) = IpAddr::from_str(s) {
            return Ok(Query::IpAddress(addr));
        }
        if let Ok(net) = IpNet::from_str(s) {
            return Ok(Query::IpNetwork(net));
        }
        if s.contains('.') {
            if let Ok(name) = normalize_domain(s) {
                return Ok(Query::Domain(name));
            }
        }
        Ok(Query::entity(s))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Domain(name) => f.write_str(name),
            Query::Autnum(asn) => write!(f, "AS{asn}"),
            Query::IpAddress(addr) => write!(f, "{addr}"),
            Query::IpNetwork(net) => write!(f, "{net}"),
            Query::Entity(handle) => f.write_str(handle),
        }
    }
}

//------------ normalize_domain ----------------------------------------------

/// Converts a domain name into the form used in queries and registries.
///
/// Applies IDNA processing, which maps the name to lower case and converts
/// non-ASCII labels into A-labels, and removes a trailing root label.
/// Percent signs are rejected rather than decoded.
pub fn normalize_domain(name: &str) -> Result<String, QueryError> {
    let invalid = || QueryError::InvalidDomain(name.into());
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() || trimmed.contains('%') {
        return Err(invalid());
    }
    match Host::parse(trimmed).map_err(|_| invalid())? {
        Host::Domain(domain) => Ok(domain),
        Host::Ipv4(_) | Host::Ipv6(_) => Err(invalid()),
    }
}

//------------ QueryError ----------------------------------------------------

/// A query value was not valid for its type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryError {
    /// The object to look up was empty.
    Empty,

    /// Not a valid domain name.
    InvalidDomain(String),

    /// Not a valid AS number.
    InvalidAutnum(String),

    /// Not a valid IP address.
    InvalidIp(String),

    /// Not a valid IP network.
    InvalidNetwork(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Empty => f.write_str("empty query"),
            QueryError::InvalidDomain(value) => {
                write!(f, "invalid domain name '{value}'")
            }
            QueryError::InvalidAutnum(value) => {
                write!(f, "invalid AS number '{value}'")
            }
            QueryError::InvalidIp(value) => {
                write!(f, "invalid IP address '{value}'")
            }
            QueryError::InvalidNetwork(value) => {
                write!(f, "invalid IP network '{value}'")
            }
        }
    }
}

impl error::Error for QueryError {}

//============ Testing =======================================================
