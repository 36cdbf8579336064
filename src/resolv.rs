//! Looking up the name servers of a domain.
//!
//! The bootstrap fetcher uses a name server lookup to decide whether a
//! domain that is missing from a cached bootstrap registry has been
//! delegated since the registry was cached. The lookup is performed through
//! the [`NsLookup`] trait. [`StubNsLookup`] asks the system’s resolvers,
//! [`NoNsLookup`] never finds anything and thus disables the check.

use std::io;

//------------ NsLookup ------------------------------------------------------

/// A type that can look up the name servers of a domain.
pub trait NsLookup {
    /// Returns the names of the name servers for `name`.
    ///
    /// A name without name servers results in an empty list rather than an
    /// error.
    fn lookup_ns(&self, name: &str) -> Result<Vec<String>, io::Error>;
}

impl<F> NsLookup for F
where
    F: Fn(&str) -> Result<Vec<String>, io::Error>,
{
    fn lookup_ns(&self, name: &str) -> Result<Vec<String>, io::Error> {
        (self)(name)
    }
}

//------------ NoNsLookup ----------------------------------------------------

/// A lookup that never finds any name servers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNsLookup;

impl NsLookup for NoNsLookup {
    fn lookup_ns(&self, _name: &str) -> Result<Vec<String>, io::Error> {
        Ok(Vec::new())
    }
}

//------------ StubNsLookup --------------------------------------------------

#[cfg(feature = "resolv")]
pub use self::stub::StubNsLookup;

#[cfg(feature = "resolv")]
mod stub {
    use std::io;
    use std::str::FromStr;

    use domain::base::iana::Rtype;
    use domain::base::name::Name;
    use domain::rdata::Ns;
    use domain::resolv::stub::conf::ResolvConf;
    use domain::resolv::StubResolver;
    use tracing::debug;

    use super::NsLookup;

    /// A lookup using a DNS stub resolver.
    ///
    /// Every lookup synchronously runs a fresh stub resolver created from
    /// the configuration on a current-thread runtime.
    #[cfg_attr(docsrs, doc(cfg(feature = "resolv")))]
    #[derive(Clone, Debug, Default)]
    pub struct StubNsLookup {
        conf: ResolvConf,
    }

    impl StubNsLookup {
        /// Creates a lookup using the system’s resolver configuration.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a lookup using the given resolver configuration.
        pub fn from_conf(conf: ResolvConf) -> Self {
            StubNsLookup { conf }
        }
    }

    impl NsLookup for StubNsLookup {
        fn lookup_ns(&self, name: &str) -> Result<Vec<String>, io::Error> {
            let qname = Name::<Vec<u8>>::from_str(name).map_err(|err| {
                io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
            })?;
            let answer =
                StubResolver::run_with_conf(self.conf.clone(), move |stub| {
                    async move { stub.query((qname, Rtype::NS)).await }
                })?;

            let invalid = |err: domain::base::wire::ParseError| {
                io::Error::new(io::ErrorKind::InvalidData, err.to_string())
            };
            let mut servers = Vec::new();
            let section = answer.answer().map_err(invalid)?;
            for record in section.limit_to::<Ns<_>>() {
                let record = record.map_err(invalid)?;
                servers.push(record.data().nsdname().to_string());
            }
            debug!("found {} name servers for {}", servers.len(), name);
            Ok(servers)
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_lookup_finds_nothing() {
        assert!(NoNsLookup.lookup_ns("example.com").unwrap().is_empty());
    }

    #[test]
    fn closures_are_lookups() {
        let lookup = |name: &str| -> Result<Vec<String>, io::Error> {
            Ok(vec![format!("a.ns.{name}")])
        };
        assert_eq!(
            lookup.lookup_ns("example.com").unwrap(),
            ["a.ns.example.com"]
        );
    }
}
