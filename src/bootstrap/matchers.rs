//! Finding the service responsible for an identifier.
//!
//! Each identifier space has its own notion of which entry is the most
//! specific one. All matchers return the URIs of the winning service as a
//! slice into the registry or an empty slice if no entry covers the
//! identifier. Matchers that need to parse entries fail if they encounter an
//! entry they can’t parse rather than silently skipping it.

use std::error;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;

use super::registry::ServiceRegistry;

//------------ ServiceRegistry -----------------------------------------------

impl ServiceRegistry {
    /// Returns the URIs for the service with the longest match for a name.
    ///
    /// The name is compared label by label from the least significant
    /// label upwards. An entry matches if all its labels are equal to the
    /// corresponding labels of the name. Of all matching entries, the one
    /// with the most labels wins. If several entries have the same number
    /// of labels, the first one is used.
    ///
    /// The name needs to be in its ASCII form already, as created by
    /// [`Query::domain`][crate::query::Query::domain]. Labels are compared
    /// ignoring ASCII case.
    ///
    /// See [RFC 9224, section 4](https://www.rfc-editor.org/rfc/rfc9224#section-4).
    pub fn match_domain(&self, fqdn: &str) -> &[String] {
        let name = labels(fqdn);
        let mut chosen: Option<(usize, &[String])> = None;

        for service in self.services() {
            for entry in service.entries() {
                let entry = labels(entry);
                if name.len() < entry.len() {
                    continue;
                }
                let tail = &name[name.len() - entry.len()..];
                let matches = tail
                    .iter()
                    .rev()
                    .zip(entry.iter().rev())
                    .all(|(left, right)| left.eq_ignore_ascii_case(right));
                if !matches {
                    continue;
                }
                if chosen.map_or(true, |(size, _)| entry.len() > size) {
                    chosen = Some((entry.len(), service.uris()));
                }
            }
        }

        chosen.map(|(_, uris)| uris).unwrap_or(&[])
    }

    /// Returns the URIs for the service with the narrowest AS number range.
    ///
    /// Entries are inclusive ranges of the form `"begin-end"`. Of all ranges
    /// containing `asn`, the one with the smallest span wins. If several
    /// ranges have the same span, the first one is used.
    ///
    /// See [RFC 9224, section 5.3](https://www.rfc-editor.org/rfc/rfc9224#section-5.3).
    pub fn match_as(&self, asn: u32) -> Result<&[String], MatchError> {
        let mut chosen: Option<(u32, &[String])> = None;

        for service in self.services() {
            for entry in service.entries() {
                let (begin, end) = parse_as_range(entry)?;
                if asn < begin || asn > end {
                    continue;
                }
                let span = end - begin;
                if chosen.map_or(true, |(size, _)| span < size) {
                    chosen = Some((span, service.uris()));
                }
            }
        }

        Ok(chosen.map(|(_, uris)| uris).unwrap_or(&[]))
    }

    /// Returns the URIs for the service with the longest prefix for a network.
    ///
    /// An entry matches if it contains both the first and the last address
    /// of `network`. Of all matching entries, the one with the longest
    /// prefix wins. If several entries have the same prefix length, the
    /// first one is used.
    ///
    /// See [RFC 9224, section 5.1](https://www.rfc-editor.org/rfc/rfc9224#section-5.1)
    /// and [section 5.2](https://www.rfc-editor.org/rfc/rfc9224#section-5.2).
    pub fn match_ip_network(
        &self,
        network: &IpNet,
    ) -> Result<&[String], MatchError> {
        let first = network.network();
        let last = network.broadcast();
        let mut chosen: Option<(u8, &[String])> = None;

        for service in self.services() {
            for entry in service.entries() {
                let entry = parse_network(entry)?;
                if !entry.contains(&first) || !entry.contains(&last) {
                    continue;
                }
                let prefix = entry.prefix_len();
                if chosen.map_or(true, |(size, _)| prefix > size) {
                    chosen = Some((prefix, service.uris()));
                }
            }
        }

        Ok(chosen.map(|(_, uris)| uris).unwrap_or(&[]))
    }

    /// Returns the URIs for the first service with a network containing `addr`.
    ///
    /// Unlike [`match_ip_network`][Self::match_ip_network], this does not
    /// look for the most specific entry. The first entry containing the
    /// address wins and entries after it are not even looked at. Registries
    /// published by IANA don’t contain overlapping networks, so for them
    /// both approaches give the same result.
    pub fn match_ip(&self, addr: IpAddr) -> Result<&[String], MatchError> {
        for service in self.services() {
            for entry in service.entries() {
                if parse_network(entry)?.contains(&addr) {
                    return Ok(service.uris());
                }
            }
        }
        Ok(&[])
    }
}

/// Splits a domain name into its labels, ignoring a trailing root label.
fn labels(name: &str) -> Vec<&str> {
    name.strip_suffix('.').unwrap_or(name).split('.').collect()
}

/// Parses an AS number range entry.
fn parse_as_range(entry: &str) -> Result<(u32, u32), MatchError> {
    let invalid = || MatchError::InvalidAsRange(entry.into());
    let (begin, end) = entry.split_once('-').ok_or_else(invalid)?;
    let begin = u32::from_str(begin.trim()).map_err(|_| invalid())?;
    let end = u32::from_str(end.trim()).map_err(|_| invalid())?;
    Ok((begin, end))
}

/// Parses a network entry.
fn parse_network(entry: &str) -> Result<IpNet, MatchError> {
    IpNet::from_str(entry.trim())
        .map_err(|_| MatchError::InvalidNetwork(entry.into()))
}

//------------ MatchError ----------------------------------------------------

/// A registry entry could not be parsed while matching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchError {
    /// An AS number registry contained an invalid range.
    InvalidAsRange(String),

    /// An IP registry contained an invalid network.
    InvalidNetwork(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::InvalidAsRange(entry) => {
                write!(f, "invalid AS number range '{entry}' in registry")
            }
            MatchError::InvalidNetwork(entry) => {
                write!(f, "invalid IP network '{entry}' in registry")
            }
        }
    }
}

impl error::Error for MatchError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::bootstrap::Service;
    use rstest::rstest;

    fn registry(services: &[(&[&str], &[&str])]) -> ServiceRegistry {
        ServiceRegistry::from_services(
            services
                .iter()
                .map(|(entries, uris)| {
                    Service::new(
                        entries.iter().map(|s| s.to_string()).collect(),
                        uris.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }

    fn net(s: &str) -> IpNet {
        IpNet::from_str(s).unwrap()
    }

    //--- match_domain

    #[test]
    fn domain_most_specific_wins() {
        let registry = registry(&[
            (&["br"], &["https://b"]),
            (&["a.b.example.com"], &["https://specific"]),
            (&["com"], &["https://com"]),
        ]);
        assert_eq!(
            registry.match_domain("sub.a.b.example.com"),
            ["https://specific"]
        );
        assert_eq!(registry.match_domain("other.com"), ["https://com"]);
        assert_eq!(registry.match_domain("nic.br"), ["https://b"]);
    }

    #[test]
    fn domain_order_of_services_irrelevant_for_specificity() {
        let registry = registry(&[
            (&["example.com"], &["https://specific"]),
            (&["com"], &["https://com"]),
        ]);
        assert_eq!(
            registry.match_domain("www.example.com"),
            ["https://specific"]
        );
    }

    #[rstest]
    #[case::label_not_suffix("notexample.com")]
    #[case::shorter_than_entry("com")]
    #[case::other_tld("example.org")]
    fn domain_no_match(#[case] fqdn: &str) {
        let registry = registry(&[(&["example.com"], &["https://ex"])]);
        assert!(registry.match_domain(fqdn).is_empty());
    }

    #[test]
    fn domain_first_wins_on_tie() {
        let registry = registry(&[
            (&["net", "com"], &["https://first"]),
            (&["com"], &["https://second"]),
        ]);
        assert_eq!(registry.match_domain("example.com"), ["https://first"]);
    }

    #[test]
    fn domain_ignores_case_and_root() {
        let registry = registry(&[(&["Example.COM"], &["https://ex"])]);
        assert_eq!(registry.match_domain("www.example.com."), ["https://ex"]);
    }

    #[test]
    fn domain_exact_entry() {
        let registry = registry(&[(&["example.com"], &["https://ex"])]);
        assert_eq!(registry.match_domain("example.com"), ["https://ex"]);
    }

    //--- match_as

    #[test]
    fn as_narrowest_range_wins() {
        let registry = registry(&[
            (&["100-200"], &["https://wide"]),
            (&["150-160"], &["https://narrow"]),
        ]);
        assert_eq!(registry.match_as(155).unwrap(), ["https://narrow"]);
        assert_eq!(registry.match_as(100).unwrap(), ["https://wide"]);
        assert_eq!(registry.match_as(200).unwrap(), ["https://wide"]);
        assert!(registry.match_as(201).unwrap().is_empty());
    }

    #[test]
    fn as_first_wins_on_equal_span() {
        let registry = registry(&[
            (&["10-20"], &["https://first"]),
            (&["15-25"], &["https://second"]),
        ]);
        assert_eq!(registry.match_as(17).unwrap(), ["https://first"]);
    }

    #[test]
    fn as_full_range() {
        let registry = registry(&[(&["0-4294967295"], &["https://all"])]);
        assert_eq!(registry.match_as(4_294_967_295).unwrap(), ["https://all"]);
    }

    #[rstest]
    #[case::no_dash("100")]
    #[case::not_a_number("a-200")]
    #[case::too_large("1-4294967296")]
    #[case::negative("-1-2")]
    fn as_invalid_entry(#[case] entry: &str) {
        let registry = registry(&[
            (&["1-10"], &["https://ok"]),
            (&[entry], &["https://bad"]),
        ]);
        assert_eq!(
            registry.match_as(5),
            Err(MatchError::InvalidAsRange(entry.into()))
        );
    }

    //--- match_ip_network

    #[test]
    fn network_longest_prefix_wins() {
        let registry = registry(&[
            (&["200.0.0.0/8"], &["https://lacnic"]),
            (&["200.160.0.0/16"], &["https://nicbr"]),
            (&["2001:db8::/32"], &["https://v6"]),
        ]);
        assert_eq!(
            registry.match_ip_network(&net("200.160.0.0/20")).unwrap(),
            ["https://nicbr"]
        );
        assert_eq!(
            registry.match_ip_network(&net("200.161.0.0/20")).unwrap(),
            ["https://lacnic"]
        );
        assert_eq!(
            registry.match_ip_network(&net("2001:db8:1::/48")).unwrap(),
            ["https://v6"]
        );
    }

    #[test]
    fn network_must_be_fully_enclosed() {
        let registry = registry(&[
            (&["200.0.0.0/8"], &["https://lacnic"]),
            (&["200.160.0.0/16"], &["https://nicbr"]),
        ]);
        // Starts within 200.160.0.0/16 but extends beyond it.
        assert_eq!(
            registry.match_ip_network(&net("200.160.0.0/15")).unwrap(),
            ["https://lacnic"]
        );
        assert!(registry
            .match_ip_network(&net("192.0.2.0/24"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn network_first_wins_on_tie() {
        let registry = registry(&[
            (&["10.0.0.0/8"], &["https://first"]),
            (&["10.0.0.0/8"], &["https://second"]),
        ]);
        assert_eq!(
            registry.match_ip_network(&net("10.1.0.0/16")).unwrap(),
            ["https://first"]
        );
    }

    #[test]
    fn network_invalid_entry() {
        let registry = registry(&[(&["10.0.0.0/33"], &["https://bad"])]);
        assert_eq!(
            registry.match_ip_network(&net("10.1.0.0/16")),
            Err(MatchError::InvalidNetwork("10.0.0.0/33".into()))
        );
    }

    //--- match_ip

    #[test]
    fn ip_first_match_wins() {
        let registry = registry(&[
            (&["200.0.0.0/8"], &["https://lacnic"]),
            (&["200.160.0.0/16"], &["https://nicbr"]),
        ]);
        // Unlike the network matcher, the broader first entry wins.
        assert_eq!(
            registry.match_ip("200.160.2.3".parse().unwrap()).unwrap(),
            ["https://lacnic"]
        );
        assert!(registry
            .match_ip("192.0.2.1".parse().unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn ip_stops_at_first_match() {
        let registry = registry(&[
            (&["2001:db8::/32"], &["https://v6"]),
            (&["garbage"], &["https://bad"]),
        ]);
        assert_eq!(
            registry.match_ip("2001:db8::1".parse().unwrap()).unwrap(),
            ["https://v6"]
        );
        assert_eq!(
            registry.match_ip("2001:db9::1".parse().unwrap()),
            Err(MatchError::InvalidNetwork("garbage".into()))
        );
    }

    //--- empty registries

    #[test]
    fn empty_registry_matches_nothing() {
        let registry = registry(&[]);
        assert!(registry.match_domain("example.com").is_empty());
        assert!(registry.match_as(1).unwrap().is_empty());
        assert!(registry
            .match_ip_network(&net("10.0.0.0/8"))
            .unwrap()
            .is_empty());
        assert!(registry
            .match_ip("10.0.0.1".parse().unwrap())
            .unwrap()
            .is_empty());
    }
}
