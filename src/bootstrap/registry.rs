//! The bootstrap service registry data model.

use std::error;
use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

//------------ Module Configuration ------------------------------------------

/// The only bootstrap registry format version we understand.
pub const VERSION: &str = "1.0";

//------------ ServiceRegistry -----------------------------------------------

/// An RDAP bootstrap service registry.
///
/// See [RFC 9224, section 3] for the format of the document.
///
/// [RFC 9224, section 3]: https://www.rfc-editor.org/rfc/rfc9224#section-3
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ServiceRegistry {
    /// The version of the registry format.
    version: String,

    /// When the registry was published.
    #[serde(default, deserialize_with = "deserialize_publication")]
    publication: Option<OffsetDateTime>,

    /// An optional free-form description of the registry.
    #[serde(default)]
    description: Option<String>,

    /// The services in the order they appear in the registry.
    services: Vec<Service>,
}

impl ServiceRegistry {
    /// Decodes a registry from the body of a bootstrap response.
    ///
    /// Fails if the body isn’t a valid registry document or if the
    /// document’s version isn’t [`VERSION`].
    pub fn from_slice(body: &[u8]) -> Result<Self, RegistryError> {
        let registry: Self = serde_json::from_slice(body)?;
        if registry.version != VERSION {
            return Err(RegistryError::Version(registry.version));
        }
        Ok(registry)
    }

    /// Creates a registry of the supported version from a list of services.
    pub fn from_services(services: Vec<Service>) -> Self {
        ServiceRegistry {
            version: VERSION.into(),
            publication: None,
            description: None,
            services,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn publication(&self) -> Option<OffsetDateTime> {
        self.publication
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }
}

/// Parses the RFC 3339 publication date of a registry.
fn deserialize_publication<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|value| {
            OffsetDateTime::parse(&value, &Rfc3339).map_err(de::Error::custom)
        })
        .transpose()
}

//------------ Service -------------------------------------------------------

/// A service of a bootstrap registry.
///
/// In the registry document, a service is an array of two arrays: the
/// entries and the URIs.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(from = "(Vec<String>, Vec<String>)")]
pub struct Service {
    /// The entries describing the part of the identifier space.
    entries: Vec<String>,

    /// The base URIs of the RDAP servers for this part.
    uris: Vec<String>,
}

impl Service {
    pub fn new(entries: Vec<String>, uris: Vec<String>) -> Self {
        Service { entries, uris }
    }

    /// Returns the entries of the service.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns the URIs of the service.
    pub fn uris(&self) -> &[String] {
        &self.uris
    }
}

impl From<(Vec<String>, Vec<String>)> for Service {
    fn from((entries, uris): (Vec<String>, Vec<String>)) -> Self {
        Service { entries, uris }
    }
}

//------------ prioritize_https ----------------------------------------------

/// Moves all HTTPS URIs in front of all other URIs.
///
/// The sort is stable, so the relative order of the URIs within both groups
/// is kept.
pub fn prioritize_https(uris: &mut [String]) {
    uris.sort_by_key(|uri| !is_https(uri));
}

fn is_https(uri: &str) -> bool {
    uri.split(':')
        .next()
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("https"))
}

//------------ RegistryError -------------------------------------------------

/// A bootstrap registry could not be decoded.
#[derive(Clone, Debug)]
pub enum RegistryError {
    /// The document is not a valid registry.
    Json(Arc<serde_json::Error>),

    /// The registry has an unsupported version.
    Version(String),
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Json(Arc::new(err))
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Json(err) => {
                write!(f, "invalid bootstrap registry: {err}")
            }
            RegistryError::Version(version) => write!(
                f,
                "incompatible bootstrap specification version: {} \
                 (expecting {})",
                version, VERSION
            ),
        }
    }
}

impl error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            RegistryError::Json(err) => Some(err.as_ref()),
            RegistryError::Version(_) => None,
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn uris(list: &[&str]) -> Vec<String> {
        list.iter().map(|uri| uri.to_string()).collect()
    }

    #[test]
    fn decode_registry() {
        let registry = ServiceRegistry::from_slice(
            br#"{
                "version": "1.0",
                "publication": "2024-01-09T16:00:01Z",
                "description": "RDAP bootstrap file for Domain Name System registrations",
                "services": [
                    [["br"], ["https://rdap.registro.br/"]],
                    [["com", "net"], ["https://rdap.verisign.com/com/v1/"]]
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(registry.version(), "1.0");
        assert_eq!(
            registry.publication().unwrap().unix_timestamp(),
            1_704_816_001
        );
        assert_eq!(
            registry.description(),
            Some("RDAP bootstrap file for Domain Name System registrations")
        );
        assert_eq!(registry.services().len(), 2);
        assert_eq!(registry.services()[1].entries(), ["com", "net"]);
        assert_eq!(
            registry.services()[1].uris(),
            ["https://rdap.verisign.com/com/v1/"]
        );
    }

    #[test]
    fn decode_without_publication() {
        let registry = ServiceRegistry::from_slice(
            br#"{"version": "1.0", "services": []}"#,
        )
        .unwrap();
        assert!(registry.publication().is_none());
        assert!(registry.services().is_empty());
    }

    #[test]
    fn reject_version() {
        let err = ServiceRegistry::from_slice(
            br#"{"version": "2.0", "services": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Version(ref v) if v == "2.0"));
        assert_eq!(
            err.to_string(),
            "incompatible bootstrap specification version: 2.0 \
             (expecting 1.0)"
        );
    }

    #[rstest]
    #[case::not_json(b"{{{{".as_slice())]
    #[case::bad_date(br#"{"version": "1.0", "publication": "31/8/2015", "services": []}"#.as_slice())]
    #[case::short_service(br#"{"version": "1.0", "services": [[["br"]]]}"#.as_slice())]
    #[case::no_services(br#"{"version": "1.0"}"#.as_slice())]
    fn reject_malformed(#[case] body: &[u8]) {
        assert!(matches!(
            ServiceRegistry::from_slice(body),
            Err(RegistryError::Json(_))
        ));
    }

    #[test]
    fn https_first() {
        let mut list = uris(&[
            "http://a.example/",
            "https://b.example/",
            "http://c.example/",
            "HTTPS://d.example/",
        ]);
        prioritize_https(&mut list);
        assert_eq!(
            list,
            uris(&[
                "https://b.example/",
                "HTTPS://d.example/",
                "http://a.example/",
                "http://c.example/",
            ])
        );
    }

    #[test]
    fn prioritize_is_idempotent() {
        let mut list = uris(&[
            "http://a.example/",
            "https://b.example/",
            "ftp://c.example/",
            "https://d.example/",
            "http://e.example/",
        ]);
        prioritize_https(&mut list);
        let once = list.clone();
        prioritize_https(&mut list);
        assert_eq!(list, once);

        let mut sorted = list.clone();
        sorted.sort();
        let mut original = uris(&[
            "http://a.example/",
            "https://b.example/",
            "ftp://c.example/",
            "https://d.example/",
            "http://e.example/",
        ]);
        original.sort();
        assert_eq!(sorted, original);
    }
}
