//! RDAP error responses.
//!
//! When a server can’t answer a query it may describe the problem in a JSON
//! body. The format is defined in [RFC 9083, section 6].
//!
//! [RFC 9083, section 6]: https://www.rfc-editor.org/rfc/rfc9083#section-6

use std::error;
use std::fmt;

use serde::Deserialize;

//------------ Module Configuration ------------------------------------------

/// The media type of RDAP responses.
pub const RDAP_MEDIA_TYPE: &str = "application/rdap+json";

/// The media type of bootstrap registries.
pub const JSON_MEDIA_TYPE: &str = "application/json";

//------------ ProtocolError -------------------------------------------------

/// An error response returned by an RDAP server.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolError {
    /// The HTTP status code the server meant to report.
    #[serde(default)]
    pub error_code: u16,

    /// A short description of the error.
    #[serde(default)]
    pub title: Option<String>,

    /// Further human-readable details.
    #[serde(default)]
    pub description: Vec<String>,

    /// Notices attached to the response.
    #[serde(default)]
    pub notices: Vec<Notice>,

    /// The specifications the response conforms to.
    #[serde(default)]
    pub rdap_conformance: Vec<String>,

    /// The language of the textual content.
    #[serde(default)]
    pub lang: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server returned error {}", self.error_code)?;
        if let Some(title) = &self.title {
            write!(f, " ({title})")?;
        }
        if !self.description.is_empty() {
            write!(f, ": {}", self.description.join(" "))?;
        }
        Ok(())
    }
}

impl error::Error for ProtocolError {}

//------------ Notice --------------------------------------------------------

/// A notice or remark.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Notice {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, rename = "type")]
    pub notice_type: Option<String>,

    #[serde(default)]
    pub description: Vec<String>,

    #[serde(default)]
    pub links: Vec<Link>,
}

//------------ Link ----------------------------------------------------------

/// A link to a related resource.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Link {
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub rel: Option<String>,

    pub href: String,

    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
}

//============ Testing =======================================================
