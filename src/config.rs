//! Configuration of clients and fetchers.

use std::time::Duration;

use serde::Deserialize;

//------------ Module Configuration ------------------------------------------

/// The location of the IANA bootstrap registries.
///
/// The `{}` is replaced by the name of the registry.
pub const IANA_BOOTSTRAP: &str = "https://data.iana.org/rdap/{}.json";

/// Default timeout for establishing a connection.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for an entire request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

//------------ Config --------------------------------------------------------

/// User configuration variables.
///
/// The configuration can be read as part of an application’s configuration
/// via serde. Missing values are replaced by their defaults.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The location of the bootstrap registries.
    bootstrap: String,

    /// Value for the X-Forwarded-For header, if any.
    x_forwarded_for: Option<String>,

    /// Value for the User-Agent header.
    user_agent: String,

    /// Timeout for establishing a connection.
    connect_timeout: Duration,

    /// Timeout for an entire request.
    timeout: Duration,
}

impl Config {
    /// Returns the bootstrap location.
    ///
    /// If the location contains `{}`, it is replaced by the registry name to
    /// get the URI of a registry. Otherwise, the registry name is appended
    /// as a new path segment.
    pub fn bootstrap(&self) -> &str {
        &self.bootstrap
    }

    /// Sets the bootstrap location.
    pub fn set_bootstrap(&mut self, value: impl Into<String>) {
        self.bootstrap = value.into()
    }

    /// Returns the URI of the registry with the given name.
    pub fn bootstrap_uri(&self, registry: &str) -> String {
        if self.bootstrap.contains("{}") {
            self.bootstrap.replace("{}", registry)
        } else {
            format!("{}/{}", self.bootstrap.trim_end_matches('/'), registry)
        }
    }

    /// Returns the value of the X-Forwarded-For header.
    pub fn x_forwarded_for(&self) -> Option<&str> {
        self.x_forwarded_for.as_deref()
    }

    /// Sets the value of the X-Forwarded-For header.
    ///
    /// This is useful when the client is acting on behalf of someone else,
    /// for instance in a web front end, so that servers can apply their
    /// rate limiting to the right party.
    pub fn set_x_forwarded_for(&mut self, value: Option<String>) {
        self.x_forwarded_for = value
    }

    /// Returns the value of the User-Agent header.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sets the value of the User-Agent header.
    pub fn set_user_agent(&mut self, value: impl Into<String>) {
        self.user_agent = value.into()
    }

    /// Returns the connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Sets the connect timeout.
    pub fn set_connect_timeout(&mut self, value: Duration) {
        self.connect_timeout = value
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the request timeout.
    pub fn set_timeout(&mut self, value: Duration) {
        self.timeout = value
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bootstrap: IANA_BOOTSTRAP.into(),
            x_forwarded_for: None,
            user_agent: concat!("rdap/", env!("CARGO_PKG_VERSION")).into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

//============ Testing =======================================================
