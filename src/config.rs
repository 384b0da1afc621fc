use std::fmt;
use std::time::Duration;

use crate::names::canonical_host;

/// `User-Agent` sent on every API request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Connection and provisioning settings for one PowerDNS API endpoint.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    pub api_key: String,
    pub server_id: String, // usually "localhost"
    /// Nameservers given to newly provisioned zones; the first one becomes the SOA mname.
    pub nameservers: Vec<String>,
    /// SOA rname of newly provisioned zones.
    pub soa_contact: String,
    /// Upper bound for each individual HTTP call.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            server_id: "localhost".into(),
            nameservers: Vec::new(),
            soa_contact: "hostmaster.".into(),
            request_timeout: None,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }

    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = server_id.into();
        self
    }

    pub fn with_nameservers<I, S>(mut self, nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nameservers = nameservers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_soa_contact(mut self, contact: impl Into<String>) -> Self {
        self.soa_contact = contact.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Provisioning nameservers as FQDNs (e.g. ns1.example.net.).
    pub fn canonical_nameservers(&self) -> Vec<String> {
        self.nameservers.iter().map(|ns| canonical_host(ns)).collect()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("server_id", &self.server_id)
            .field("nameservers", &self.nameservers)
            .field("soa_contact", &self.soa_contact)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
