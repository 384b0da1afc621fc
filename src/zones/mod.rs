//! Zone/record reconciliation: find the zone that owns a name, create it when
//! missing, switch it to API-managed serials and patch its rrsets.
//!
//! Every step re-reads server state; nothing is cached between calls, so a
//! `ZoneManager` can be shared freely across tasks.

mod locate;
mod mutate;
mod normalize;
mod pipeline;
mod provision;

pub use locate::LocatedZone;
pub use normalize::INCEPTION_INCREMENT;
pub use provision::{ProvisionedZone, initial_serial, seed_soa_content};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::names::canonical_host;
use crate::powerdns::client::PowerDnsClient;
use crate::powerdns::transport::{HttpTransport, Transport};

pub struct ZoneManager<T = HttpTransport> {
    client: PowerDnsClient<T>,
    nameservers: Vec<String>, // "ns1.example.net.", ...
    soa_contact: String,
}

impl ZoneManager<HttpTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            PowerDnsClient::from_config(config)?,
            config.canonical_nameservers(),
        )
        .with_soa_contact(&config.soa_contact))
    }
}

impl<T: Transport> ZoneManager<T> {
    pub fn new<I, S>(client: PowerDnsClient<T>, nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            client,
            nameservers: nameservers
                .into_iter()
                .map(|ns| canonical_host(ns.as_ref()))
                .collect(),
            soa_contact: "hostmaster.".into(),
        }
    }

    pub fn with_soa_contact(mut self, contact: &str) -> Self {
        self.soa_contact = canonical_host(contact);
        self
    }

    pub fn client(&self) -> &PowerDnsClient<T> {
        &self.client
    }

    /// Nameservers used when a zone has to be provisioned.
    pub fn nameservers(&self) -> &[String] {
        &self.nameservers
    }
}
