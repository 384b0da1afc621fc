//! Crate entrypoint: PowerDNS API client plus zone/record reconciliation.

pub mod config;
pub mod error;
pub mod names;
pub mod powerdns;
pub mod validation;
pub mod zones;

pub use config::ClientConfig;
pub use error::{ApiError, ReconcileError};
pub use powerdns::client::PowerDnsClient;
pub use powerdns::transport::{HttpTransport, RawResponse, Transport};
pub use powerdns::types::ChangeType;
pub use zones::{LocatedZone, ProvisionedZone, ZoneManager};
