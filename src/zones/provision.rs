use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::ZoneManager;
use crate::error::{ApiError, ReconcileError};
use crate::names::{canonical_host, canonical_name};
use crate::powerdns::transport::Transport;
use crate::powerdns::types::{PdnsRrset, PdnsZone, PdnsZoneCreate, ZoneKind};

const SOA_TTL: u32 = 60;
// refresh, retry, expire, minimum
const SOA_TIMERS: &str = "28800 7200 604800 86400";

/// A zone that exists after `ensure_zone`, and how its SOA seeding went.
#[derive(Debug)]
pub struct ProvisionedZone {
    pub name: String,
    /// Server's view of the zone when the call returned one.
    pub zone: Option<PdnsZone>,
    /// Whether this call created the zone (false when it already existed).
    pub created: bool,
    /// Outcome of installing the initial SOA; failure leaves the zone in place.
    pub soa_seed: Result<(), ApiError>,
}

/// First serial of the day: `YYYYMMDD01`.
pub fn initial_serial(date: NaiveDate) -> String {
    format!("{}01", date.format("%Y%m%d"))
}

/// SOA content for a freshly created zone.
pub fn seed_soa_content(primary_ns: &str, contact: &str, date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        canonical_host(primary_ns),
        canonical_host(contact),
        initial_serial(date),
        SOA_TIMERS
    )
}

impl<T: Transport> ZoneManager<T> {
    /// Makes sure a zone named `domain` exists, creating it with `nameservers`
    /// and a seeded SOA if the server does not have it yet.
    pub async fn ensure_zone(
        &self,
        domain: &str,
        nameservers: &[String],
    ) -> Result<ProvisionedZone, ReconcileError> {
        let zone_name = canonical_name(domain)?;
        let existing = self
            .client
            .find_zone(&zone_name)
            .await
            .map_err(|source| ReconcileError::Provision {
                zone: zone_name.clone(),
                source,
            })?;

        if let Some(zone) = existing {
            return Ok(ProvisionedZone {
                name: zone_name,
                zone: Some(zone),
                created: false,
                soa_seed: Ok(()),
            });
        }

        self.provision_zone(&zone_name, nameservers).await
    }

    /// Creates `zone_name` unconditionally; callers have already seen it absent.
    pub(crate) async fn provision_zone(
        &self,
        zone_name: &str,
        nameservers: &[String],
    ) -> Result<ProvisionedZone, ReconcileError> {
        let nameservers: Vec<String> = nameservers.iter().map(|ns| canonical_host(ns)).collect();
        let Some(primary_ns) = nameservers.first().cloned() else {
            return Err(ReconcileError::NoNameservers(zone_name.to_string()));
        };

        let z = PdnsZoneCreate {
            name: zone_name.to_string(),
            kind: ZoneKind::Master,
            masters: Vec::new(),
            nameservers,
        };
        let zone = self
            .client
            .create_zone(&z)
            .await
            .map_err(|source| ReconcileError::Provision {
                zone: zone_name.to_string(),
                source,
            })?;
        info!(zone = %zone_name, "created zone");

        let soa = seed_soa_content(&primary_ns, &self.soa_contact, Utc::now().date_naive());
        let soa_rrset = PdnsRrset::replace(zone_name, "SOA", SOA_TTL, [soa.clone()]);
        let soa_seed = self.client.patch_rrsets(zone_name, &[soa_rrset]).await;
        match &soa_seed {
            Ok(()) => info!(zone = %zone_name, content = %soa, "seeded SOA record"),
            Err(err) => warn!(zone = %zone_name, content = %soa, error = %err, "failed to seed SOA record"),
        }

        Ok(ProvisionedZone {
            name: zone_name.to_string(),
            zone,
            created: true,
            soa_seed,
        })
    }
}
