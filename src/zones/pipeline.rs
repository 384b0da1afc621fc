use tracing::{info, warn};

use super::ZoneManager;
use crate::error::ReconcileError;
use crate::names::{canonical_name, record_name};
use crate::powerdns::transport::Transport;
use crate::powerdns::types::{ChangeType, PdnsZone};
use crate::validation::validate_owner_name;

impl<T: Transport> ZoneManager<T> {
    /// Sets `label.domain.` to a single `rrtype` record, creating the zone for
    /// `domain` when no ancestor zone exists.
    pub async fn upsert_record(
        &self,
        domain: &str,
        rrtype: &str,
        label: &str,
        content: &str,
        ttl: u32,
    ) -> Result<String, ReconcileError> {
        let name = record_name(label, domain)?;
        let zone = self
            .resolve_zone(domain, true)
            .await?
            .ok_or_else(|| ReconcileError::NoOwningZone(domain.to_string()))?;
        self.apply_record(&zone, rrtype, &name, content, ttl, ChangeType::Replace)
            .await?;
        Ok(zone)
    }

    /// Removes the `rrtype` set at `label.domain.`. Never creates zones: when
    /// no zone governs `domain` there is nothing to delete and `Ok(None)` is
    /// returned without any write.
    pub async fn delete_record(
        &self,
        domain: &str,
        rrtype: &str,
        label: &str,
    ) -> Result<Option<String>, ReconcileError> {
        let name = record_name(label, domain)?;
        let Some(zone) = self.resolve_zone(domain, false).await? else {
            info!(%name, %rrtype, "no owning zone, nothing to delete");
            return Ok(None);
        };
        self.apply_record(&zone, rrtype, &name, "", 0, ChangeType::Delete)
            .await?;
        Ok(Some(zone))
    }

    /// Sets the fully-qualified `name` to a single `rrtype` record in whichever
    /// zone owns it. Never creates zones.
    pub async fn upsert_fqdn(
        &self,
        name: &str,
        rrtype: &str,
        content: &str,
        ttl: u32,
    ) -> Result<String, ReconcileError> {
        let zone = self.resolve_owner_zone(name).await?;
        self.apply_record(&zone, rrtype, name, content, ttl, ChangeType::Replace)
            .await?;
        Ok(zone)
    }

    /// Removes the `rrtype` set at the fully-qualified `name`. Never creates zones.
    pub async fn delete_fqdn(&self, name: &str, rrtype: &str) -> Result<String, ReconcileError> {
        let zone = self.resolve_owner_zone(name).await?;
        self.apply_record(&zone, rrtype, name, "", 0, ChangeType::Delete)
            .await?;
        Ok(zone)
    }

    /// Zone governing an absolute owner name; a leading wildcard label is
    /// skipped when walking candidates.
    async fn resolve_owner_zone(&self, name: &str) -> Result<String, ReconcileError> {
        validate_owner_name(name)?;
        let lookup = name.strip_prefix("*.").unwrap_or(name);
        self.resolve_zone(lookup, false)
            .await?
            .ok_or_else(|| ReconcileError::NoOwningZone(name.to_string()))
    }

    /// Locate, then provision if allowed and nothing was found, then normalize.
    /// Returns the canonical name of the zone to patch, if there is one.
    async fn resolve_zone(
        &self,
        lookup: &str,
        provision: bool,
    ) -> Result<Option<String>, ReconcileError> {
        let (zone_name, fetched) = match self.find_owning_zone(lookup).await? {
            Some(located) => (located.name, Some(located.zone)),
            None if provision => {
                let zone_name = canonical_name(lookup)?;
                info!(zone = %zone_name, "no owning zone found, provisioning");
                let provisioned = self.provision_zone(&zone_name, &self.nameservers).await?;
                (provisioned.name, provisioned.zone)
            }
            None => return Ok(None),
        };

        self.normalize_advisory(&zone_name, fetched.as_ref()).await;
        Ok(Some(zone_name))
    }

    /// Normalization never blocks the record change; failures are only logged.
    async fn normalize_advisory(&self, zone_name: &str, fetched: Option<&PdnsZone>) {
        let outcome = match fetched {
            Some(zone) => self.normalize_zone(zone_name, zone).await,
            None => self.ensure_api_editable(zone_name).await,
        };
        if let Err(err) = outcome {
            warn!(zone = %zone_name, error = %err, "continuing without SOA-EDIT-API fix-up");
        }
    }
}
