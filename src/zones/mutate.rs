use tracing::info;

use super::ZoneManager;
use crate::error::ReconcileError;
use crate::names::is_within_zone;
use crate::powerdns::transport::Transport;
use crate::powerdns::types::{ChangeType, PdnsRrset};
use crate::validation::{ValidationError, validate_fqdn, validate_owner_name, validate_rrtype};

impl<T: Transport> ZoneManager<T> {
    /// Replaces (or deletes) the whole `name`/`rrtype` set in `zone_name` with
    /// a single record. `content` and `ttl` are ignored for deletes.
    pub async fn apply_record(
        &self,
        zone_name: &str,
        rrtype: &str,
        name: &str,
        content: &str,
        ttl: u32,
        changetype: ChangeType,
    ) -> Result<(), ReconcileError> {
        let rrtype = rrtype.to_ascii_uppercase();
        let rrset = match changetype {
            ChangeType::Replace => PdnsRrset::replace(name, rrtype, ttl, [content]),
            ChangeType::Delete => PdnsRrset::delete(name, rrtype),
        };
        self.apply_rrset(zone_name, rrset).await
    }

    /// Submits one rrset change as a single PATCH against `zone_name`.
    pub async fn apply_rrset(&self, zone_name: &str, mut rrset: PdnsRrset) -> Result<(), ReconcileError> {
        validate_fqdn(zone_name)?;
        validate_owner_name(&rrset.name)?;
        rrset.rrtype = rrset.rrtype.to_ascii_uppercase();
        validate_rrtype(&rrset.rrtype)?;
        if !is_within_zone(&rrset.name, zone_name) {
            return Err(ValidationError::OutsideZone {
                name: rrset.name,
                zone: zone_name.to_string(),
            }
            .into());
        }

        // records may only restate the identity of their rrset
        for record in &mut rrset.records {
            let same_name = record
                .name
                .as_deref()
                .is_none_or(|n| n.eq_ignore_ascii_case(&rrset.name));
            let same_type = record
                .rrtype
                .as_deref()
                .is_none_or(|t| t.eq_ignore_ascii_case(&rrset.rrtype));
            if !same_name || !same_type {
                return Err(ValidationError::RecordMismatch {
                    record: format!(
                        "{}/{}",
                        record.name.as_deref().unwrap_or(&rrset.name),
                        record.rrtype.as_deref().unwrap_or(&rrset.rrtype)
                    ),
                    rrset: format!("{}/{}", rrset.name, rrset.rrtype),
                }
                .into());
            }
            if record.rrtype.is_some() {
                record.rrtype = Some(rrset.rrtype.clone());
            }
        }

        let changetype = *rrset.changetype.get_or_insert(ChangeType::Replace);
        if changetype == ChangeType::Replace
            && (rrset.records.is_empty() || rrset.records.iter().any(|r| r.content.is_empty()))
        {
            return Err(ValidationError::EmptyContent(rrset.name).into());
        }

        let PdnsRrset { name, rrtype, .. } = &rrset;
        self.client
            .patch_rrsets(zone_name, std::slice::from_ref(&rrset))
            .await
            .map_err(|source| ReconcileError::Mutate {
                zone: zone_name.to_string(),
                name: name.clone(),
                rrtype: rrtype.clone(),
                changetype,
                source,
            })?;

        info!(zone = %zone_name, %name, %rrtype, %changetype, records = rrset.records.len(), "applied rrset");
        Ok(())
    }
}
