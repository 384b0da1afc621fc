use tracing::{debug, info};

use super::ZoneManager;
use crate::error::ReconcileError;
use crate::names::canonical_name;
use crate::powerdns::transport::Transport;
use crate::powerdns::types::{PdnsZone, PdnsZoneMetadataUpdate, ZoneKind};

/// SOA-EDIT(-API) policy under which the server derives serials from the
/// inception date plus an increment on every API write.
pub const INCEPTION_INCREMENT: &str = "INCEPTION-INCREMENT";

impl<T: Transport> ZoneManager<T> {
    /// Fetches `zone_name` and switches it to `INCEPTION-INCREMENT` serials if
    /// it is not already. Returns whether an update was issued.
    pub async fn ensure_api_editable(&self, zone_name: &str) -> Result<bool, ReconcileError> {
        let zone_name = canonical_name(zone_name)?;
        let zone = self
            .client
            .get_zone(&zone_name)
            .await
            .map_err(|source| ReconcileError::Normalize {
                zone: zone_name.clone(),
                source,
            })?;
        self.normalize_zone(&zone_name, &zone).await
    }

    /// Same as `ensure_api_editable` for a zone object fetched earlier in the
    /// same operation.
    pub(crate) async fn normalize_zone(
        &self,
        zone_name: &str,
        zone: &PdnsZone,
    ) -> Result<bool, ReconcileError> {
        if zone.soa_edit_api == INCEPTION_INCREMENT {
            debug!(zone = %zone_name, "SOA-EDIT-API already set");
            return Ok(false);
        }

        let update = PdnsZoneMetadataUpdate {
            kind: ZoneKind::Master,
            soa_edit: INCEPTION_INCREMENT.into(),
            soa_edit_api: INCEPTION_INCREMENT.into(),
        };
        self.client
            .update_zone_metadata(zone_name, &update)
            .await
            .map_err(|source| ReconcileError::Normalize {
                zone: zone_name.to_string(),
                source,
            })?;

        info!(zone = %zone_name, previous = %zone.soa_edit_api, "set SOA-EDIT-API to INCEPTION-INCREMENT");
        Ok(true)
    }
}
