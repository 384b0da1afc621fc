use tracing::debug;

use super::ZoneManager;
use crate::error::ReconcileError;
use crate::names::candidate_zones;
use crate::powerdns::transport::Transport;
use crate::powerdns::types::PdnsZone;

/// The nearest managed ancestor of a name, with the zone as fetched while probing.
#[derive(Debug, Clone)]
pub struct LocatedZone {
    pub name: String,
    pub zone: PdnsZone,
}

impl<T: Transport> ZoneManager<T> {
    /// Walks `name` from its full form towards the TLD and returns the first
    /// candidate that exists as a zone on the server.
    ///
    /// Absence of a candidate moves on to the next, shorter one; any other
    /// failure (transport, auth, server error) aborts the search.
    pub async fn find_owning_zone(&self, name: &str) -> Result<Option<LocatedZone>, ReconcileError> {
        for candidate in candidate_zones(name)? {
            let probe = self
                .client
                .find_zone(&candidate)
                .await
                .map_err(|source| ReconcileError::Locate {
                    name: name.to_string(),
                    source,
                })?;

            match probe {
                Some(zone) => {
                    debug!(%name, zone = %candidate, "located owning zone");
                    return Ok(Some(LocatedZone {
                        name: candidate,
                        zone,
                    }));
                }
                None => debug!(%name, %candidate, "no zone at candidate"),
            }
        }

        debug!(%name, "no managed ancestor zone");
        Ok(None)
    }
}
