use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::powerdns::transport::{HttpTransport, RawResponse, Transport};
use crate::powerdns::types::*;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Typed PowerDNS API calls for one server id.
#[derive(Clone)]
pub struct PowerDnsClient<T = HttpTransport> {
    transport: T,
    server_id: String, // usually "localhost"
}

impl PowerDnsClient<HttpTransport> {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        server_id: impl Into<String>,
    ) -> Self {
        Self::with_transport(HttpTransport::new(base_url, api_key), server_id)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_transport(
            HttpTransport::from_config(config)?,
            config.server_id.clone(),
        ))
    }
}

impl<T: Transport> PowerDnsClient<T> {
    pub fn with_transport(transport: T, server_id: impl Into<String>) -> Self {
        Self {
            transport,
            server_id: server_id.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    fn server_path(&self, path: &str) -> String {
        format!(
            "servers/{}/{}",
            self.server_id,
            path.trim_start_matches('/')
        )
    }

    fn zone_path(&self, name: &str) -> String {
        self.server_path(&format!("zones/{}", name))
    }

    /// Sends one request and returns the body of a 2xx response.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(ApiError::Encode)?;
        let RawResponse { status, body } =
            self.transport.request(method.clone(), path, body).await?;
        if !status.is_success() {
            return Err(ApiError::rejected(method, path, status, &body));
        }
        Ok(body)
    }

    fn decode<D: DeserializeOwned>(path: &str, body: &[u8]) -> Result<D, ApiError> {
        serde_json::from_slice(body).map_err(|source| ApiError::Malformed {
            path: path.to_string(),
            source,
        })
    }

    pub async fn list_servers(&self) -> Result<Vec<PdnsServer>, ApiError> {
        let body = self.send::<()>(Method::GET, "servers", None).await?;
        Self::decode("servers", &body)
    }

    pub async fn get_server(&self) -> Result<PdnsServer, ApiError> {
        let path = format!("servers/{}", self.server_id);
        let body = self.send::<()>(Method::GET, &path, None).await?;
        Self::decode(&path, &body)
    }

    pub async fn list_zones(&self) -> Result<Vec<PdnsZone>, ApiError> {
        let path = self.server_path("zones");
        let body = self.send::<()>(Method::GET, &path, None).await?;
        Self::decode(&path, &body)
    }

    /// Fetches a zone; a missing zone is `ApiError::NotFound`.
    pub async fn get_zone(&self, name: &str) -> Result<PdnsZone, ApiError> {
        let path = self.zone_path(name);
        match self.send::<()>(Method::GET, &path, None).await {
            Ok(body) => Self::decode(&path, &body),
            // Older servers answer 422 "Could not find domain" instead of 404.
            Err(ApiError::Rejected { status, .. })
                if status == StatusCode::NOT_FOUND
                    || status == StatusCode::UNPROCESSABLE_ENTITY =>
            {
                Err(ApiError::NotFound(name.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Like `get_zone`, but absence is `Ok(None)` rather than an error.
    pub async fn find_zone(&self, name: &str) -> Result<Option<PdnsZone>, ApiError> {
        match self.get_zone(name).await {
            Ok(zone) => Ok(Some(zone)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Creates a zone, returning the server's view of it when the response carries one.
    pub async fn create_zone(&self, z: &PdnsZoneCreate) -> Result<Option<PdnsZone>, ApiError> {
        let path = self.server_path("zones");
        let body = self.send(Method::POST, &path, Some(z)).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Self::decode(&path, &body).map(Some)
    }

    pub async fn update_zone_metadata(
        &self,
        name: &str,
        update: &PdnsZoneMetadataUpdate,
    ) -> Result<(), ApiError> {
        let path = self.zone_path(name);
        self.send(Method::PUT, &path, Some(update)).await?;
        Ok(())
    }

    pub async fn patch_rrsets(&self, zone_name: &str, rrsets: &[PdnsRrset]) -> Result<(), ApiError> {
        let path = self.zone_path(zone_name);
        let body = PdnsZonePatch {
            rrsets: rrsets.to_vec(),
        };
        self.send(Method::PATCH, &path, Some(&body)).await?;
        Ok(())
    }

    pub async fn delete_zone(&self, name: &str) -> Result<(), ApiError> {
        let path = self.zone_path(name);
        self.send::<()>(Method::DELETE, &path, None).await?;
        Ok(())
    }
}
