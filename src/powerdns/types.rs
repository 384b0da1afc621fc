use serde::{Deserialize, Serialize};
use std::fmt;

/// Change directive attached to an rrset in a zone PATCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Replace,
    Delete,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeType::Replace => "REPLACE",
            ChangeType::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    Native,
    Master,
    Slave,
    Producer,
    Consumer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsZone {
    #[serde(default)]
    pub id: String, // "example.com."
    pub name: String, // "example.com."
    pub kind: ZoneKind,
    #[serde(default)]
    pub masters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub serial: u32,
    #[serde(default)]
    pub notified_serial: u32,
    #[serde(default)]
    pub soa_edit: String,
    #[serde(default)]
    pub soa_edit_api: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub dnssec: bool,
    #[serde(default)]
    pub api_rectify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>, // "/api/v1/servers/localhost/zones/example.com."
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrsets: Option<Vec<PdnsRrset>>,
}

impl PdnsZone {
    pub fn rrset(&self, name: &str, rrtype: &str) -> Option<&PdnsRrset> {
        self.rrsets
            .as_deref()?
            .iter()
            .find(|rr| rr.name.eq_ignore_ascii_case(name) && rr.rrtype == rrtype)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsRrset {
    pub name: String, // "www.example.com."
    #[serde(rename = "type")]
    pub rrtype: String, // "A", "NS", ...
    #[serde(default)]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changetype: Option<ChangeType>,
    #[serde(default)]
    pub records: Vec<PdnsRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<PdnsComment>,
}

impl PdnsRrset {
    /// REPLACE rrset whose records carry their owner name, type and ttl.
    pub fn replace<I, S>(name: impl Into<String>, rrtype: impl Into<String>, ttl: u32, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let rrtype = rrtype.into();
        let records = contents
            .into_iter()
            .map(|content| PdnsRecord {
                content: content.into(),
                disabled: false,
                name: Some(name.clone()),
                ttl: Some(ttl),
                rrtype: Some(rrtype.clone()),
            })
            .collect();

        Self {
            name,
            rrtype,
            ttl,
            changetype: Some(ChangeType::Replace),
            records,
            comments: Vec::new(),
        }
    }

    /// DELETE rrset; its single record only names the set being removed.
    pub fn delete(name: impl Into<String>, rrtype: impl Into<String>) -> Self {
        let name = name.into();
        let rrtype = rrtype.into();
        let identity = PdnsRecord {
            content: String::new(),
            disabled: false,
            name: Some(name.clone()),
            ttl: Some(0),
            rrtype: Some(rrtype.clone()),
        };

        Self {
            name,
            rrtype,
            ttl: 0,
            changetype: Some(ChangeType::Delete),
            records: vec![identity],
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsRecord {
    pub content: String, // "192.0.2.1" or "ns1.example.net."
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub rrtype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsComment {
    pub content: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub modified_at: u64,
}

/// Body of a zone PATCH.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsZonePatch {
    pub rrsets: Vec<PdnsRrset>,
}

// Used when creating a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsZoneCreate {
    pub name: String,             // "example.com."
    pub kind: ZoneKind,           // Master
    pub masters: Vec<String>,     // always empty for Master zones
    pub nameservers: Vec<String>, // ["ns1.example.net.", "ns2.example.net."]
}

/// Body of a zone PUT adjusting its serial policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsZoneMetadataUpdate {
    pub kind: ZoneKind,
    pub soa_edit: String,
    pub soa_edit_api: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsServer {
    pub id: String, // "localhost"
    #[serde(rename = "type", default)]
    pub server_type: Option<String>, // "Server"
    #[serde(default)]
    pub daemon_type: Option<String>, // "authoritative"
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub config_url: Option<String>,
    #[serde(default)]
    pub zones_url: Option<String>,
}
