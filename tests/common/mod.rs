//! In-memory stand-in for the PowerDNS HTTP API, recording every call it sees.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pdns_zones::powerdns::types::*;
use pdns_zones::{ApiError, PowerDnsClient, RawResponse, Transport, ZoneManager};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Fault {
    Status(StatusCode, String),
    Transport,
    Stall,
}

#[derive(Default)]
struct State {
    zones: BTreeMap<String, PdnsZone>,
    calls: Vec<Call>,
    faults: HashMap<(Method, String), Fault>,
}

#[derive(Clone, Default)]
pub struct FakePdns {
    state: Arc<Mutex<State>>,
}

#[derive(Debug)]
struct FakeIoError;

impl std::fmt::Display for FakeIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("connection refused")
    }
}

impl std::error::Error for FakeIoError {}

impl FakePdns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an existing zone with the given SOA-EDIT-API value.
    pub fn with_zone(self, name: &str, soa_edit_api: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let mut zone = new_zone(name, ZoneKind::Native, &["ns1.example.net.".into()]);
            zone.soa_edit_api = soa_edit_api.into();
            state.zones.insert(name.to_string(), zone);
        }
        self
    }

    pub fn manager(&self) -> ZoneManager<FakePdns> {
        ZoneManager::new(
            PowerDnsClient::with_transport(self.clone(), "localhost"),
            ["ns1.example.com", "ns2.example.com"],
        )
    }

    pub fn fail_with(&self, method: Method, path: &str, status: StatusCode, message: &str) {
        self.set_fault(method, path, Fault::Status(status, message.into()));
    }

    pub fn break_transport(&self, method: Method, path: &str) {
        self.set_fault(method, path, Fault::Transport);
    }

    pub fn stall(&self, method: Method, path: &str) {
        self.set_fault(method, path, Fault::Stall);
    }

    fn set_fault(&self, method: Method, path: &str, fault: Fault) {
        let mut state = self.state.lock().unwrap();
        state.faults.insert((method, path.to_string()), fault);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls rendered as "METHOD path" for compact assertions.
    pub fn call_log(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn zone(&self, name: &str) -> Option<PdnsZone> {
        self.state.lock().unwrap().zones.get(name).cloned()
    }

    pub fn rrset(&self, zone: &str, name: &str, rrtype: &str) -> Option<PdnsRrset> {
        self.zone(zone)?.rrset(name, rrtype).cloned()
    }

    fn handle(&self, method: &Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut state = self.state.lock().unwrap();
        let segments: Vec<&str> = path.split('/').collect();

        match (method.as_str(), segments.as_slice()) {
            ("GET", ["servers"]) => (
                StatusCode::OK,
                json!([{
                    "id": "localhost",
                    "type": "Server",
                    "daemon_type": "authoritative",
                    "version": "4.9.0",
                    "url": "/api/v1/servers/localhost",
                    "config_url": "/api/v1/servers/localhost/config{/config_setting}",
                    "zones_url": "/api/v1/servers/localhost/zones{/zone}"
                }]),
            ),
            ("GET", ["servers", "localhost"]) => (
                StatusCode::OK,
                json!({"id": "localhost", "type": "Server", "daemon_type": "authoritative"}),
            ),
            ("GET", ["servers", "localhost", "zones"]) => {
                let zones: Vec<PdnsZone> = state
                    .zones
                    .values()
                    .map(|z| PdnsZone {
                        rrsets: None,
                        ..z.clone()
                    })
                    .collect();
                (StatusCode::OK, serde_json::to_value(zones).unwrap())
            }
            ("POST", ["servers", "localhost", "zones"]) => {
                let create: PdnsZoneCreate = match body.map(serde_json::from_value) {
                    Some(Ok(create)) => create,
                    _ => return unprocessable("malformed zone"),
                };
                if !create.name.ends_with('.')
                    || create.nameservers.iter().any(|ns| !ns.ends_with('.'))
                {
                    return unprocessable("names must be canonical");
                }
                if state.zones.contains_key(&create.name) {
                    return (
                        StatusCode::CONFLICT,
                        json!({"error": format!("Domain '{}' already exists", create.name)}),
                    );
                }
                let zone = new_zone(&create.name, create.kind, &create.nameservers);
                state.zones.insert(create.name.clone(), zone.clone());
                (StatusCode::CREATED, serde_json::to_value(zone).unwrap())
            }
            (_, ["servers", "localhost", "zones", name]) => {
                let name = name.to_string();
                let Some(zone) = state.zones.get_mut(&name) else {
                    return (
                        StatusCode::NOT_FOUND,
                        json!({"error": format!("Could not find domain '{name}'")}),
                    );
                };
                match method.as_str() {
                    "GET" => (StatusCode::OK, serde_json::to_value(&*zone).unwrap()),
                    "PUT" => {
                        let Some(Ok(update)) =
                            body.map(serde_json::from_value::<PdnsZoneMetadataUpdate>)
                        else {
                            return unprocessable("malformed metadata");
                        };
                        zone.kind = update.kind;
                        zone.soa_edit = update.soa_edit;
                        zone.soa_edit_api = update.soa_edit_api;
                        (StatusCode::NO_CONTENT, Value::Null)
                    }
                    "PATCH" => {
                        let Some(Ok(patch)) = body.map(serde_json::from_value::<PdnsZonePatch>)
                        else {
                            return unprocessable("malformed patch");
                        };
                        match apply_patch(zone, patch) {
                            Ok(()) => (StatusCode::NO_CONTENT, Value::Null),
                            Err(msg) => unprocessable(&msg),
                        }
                    }
                    "DELETE" => {
                        state.zones.remove(&name);
                        (StatusCode::NO_CONTENT, Value::Null)
                    }
                    _ => (StatusCode::METHOD_NOT_ALLOWED, Value::Null),
                }
            }
            _ => (StatusCode::NOT_FOUND, json!({"error": "Not Found"})),
        }
    }
}

#[async_trait]
impl Transport for FakePdns {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<RawResponse, ApiError> {
        let fault = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call {
                method: method.clone(),
                path: path.to_string(),
                body: body.clone(),
            });
            state.faults.get(&(method.clone(), path.to_string())).cloned()
        };

        match fault {
            Some(Fault::Status(status, message)) => {
                return Ok(RawResponse {
                    status,
                    body: serde_json::to_vec(&json!({ "error": message })).unwrap(),
                });
            }
            Some(Fault::Transport) => return Err(ApiError::transport(FakeIoError)),
            Some(Fault::Stall) => std::future::pending::<()>().await,
            None => {}
        }

        let (status, value) = self.handle(&method, path, body);
        let body = if value.is_null() {
            Vec::new()
        } else {
            serde_json::to_vec(&value).unwrap()
        };
        Ok(RawResponse { status, body })
    }
}

fn unprocessable(message: &str) -> (StatusCode, Value) {
    (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": message }))
}

fn new_zone(name: &str, kind: ZoneKind, nameservers: &[String]) -> PdnsZone {
    let soa = PdnsRrset {
        name: name.to_string(),
        rrtype: "SOA".into(),
        ttl: 3600,
        changetype: None,
        records: vec![record(&format!(
            "a.misconfigured.dns.server.invalid. hostmaster.{name} 0 10800 3600 604800 3600"
        ))],
        comments: Vec::new(),
    };
    let ns = PdnsRrset {
        name: name.to_string(),
        rrtype: "NS".into(),
        ttl: 3600,
        changetype: None,
        records: nameservers.iter().map(|ns| record(ns)).collect(),
        comments: Vec::new(),
    };

    PdnsZone {
        id: name.to_string(),
        name: name.to_string(),
        kind,
        masters: Vec::new(),
        nameservers: Vec::new(),
        serial: 1,
        notified_serial: 0,
        soa_edit: String::new(),
        soa_edit_api: "DEFAULT".into(),
        account: String::new(),
        dnssec: false,
        api_rectify: false,
        url: Some(format!("/api/v1/servers/localhost/zones/{name}")),
        rrsets: Some(vec![soa, ns]),
    }
}

fn record(content: &str) -> PdnsRecord {
    PdnsRecord {
        content: content.to_string(),
        disabled: false,
        name: None,
        ttl: None,
        rrtype: None,
    }
}

fn apply_patch(zone: &mut PdnsZone, patch: PdnsZonePatch) -> Result<(), String> {
    let rrsets = zone.rrsets.get_or_insert_with(Vec::new);
    for change in patch.rrsets {
        let suffix = format!(".{}", zone.name);
        if change.name != zone.name && !change.name.ends_with(&suffix) {
            return Err(format!("RRset {} is out of zone", change.name));
        }
        rrsets.retain(|rr| !(rr.name == change.name && rr.rrtype == change.rrtype));
        match change.changetype {
            Some(ChangeType::Replace) => rrsets.push(PdnsRrset {
                changetype: None,
                records: change
                    .records
                    .iter()
                    .map(|r| record(&r.content))
                    .collect(),
                ..change
            }),
            Some(ChangeType::Delete) => {}
            None => return Err("changetype missing".into()),
        }
    }
    zone.serial += 1;
    Ok(())
}
