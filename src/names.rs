//! Canonical-name helpers: trailing dots, relative labels and zone candidates.
use crate::validation::{ValidationError, validate_domain, validate_owner_name};

/// Fully-qualified form of `name` with exactly one trailing dot.
pub fn canonical_name(name: &str) -> Result<String, ValidationError> {
    validate_domain(name)?;
    Ok(format!("{}.", name.trim_end_matches('.')))
}

/// Canonical owner name for a relative `label` under `domain`.
///
/// An empty label or `@` addresses the apex of `domain` itself.
pub fn record_name(label: &str, domain: &str) -> Result<String, ValidationError> {
    let apex = canonical_name(domain)?;
    match label {
        "" | "@" => Ok(apex),
        label if label.ends_with('.') => Err(ValidationError::AbsoluteLabel(label.to_string())),
        label => {
            let name = format!("{label}.{apex}");
            validate_owner_name(&name)?;
            Ok(name)
        }
    }
}

/// Zone names that could own `name`, most specific first.
///
/// `a.b.example.com` yields `a.b.example.com.`, `b.example.com.`,
/// `example.com.` and `com.`.
pub fn candidate_zones(name: &str) -> Result<Vec<String>, ValidationError> {
    let canonical = canonical_name(name)?;
    let labels: Vec<&str> = canonical.trim_end_matches('.').split('.').collect();
    Ok((0..labels.len())
        .map(|i| format!("{}.", labels[i..].join(".")))
        .collect())
}

/// Whether the canonical `name` is the apex of, or lies below, the canonical `zone`.
pub fn is_within_zone(name: &str, zone: &str) -> bool {
    let name = name.to_ascii_lowercase();
    let zone = zone.to_ascii_lowercase();
    name == zone || name.ends_with(&format!(".{zone}"))
}

/// Appends the trailing dot to a host name if it is missing.
pub fn canonical_host(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('.');
    format!("{trimmed}.")
}
