use regex::Regex;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is empty")]
    Empty,
    #[error("name '{0}' contains an empty label")]
    EmptyLabel(String),
    #[error("label '{0}' too long (max 63 characters)")]
    LabelTooLong(String),
    #[error("name '{0}' too long (max 253 characters)")]
    NameTooLong(String),
    #[error("label '{0}' contains invalid characters (only letters, digits, '-' and '_' allowed)")]
    InvalidCharacters(String),
    #[error("label '{0}' must not start or end with '-'")]
    LeadingOrTrailingHyphen(String),
    #[error("name '{0}' must be fully qualified with a trailing '.'")]
    MissingTrailingDot(String),
    #[error("label '{0}' must be relative, not fully qualified")]
    AbsoluteLabel(String),
    #[error("record {record} does not match rrset {rrset}")]
    RecordMismatch { record: String, rrset: String },
    #[error("'{0}' is not a valid RR type mnemonic")]
    InvalidRrType(String),
    #[error("REPLACE of {0} requires non-empty content")]
    EmptyContent(String),
    #[error("{name} is outside zone {zone}")]
    OutsideZone { name: String, zone: String },
}

lazy_static::lazy_static! {
    /// Letters, digits, '-' and '_' (service labels such as _acme-challenge)
    static ref LABEL_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
    /// RR type mnemonics: A, AAAA, TXT, TYPE65534, ...
    static ref RRTYPE_RE: Regex = Regex::new(r"^[A-Z][A-Z0-9]*$").unwrap();
}

pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.is_empty() {
        return Err(ValidationError::Empty);
    }
    if label.len() > 63 {
        return Err(ValidationError::LabelTooLong(label.to_string()));
    }
    if !LABEL_RE.is_match(label) {
        return Err(ValidationError::InvalidCharacters(label.to_string()));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(ValidationError::LeadingOrTrailingHyphen(label.to_string()));
    }

    Ok(())
}

/// Validates a domain name with or without its trailing dot.
pub fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    let d = domain.strip_suffix('.').unwrap_or(domain);
    if d.is_empty() {
        return Err(ValidationError::Empty);
    }
    if d.len() > 253 {
        return Err(ValidationError::NameTooLong(domain.to_string()));
    }
    for label in d.split('.') {
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel(domain.to_string()));
        }
        validate_label(label)?;
    }
    Ok(())
}

/// Validates a canonical name as used on the wire: fully qualified, trailing dot.
pub fn validate_fqdn(name: &str) -> Result<(), ValidationError> {
    if !name.ends_with('.') {
        return Err(ValidationError::MissingTrailingDot(name.to_string()));
    }
    validate_domain(name)
}

/// Validates a canonical owner name, which may start with a single `*` label.
pub fn validate_owner_name(name: &str) -> Result<(), ValidationError> {
    match name.strip_prefix("*.") {
        Some(rest) => validate_fqdn(rest),
        None => validate_fqdn(name),
    }
}

pub fn validate_rrtype(rrtype: &str) -> Result<(), ValidationError> {
    if !RRTYPE_RE.is_match(rrtype) {
        return Err(ValidationError::InvalidRrType(rrtype.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_service_labels() {
        assert_eq!(validate_label("_acme-challenge"), Ok(()));
        assert_eq!(validate_label("xn--bcher-kva"), Ok(()));
    }

    #[test]
    fn rejects_bad_labels() {
        assert_eq!(validate_label(""), Err(ValidationError::Empty));
        assert!(matches!(
            validate_label("-www"),
            Err(ValidationError::LeadingOrTrailingHyphen(_))
        ));
        assert!(matches!(
            validate_label("w w"),
            Err(ValidationError::InvalidCharacters(_))
        ));
        assert!(matches!(
            validate_label(&"a".repeat(64)),
            Err(ValidationError::LabelTooLong(_))
        ));
    }

    #[test]
    fn domains_need_non_empty_labels() {
        assert_eq!(validate_domain("example.com"), Ok(()));
        assert_eq!(validate_domain("example.com."), Ok(()));
        assert!(matches!(
            validate_domain("a..example.com"),
            Err(ValidationError::EmptyLabel(_))
        ));
        assert_eq!(validate_domain("."), Err(ValidationError::Empty));
    }

    #[test]
    fn fqdn_requires_trailing_dot() {
        assert_eq!(validate_fqdn("www.example.com."), Ok(()));
        assert!(matches!(
            validate_fqdn("www.example.com"),
            Err(ValidationError::MissingTrailingDot(_))
        ));
    }

    #[test]
    fn wildcard_only_leads_owner_names() {
        assert_eq!(validate_owner_name("*.example.com."), Ok(()));
        assert!(matches!(
            validate_owner_name("www.*.example.com."),
            Err(ValidationError::InvalidCharacters(_))
        ));
        assert!(validate_owner_name("*.*.example.com.").is_err());
        assert!(validate_domain("*.example.com").is_err());
    }

    #[test]
    fn rrtype_mnemonics() {
        assert_eq!(validate_rrtype("AAAA"), Ok(()));
        assert_eq!(validate_rrtype("TYPE65534"), Ok(()));
        assert!(validate_rrtype("a").is_err());
        assert!(validate_rrtype("").is_err());
    }
}
