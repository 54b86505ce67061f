//! Domain types exchanged with the registrar
//!
//! Field names follow the registrar's JSON wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// DNS record types listed by a full zone read, in listing order
pub const DNS_RECORD_TYPES: [&str; 8] = ["A", "AAAA", "CNAME", "MX", "NS", "SOA", "SRV", "TXT"];

/// A DNS record as stored by the registrar
///
/// The core does not interpret record semantics; identity from the
/// registrar's perspective is (domain, type, name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record type (e.g. "A", "TXT")
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record name relative to the domain ("@" for the apex)
    pub name: String,
    /// Record payload
    #[serde(default)]
    pub data: String,
    /// Time-to-live in seconds
    #[serde(default)]
    pub ttl: i64,
}

impl DnsRecord {
    /// Create a new record
    pub fn new(
        record_type: impl Into<String>,
        name: impl Into<String>,
        data: impl Into<String>,
        ttl: i64,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            data: data.into(),
            ttl,
        }
    }
}

/// Postal address of a registration contact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressMailing {
    pub address1: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub state: String,
}

/// Registration contact, used for every contact role of a purchase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub address_mailing: AddressMailing,
    pub email: String,
    pub name_first: String,
    pub name_last: String,
    pub phone: String,
}

/// Consent to the registrar's purchase agreements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    /// When the agreements were accepted
    pub agreed_at: DateTime<Utc>,
    /// Who accepted them (typically a client IP address)
    pub agreed_by: String,
    /// Keys of the accepted agreements (see `Registrar::purchase_agreement`)
    pub agreement_keys: Vec<String>,
}

impl Consent {
    /// Consent to the given agreement keys, accepted now
    pub fn now(agreed_by: impl Into<String>, agreement_keys: Vec<String>) -> Self {
        Self {
            agreed_at: Utc::now(),
            agreed_by: agreed_by.into(),
            agreement_keys,
        }
    }
}

/// Availability and price of a single domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAvailability {
    pub available: bool,
    /// Price as returned by the registrar (micro-units of the account currency)
    pub price: i64,
}

/// A suggested domain that is available for purchase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    pub domain: String,
    pub price: i64,
}
