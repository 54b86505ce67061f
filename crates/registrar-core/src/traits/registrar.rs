// # Registrar Trait
//
// Defines the capability boundary between the HTTP surface / fan-out
// aggregator and a concrete registrar API.
//
// ## Implementations
//
// - GoDaddy: `registrar-godaddy` crate
//
// ## Usage
//
// ```rust,ignore
// use registrar_core::Registrar;
//
// #[tokio::main]
// async fn main() -> registrar_core::Result<()> {
//     let registrar = /* Registrar implementation */;
//
//     let availability = registrar.check_availability("example.com").await?;
//     if availability.available {
//         println!("example.com costs {}", availability.price);
//     }
//
//     Ok(())
// }
// ```

use crate::error::Result;
use crate::types::{Consent, Contact, DnsRecord, DomainAvailability};
use async_trait::async_trait;

/// Trait for registrar API implementations
///
/// Each operation maps onto exactly one outbound call through the transport
/// client plus payload encode/decode.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: the fan-out aggregator calls them
/// from many tasks at once.
///
/// ## Forbidden Capabilities
/// - ❌ Batching several items into one operation (owned by the fan-out aggregator)
/// - ❌ Retry logic or backoff
/// - ❌ Caching responses between calls
/// - ❌ Spawning tasks
///
/// Errors are returned as classified [`ServiceError`](crate::ServiceError)s;
/// transport errors propagate with their kind unchanged.
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Check whether a domain can be registered and at what price
    async fn check_availability(&self, domain: &str) -> Result<DomainAvailability>;

    /// Purchase a domain, using `contact` for every contact role
    async fn purchase(&self, domain: &str, contact: &Contact, consent: &Consent) -> Result<()>;

    /// List domain names suggested for a query
    async fn suggest(&self, query: &str) -> Result<Vec<String>>;

    /// List the TLDs the registrar supports
    async fn list_tlds(&self) -> Result<Vec<String>>;

    /// Names of the fields required to purchase a domain under `tld`
    async fn purchase_schema(&self, tld: &str) -> Result<Vec<String>>;

    /// Keys of the agreements that must be consented to for `tld`
    async fn purchase_agreement(&self, tld: &str) -> Result<Vec<String>>;

    /// DNS records of one type for a domain
    async fn get_dns_records(&self, domain: &str, record_type: &str) -> Result<Vec<DnsRecord>>;

    /// Replace the records matching (domain, type, name) with `record`
    async fn put_dns_record(&self, domain: &str, record: &DnsRecord) -> Result<()>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing registrars from configuration
pub trait RegistrarFactory: Send + Sync {
    /// Create a Registrar instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration for the registrar API
    ///
    /// # Returns
    ///
    /// A shareable Registrar trait object
    fn create(
        &self,
        config: &crate::config::RegistrarConfig,
    ) -> Result<std::sync::Arc<dyn Registrar>>;
}
