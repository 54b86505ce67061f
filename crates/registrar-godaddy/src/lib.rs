// # GoDaddy Registrar
//
// This crate provides the GoDaddy domains API adapter for the registrar
// service.
//
// ## Behavior
//
// - ✅ Exactly one transport call per operation
// - ✅ Transport errors propagate with their classified kind unchanged
// - ✅ Response bodies that fail to decode classify as `Internal`
// - ✅ Credentials never appear in logs or `Debug` output
// - ❌ NO batching (owned by the fan-out aggregator)
// - ❌ NO retry logic
// - ❌ NO caching
//
// ## API Reference
//
// - Domains API v1: https://developer.godaddy.com/doc/endpoint/domains
// - Availability: GET `/v1/domains/available?domain=...`
// - Purchase: POST `/v1/domains/purchase`
// - Suggestions: GET `/v1/domains/suggest?query=...&limit=...`
// - TLDs: GET `/v1/domains/tlds`
// - Purchase schema: GET `/v1/domains/purchase/schema/:tld`
// - Agreements: GET `/v1/domains/agreements?tlds=...&privacy=false`
// - DNS records: GET `/v1/domains/:domain/records/:type`
// - Replace DNS records: PUT `/v1/domains/:domain/records/:type/:name`

use async_trait::async_trait;
use registrar_core::config::RegistrarConfig;
use registrar_core::traits::{Registrar, RegistrarFactory};
use registrar_core::transport::{CallRequest, TransportClient};
use registrar_core::types::{Consent, Contact, DnsRecord, DomainAvailability};
use registrar_core::{Result, ServiceError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// GoDaddy API base URL (test environment)
pub const GODADDY_OTE_API_BASE: &str = "https://api.ote-godaddy.com";

/// GoDaddy API base URL (production)
pub const GODADDY_API_BASE: &str = "https://api.godaddy.com";

/// Default number of suggestions requested per query
const DEFAULT_SUGGEST_LIMIT: u32 = 10;

/// GoDaddy registrar
///
/// Stateless apart from its configuration; safe to share across tasks.
pub struct GoDaddyRegistrar {
    /// Transport client every call goes through
    transport: TransportClient,

    /// API base URL without a trailing slash
    api_base: String,

    /// `Authorization` header value (`sso-key <key>:<secret>`)
    /// ⚠️ NEVER log this value
    authorization: String,

    /// `limit` sent with suggestion queries
    suggest_limit: u32,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for GoDaddyRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyRegistrar")
            .field("api_base", &self.api_base)
            .field("authorization", &"<REDACTED>")
            .field("suggest_limit", &self.suggest_limit)
            .finish()
    }
}

/// Body of a purchase request: one contact for every role
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseBody<'a> {
    consent: &'a Consent,
    contact_admin: &'a Contact,
    contact_billing: &'a Contact,
    contact_registrant: &'a Contact,
    contact_tech: &'a Contact,
    domain: &'a str,
}

#[derive(Deserialize)]
struct AvailabilityResponse {
    available: bool,
    #[serde(default)]
    price: i64,
}

#[derive(Deserialize)]
struct SuggestionEntry {
    domain: String,
}

#[derive(Deserialize)]
struct TldEntry {
    name: String,
}

#[derive(Deserialize)]
struct SchemaResponse {
    #[serde(default)]
    required: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgreementEntry {
    agreement_key: String,
}

impl GoDaddyRegistrar {
    /// Create a new GoDaddy registrar
    ///
    /// # Parameters
    ///
    /// - `transport`: Transport client for outbound calls
    /// - `api_base`: API base URL (e.g. [`GODADDY_OTE_API_BASE`])
    /// - `authorization`: `Authorization` header value; empty to send none
    pub fn new(
        transport: TransportClient,
        api_base: impl Into<String>,
        authorization: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            authorization: authorization.into(),
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
        }
    }

    /// Set the number of suggestions requested per query
    pub fn with_suggest_limit(mut self, limit: u32) -> Self {
        self.suggest_limit = limit;
        self
    }

    /// Create a registrar from configuration
    pub fn from_config(config: &RegistrarConfig) -> Result<Self> {
        config.validate()?;
        let transport = TransportClient::with_timeout(config.http_timeout())?;
        Ok(Self::new(transport, config.api_base.clone(), config.authorization())
            .with_suggest_limit(config.suggest_limit))
    }

    /// URL of the API path made of `segments`
    ///
    /// Each segment is percent-encoded on its own, so caller input such as
    /// `a/b?c` stays a single path segment. `.` and `..` are rejected.
    fn url(&self, segments: &[&str]) -> Result<String> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ServiceError::invalid_argument(format!(
                "Invalid path segment: {:?}",
                segment
            )));
        }

        let mut url = Url::parse(&self.api_base).map_err(|e| {
            ServiceError::internal(format!("Invalid API base {}: {}", self.api_base, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ServiceError::internal(format!("API base cannot carry a path: {}", self.api_base))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url.into())
    }

    fn get(&self, segments: &[&str]) -> Result<CallRequest> {
        Ok(CallRequest::get(self.url(segments)?).authorization(self.authorization.as_str()))
    }

    /// Send one request, logging the failure with the called URL
    async fn send(&self, request: CallRequest) -> Result<reqwest::Response> {
        let url = request.url().to_string();
        self.transport.call(request).await.map_err(|e| {
            tracing::error!("Error calling {}: {}", url, e);
            e
        })
    }

    /// Send one request and decode its JSON body
    async fn fetch<T: DeserializeOwned>(&self, request: CallRequest) -> Result<T> {
        let url = request.url().to_string();
        let response = self.send(request).await?;

        let body = response.bytes().await.map_err(|e| {
            tracing::error!("Error reading response body from {}: {}", url, e);
            ServiceError::internal("Error reading response body")
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("Error decoding response body from {}: {}", url, e);
            ServiceError::internal("Error decoding response body")
        })
    }
}

#[async_trait]
impl Registrar for GoDaddyRegistrar {
    async fn check_availability(&self, domain: &str) -> Result<DomainAvailability> {
        tracing::debug!("Checking availability of {}", domain);

        let body: AvailabilityResponse = self
            .fetch(self.get(&["v1", "domains", "available"])?.query("domain", domain))
            .await?;

        Ok(DomainAvailability {
            available: body.available,
            price: body.price,
        })
    }

    async fn purchase(&self, domain: &str, contact: &Contact, consent: &Consent) -> Result<()> {
        tracing::info!("Purchasing domain {}", domain);

        let body = PurchaseBody {
            consent,
            contact_admin: contact,
            contact_billing: contact,
            contact_registrant: contact,
            contact_tech: contact,
            domain,
        };
        let request = CallRequest::post(self.url(&["v1", "domains", "purchase"])?)
            .authorization(self.authorization.as_str())
            .json(&body)?;

        self.send(request).await?;
        tracing::info!("Domain purchased: {}", domain);
        Ok(())
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let body: Vec<SuggestionEntry> = self
            .fetch(
                self.get(&["v1", "domains", "suggest"])?
                    .query("query", query)
                    .query("limit", self.suggest_limit.to_string()),
            )
            .await?;

        Ok(body.into_iter().map(|s| s.domain).collect())
    }

    async fn list_tlds(&self) -> Result<Vec<String>> {
        let body: Vec<TldEntry> = self.fetch(self.get(&["v1", "domains", "tlds"])?).await?;
        Ok(body.into_iter().map(|t| t.name).collect())
    }

    async fn purchase_schema(&self, tld: &str) -> Result<Vec<String>> {
        let request = self.get(&["v1", "domains", "purchase", "schema", tld])?;
        let body: SchemaResponse = self.fetch(request).await?;
        Ok(body.required)
    }

    async fn purchase_agreement(&self, tld: &str) -> Result<Vec<String>> {
        let body: Vec<AgreementEntry> = self
            .fetch(
                self.get(&["v1", "domains", "agreements"])?
                    .query("tlds", tld)
                    .query("privacy", "false"),
            )
            .await?;

        Ok(body.into_iter().map(|a| a.agreement_key).collect())
    }

    async fn get_dns_records(&self, domain: &str, record_type: &str) -> Result<Vec<DnsRecord>> {
        let request = self.get(&["v1", "domains", domain, "records", record_type])?;
        let records: Vec<DnsRecord> = self.fetch(request).await?;
        tracing::debug!(
            "DNS records of type {} for {}: {}",
            record_type,
            domain,
            records.len()
        );
        Ok(records)
    }

    async fn put_dns_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        let url = self.url(&[
            "v1",
            "domains",
            domain,
            "records",
            &record.record_type,
            &record.name,
        ])?;
        let request = CallRequest::put(url)
            .authorization(self.authorization.as_str())
            .json(std::slice::from_ref(record))?;

        self.send(request).await?;
        tracing::info!(
            "DNS record replaced: {} {} {}",
            domain,
            record.record_type,
            record.name
        );
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "godaddy"
    }
}

/// Factory for creating GoDaddy registrars
pub struct GoDaddyFactory;

impl RegistrarFactory for GoDaddyFactory {
    fn create(&self, config: &RegistrarConfig) -> Result<Arc<dyn Registrar>> {
        if config.api_key.is_none() {
            tracing::warn!("GoDaddy registrar has no API credentials; calls will be unauthenticated");
        }
        Ok(Arc::new(GoDaddyRegistrar::from_config(config)?))
    }
}

/// Register the GoDaddy registrar with a registry
///
/// # Example
///
/// ```rust
/// use registrar_core::RegistrarRegistry;
///
/// let registry = RegistrarRegistry::new();
/// registrar_godaddy::register(&registry);
/// assert!(registry.has_registrar("godaddy"));
/// ```
pub fn register(registry: &registrar_core::RegistrarRegistry) {
    registry.register_registrar("godaddy", Box::new(GoDaddyFactory));
}
