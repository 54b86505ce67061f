//! Test doubles for the HTTP surface contract tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use registrar_core::types::{Consent, Contact, DnsRecord, DomainAvailability};
use registrar_core::{DebugConfig, Registrar, Result, ServiceError};
use registrard::{AppState, router};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Scripted registrar counting every call
#[derive(Default)]
pub struct MockRegistrar {
    pub suggestions: Vec<String>,
    /// Available domains and their prices; anything else is unavailable
    pub available: HashMap<String, i64>,
    /// Domains whose availability check fails
    pub failing_domains: HashMap<String, ServiceError>,
    pub suggest_error: Option<ServiceError>,
    /// Records returned per record type; missing types return none
    pub records: HashMap<String, Vec<DnsRecord>>,
    /// Record types whose read fails
    pub failing_types: HashMap<String, ServiceError>,
    pub put_error: Option<ServiceError>,
    pub calls: AtomicUsize,
    pub purchases: Mutex<Vec<(String, Contact, Consent)>>,
    pub puts: Mutex<Vec<(String, DnsRecord)>>,
    pub dns_reads: Mutex<Vec<String>>,
}

impl MockRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Registrar for MockRegistrar {
    async fn check_availability(&self, domain: &str) -> Result<DomainAvailability> {
        self.hit();
        if let Some(err) = self.failing_domains.get(domain) {
            return Err(err.clone());
        }
        Ok(match self.available.get(domain) {
            Some(price) => DomainAvailability {
                available: true,
                price: *price,
            },
            None => DomainAvailability {
                available: false,
                price: 0,
            },
        })
    }

    async fn purchase(&self, domain: &str, contact: &Contact, consent: &Consent) -> Result<()> {
        self.hit();
        self.purchases
            .lock()
            .unwrap()
            .push((domain.to_string(), contact.clone(), consent.clone()));
        Ok(())
    }

    async fn suggest(&self, _query: &str) -> Result<Vec<String>> {
        self.hit();
        if let Some(err) = &self.suggest_error {
            return Err(err.clone());
        }
        Ok(self.suggestions.clone())
    }

    async fn list_tlds(&self) -> Result<Vec<String>> {
        self.hit();
        Ok(vec!["com".to_string(), "io".to_string()])
    }

    async fn purchase_schema(&self, _tld: &str) -> Result<Vec<String>> {
        self.hit();
        Ok(vec!["consent".to_string(), "domain".to_string()])
    }

    async fn purchase_agreement(&self, _tld: &str) -> Result<Vec<String>> {
        self.hit();
        Ok(vec!["DNRA".to_string()])
    }

    async fn get_dns_records(&self, _domain: &str, record_type: &str) -> Result<Vec<DnsRecord>> {
        self.hit();
        self.dns_reads.lock().unwrap().push(record_type.to_string());
        if let Some(err) = self.failing_types.get(record_type) {
            return Err(err.clone());
        }
        Ok(self.records.get(record_type).cloned().unwrap_or_default())
    }

    async fn put_dns_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        self.hit();
        if let Some(err) = &self.put_error {
            return Err(err.clone());
        }
        self.puts
            .lock()
            .unwrap()
            .push((domain.to_string(), record.clone()));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

pub fn app(registrar: Arc<MockRegistrar>) -> Router {
    router(AppState::new(registrar, DebugConfig::default()))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST `body` without a `Content-Type` header (as `curl -d` sends it)
pub async fn post_untyped(app: Router, uri: &str, body: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
