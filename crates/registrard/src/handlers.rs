//! Route handlers
//!
//! Single-item routes call the registrar directly. `/domain-suggest` and
//! `/list-dns` issue one registrar call per item through the fan-out
//! aggregator and answer with the aggregate, or with one error.

use crate::AppState;
use crate::errors::{AppError, AppResult};
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use registrar_core::fan_out;
use registrar_core::types::{Consent, DNS_RECORD_TYPES, DnsRecord, Suggestion};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct DomainQuery {
    pub domain: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DomainRequest {
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct TldRequest {
    pub tld: String,
}

/// Body of `/put-dns`: the target domain plus the record itself
#[derive(Debug, Deserialize)]
pub struct PutDnsRequest {
    pub domain: String,
    #[serde(flatten)]
    pub record: DnsRecord,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    #[serde(rename = "Suggestion")]
    pub suggestion: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<DnsRecord>,
}

#[derive(Debug, Serialize)]
pub struct TldsResponse {
    pub tlds: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub required: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementResponse {
    pub agreement_keys: Vec<String>,
}

/// Decode a JSON request body regardless of its declared content type
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body).map_err(AppError::malformed_body)
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")])
}

/// Availability of `?domain=`, or of the configured debug domain
pub async fn domain_availability(
    State(state): State<AppState>,
    Query(query): Query<DomainQuery>,
) -> AppResult<impl IntoResponse> {
    let domain = query
        .domain
        .unwrap_or_else(|| state.debug.availability_domain.clone());

    let availability = state.registrar.check_availability(&domain).await?;
    Ok(Json(availability))
}

/// Purchase `?domain=` (or the configured debug domain) with the debug contact
pub async fn purchase_domain(
    State(state): State<AppState>,
    Query(query): Query<DomainQuery>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let domain = query
        .domain
        .unwrap_or_else(|| state.debug.purchase_domain.clone());
    let agreed_by = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .unwrap_or("127.0.0.1");
    let consent = Consent::now(agreed_by, state.debug.agreement_keys.clone());

    state
        .registrar
        .purchase(&domain, &state.debug.contact, &consent)
        .await?;
    Ok(StatusCode::OK)
}

/// Available suggestions for a query, each with its price
pub async fn domain_suggest(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<SuggestResponse>> {
    let request: DomainRequest = decode_body(&body)?;

    let names = state.registrar.suggest(&request.domain).await?;
    let candidates = names.len();

    let checked = fan_out("domain-suggest", names, |name, _task| {
        let registrar = Arc::clone(&state.registrar);
        async move {
            let availability = registrar.check_availability(&name).await?;
            Ok(availability.available.then_some(Suggestion {
                domain: name,
                price: availability.price,
            }))
        }
    })
    .await?;

    let suggestion: Vec<Suggestion> = checked.into_iter().flatten().collect();
    info!(
        "{} of {} suggestions for {} are available",
        suggestion.len(),
        candidates,
        request.domain
    );
    Ok(Json(SuggestResponse { suggestion }))
}

/// Every DNS record of a domain, one registrar call per record type
pub async fn list_dns(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<RecordsResponse>> {
    let request: DomainRequest = decode_body(&body)?;

    let per_type = fan_out("list-dns", DNS_RECORD_TYPES, |record_type, task| {
        let registrar = Arc::clone(&state.registrar);
        let domain = request.domain.clone();
        async move {
            task.checkpoint()?;
            registrar.get_dns_records(&domain, record_type).await
        }
    })
    .await?;

    let records = per_type.into_iter().flatten().collect();
    Ok(Json(RecordsResponse { records }))
}

pub async fn put_dns(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<StatusCode> {
    let request: PutDnsRequest = decode_body(&body)?;

    state
        .registrar
        .put_dns_record(&request.domain, &request.record)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn tlds(State(state): State<AppState>) -> AppResult<Json<TldsResponse>> {
    let tlds = state.registrar.list_tlds().await?;
    Ok(Json(TldsResponse { tlds }))
}

pub async fn purchase_schema(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<SchemaResponse>> {
    let request: TldRequest = decode_body(&body)?;
    let required = state.registrar.purchase_schema(&request.tld).await?;
    Ok(Json(SchemaResponse { required }))
}

pub async fn purchase_agreement(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<AgreementResponse>> {
    let request: TldRequest = decode_body(&body)?;
    let agreement_keys = state.registrar.purchase_agreement(&request.tld).await?;
    Ok(Json(AgreementResponse { agreement_keys }))
}
