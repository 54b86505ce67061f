// # registrard - HTTP surface
//
// Router and handlers of the registrar adapter service. The binary in
// `main.rs` wires configuration, tracing and shutdown around [`router`];
// tests drive the router directly.
//
// ## Routes
//
// | Route                 | Method | Body              |
// |-----------------------|--------|-------------------|
// | `/healthz`            | GET    | none              |
// | `/domain-availability`| GET    | `?domain=`        |
// | `/purchase-domain`    | GET    | `?domain=`        |
// | `/domain-suggest`     | POST   | `{domain}`        |
// | `/list-dns`           | POST   | `{domain}`        |
// | `/put-dns`            | POST   | `{domain,type,name,data,ttl}` |
// | `/tlds`               | GET    | none              |
// | `/purchase-schema`    | POST   | `{tld}`           |
// | `/purchase-agreement` | POST   | `{tld}`           |

pub mod errors;
pub mod handlers;
pub mod shutdown;

use axum::{
    Router,
    routing::{get, post},
};
use registrar_core::{DebugConfig, Registrar};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use errors::{AppError, AppResult};

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub registrar: Arc<dyn Registrar>,
    pub debug: DebugConfig,
}

impl AppState {
    pub fn new(registrar: Arc<dyn Registrar>, debug: DebugConfig) -> Self {
        Self { registrar, debug }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/domain-availability", get(handlers::domain_availability))
        .route("/purchase-domain", get(handlers::purchase_domain))
        .route("/domain-suggest", post(handlers::domain_suggest))
        .route("/list-dns", post(handlers::list_dns))
        .route("/put-dns", post(handlers::put_dns))
        .route("/tlds", get(handlers::tlds))
        .route("/purchase-schema", post(handlers::purchase_schema))
        .route("/purchase-agreement", post(handlers::purchase_agreement))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
