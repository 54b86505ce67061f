//! Test doubles for the GoDaddy adapter contract tests
//!
//! [`FakeGoDaddy`] serves canned replies keyed by `(method, path)` and
//! answers anything else with 404. Every request is recorded.

#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use registrar_core::TransportClient;
use registrar_godaddy::GoDaddyRegistrar;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const AUTHORIZATION: &str = "sso-key test-key:test-secret";

/// A request as seen by the fake API
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Seen {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone, Default)]
struct Routes {
    replies: Arc<HashMap<(String, String), (u16, String)>>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

/// Builder for the fake GoDaddy API
#[derive(Default)]
pub struct FakeGoDaddyBuilder {
    replies: HashMap<(String, String), (u16, String)>,
}

impl FakeGoDaddyBuilder {
    pub fn route(mut self, method: &str, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .insert((method.to_string(), path.to_string()), (status, body.into()));
        self
    }

    pub async fn start(self) -> FakeGoDaddy {
        let routes = Routes {
            replies: Arc::new(self.replies),
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let seen = Arc::clone(&routes.seen);

        let app = Router::new().fallback(serve).with_state(routes);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake api");
        let addr = listener.local_addr().expect("fake api address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake api serves");
        });

        FakeGoDaddy {
            base_url: format!("http://{}", addr),
            seen,
        }
    }
}

/// In-process stand-in for the GoDaddy domains API
pub struct FakeGoDaddy {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakeGoDaddy {
    pub fn builder() -> FakeGoDaddyBuilder {
        FakeGoDaddyBuilder::default()
    }

    /// Registrar pointed at this fake, authenticated with [`AUTHORIZATION`]
    pub fn registrar(&self) -> GoDaddyRegistrar {
        GoDaddyRegistrar::new(
            TransportClient::new().expect("transport client"),
            self.base_url.clone(),
            AUTHORIZATION,
        )
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    /// The only request received; panics unless exactly one arrived
    pub fn single(&self) -> Seen {
        let seen = self.seen();
        assert_eq!(seen.len(), 1, "expected exactly one upstream request: {seen:?}");
        seen.into_iter().next().unwrap()
    }
}

async fn serve(
    State(routes): State<Routes>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    routes.seen.lock().unwrap().push(Seen {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: body.to_vec(),
    });

    match routes
        .replies
        .get(&(method.to_string(), uri.path().to_string()))
    {
        Some((status, body)) => {
            let status = StatusCode::from_u16(*status).expect("valid status");
            (status, body.clone()).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            r#"{"code":"NOT_FOUND","message":"no such route"}"#,
        )
            .into_response(),
    }
}
