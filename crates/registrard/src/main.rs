// # registrard - Registrar Adapter Daemon
//
// The registrard daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Registering registrar implementations and creating the configured one
// 4. Serving the HTTP surface until SIGTERM/SIGINT
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Server
// - `REGISTRAR_LISTEN_ADDR`: Listen address (default `0.0.0.0:11001`)
// - `REGISTRAR_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
//
// ### Registrar
// - `REGISTRAR_PROVIDER_TYPE`: Registrar type (default `godaddy`)
// - `REGISTRAR_API_BASE`: API base URL (default `https://api.ote-godaddy.com`)
// - `REGISTRAR_API_KEY` / `REGISTRAR_API_SECRET`: API credentials (optional)
// - `REGISTRAR_HTTP_TIMEOUT_SECS`: Per-request timeout (default 30)
// - `REGISTRAR_SUGGEST_LIMIT`: Suggestions requested per query (default 10)
//
// ### Debug endpoints
// - `REGISTRAR_DEBUG_DOMAIN`: Default domain of `/domain-availability`
// - `REGISTRAR_DEBUG_PURCHASE_DOMAIN`: Default domain of `/purchase-domain`
//
// ## Example
//
// ```bash
// export REGISTRAR_API_KEY=your_key
// export REGISTRAR_API_SECRET=your_secret
// export REGISTRAR_LOG_LEVEL=debug
//
// registrard
// ```

use anyhow::{Context, Result};
use registrar_core::{RegistrarRegistry, ServiceConfig};
use registrard::shutdown::{serve_until, wait_for_signal};
use registrard::{AppState, router};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum RegistrarExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<RegistrarExitCode> for ExitCode {
    fn from(code: RegistrarExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    service: ServiceConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let mut service = ServiceConfig::new();

        if let Ok(addr) = env::var("REGISTRAR_LISTEN_ADDR") {
            service.listen_addr = addr;
        }
        if let Ok(provider) = env::var("REGISTRAR_PROVIDER_TYPE") {
            service.registrar.provider = provider;
        }
        if let Ok(api_base) = env::var("REGISTRAR_API_BASE") {
            service.registrar.api_base = api_base;
        }
        service.registrar.api_key = env::var("REGISTRAR_API_KEY").ok().filter(|s| !s.is_empty());
        service.registrar.api_secret = env::var("REGISTRAR_API_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        if let Ok(timeout) = env::var("REGISTRAR_HTTP_TIMEOUT_SECS") {
            service.registrar.http_timeout_secs = timeout
                .parse()
                .with_context(|| format!("REGISTRAR_HTTP_TIMEOUT_SECS is not a number: {}", timeout))?;
        }
        if let Ok(limit) = env::var("REGISTRAR_SUGGEST_LIMIT") {
            service.registrar.suggest_limit = limit
                .parse()
                .with_context(|| format!("REGISTRAR_SUGGEST_LIMIT is not a number: {}", limit))?;
        }
        if let Ok(domain) = env::var("REGISTRAR_DEBUG_DOMAIN") {
            service.debug.availability_domain = domain;
        }
        if let Ok(domain) = env::var("REGISTRAR_DEBUG_PURCHASE_DOMAIN") {
            service.debug.purchase_domain = domain;
        }

        Ok(Self {
            service,
            log_level: env::var("REGISTRAR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.service.validate()?;

        if self.service.registrar.api_key.is_none() {
            eprintln!(
                "WARNING: REGISTRAR_API_KEY and REGISTRAR_API_SECRET are not set. \
                Registrar calls will be sent without an Authorization header."
            );
        }

        if self.service.registrar.api_base.starts_with("http://") {
            eprintln!(
                "WARNING: REGISTRAR_API_BASE uses HTTP (not HTTPS). \
                Credentials will be sent in clear text."
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "REGISTRAR_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return RegistrarExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return RegistrarExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RegistrarExitCode::ConfigError.into();
    }

    info!("Starting registrard daemon");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RegistrarExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let state = match build_state(&config.service) {
            Ok(state) => state,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return RegistrarExitCode::ConfigError;
            }
        };

        if let Err(e) = serve(&config.service.listen_addr, state).await {
            error!("Daemon error: {:#}", e);
            RegistrarExitCode::RuntimeError
        } else {
            RegistrarExitCode::CleanShutdown
        }
    })
    .into()
}

/// Create the configured registrar and the handler state around it
fn build_state(service: &ServiceConfig) -> Result<AppState> {
    let registry = RegistrarRegistry::new();

    #[cfg(feature = "godaddy")]
    {
        info!("Registering GoDaddy registrar");
        registrar_godaddy::register(&registry);
    }

    let registrar = registry
        .create_registrar(&service.registrar)
        .with_context(|| {
            format!(
                "Cannot create registrar '{}'. Available: {}",
                service.registrar.provider,
                registry.list_registrars().join(", ")
            )
        })?;

    info!(
        "Registrar: {} ({})",
        registrar.provider_name(),
        service.registrar.api_base
    );

    Ok(AppState::new(registrar, service.debug.clone()))
}

/// Serve the HTTP surface until a shutdown signal arrives
async fn serve(listen_addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;

    info!("Listening on {}", listen_addr);

    let signal = serve_until(listener, router(state), wait_for_signal()).await?;
    info!("Received shutdown signal: {}", signal);
    info!("Shutting down daemon");
    Ok(())
}
