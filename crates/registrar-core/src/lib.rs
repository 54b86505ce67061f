// # registrar-core
//
// Core library for the registrar adapter service.
//
// ## Architecture Overview
//
// - **ServiceError / ErrorKind**: Closed error taxonomy with HTTP and RPC code translation
// - **TransportClient**: Single choke-point for outbound HTTP calls
// - **Registrar**: Trait for registrar API implementations (the adapter boundary)
// - **FanOut**: Concurrent fan-out aggregation with first-error cancellation
// - **RegistrarRegistry**: Plugin-based registry for registrar implementations
//
// ## Design Principles
//
// 1. **Single choke-point**: Every outbound call goes through `TransportClient`
// 2. **Classified errors**: Every failure carries exactly one `ErrorKind`
// 3. **Batching above the adapter**: `Registrar` operations are single-item;
//    multi-item requests fan out through `FanOut`
// 4. **Single attempt**: No retries, no caching

pub mod config;
pub mod error;
pub mod fanout;
pub mod registry;
pub mod traits;
pub mod transport;
pub mod types;

// Re-export core types for convenience
pub use config::{DebugConfig, RegistrarConfig, ServiceConfig};
pub use error::{ErrorKind, Result, RpcCode, ServiceError};
pub use fanout::{FanOut, SubTask, fan_out};
pub use registry::RegistrarRegistry;
pub use traits::{Registrar, RegistrarFactory};
pub use transport::{CallRequest, TransportClient};
pub use types::{
    AddressMailing, Consent, Contact, DNS_RECORD_TYPES, DnsRecord, DomainAvailability, Suggestion,
};
