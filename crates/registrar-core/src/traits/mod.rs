//! Core traits for the registrar adapter
//!
//! - [`Registrar`]: Business operations against a registrar API

pub mod registrar;

pub use registrar::{Registrar, RegistrarFactory};
