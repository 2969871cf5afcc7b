//! Core domain + application logic for the chat SMS fallback router.
//!
//! This crate is transport-agnostic. The key-value store and the outbound
//! publish gateway live behind ports (traits) implemented by adapter crates
//! (or the built-in store adapters in [`store`]).

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod ports;
pub mod presence;
pub mod router;
pub mod store;

pub use errors::{Error, Result};
