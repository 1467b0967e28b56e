//! SAMAJ Core — domain models and the society hierarchy components.
//!
//! This crate provides:
//! - Domain models for the society → building → block → floor → unit
//!   hierarchy and its dependents ([`models`])
//! - The error taxonomy ([`error`])
//! - The document-store seam ([`store`]) implemented by `samaj-db`
//! - The reference matcher for the historically inconsistent society
//!   reference encodings ([`reference`])
//! - Hierarchy resolution, dependent collection, cascade deletion, and
//!   society aggregation ([`hierarchy`], [`dependents`], [`cascade`],
//!   [`aggregate`])

pub mod aggregate;
pub mod auth;
pub mod cascade;
pub mod dependents;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod reference;
pub mod response;
pub mod store;

pub use error::{SamajError, SamajResult};
