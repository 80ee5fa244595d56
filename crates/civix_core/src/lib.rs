//! civix_core — domain core for the Civix civic issue-reporting service.
//!
//! Citizens submit service requests against a jurisdiction's service catalog;
//! each submission is validated against the per-(jurisdiction, service)
//! attribute schema before anything is persisted. Storage and the image
//! moderation collaborator sit behind port traits so the same logic runs
//! against Postgres (`civix_postgres`) or the in-memory test doubles.

pub mod error;
pub mod memory;
pub mod ports;
pub mod schema;
pub mod service;
pub mod types;
pub mod validation;
