//! Civix HTTP server — an Open311-style REST façade over `civix_core`.
//!
//! Handlers stay thin: parse the wire format, delegate to the
//! `CivicService` trait, serialize the result. All domain rules live in
//! the core crate; all Postgres access behind the port traits.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod safesearch;
pub mod xml;
