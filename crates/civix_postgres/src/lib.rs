//! civix_postgres — Postgres implementations of the `civix_core` port
//! traits. All SQL is runtime-checked (`sqlx::query`, not `sqlx::query!`)
//! to avoid a compile-time database requirement.

mod sqlx_types;
mod store;

pub use store::{PgJurisdictionStore, PgServiceRequestStore, PgServiceStore, PgStores};
