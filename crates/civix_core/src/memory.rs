//! In-memory port implementations — test doubles and local development.
//!
//! Seeding happens through inherent methods rather than the port traits:
//! jurisdictions and catalogs are administered out-of-band in production,
//! so the traits expose no mutation for them.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CivicError;
use crate::ports::{
    JurisdictionStore, RequestFilters, Result, ServiceRequestStore, ServiceStore,
};
use crate::schema::ServiceDefinition;
use crate::types::{Jurisdiction, Service, ServiceRequest};

// ── Jurisdictions ─────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryJurisdictionStore {
    rows: Mutex<Vec<Jurisdiction>>,
}

impl InMemoryJurisdictionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, jurisdiction: Jurisdiction) {
        self.rows.lock().expect("lock poisoned").push(jurisdiction);
    }
}

#[async_trait]
impl JurisdictionStore for InMemoryJurisdictionStore {
    async fn find_by_id(&self, jurisdiction_id: &str) -> Result<Jurisdiction> {
        self.rows
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|j| j.jurisdiction_id == jurisdiction_id)
            .cloned()
            .ok_or_else(|| {
                CivicError::NotFound(format!("no jurisdiction with id: {jurisdiction_id}"))
            })
    }

    async fn find_by_host(&self, host: &str) -> Result<Jurisdiction> {
        self.rows
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|j| j.remote_hosts.iter().any(|h| h == host))
            .cloned()
            .ok_or_else(|| CivicError::NotFound(format!("no jurisdiction for host: {host}")))
    }
}

// ── Services + definitions ────────────────────────────────────

#[derive(Default)]
pub struct InMemoryServiceStore {
    services: Mutex<Vec<Service>>,
    definitions: Mutex<BTreeMap<(String, String), ServiceDefinition>>,
}

impl InMemoryServiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog entry with its attribute schema.
    pub fn seed(&self, service: Service, attributes: Vec<crate::schema::ServiceDefinitionAttribute>) {
        let key = (service.jurisdiction_id.clone(), service.service_code.clone());
        let definition = ServiceDefinition::new(service.service_code.clone(), attributes);
        self.services.lock().expect("lock poisoned").push(service);
        self.definitions
            .lock()
            .expect("lock poisoned")
            .insert(key, definition);
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn list_services(&self, jurisdiction_id: &str) -> Result<Vec<Service>> {
        Ok(self
            .services
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|s| s.jurisdiction_id == jurisdiction_id)
            .cloned()
            .collect())
    }

    async fn find_definition(
        &self,
        jurisdiction_id: &str,
        service_code: &str,
    ) -> Result<ServiceDefinition> {
        self.definitions
            .lock()
            .expect("lock poisoned")
            .get(&(jurisdiction_id.to_string(), service_code.to_string()))
            .cloned()
            .ok_or_else(|| {
                CivicError::NotFound(format!(
                    "no service with code {service_code} in jurisdiction {jurisdiction_id}"
                ))
            })
    }
}

// ── Service requests ──────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryServiceRequestStore {
    rows: Mutex<Vec<ServiceRequest>>,
}

impl InMemoryServiceRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows across all jurisdictions (for no-partial-write checks).
    pub fn count(&self) -> usize {
        self.rows.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl ServiceRequestStore for InMemoryServiceRequestStore {
    async fn insert(&self, request: &ServiceRequest) -> Result<()> {
        self.rows.lock().expect("lock poisoned").push(request.clone());
        Ok(())
    }

    async fn find_all(
        &self,
        jurisdiction_id: &str,
        filters: &RequestFilters,
    ) -> Result<Vec<ServiceRequest>> {
        let mut matches: Vec<ServiceRequest> = self
            .rows
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|r| r.jurisdiction_id == jurisdiction_id)
            .filter(|r| filters.ids.is_empty() || filters.ids.contains(&r.id))
            .filter(|r| {
                filters
                    .service_code
                    .as_deref()
                    .is_none_or(|code| r.service_code == code)
            })
            .filter(|r| filters.status.is_none_or(|s| r.status == s))
            .filter(|r| filters.start_date.is_none_or(|d| r.requested_at >= d))
            .filter(|r| filters.end_date.is_none_or(|d| r.requested_at <= d))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));

        Ok(matches
            .into_iter()
            .skip(filters.effective_offset() as usize)
            .take(filters.effective_limit() as usize)
            .collect())
    }

    async fn find_by_id(&self, jurisdiction_id: &str, id: Uuid) -> Result<ServiceRequest> {
        self.rows
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|r| r.jurisdiction_id == jurisdiction_id && r.id == id)
            .cloned()
            .ok_or_else(|| {
                CivicError::NotFound(format!(
                    "no service request with id {id} in jurisdiction {jurisdiction_id}"
                ))
            })
    }
}
