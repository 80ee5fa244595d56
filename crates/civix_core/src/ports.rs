//! Storage and collaborator port traits. Implemented by `civix_postgres`
//! (and the server's SafeSearch client); core logic depends only on these.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CivicError;
use crate::schema::ServiceDefinition;
use crate::types::{Jurisdiction, RequestStatus, Service, ServiceRequest};

pub type Result<T> = std::result::Result<T, CivicError>;

/// Tenant lookups. Jurisdictions are administered out-of-band; this core
/// only reads them.
#[async_trait]
pub trait JurisdictionStore: Send + Sync {
    /// Load a jurisdiction by id. `NotFound` when absent.
    async fn find_by_id(&self, jurisdiction_id: &str) -> Result<Jurisdiction>;

    /// Resolve the jurisdiction declaring `host` among its remote hosts.
    /// `NotFound` when no jurisdiction answers for that host.
    async fn find_by_host(&self, host: &str) -> Result<Jurisdiction>;
}

/// Service catalog and attribute schema lookups.
#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Catalog entries of one jurisdiction, in catalog order.
    async fn list_services(&self, jurisdiction_id: &str) -> Result<Vec<Service>>;

    /// Ordered attribute schema for one (jurisdiction, service code) pair.
    /// `NotFound` when no service with that code exists in the jurisdiction.
    async fn find_definition(
        &self,
        jurisdiction_id: &str,
        service_code: &str,
    ) -> Result<ServiceDefinition>;
}

/// Rows returned by a listing when no explicit limit is given.
pub const DEFAULT_PAGE_SIZE: i64 = 200;

/// Optional filters for listing service requests. The jurisdiction is not a
/// filter — it is a mandatory scope, passed separately so an implementation
/// cannot accidentally produce a cross-tenant result.
#[derive(Debug, Clone, Default)]
pub struct RequestFilters {
    pub ids: Vec<Uuid>,
    pub service_code: Option<String>,
    pub status: Option<RequestStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl RequestFilters {
    /// Row cap every store applies: the explicit limit, or
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(0)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Persistence for service requests. Creation is atomic: a failed insert
/// leaves no partial row.
#[async_trait]
pub trait ServiceRequestStore: Send + Sync {
    /// Persist a freshly created request with its selected values.
    async fn insert(&self, request: &ServiceRequest) -> Result<()>;

    /// Requests of one jurisdiction, newest first, honoring `filters`.
    /// Every implementation caps the result at
    /// `filters.effective_limit()` — [`DEFAULT_PAGE_SIZE`] rows unless the
    /// caller asks for a different page size.
    async fn find_all(
        &self,
        jurisdiction_id: &str,
        filters: &RequestFilters,
    ) -> Result<Vec<ServiceRequest>>;

    /// One request scoped to a jurisdiction. `NotFound` when the id does
    /// not exist under that jurisdiction — including ids that exist under a
    /// different jurisdiction.
    async fn find_by_id(&self, jurisdiction_id: &str, id: Uuid) -> Result<ServiceRequest>;
}

/// External image moderation collaborator (Google Vision SafeSearch in
/// production). The lifecycle service treats a failure of this collaborator
/// as "not explicit" — see `CivicServiceImpl::create_service_request`.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// True when the image (base64 content) contains explicit material.
    async fn is_explicit(&self, image_base64: &str) -> Result<bool>;
}
