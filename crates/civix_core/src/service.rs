//! CivicService — the request lifecycle service.
//!
//! Takes port traits via `Arc<dyn PortTrait>` so the same logic works
//! against Postgres or the in-memory test doubles. The REST façade in
//! `civix_server` holds an `Arc<dyn CivicService>` and delegates all calls
//! here; wire formats stay in the façade.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CivicError;
use crate::ports::{
    ImageClassifier, JurisdictionStore, RequestFilters, Result, ServiceRequestStore, ServiceStore,
};
use crate::schema::ServiceDefinition;
use crate::types::{Jurisdiction, Service, ServiceRequest};
use crate::validation::{validate_attributes, RawAttributes};

/// Input for creating a service request, already stripped of wire-format
/// concerns by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct CreateServiceRequestInput {
    pub jurisdiction_id: String,
    pub service_code: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    /// Base64 image content; moderated before acceptance when present.
    pub media: Option<String>,
    pub attributes: RawAttributes,
}

// ── CivicService trait ────────────────────────────────────────

#[async_trait]
pub trait CivicService: Send + Sync {
    /// Create a service request: resolve the jurisdiction, load the schema,
    /// moderate embedded media, validate attributes, construct and persist.
    /// Atomic — a failed creation persists nothing.
    async fn create_service_request(
        &self,
        input: CreateServiceRequestInput,
    ) -> Result<ServiceRequest>;

    /// Requests of one jurisdiction, newest first. The jurisdiction id is
    /// mandatory: `BadRequest` when absent or blank.
    async fn find_service_requests(
        &self,
        jurisdiction_id: Option<&str>,
        filters: RequestFilters,
    ) -> Result<Vec<ServiceRequest>>;

    /// One request scoped to a jurisdiction; `NotFound` otherwise, even
    /// when the id exists under a different jurisdiction.
    async fn get_service_request(
        &self,
        jurisdiction_id: &str,
        id: Uuid,
    ) -> Result<ServiceRequest>;

    /// Catalog of one jurisdiction. `BadRequest` without a jurisdiction id.
    async fn list_services(&self, jurisdiction_id: Option<&str>) -> Result<Vec<Service>>;

    /// Ordered attribute schema for one (jurisdiction, service code) pair.
    async fn get_service_definition(
        &self,
        jurisdiction_id: &str,
        service_code: &str,
    ) -> Result<ServiceDefinition>;

    /// Tenant resolution by explicit id.
    async fn resolve_jurisdiction(&self, jurisdiction_id: &str) -> Result<Jurisdiction>;

    /// Tenant resolution from an inbound host name.
    async fn resolve_jurisdiction_by_host(&self, host: &str) -> Result<Jurisdiction>;
}

// ── CivicServiceImpl ──────────────────────────────────────────

/// Concrete implementation holding port trait references. Constructed at
/// startup in `civix_server/src/main.rs`.
pub struct CivicServiceImpl {
    jurisdictions: Arc<dyn JurisdictionStore>,
    services: Arc<dyn ServiceStore>,
    requests: Arc<dyn ServiceRequestStore>,
    classifier: Option<Arc<dyn ImageClassifier>>,
}

impl CivicServiceImpl {
    pub fn new(
        jurisdictions: Arc<dyn JurisdictionStore>,
        services: Arc<dyn ServiceStore>,
        requests: Arc<dyn ServiceRequestStore>,
    ) -> Self {
        Self {
            jurisdictions,
            services,
            requests,
            classifier: None,
        }
    }

    /// Wire the image moderation collaborator (builder pattern). Without
    /// one, submissions with media are accepted unmoderated.
    pub fn with_classifier(mut self, classifier: Arc<dyn ImageClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    fn require_jurisdiction(jurisdiction_id: Option<&str>) -> Result<&str> {
        match jurisdiction_id {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(CivicError::BadRequest("jurisdiction_id is required".into())),
        }
    }
}

#[async_trait]
impl CivicService for CivicServiceImpl {
    async fn create_service_request(
        &self,
        input: CreateServiceRequestInput,
    ) -> Result<ServiceRequest> {
        let jurisdiction_id = Self::require_jurisdiction(Some(&input.jurisdiction_id))?;
        let jurisdiction = self.jurisdictions.find_by_id(jurisdiction_id).await?;
        let definition = self
            .services
            .find_definition(&jurisdiction.jurisdiction_id, &input.service_code)
            .await?;

        let has_address = input
            .address
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty());
        let has_point = input.latitude.is_some() && input.longitude.is_some();
        if !has_address && !has_point {
            return Err(CivicError::BadRequest(
                "either an address or latitude and longitude must be provided".into(),
            ));
        }

        if let (Some(classifier), Some(media)) = (&self.classifier, &input.media) {
            match classifier.is_explicit(media).await {
                Ok(true) => {
                    return Err(CivicError::BadRequest(
                        "submitted media was rejected by content moderation".into(),
                    ))
                }
                Ok(false) => {}
                Err(err) => {
                    // Deliberate fail-open: a moderation outage must not
                    // block citizen submissions. See DESIGN.md.
                    tracing::warn!(
                        jurisdiction = %jurisdiction.jurisdiction_id,
                        error = %err,
                        "safe-search check failed; accepting submission unmoderated"
                    );
                }
            }
        }

        let selected = validate_attributes(&definition.attributes, &input.attributes)?;

        let request = ServiceRequest::new(
            jurisdiction.jurisdiction_id.clone(),
            input.service_code,
            input.address,
            input.latitude,
            input.longitude,
            selected,
        )
        .with_description(input.description);

        self.requests.insert(&request).await?;
        tracing::info!(
            id = %request.id,
            jurisdiction = %request.jurisdiction_id,
            service_code = %request.service_code,
            "created service request"
        );
        Ok(request)
    }

    async fn find_service_requests(
        &self,
        jurisdiction_id: Option<&str>,
        filters: RequestFilters,
    ) -> Result<Vec<ServiceRequest>> {
        let jurisdiction_id = Self::require_jurisdiction(jurisdiction_id)?;
        self.requests.find_all(jurisdiction_id, &filters).await
    }

    async fn get_service_request(
        &self,
        jurisdiction_id: &str,
        id: Uuid,
    ) -> Result<ServiceRequest> {
        let jurisdiction_id = Self::require_jurisdiction(Some(jurisdiction_id))?;
        self.requests.find_by_id(jurisdiction_id, id).await
    }

    async fn list_services(&self, jurisdiction_id: Option<&str>) -> Result<Vec<Service>> {
        let jurisdiction_id = Self::require_jurisdiction(jurisdiction_id)?;
        self.services.list_services(jurisdiction_id).await
    }

    async fn get_service_definition(
        &self,
        jurisdiction_id: &str,
        service_code: &str,
    ) -> Result<ServiceDefinition> {
        let jurisdiction_id = Self::require_jurisdiction(Some(jurisdiction_id))?;
        self.services
            .find_definition(jurisdiction_id, service_code)
            .await
    }

    async fn resolve_jurisdiction(&self, jurisdiction_id: &str) -> Result<Jurisdiction> {
        self.jurisdictions.find_by_id(jurisdiction_id).await
    }

    async fn resolve_jurisdiction_by_host(&self, host: &str) -> Result<Jurisdiction> {
        self.jurisdictions.find_by_host(host).await
    }
}
