//! Postgres implementations of the civix_core port traits.
//!
//! Each adapter is a newtype wrapping `PgPool`. A service request row owns
//! its selected values as a JSONB column, so creation is a single INSERT
//! and the all-or-nothing contract holds without multi-statement
//! transactions.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use civix_core::error::CivicError;
use civix_core::ports::{
    JurisdictionStore, RequestFilters, Result, ServiceRequestStore, ServiceStore,
};
use civix_core::schema::{ServiceDefinition, ServiceDefinitionAttribute};
use civix_core::types::{Jurisdiction, LatLong, Service, ServiceRequest};

use crate::sqlx_types::{PgServiceRequestRow, PgServiceRow};

/// All adapters over one pool, built once at startup.
pub struct PgStores {
    pub jurisdictions: PgJurisdictionStore,
    pub services: PgServiceStore,
    pub requests: PgServiceRequestStore,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            jurisdictions: PgJurisdictionStore::new(pool.clone()),
            services: PgServiceStore::new(pool.clone()),
            requests: PgServiceRequestStore::new(pool),
        }
    }
}

// ── PgJurisdictionStore ───────────────────────────────────────

pub struct PgJurisdictionStore {
    pool: PgPool,
}

impl PgJurisdictionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach bounds and remote hosts to a bare (id, name) row.
    async fn hydrate(&self, jurisdiction_id: String, name: String) -> Result<Jurisdiction> {
        let bounds: Vec<(f64, f64)> = sqlx::query_as(
            r#"
            SELECT latitude, longitude
            FROM jurisdiction_bounds
            WHERE jurisdiction_id = $1
            ORDER BY ordinal
            "#,
        )
        .bind(&jurisdiction_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;

        let remote_hosts: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT host
            FROM remote_hosts
            WHERE jurisdiction_id = $1
            ORDER BY host
            "#,
        )
        .bind(&jurisdiction_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;

        Ok(Jurisdiction {
            jurisdiction_id,
            name,
            bounds: bounds
                .into_iter()
                .map(|(latitude, longitude)| LatLong {
                    latitude,
                    longitude,
                })
                .collect(),
            remote_hosts,
        })
    }
}

#[async_trait]
impl JurisdictionStore for PgJurisdictionStore {
    async fn find_by_id(&self, jurisdiction_id: &str) -> Result<Jurisdiction> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT jurisdiction_id, name
            FROM jurisdictions
            WHERE jurisdiction_id = $1
            "#,
        )
        .bind(jurisdiction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;

        match row {
            Some((id, name)) => self.hydrate(id, name).await,
            None => Err(CivicError::NotFound(format!(
                "no jurisdiction with id: {jurisdiction_id}"
            ))),
        }
    }

    async fn find_by_host(&self, host: &str) -> Result<Jurisdiction> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT j.jurisdiction_id, j.name
            FROM jurisdictions j
            JOIN remote_hosts h ON h.jurisdiction_id = j.jurisdiction_id
            WHERE h.host = $1
            "#,
        )
        .bind(host)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;

        match row {
            Some((id, name)) => self.hydrate(id, name).await,
            None => Err(CivicError::NotFound(format!(
                "no jurisdiction for host: {host}"
            ))),
        }
    }
}

// ── PgServiceStore ────────────────────────────────────────────

pub struct PgServiceStore {
    pool: PgPool,
}

impl PgServiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceStore for PgServiceStore {
    async fn list_services(&self, jurisdiction_id: &str) -> Result<Vec<Service>> {
        let rows = sqlx::query_as::<_, PgServiceRow>(
            r#"
            SELECT jurisdiction_id, service_code, service_name, description
            FROM services
            WHERE jurisdiction_id = $1
            ORDER BY service_code
            "#,
        )
        .bind(jurisdiction_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn find_definition(
        &self,
        jurisdiction_id: &str,
        service_code: &str,
    ) -> Result<ServiceDefinition> {
        let definition: Option<serde_json::Value> = sqlx::query_scalar(
            r#"
            SELECT definition
            FROM services
            WHERE jurisdiction_id = $1 AND service_code = $2
            "#,
        )
        .bind(jurisdiction_id)
        .bind(service_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;

        let definition = definition.ok_or_else(|| {
            CivicError::NotFound(format!(
                "no service with code {service_code} in jurisdiction {jurisdiction_id}"
            ))
        })?;

        let mut attributes: Vec<ServiceDefinitionAttribute> =
            serde_json::from_value(definition).map_err(|e| anyhow!(e))?;
        // Catalog-declared order, regardless of JSONB array order.
        attributes.sort_by_key(|a| a.order);
        Ok(ServiceDefinition::new(service_code, attributes))
    }
}

// ── PgServiceRequestStore ─────────────────────────────────────

pub struct PgServiceRequestStore {
    pool: PgPool,
}

impl PgServiceRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REQUEST_COLUMNS: &str = r#"
    service_request_id, jurisdiction_id, service_code, status,
    address, latitude, longitude, description, selected_values, requested_at
"#;

#[async_trait]
impl ServiceRequestStore for PgServiceRequestStore {
    async fn insert(&self, request: &ServiceRequest) -> Result<()> {
        let selected_values =
            serde_json::to_value(&request.selected_values).map_err(|e| anyhow!(e))?;
        sqlx::query(
            r#"
            INSERT INTO service_requests (
                service_request_id, jurisdiction_id, service_code, status,
                address, latitude, longitude, description, selected_values, requested_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.id)
        .bind(&request.jurisdiction_id)
        .bind(&request.service_code)
        .bind(request.status.as_str())
        .bind(&request.address)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.description)
        .bind(&selected_values)
        .bind(request.requested_at)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(())
    }

    async fn find_all(
        &self,
        jurisdiction_id: &str,
        filters: &RequestFilters,
    ) -> Result<Vec<ServiceRequest>> {
        let ids: Option<Vec<Uuid>> = if filters.ids.is_empty() {
            None
        } else {
            Some(filters.ids.clone())
        };
        let query = format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM service_requests
            WHERE jurisdiction_id = $1
              AND ($2::uuid[] IS NULL OR service_request_id = ANY($2))
              AND ($3::text IS NULL OR service_code = $3)
              AND ($4::text IS NULL OR status = $4)
              AND ($5::timestamptz IS NULL OR requested_at >= $5)
              AND ($6::timestamptz IS NULL OR requested_at <= $6)
            ORDER BY requested_at DESC
            LIMIT $7 OFFSET $8
            "#
        );
        let rows = sqlx::query_as::<_, PgServiceRequestRow>(&query)
            .bind(jurisdiction_id)
            .bind(ids)
            .bind(filters.service_code.as_deref())
            .bind(filters.status.map(|s| s.as_str()))
            .bind(filters.start_date)
            .bind(filters.end_date)
            .bind(filters.effective_limit())
            .bind(filters.effective_offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        rows.into_iter()
            .map(|r| {
                r.try_into()
                    .map_err(|e: String| CivicError::Internal(anyhow!(e)))
            })
            .collect()
    }

    async fn find_by_id(&self, jurisdiction_id: &str, id: Uuid) -> Result<ServiceRequest> {
        let query = format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM service_requests
            WHERE jurisdiction_id = $1 AND service_request_id = $2
            "#
        );
        let row = sqlx::query_as::<_, PgServiceRequestRow>(&query)
            .bind(jurisdiction_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        match row {
            Some(r) => r
                .try_into()
                .map_err(|e: String| CivicError::Internal(anyhow!(e))),
            None => Err(CivicError::NotFound(format!(
                "no service request with id {id} in jurisdiction {jurisdiction_id}"
            ))),
        }
    }
}
