//! sqlx row types with `TryFrom` conversions into the pure core types.
//! The core types carry no sqlx derives; only this crate knows about rows.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use civix_core::types::{RequestStatus, Service, ServiceRequest};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgServiceRow {
    pub jurisdiction_id: String,
    pub service_code: String,
    pub service_name: String,
    pub description: Option<String>,
}

impl From<PgServiceRow> for Service {
    fn from(row: PgServiceRow) -> Self {
        Service {
            jurisdiction_id: row.jurisdiction_id,
            service_code: row.service_code,
            service_name: row.service_name,
            description: row.description,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgServiceRequestRow {
    pub service_request_id: Uuid,
    pub jurisdiction_id: String,
    pub service_code: String,
    pub status: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub selected_values: serde_json::Value,
    pub requested_at: DateTime<Utc>,
}

impl TryFrom<PgServiceRequestRow> for ServiceRequest {
    type Error = String;

    fn try_from(row: PgServiceRequestRow) -> Result<Self, Self::Error> {
        let status = RequestStatus::from_str(&row.status)
            .ok_or_else(|| format!("unknown request status: {}", row.status))?;
        let selected_values = serde_json::from_value(row.selected_values)
            .map_err(|e| format!("bad selected_values payload: {e}"))?;
        Ok(ServiceRequest {
            id: row.service_request_id,
            jurisdiction_id: row.jurisdiction_id,
            service_code: row.service_code,
            status,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            description: row.description,
            selected_values,
            requested_at: row.requested_at,
        })
    }
}
