//! Wire DTOs for the Open311-style surface. JSON field names follow the
//! GeoReport conventions (`service_request_id`, `lat`, `long`,
//! `requested_datetime`); the XML renditions in `xml` reuse these structs.

use serde::Serialize;

use civix_core::schema::{ServiceDefinition, ServiceDefinitionAttribute};
use civix_core::types::{Jurisdiction, Service, ServiceRequest};

// ── Catalog ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ServiceDto {
    pub service_code: String,
    pub service_name: String,
    pub description: Option<String>,
}

impl From<Service> for ServiceDto {
    fn from(s: Service) -> Self {
        Self {
            service_code: s.service_code,
            service_name: s.service_name,
            description: s.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceDefinitionDto {
    pub service_code: String,
    pub attributes: Vec<AttributeDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeDto {
    pub code: String,
    pub description: String,
    pub datatype: String,
    pub required: bool,
    pub order: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<AttributeOptionDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeOptionDto {
    pub key: String,
    pub name: String,
}

impl From<ServiceDefinitionAttribute> for AttributeDto {
    fn from(a: ServiceDefinitionAttribute) -> Self {
        Self {
            code: a.code,
            description: a.description,
            datatype: a.kind.as_str().to_string(),
            required: a.required,
            order: a.order,
            values: a
                .options
                .into_iter()
                .map(|o| AttributeOptionDto {
                    key: o.key,
                    name: o.name,
                })
                .collect(),
        }
    }
}

impl From<ServiceDefinition> for ServiceDefinitionDto {
    fn from(d: ServiceDefinition) -> Self {
        Self {
            service_code: d.service_code,
            attributes: d.attributes.into_iter().map(AttributeDto::from).collect(),
        }
    }
}

// ── Service requests ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestDto {
    pub service_request_id: String,
    pub jurisdiction_id: String,
    pub service_code: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub requested_datetime: String,
    pub selected_values: Vec<SelectedValueDto>,
}

/// A validated attribute as display strings; typed values stop at the core.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedValueDto {
    pub code: String,
    pub values: Vec<String>,
}

impl From<ServiceRequest> for ServiceRequestDto {
    fn from(r: ServiceRequest) -> Self {
        Self {
            service_request_id: r.id.to_string(),
            jurisdiction_id: r.jurisdiction_id,
            service_code: r.service_code,
            status: r.status.as_str().to_string(),
            address: r.address,
            lat: r.latitude,
            long: r.longitude,
            description: r.description,
            requested_datetime: r.requested_at.to_rfc3339(),
            selected_values: r
                .selected_values
                .into_iter()
                .map(|sv| SelectedValueDto {
                    code: sv.code,
                    values: sv.value.values(),
                })
                .collect(),
        }
    }
}

// ── Jurisdiction (tenant config endpoint) ─────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionDto {
    pub jurisdiction_id: String,
    pub name: String,
    /// `[latitude, longitude]` pairs in declared order.
    pub bounds: Vec<[f64; 2]>,
}

impl From<Jurisdiction> for JurisdictionDto {
    fn from(j: Jurisdiction) -> Self {
        Self {
            jurisdiction_id: j.jurisdiction_id,
            name: j.name,
            bounds: j
                .bounds
                .into_iter()
                .map(|p| [p.latitude, p.longitude])
                .collect(),
        }
    }
}

// ── Discovery ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryDto {
    pub contact: String,
    pub changeset: String,
    pub endpoints: Vec<EndpointDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointDto {
    pub specification: String,
    pub url: String,
    pub changeset: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub formats: Vec<String>,
}
