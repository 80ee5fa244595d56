//! Core domain types — pure value types, no sqlx, no HTTP dependencies.

// Status uses `from_str() -> Option<Self>` instead of `FromStr` because it
// returns None for unknown values rather than an error.
#![allow(clippy::should_implement_trait)]

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Jurisdiction (tenant boundary) ────────────────────────────

/// A tenant — typically a municipality — owning its own service catalog
/// and service requests. Administered out-of-band; read-mostly here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub jurisdiction_id: String,
    pub name: String,
    /// Ordered lat/long pairs bounding the jurisdiction's territory.
    #[serde(default)]
    pub bounds: Vec<LatLong>,
    /// Host names this jurisdiction answers for (host-based tenant resolution).
    #[serde(default)]
    pub remote_hosts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    pub latitude: f64,
    pub longitude: f64,
}

// ── Service (catalog entry) ───────────────────────────────────

/// A category of reportable issue (e.g. "pothole"), identified by
/// `service_code` and scoped to one jurisdiction. Immutable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub jurisdiction_id: String,
    pub service_code: String,
    pub service_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ── Request status ────────────────────────────────────────────

/// Service request lifecycle status. No transition operations are exposed
/// by this core; management tooling owns transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Validated attribute values ────────────────────────────────

/// One validated, typed attribute value. Raw `attribute[KEY]` maps stop at
/// the HTTP boundary — everything past the validator carries this union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Number(Decimal),
    Timestamp(DateTime<Utc>),
    Choice(String),
    Choices(Vec<String>),
}

impl AttributeValue {
    /// The value(s) as display strings, for the serialization layer.
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::Text(s) | Self::Choice(s) => vec![s.clone()],
            Self::Number(n) => vec![n.to_string()],
            Self::Timestamp(t) => vec![t.to_rfc3339()],
            Self::Choices(vs) => vs.clone(),
        }
    }
}

/// One validated attribute-key/value pair attached to a service request.
/// The request exclusively owns its selected values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedValue {
    pub code: String,
    pub value: AttributeValue,
}

// ── ServiceRequest aggregate ──────────────────────────────────

/// A citizen-submitted report. Created once on submission; immutable in
/// this core's scope thereafter. References its jurisdiction and service
/// by identifier only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub jurisdiction_id: String,
    pub service_code: String,
    pub status: RequestStatus,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    /// Validated values in schema-declared order.
    pub selected_values: Vec<SelectedValue>,
    pub requested_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Construct a new request with a fresh id, `Open` status and the
    /// current timestamp. Performs no validation — the attribute validator
    /// runs before construction (see `validation`).
    pub fn new(
        jurisdiction_id: impl Into<String>,
        service_code: impl Into<String>,
        address: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        selected_values: Vec<SelectedValue>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            jurisdiction_id: jurisdiction_id.into(),
            service_code: service_code.into(),
            status: RequestStatus::Open,
            address,
            latitude,
            longitude,
            description: None,
            selected_values,
            requested_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

// Identity is by id.
impl PartialEq for ServiceRequest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceRequest {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        assert_eq!(RequestStatus::from_str("open"), Some(RequestStatus::Open));
        assert_eq!(
            RequestStatus::from_str("closed"),
            Some(RequestStatus::Closed)
        );
        assert_eq!(RequestStatus::from_str("reopened"), None);
        assert_eq!(RequestStatus::Open.to_string(), "open");
    }

    #[test]
    fn new_request_defaults() {
        let req = ServiceRequest::new(
            "city.gov",
            "001",
            Some("12345 Fairway".into()),
            None,
            None,
            vec![],
        );
        assert_eq!(req.status, RequestStatus::Open);
        assert_eq!(req.jurisdiction_id, "city.gov");
        assert!(req.selected_values.is_empty());
        assert!(req.description.is_none());
    }

    #[test]
    fn request_identity_is_by_id() {
        let a = ServiceRequest::new("city.gov", "001", None, Some(1.0), Some(2.0), vec![]);
        let mut b = a.clone();
        b.address = Some("somewhere else".into());
        assert_eq!(a, b);

        let c = ServiceRequest::new("city.gov", "001", None, Some(1.0), Some(2.0), vec![]);
        assert_ne!(a, c);
    }

    #[test]
    fn attribute_value_display_strings() {
        let num = AttributeValue::Number("5".parse().unwrap());
        assert_eq!(num.values(), vec!["5".to_string()]);

        let multi = AttributeValue::Choices(vec!["NARROW".into(), "CRACKED".into()]);
        assert_eq!(multi.values().len(), 2);

        let ts = AttributeValue::Timestamp(
            chrono::DateTime::parse_from_rfc3339("2015-04-14T11:07:36.639Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        assert!(ts.values()[0].starts_with("2015-04-14T11:07:36"));
    }

    #[test]
    fn attribute_value_serde_is_tagged() {
        let v = AttributeValue::Choice("NARROW".into());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["choice"], "NARROW");
        let back: AttributeValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }
}
